//! Best-effort control-rate loop: menu edits and MIDI.
//!
//! Runs whenever the audio callback is idle. Each [`ControlLoop::poll`]
//! applies pending UI events, then (only if MIDI is enabled) drains the
//! MIDI queue, and finally publishes the resulting [`Settings`] to the
//! [`SettingsCell`] read by the audio callback. Nothing here touches audio
//! state directly.

use trem_core::{ParameterInfo, TremoloType, Waveform};

use crate::{ControlId, ControlMapper, Settings, SettingsCell};

/// A menu edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// Select the tremolo type.
    SetTremoloType(TremoloType),
    /// Select the tremolo waveform.
    SetTremoloWaveform(Waveform),
    /// Select the modulation oscillator waveform.
    SetModWaveform(Waveform),
    /// Check or uncheck "True Bypass".
    SetRelayBypass(bool),
    /// Check or uncheck "Midi".
    SetMidi(bool),
    /// Encoder turned on a menu item (a [`Settings`] parameter index).
    Step {
        /// Parameter index.
        param: usize,
        /// Encoder increments, negative for counter-clockwise.
        delta: i32,
    },
}

/// An inbound MIDI message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    /// Note on with non-zero velocity.
    NoteOn {
        /// Channel 0-15.
        channel: u8,
        /// Note number.
        note: u8,
        /// Velocity 1-127.
        velocity: u8,
    },
    /// Note off (including note on with velocity 0).
    NoteOff {
        /// Channel 0-15.
        channel: u8,
        /// Note number.
        note: u8,
    },
    /// Control change.
    ControlChange {
        /// Channel 0-15.
        channel: u8,
        /// Controller number 0-127.
        control: u8,
        /// Value 0-127.
        value: u8,
    },
    /// Any other message, by status byte.
    Other {
        /// Status byte.
        status: u8,
    },
}

impl MidiEvent {
    /// Decode one channel message from raw bytes.
    ///
    /// Returns `None` when the slice is empty, does not start with a status
    /// byte, or is too short for its status.
    ///
    /// # Example
    ///
    /// ```rust
    /// use trem_platform::MidiEvent;
    ///
    /// assert_eq!(
    ///     MidiEvent::parse(&[0xB0, 0x0A, 0x7F]),
    ///     Some(MidiEvent::ControlChange { channel: 0, control: 10, value: 127 })
    /// );
    /// assert_eq!(
    ///     MidiEvent::parse(&[0x91, 60, 0]),
    ///     Some(MidiEvent::NoteOff { channel: 1, note: 60 })
    /// );
    /// ```
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        if status & 0x80 == 0 {
            return None;
        }
        let channel = status & 0x0F;
        let event = match status & 0xF0 {
            0x80 => {
                let [note, _, ..] = *data else { return None };
                MidiEvent::NoteOff { channel, note }
            }
            0x90 => {
                let [note, velocity, ..] = *data else {
                    return None;
                };
                if velocity == 0 {
                    MidiEvent::NoteOff { channel, note }
                } else {
                    MidiEvent::NoteOn {
                        channel,
                        note,
                        velocity,
                    }
                }
            }
            0xB0 => {
                let [control, value, ..] = *data else {
                    return None;
                };
                MidiEvent::ControlChange {
                    channel,
                    control,
                    value,
                }
            }
            _ => MidiEvent::Other { status },
        };
        Some(event)
    }
}

/// A queue the control loop can pop events from.
///
/// Implemented for `VecDeque` with the `std` feature; firmware implements
/// it for its UART or ring buffer.
pub trait EventSource<T> {
    /// Pop the next pending event, if any.
    fn next_event(&mut self) -> Option<T>;
}

#[cfg(feature = "std")]
impl<T> EventSource<T> for std::collections::VecDeque<T> {
    fn next_event(&mut self) -> Option<T> {
        self.pop_front()
    }
}

/// What one [`ControlLoop::poll`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollReport {
    /// UI events applied.
    pub ui_events: usize,
    /// MIDI events drained (zero while MIDI is disabled).
    pub midi_events: usize,
    /// Whether the settings changed and were published.
    pub published: bool,
}

/// Control-rate state: current settings and the MIDI CC map.
///
/// `N` is the capacity of the CC map.
///
/// # Example
///
/// ```rust
/// use std::collections::VecDeque;
/// use trem_core::Waveform;
/// use trem_platform::{ControlLoop, MidiEvent, Settings, SettingsCell, UiEvent};
///
/// let cell = SettingsCell::default();
/// let mut control = ControlLoop::<4>::new(Settings::default());
/// control.map_cc(20, 1); // CC 20 -> tremolo waveform
///
/// let mut ui = VecDeque::from([UiEvent::SetModWaveform(Waveform::Ramp)]);
/// let mut midi = VecDeque::from([MidiEvent::ControlChange { channel: 0, control: 20, value: 127 }]);
///
/// let report = control.poll(&mut ui, &mut midi, &cell);
/// assert!(report.published);
/// assert_eq!(cell.load().mod_waveform, Waveform::Ramp);
/// assert_eq!(cell.load().tremolo_waveform, Waveform::Square);
/// ```
#[derive(Debug, Clone)]
pub struct ControlLoop<const N: usize> {
    settings: Settings,
    cc_map: ControlMapper<N>,
}

impl<const N: usize> ControlLoop<N> {
    /// Create a loop starting from `settings` with an empty CC map.
    pub const fn new(settings: Settings) -> Self {
        Self {
            settings,
            cc_map: ControlMapper::new(),
        }
    }

    /// Current settings.
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// The MIDI CC map.
    pub fn cc_map(&self) -> &ControlMapper<N> {
        &self.cc_map
    }

    /// Route CC number `cc` to the [`Settings`] parameter `param`.
    ///
    /// Returns `false` if the map is full or `param` does not exist.
    pub fn map_cc(&mut self, cc: u8, param: usize) -> bool {
        param < self.settings.param_count() && self.cc_map.map(ControlId::midi(cc), param)
    }

    /// Apply one UI event. Returns `true` if the settings changed.
    pub fn apply_ui(&mut self, event: UiEvent) -> bool {
        let before = self.settings;
        match event {
            UiEvent::SetTremoloType(t) => self.settings.tremolo_type = t,
            UiEvent::SetTremoloWaveform(w) => self.settings.tremolo_waveform = w,
            UiEvent::SetModWaveform(w) => self.settings.mod_waveform = w,
            UiEvent::SetRelayBypass(on) => self.settings.relay_bypass_enabled = on,
            UiEvent::SetMidi(on) => self.settings.midi_enabled = on,
            UiEvent::Step { param, delta } => {
                self.settings.step_param(param, delta);
            }
        }
        self.settings != before
    }

    /// Apply one MIDI event. Returns `true` if the settings changed.
    ///
    /// Only control changes on mapped CC numbers have an effect; the value
    /// is normalized by 127 and denormalized through the parameter's
    /// descriptor.
    pub fn handle_midi(&mut self, event: MidiEvent) -> bool {
        let MidiEvent::ControlChange { control, value, .. } = event else {
            return false;
        };
        let before = self.settings;
        self.cc_map
            .apply(ControlId::midi(control), f32::from(value) / 127.0, &mut self.settings);
        self.settings != before
    }

    /// Run one control-loop pass.
    ///
    /// Applies every pending UI event, then drains MIDI if (after the UI
    /// events) MIDI is enabled; while disabled, MIDI events stay queued.
    /// Publishes to `cell` when anything changed.
    pub fn poll<U, M>(&mut self, ui: &mut U, midi: &mut M, cell: &SettingsCell) -> PollReport
    where
        U: EventSource<UiEvent> + ?Sized,
        M: EventSource<MidiEvent> + ?Sized,
    {
        let mut report = PollReport::default();
        let mut changed = false;

        while let Some(event) = ui.next_event() {
            changed |= self.apply_ui(event);
            report.ui_events += 1;
        }

        if self.settings.midi_enabled {
            while let Some(event) = midi.next_event() {
                changed |= self.handle_midi(event);
                report.midi_events += 1;
            }
        }

        if changed {
            cell.store(self.settings);
            report.published = true;

            #[cfg(feature = "tracing")]
            tracing::debug!(settings = ?self.settings, "settings published");
        }

        report
    }

    /// Menu label of a settings parameter, for display.
    pub fn param_label(&self, param: usize) -> Option<&'static str> {
        self.settings.param_info(param).map(|desc| desc.name)
    }
}
