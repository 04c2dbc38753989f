//! Menu-level settings and their lock-free handoff to the audio callback.
//!
//! [`Settings`] is everything the menu (and MIDI) can change: tremolo type,
//! both waveforms and the two global switches. The control loop is the only
//! writer; the audio callback reads a copy at the start of each block.
//!
//! [`SettingsCell`] packs the whole struct into one `u32`, so a reader can
//! never observe half of one update and half of another.

use core::sync::atomic::{AtomicU32, Ordering};

use trem_core::{ParamDescriptor, ParameterInfo, TremoloType, Waveform};

/// Parameter index of the tremolo type.
pub const PARAM_TREMOLO_TYPE: usize = 0;
/// Parameter index of the tremolo waveform.
pub const PARAM_TREMOLO_WAVEFORM: usize = 1;
/// Parameter index of the modulation oscillator waveform.
pub const PARAM_MOD_WAVEFORM: usize = 2;
/// Parameter index of the true-bypass switch.
pub const PARAM_RELAY_BYPASS: usize = 3;
/// Parameter index of the MIDI switch.
pub const PARAM_MIDI: usize = 4;

const PARAM_COUNT: usize = 5;

const RELAY_BIT: u32 = 1 << 12;
const MIDI_BIT: u32 = 1 << 13;

/// Menu configuration consumed by the audio callback.
///
/// # Example
///
/// ```rust
/// use trem_core::{ParameterInfo, TremoloType, Waveform};
/// use trem_platform::Settings;
///
/// let mut settings = Settings::default();
/// assert_eq!(settings.tremolo_type, TremoloType::Simple);
///
/// let idx = settings.find_param_by_name("osc_wave").unwrap();
/// settings.set_param(idx, 4.0);
/// assert_eq!(settings.mod_waveform, Waveform::Square);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Settings {
    /// Fixed-rate or harmonic (rate-swept) tremolo.
    pub tremolo_type: TremoloType,
    /// Waveform of the tremolo oscillator.
    pub tremolo_waveform: Waveform,
    /// Waveform of the rate-modulation oscillator.
    pub mod_waveform: Waveform,
    /// Drive the bypass relay and mute lines.
    pub relay_bypass_enabled: bool,
    /// Drain MIDI input in the control loop.
    pub midi_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tremolo_type: TremoloType::Simple,
            tremolo_waveform: Waveform::Sine,
            mod_waveform: Waveform::Sine,
            relay_bypass_enabled: true,
            midi_enabled: true,
        }
    }
}

impl Settings {
    /// Pack into a single word.
    ///
    /// Layout: bits 0-3 tremolo type, 4-7 tremolo waveform, 8-11
    /// modulation waveform, bit 12 relay bypass, bit 13 MIDI.
    pub const fn pack(&self) -> u32 {
        let mut bits = self.tremolo_type.index() as u32
            | (self.tremolo_waveform.index() as u32) << 4
            | (self.mod_waveform.index() as u32) << 8;
        if self.relay_bypass_enabled {
            bits |= RELAY_BIT;
        }
        if self.midi_enabled {
            bits |= MIDI_BIT;
        }
        bits
    }

    /// Unpack a word produced by [`pack`](Self::pack).
    ///
    /// Out-of-range fields fall back to the first variant.
    pub const fn unpack(bits: u32) -> Self {
        Self {
            tremolo_type: TremoloType::from_index((bits & 0xF) as usize),
            tremolo_waveform: Waveform::from_index(((bits >> 4) & 0xF) as usize),
            mod_waveform: Waveform::from_index(((bits >> 8) & 0xF) as usize),
            relay_bypass_enabled: bits & RELAY_BIT != 0,
            midi_enabled: bits & MIDI_BIT != 0,
        }
    }

    /// Move a stepped parameter by `delta` steps, clamped at the ends.
    ///
    /// This is what an encoder turn on a menu item does. Returns `true` if
    /// the value changed.
    pub fn step_param(&mut self, index: usize, delta: i32) -> bool {
        let Some(desc) = self.param_info(index) else {
            return false;
        };
        let before = *self;
        let current = self.get_param(index);
        self.set_param(index, desc.clamp(current + delta as f32 * desc.step));
        *self != before
    }
}

impl ParameterInfo for Settings {
    fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            PARAM_TREMOLO_TYPE => Some(
                ParamDescriptor::choice("Type", "Type", TremoloType::ALL.len(), 0)
                    .with_string_id("trem_type"),
            ),
            PARAM_TREMOLO_WAVEFORM => Some(
                ParamDescriptor::choice("Waveform", "Wave", Waveform::ALL.len(), 0)
                    .with_string_id("trem_wave"),
            ),
            PARAM_MOD_WAVEFORM => Some(
                ParamDescriptor::choice("Osc Wave", "OscWave", Waveform::ALL.len(), 0)
                    .with_string_id("osc_wave"),
            ),
            PARAM_RELAY_BYPASS => Some(
                ParamDescriptor::toggle("True Bypass", "TrueByp", true)
                    .with_string_id("true_bypass"),
            ),
            PARAM_MIDI => Some(ParamDescriptor::toggle("Midi", "Midi", true).with_string_id("midi")),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            PARAM_TREMOLO_TYPE => self.tremolo_type.index() as f32,
            PARAM_TREMOLO_WAVEFORM => self.tremolo_waveform.index() as f32,
            PARAM_MOD_WAVEFORM => self.mod_waveform.index() as f32,
            PARAM_RELAY_BYPASS => f32::from(u8::from(self.relay_bypass_enabled)),
            PARAM_MIDI => f32::from(u8::from(self.midi_enabled)),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let Some(desc) = self.param_info(index) else {
            return;
        };
        let step = libm::roundf(desc.clamp(value)) as usize;
        match index {
            PARAM_TREMOLO_TYPE => self.tremolo_type = TremoloType::from_index(step),
            PARAM_TREMOLO_WAVEFORM => self.tremolo_waveform = Waveform::from_index(step),
            PARAM_MOD_WAVEFORM => self.mod_waveform = Waveform::from_index(step),
            PARAM_RELAY_BYPASS => self.relay_bypass_enabled = step != 0,
            PARAM_MIDI => self.midi_enabled = step != 0,
            _ => {}
        }
    }
}

/// Single-writer, single-reader settings handoff.
///
/// The control loop calls [`store`](Self::store); the audio callback calls
/// [`load`](Self::load) once per block. Both are one atomic word access,
/// so neither side can block the other.
///
/// # Example
///
/// ```rust
/// use trem_core::Waveform;
/// use trem_platform::{Settings, SettingsCell};
///
/// let cell = SettingsCell::new(Settings::default());
///
/// let mut edited = cell.load();
/// edited.tremolo_waveform = Waveform::Triangle;
/// cell.store(edited);
///
/// assert_eq!(cell.load().tremolo_waveform, Waveform::Triangle);
/// ```
#[derive(Debug)]
pub struct SettingsCell {
    packed: AtomicU32,
}

impl SettingsCell {
    /// Create a cell holding `settings`. Usable in a `static`.
    pub const fn new(settings: Settings) -> Self {
        Self {
            packed: AtomicU32::new(settings.pack()),
        }
    }

    /// Read the current settings (audio callback).
    #[inline]
    pub fn load(&self) -> Settings {
        Settings::unpack(self.packed.load(Ordering::Acquire))
    }

    /// Publish new settings (control loop).
    #[inline]
    pub fn store(&self, settings: Settings) {
        self.packed.store(settings.pack(), Ordering::Release);
    }
}

impl Default for SettingsCell {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
