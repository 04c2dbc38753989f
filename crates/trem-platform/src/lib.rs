//! Trem Platform - Pedal context, control surface and control-rate loop
//!
//! This crate sits between the DSP in `trem-core` and the hardware. It owns
//! the per-block audio entry point ([`Pedal`]), the control loop that turns
//! menu and MIDI input into [`Settings`], and the lock-free cell that hands
//! those settings to the audio callback.
//!
//! # Core Abstractions
//!
//! ## Control System
//!
//! - [`ControlId`] - Namespaced control identifier (hardware, MIDI)
//! - [`ControlType`] - Control type (knob, footswitch, LED, gate output)
//! - [`ControlState`] - Normalized control reading
//! - [`ids`] - The pedal's standard control ids
//!
//! ## Platform Controller
//!
//! - [`PlatformController`] - Trait implemented by the hardware (or a mock)
//! - [`ControlMapper`] - Maps controls to [`ParameterInfo`] indices
//!
//! ## Pedal
//!
//! - [`Pedal`] - All real-time state; one call per audio block
//! - [`Settings`] / [`SettingsCell`] - Menu configuration and its handoff
//! - [`ControlLoop`] - Best-effort loop applying UI and MIDI events
//!
//! # Control ID Namespaces
//!
//! Control IDs use a 16-bit identifier with namespace prefixes:
//!
//! - `0x00XX` - Hardware controls (knobs, footswitch, LEDs, relay, mute)
//! - `0x02XX` - MIDI controls (CC numbers)
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! trem-platform = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use trem_core::{TransitionKind, TransitionTimings};
//! use trem_platform::{BlockControls, Pedal, Settings};
//!
//! let sample_rate = 48000.0;
//! let mut pedal = Pedal::new(
//!     sample_rate,
//!     TransitionKind::HardSwitch,
//!     TransitionTimings::defaults(sample_rate),
//! );
//!
//! let input = [0.5f32; 4];
//! let (mut left, mut right) = ([0.0f32; 4], [0.0f32; 4]);
//! let controls = BlockControls {
//!     knobs: [0.25, 0.8, 0.0],
//!     footswitch_pressed: true,
//! };
//!
//! let report = pedal.process_block(
//!     Settings::default(),
//!     controls,
//!     (&input, &input),
//!     (&mut left, &mut right),
//! );
//! assert!(report.toggled);
//! assert!(report.hardware.mute);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod control_loop;
pub mod control_mapper;
pub mod pedal;
pub mod settings;

// Re-export trem-core types for convenience
pub use trem_core::{HardwareLines, ParamDescriptor, ParamUnit, ParameterInfo};

// Re-export main types at crate root
pub use control_loop::{ControlLoop, EventSource, MidiEvent, PollReport, UiEvent};
pub use control_mapper::ControlMapper;
pub use pedal::{BlockControls, BlockReport, KNOB_PARAMS, Pedal};
pub use settings::{Settings, SettingsCell};

/// Namespace identifiers for control sources.
pub mod namespace {
    /// Hardware controls (physical knobs, switches and outputs on the device).
    pub const HARDWARE: u16 = 0x0000;
    /// MIDI controls (CC numbers).
    pub const MIDI: u16 = 0x0200;
}

/// Standard control ids of the pedal.
pub mod ids {
    use super::{ControlId, ControlType};

    /// Knob 1: tremolo rate span.
    pub const KNOB_RATE: ControlId = ControlId::hardware(0x00);
    /// Knob 2: tremolo depth.
    pub const KNOB_DEPTH: ControlId = ControlId::hardware(0x01);
    /// Knob 3: modulation oscillator rate.
    pub const KNOB_MOD_RATE: ControlId = ControlId::hardware(0x02);
    /// All knobs in panel order.
    pub const KNOBS: [ControlId; 3] = [KNOB_RATE, KNOB_DEPTH, KNOB_MOD_RATE];

    /// Effect on/off footswitch.
    pub const FOOTSWITCH: ControlId = ControlId::hardware(0x10);

    /// LED showing whether the effect is on.
    pub const LED_EFFECT: ControlId = ControlId::hardware(0x20);
    /// LED following the tremolo envelope.
    pub const LED_ENVELOPE: ControlId = ControlId::hardware(0x21);

    /// Bypass relay drive line.
    pub const RELAY_BYPASS: ControlId = ControlId::hardware(0x30);
    /// Hardware mute drive line.
    pub const MUTE: ControlId = ControlId::hardware(0x31);

    /// Type of a standard control, `None` for unknown ids.
    ///
    /// ```rust
    /// use trem_platform::{ControlType, ids};
    ///
    /// assert_eq!(ids::control_type(ids::FOOTSWITCH), Some(ControlType::Footswitch));
    /// assert_eq!(ids::control_type(ids::MUTE), Some(ControlType::Gate));
    /// ```
    pub const fn control_type(id: ControlId) -> Option<ControlType> {
        if !id.is_hardware() {
            return None;
        }
        match id.index() {
            0x00..=0x02 => Some(ControlType::Knob),
            0x10 => Some(ControlType::Footswitch),
            0x20 | 0x21 => Some(ControlType::Led),
            0x30 | 0x31 => Some(ControlType::Gate),
            _ => None,
        }
    }
}

/// A namespaced control identifier.
///
/// The high byte is the namespace (source type), the low byte the control
/// index within that namespace.
///
/// # Example
///
/// ```rust
/// use trem_platform::ControlId;
///
/// let knob = ControlId::hardware(0x02);
/// assert_eq!(knob.raw(), 0x0002);
/// assert!(knob.is_hardware());
///
/// let cc = ControlId::midi(74);
/// assert_eq!(cc.raw(), 0x024A);
/// assert!(!cc.is_hardware());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(u16);

impl ControlId {
    /// Creates a ControlId from a raw 16-bit value.
    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Creates a hardware control ID (namespace 0x00XX).
    #[inline]
    pub const fn hardware(index: u8) -> Self {
        Self(namespace::HARDWARE | index as u16)
    }

    /// Creates a MIDI control ID (namespace 0x02XX) for a CC number.
    #[inline]
    pub const fn midi(cc: u8) -> Self {
        Self(namespace::MIDI | cc as u16)
    }

    /// Returns the raw 16-bit value.
    #[inline]
    pub const fn raw(&self) -> u16 {
        self.0
    }

    /// Returns the namespace portion (high byte).
    #[inline]
    pub const fn namespace(&self) -> u16 {
        self.0 & 0xFF00
    }

    /// Returns the index within the namespace (low byte).
    #[inline]
    pub const fn index(&self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// Returns true if this is a hardware control.
    #[inline]
    pub const fn is_hardware(&self) -> bool {
        self.namespace() == namespace::HARDWARE
    }
}

/// Physical control type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlType {
    /// Rotary knob with continuous value (0.0 to 1.0).
    Knob,
    /// Momentary footswitch (pressed = 1.0, released = 0.0).
    Footswitch,
    /// LED indicator (0.0 = off, 1.0 = full brightness).
    Led,
    /// Digital output line such as the relay or mute (0.0 = low, 1.0 = high).
    Gate,
}

/// Current reading of a control, normalized to 0.0 - 1.0.
///
/// # Example
///
/// ```rust
/// use trem_platform::ControlState;
///
/// assert!(ControlState::new(0.75).is_on());
/// assert!(!ControlState::new(0.25).is_on());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlState {
    /// Normalized control value (0.0 to 1.0).
    pub value: f32,
}

impl ControlState {
    /// Creates a control state.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self { value }
    }

    /// Whether a two-position control reads as on (value at or above 0.5).
    #[inline]
    pub fn is_on(&self) -> bool {
        self.value >= 0.5
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Seam to the pedal hardware.
///
/// The audio callback reads knobs and the footswitch and writes the LEDs,
/// relay and mute through this trait; see [`ids`] for the standard ids.
/// ADC scanning, debouncing and GPIO drive live in the implementation.
///
/// # Example
///
/// ```rust
/// use trem_platform::{ControlId, ControlState, ControlType, PlatformController, ids};
///
/// struct Panel {
///     knobs: [f32; 3],
///     footswitch: bool,
///     leds: [f32; 2],
/// }
///
/// impl PlatformController for Panel {
///     fn control_count(&self) -> usize { 4 }
///
///     fn control_id(&self, index: usize) -> Option<ControlId> {
///         match index {
///             0..=2 => Some(ids::KNOBS[index]),
///             3 => Some(ids::FOOTSWITCH),
///             _ => None,
///         }
///     }
///
///     fn control_type(&self, id: ControlId) -> Option<ControlType> {
///         ids::control_type(id)
///     }
///
///     fn read_control(&self, id: ControlId) -> Option<ControlState> {
///         match id {
///             ids::FOOTSWITCH => Some(ControlState::new(if self.footswitch { 1.0 } else { 0.0 })),
///             _ => ids::KNOBS
///                 .iter()
///                 .position(|&k| k == id)
///                 .map(|i| ControlState::new(self.knobs[i])),
///         }
///     }
///
///     fn write_control(&mut self, id: ControlId, value: f32) -> bool {
///         match id {
///             ids::LED_EFFECT => { self.leds[0] = value; true }
///             ids::LED_ENVELOPE => { self.leds[1] = value; true }
///             _ => false,
///         }
///     }
/// }
/// ```
pub trait PlatformController {
    /// Returns the total number of controls on this platform.
    fn control_count(&self) -> usize;

    /// Returns the control ID at the given index.
    ///
    /// Returns `None` if `index >= control_count()`.
    fn control_id(&self, index: usize) -> Option<ControlId>;

    /// Returns the type of the specified control.
    fn control_type(&self, id: ControlId) -> Option<ControlType>;

    /// Reads the current state of a control.
    ///
    /// Returns `None` if the control ID is not recognized or is not readable.
    fn read_control(&self, id: ControlId) -> Option<ControlState>;

    /// Writes a normalized value to an output control (LED or gate).
    ///
    /// Returns `false` if the control is not writable or not recognized.
    fn write_control(&mut self, id: ControlId, value: f32) -> bool;

    /// Refreshes input state from the hardware.
    ///
    /// Called at the start of each audio block.
    fn poll(&mut self) {}

    /// Applies pending output changes to the hardware.
    ///
    /// Called at the end of each audio block.
    fn flush(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_id_hardware() {
        let id = ControlId::hardware(0x05);
        assert_eq!(id.raw(), 0x0005);
        assert_eq!(id.namespace(), namespace::HARDWARE);
        assert_eq!(id.index(), 0x05);
        assert!(id.is_hardware());
    }

    #[test]
    fn test_control_id_midi() {
        let id = ControlId::midi(74);
        assert_eq!(id.raw(), 0x024A);
        assert_eq!(id.namespace(), namespace::MIDI);
        assert_eq!(id.index(), 74);
        assert!(!id.is_hardware());
    }

    #[test]
    fn test_control_id_from_raw() {
        let id = ControlId::from_raw(0x0205);
        assert_eq!(id.namespace(), namespace::MIDI);
        assert_eq!(id.index(), 0x05);
    }

    #[test]
    fn test_standard_ids() {
        for knob in ids::KNOBS {
            assert_eq!(ids::control_type(knob), Some(ControlType::Knob));
        }
        assert_eq!(ids::control_type(ids::LED_EFFECT), Some(ControlType::Led));
        assert_eq!(ids::control_type(ids::LED_ENVELOPE), Some(ControlType::Led));
        assert_eq!(ids::control_type(ids::RELAY_BYPASS), Some(ControlType::Gate));
        assert_eq!(ids::control_type(ControlId::hardware(0x7F)), None);
        assert_eq!(ids::control_type(ControlId::midi(0x00)), None);
    }

    #[test]
    fn test_control_state_is_on() {
        assert!(ControlState::new(1.0).is_on());
        assert!(ControlState::new(0.5).is_on());
        assert!(!ControlState::new(0.49).is_on());
        assert!(!ControlState::default().is_on());
    }
}
