//! Parameter introspection for knob, menu and MIDI mapping.
//!
//! Every adjustable quantity on the pedal (tremolo rate and depth, the
//! waveform menus, the bypass options) is described by a
//! [`ParamDescriptor`]. Controllers only ever produce normalized values in
//! 0.0 - 1.0; the descriptor turns them into plain values with
//! [`denormalize`](ParamDescriptor::denormalize), applying the knob curve.
//!
//! # Example
//!
//! ```rust
//! use trem_core::{ParameterInfo, ParamDescriptor};
//!
//! struct Level {
//!     level: f32,
//! }
//!
//! impl ParameterInfo for Level {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::depth().with_string_id("lvl")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         match index {
//!             0 => self.level,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if index == 0 {
//!             self.level = value.clamp(0.0, 100.0);
//!         }
//!     }
//! }
//!
//! let level = Level { level: 25.0 };
//! assert_eq!(level.find_param_by_name("lvl"), Some(0));
//! ```

use libm::{powf, roundf};

/// Scaling curve for parameter normalization.
///
/// - **Linear**: `value = min + t * (max - min)`
/// - **Power(exp)**: `value = min + t.powf(exp) * (max - min)`
///
/// `Power(2.0)` is the "exponential" knob taper: more resolution at the
/// bottom of the travel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParamScale {
    /// Linear mapping (default). Equal resolution across the range.
    #[default]
    Linear,
    /// Power curve mapping with configurable exponent.
    /// exponent > 1.0 → more resolution at low end.
    Power(f32),
}

/// Parameter capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Parameter has discrete steps (enum-like, integer values).
    pub const STEPPED: Self = Self(1 << 0);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Trait for anything exposing introspectable parameters.
///
/// Parameters are accessed by zero-based index, stable for the lifetime of
/// the instance. `set_param` must clamp; out-of-range indices are ignored.
pub trait ParameterInfo {
    /// Returns the number of parameters.
    fn param_count(&self) -> usize;

    /// Returns the descriptor for the parameter at the given index.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Gets the current plain value of the parameter at the given index.
    ///
    /// Returns `0.0` for out-of-range indices.
    fn get_param(&self, index: usize) -> f32;

    /// Sets the plain value of the parameter at the given index.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter index by name (case-insensitive).
    ///
    /// Matches [`ParamDescriptor::name`], [`ParamDescriptor::short_name`]
    /// and [`ParamDescriptor::string_id`].
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|desc| {
                desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name)
                    || (!desc.string_id.is_empty() && desc.string_id.eq_ignore_ascii_case(name))
            })
        })
    }

    /// Sets a parameter from a normalized (0.0 - 1.0) controller value.
    ///
    /// Returns `false` if the index is out of range.
    fn set_param_normalized(&mut self, index: usize, normalized: f32) -> bool {
        match self.param_info(index) {
            Some(desc) => {
                self.set_param(index, desc.denormalize(normalized));
                true
            }
            None => false,
        }
    }
}

/// Describes a single parameter's metadata for display and mapping.
///
/// `short_name` should be 8 characters or less for the pedal's OLED.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Rate", "Osc Wave").
    pub name: &'static str,
    /// Short name for hardware displays, max 8 characters.
    pub short_name: &'static str,
    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,
    /// Minimum allowed value.
    pub min: f32,
    /// Maximum allowed value.
    pub max: f32,
    /// Default value.
    pub default: f32,
    /// Recommended step increment for encoder-based control.
    pub step: f32,
    /// Stable identifier used by configuration files (e.g., `"trem_wave"`).
    pub string_id: &'static str,
    /// Normalization curve.
    pub scale: ParamScale,
    /// Capability flags.
    pub flags: ParamFlags,
}

impl ParamDescriptor {
    /// Standard depth parameter (0–100%, default 50%).
    pub const fn depth() -> Self {
        Self {
            name: "Depth",
            short_name: "Depth",
            unit: ParamUnit::Percent,
            min: 0.0,
            max: 100.0,
            default: 50.0,
            step: 1.0,
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::NONE,
        }
    }

    /// Rate parameter in Hz with a linear taper.
    pub const fn rate_hz(min: f32, max: f32, default: f32) -> Self {
        Self {
            name: "Rate",
            short_name: "Rate",
            unit: ParamUnit::Hertz,
            min,
            max,
            default,
            step: 0.05,
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::NONE,
        }
    }

    /// Discrete choice among `count` options (value = option index).
    pub const fn choice(
        name: &'static str,
        short_name: &'static str,
        count: usize,
        default: usize,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min: 0.0,
            max: (count.saturating_sub(1)) as f32,
            default: default as f32,
            step: 1.0,
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::STEPPED,
        }
    }

    /// On/off switch (0.0 = off, 1.0 = on).
    pub const fn toggle(name: &'static str, short_name: &'static str, default: bool) -> Self {
        Self::choice(name, short_name, 2, default as usize)
    }

    /// Sets the stable string ID.
    pub const fn with_string_id(mut self, string_id: &'static str) -> Self {
        self.string_id = string_id;
        self
    }

    /// Sets the normalization scale.
    pub const fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the display name and short name.
    pub const fn with_name(mut self, name: &'static str, short_name: &'static str) -> Self {
        self.name = name;
        self.short_name = short_name;
        self
    }

    /// Whether the parameter only takes integer steps.
    #[inline]
    pub const fn is_stepped(&self) -> bool {
        self.flags.contains(ParamFlags::STEPPED)
    }

    /// Clamps a value to this parameter's valid range.
    ///
    /// Non-finite values clamp to the default.
    ///
    /// # Example
    ///
    /// ```rust
    /// use trem_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::rate_hz(0.0, 20.0, 5.0);
    /// assert_eq!(desc.clamp(10.0), 10.0);
    /// assert_eq!(desc.clamp(-1.0), 0.0);
    /// assert_eq!(desc.clamp(100.0), 20.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if !value.is_finite() {
            self.default
        } else if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Converts a normalized value (0.0 to 1.0) to the plain range.
    ///
    /// Stepped parameters round to the nearest step; input outside
    /// 0.0 - 1.0 is clamped first.
    ///
    /// # Example
    ///
    /// ```rust
    /// use trem_core::{ParamDescriptor, ParamScale};
    ///
    /// let knob = ParamDescriptor::rate_hz(0.0, 1.0, 0.0).with_scale(ParamScale::Power(2.0));
    /// assert!((knob.denormalize(0.5) - 0.25).abs() < 1e-6);
    /// ```
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let t = if normalized.is_finite() {
            normalized.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let curved = match self.scale {
            ParamScale::Linear => t,
            ParamScale::Power(exp) => powf(t, exp),
        };
        let value = self.min + curved * (self.max - self.min);
        if self.is_stepped() && self.step > 0.0 {
            let steps = roundf((value - self.min) / self.step);
            self.clamp(self.min + steps * self.step)
        } else {
            value
        }
    }
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Hertz (Hz) - tremolo and modulation rates.
    Hertz,
    /// Milliseconds (ms) - transition windows.
    Milliseconds,
    /// Percentage (%) - depth.
    Percent,
    /// No unit - choices and switches.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// # Example
    ///
    /// ```rust
    /// use trem_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Hertz.suffix(), " Hz");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Hertz => " Hz",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Percent => "%",
            ParamUnit::None => "",
        }
    }
}
