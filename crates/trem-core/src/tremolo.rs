//! Tremolo unit: oscillator-driven amplitude modulation.
//!
//! The oscillator output is rescaled to a unipolar envelope in
//! `[1 - depth, 1]` and multiplied into the input:
//!
//! ```text
//! env    = 1 - depth * (1 - (osc + 1) / 2)
//! output = input * env
//! ```
//!
//! At depth 0 the envelope is exactly 1 (bit-exact passthrough); at depth 1
//! it swings the full 0..1 range. The envelope never exceeds 1, so the
//! output magnitude never exceeds the input magnitude.

use crate::oscillator::{Oscillator, Waveform};
use crate::{Effect, ParamDescriptor, ParameterInfo};

/// Lowest tremolo frequency reached by the rate knob, in Hz.
pub const RATE_BASE_HZ: f32 = 1.0;

/// Frequency added by the rate knob at full travel, in Hz.
pub const RATE_SPAN_MAX_HZ: f32 = 20.0;

/// How the tremolo frequency is driven.
///
/// Both types use the same [`Tremolo`] unit; `Harmonic` feeds its
/// frequency from a [`RateModulator`](crate::RateModulator) instead of the
/// static knob value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TremoloType {
    /// Fixed rate from the rate knob.
    #[default]
    Simple,
    /// Rate swept by the modulation oscillator.
    Harmonic,
}

impl TremoloType {
    /// All types in menu order.
    pub const ALL: [TremoloType; 2] = [TremoloType::Simple, TremoloType::Harmonic];

    /// Type from menu index. Out-of-range indices fall back to `Simple`.
    pub const fn from_index(index: usize) -> Self {
        match index {
            1 => TremoloType::Harmonic,
            _ => TremoloType::Simple,
        }
    }

    /// Menu index of this type.
    pub const fn index(self) -> usize {
        match self {
            TremoloType::Simple => 0,
            TremoloType::Harmonic => 1,
        }
    }

    /// Display label.
    pub const fn name(self) -> &'static str {
        match self {
            TremoloType::Simple => "Simple",
            TremoloType::Harmonic => "Harmonic",
        }
    }

    /// Case-insensitive lookup by label.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }
}

/// Tremolo effect unit.
///
/// Owns one [`Oscillator`] at full amplitude. Frequency and waveform are
/// forwarded to it; depth is clamped to [0, 1].
///
/// # Example
///
/// ```rust
/// use trem_core::{Effect, Tremolo, Waveform};
///
/// let mut tremolo = Tremolo::new(48000.0);
/// tremolo.set_frequency(5.0);
/// tremolo.set_depth(0.7);
/// tremolo.set_waveform(Waveform::Triangle);
///
/// let output = tremolo.process(0.5);
/// assert!(output.abs() <= 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Tremolo {
    osc: Oscillator,
    depth: f32,
    gain: f32,
}

impl Tremolo {
    /// Create a tremolo at [`RATE_BASE_HZ`] and 50% depth.
    pub fn new(sample_rate: f32) -> Self {
        let mut osc = Oscillator::new(sample_rate);
        osc.set_amplitude(1.0);
        osc.set_frequency(RATE_BASE_HZ);

        Self {
            osc,
            depth: 0.5,
            gain: 1.0,
        }
    }

    /// Set modulation depth, clamped to 0.0 - 1.0.
    #[inline]
    pub fn set_depth(&mut self, depth: f32) {
        self.depth = if depth.is_finite() {
            depth.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Current depth.
    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Set modulation frequency in Hz (floored at 0).
    #[inline]
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.osc.set_frequency(freq_hz);
    }

    /// Current modulation frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.osc.frequency()
    }

    /// Set waveform type.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.osc.set_waveform(waveform);
    }

    /// Current waveform.
    pub fn waveform(&self) -> Waveform {
        self.osc.waveform()
    }

    /// Advance the oscillator and return the envelope for this sample.
    ///
    /// Equivalent to `process(1.0)`; the pedal applies the same gain to
    /// both channels and shows it on the modulation LED.
    #[inline]
    pub fn next_gain(&mut self) -> f32 {
        let lfo_unipolar = self.osc.process_unipolar();
        self.gain = 1.0 - self.depth * (1.0 - lfo_unipolar);
        self.gain
    }

    /// Envelope computed by the most recent sample.
    pub fn gain(&self) -> f32 {
        self.gain
    }
}

impl Effect for Tremolo {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        input * self.next_gain()
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.osc.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.osc.reset();
        self.gain = 1.0;
    }
}

impl ParameterInfo for Tremolo {
    fn param_count(&self) -> usize {
        3
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(
                ParamDescriptor::rate_hz(0.0, RATE_BASE_HZ + RATE_SPAN_MAX_HZ, RATE_BASE_HZ)
                    .with_string_id("trem_rate"),
            ),
            1 => Some(ParamDescriptor::depth().with_string_id("trem_depth")),
            2 => Some(
                ParamDescriptor::choice("Waveform", "Wave", Waveform::ALL.len(), 0)
                    .with_string_id("trem_wave"),
            ),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.frequency(),
            1 => self.depth * 100.0,
            2 => self.waveform().index() as f32,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let Some(desc) = self.param_info(index) else {
            return;
        };
        let value = desc.clamp(value);
        match index {
            0 => self.set_frequency(value),
            1 => self.set_depth(value / 100.0),
            2 => self.set_waveform(Waveform::from_index(value as usize)),
            _ => {}
        }
    }
}
