//! The harmonic tremolo rate modulator.
//!
//! The "harmonic" tremolo sweeps its own rate: a second oscillator runs at
//! a slow, knob-controlled frequency and its output scales the span of the
//! tremolo frequency. [`RateModulator`] owns that second oscillator.

use crate::Oscillator;
use crate::oscillator::Waveform;

/// Lowest modulation oscillator frequency in Hz (knob fully down).
pub const MOD_FREQ_MIN_HZ: f32 = 0.01;

/// Frequency added across the knob travel, giving a 0.01–3.01 Hz range.
pub const MOD_FREQ_SPAN_HZ: f32 = 3.0;

/// Knob positions below this disable modulation (multiplier forced to 1.0).
pub const MOD_KNOB_FLOOR: f32 = 0.01;

/// Sweeps the tremolo rate from a slow second oscillator.
///
/// The oscillator runs at `0.01 + 3.0 · knob` Hz with amplitude fixed at 1.
/// Each sample it yields a rate multiplier; the caller computes the tremolo
/// frequency as `base_hz + span_hz · multiplier`. Below a knob position of
/// [`MOD_KNOB_FLOOR`] the multiplier is pinned to 1.0, so the tremolo runs
/// at the static knob frequency instead of crawling near zero.
///
/// The oscillator keeps advancing while pinned, so raising the knob again
/// resumes from a continuous phase.
///
/// # Example
///
/// ```rust
/// use trem_core::RateModulator;
///
/// let mut rate_mod = RateModulator::new(48000.0);
/// rate_mod.set_knob(0.0);
/// assert_eq!(rate_mod.next_multiplier(), 1.0);
///
/// rate_mod.set_knob(0.5);
/// let m = rate_mod.next_multiplier();
/// assert!((-1.0..=1.0).contains(&m));
/// ```
#[derive(Debug, Clone)]
pub struct RateModulator {
    osc: Oscillator,
    knob: f32,
    multiplier: f32,
}

impl RateModulator {
    /// Create a modulator with the knob fully down (modulation disabled).
    pub fn new(sample_rate: f32) -> Self {
        let mut osc = Oscillator::new(sample_rate);
        osc.set_amplitude(1.0);
        osc.set_frequency(MOD_FREQ_MIN_HZ);
        Self {
            osc,
            knob: 0.0,
            multiplier: 1.0,
        }
    }

    /// Set the controlling knob position (0.0 - 1.0, already curve-mapped).
    pub fn set_knob(&mut self, knob: f32) {
        self.knob = if knob.is_finite() {
            knob.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.osc
            .set_frequency(MOD_FREQ_MIN_HZ + self.knob * MOD_FREQ_SPAN_HZ);
    }

    /// Current knob position.
    pub fn knob(&self) -> f32 {
        self.knob
    }

    /// Whether the knob is above the floor and the multiplier sweeps.
    pub fn is_active(&self) -> bool {
        self.knob >= MOD_KNOB_FLOOR
    }

    /// Modulation oscillator frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.osc.frequency()
    }

    /// Set the modulation oscillator waveform.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.osc.set_waveform(waveform);
    }

    /// Current modulation oscillator waveform.
    pub fn waveform(&self) -> Waveform {
        self.osc.waveform()
    }

    /// Advance one sample and return the rate multiplier.
    #[inline]
    pub fn next_multiplier(&mut self) -> f32 {
        let value = self.osc.process();
        self.multiplier = if self.is_active() { value } else { 1.0 };
        self.multiplier
    }

    /// Update the sample rate of the modulation oscillator.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.osc.set_sample_rate(sample_rate);
    }

    /// Reset the oscillator phase.
    pub fn reset(&mut self) {
        self.osc.reset();
        self.multiplier = 1.0;
    }
}
