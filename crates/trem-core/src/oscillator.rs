//! Phase-accumulating oscillator for modulation signals.
//!
//! Drives both the tremolo envelope and the rate modulator that sweeps the
//! tremolo frequency. Waveforms are pure functions of the phase, so the
//! only state is the accumulator itself.

use core::f32::consts::TAU;
use libm::{floorf, sinf};

/// Oscillator waveform.
///
/// The discriminant order matches the menu order of the pedal
/// (Sine, Triangle, Saw, Ramp, Square), so [`Waveform::from_index`] and
/// [`Waveform::index`] are stable for settings storage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Waveform {
    /// `sin(2π·phase)`
    #[default]
    Sine,
    /// Linear up/down ramp, −1 at phase 0, +1 at phase 0.5.
    Triangle,
    /// Falling sawtooth, +1 at phase 0 down to −1.
    Saw,
    /// Rising sawtooth, −1 at phase 0 up to +1.
    Ramp,
    /// +1 for the first half cycle, −1 for the second.
    Square,
}

impl Waveform {
    /// All waveforms in menu order.
    pub const ALL: [Waveform; 5] = [
        Waveform::Sine,
        Waveform::Triangle,
        Waveform::Saw,
        Waveform::Ramp,
        Waveform::Square,
    ];

    /// Waveform from menu index. Out-of-range indices fall back to `Sine`.
    pub const fn from_index(index: usize) -> Self {
        match index {
            1 => Waveform::Triangle,
            2 => Waveform::Saw,
            3 => Waveform::Ramp,
            4 => Waveform::Square,
            _ => Waveform::Sine,
        }
    }

    /// Menu index of this waveform.
    pub const fn index(self) -> usize {
        match self {
            Waveform::Sine => 0,
            Waveform::Triangle => 1,
            Waveform::Saw => 2,
            Waveform::Ramp => 3,
            Waveform::Square => 4,
        }
    }

    /// Display label.
    pub const fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "Sine",
            Waveform::Triangle => "Triangle",
            Waveform::Saw => "Saw",
            Waveform::Ramp => "Ramp",
            Waveform::Square => "Square",
        }
    }

    /// Case-insensitive lookup by label.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|w| w.name().eq_ignore_ascii_case(name))
    }

    /// Evaluate the bipolar waveform (−1.0 to 1.0) at `phase` in [0, 1).
    #[inline]
    pub fn evaluate(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => sinf(phase * TAU),
            Waveform::Triangle => {
                if phase < 0.5 {
                    4.0 * phase - 1.0
                } else {
                    3.0 - 4.0 * phase
                }
            }
            Waveform::Saw => 1.0 - 2.0 * phase,
            Waveform::Ramp => 2.0 * phase - 1.0,
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

/// Phase-accumulating oscillator.
///
/// Each call to [`process`](Self::process) advances the phase by
/// `frequency / sample_rate` (wrapping into [0, 1)) and returns the
/// waveform at the new phase scaled by the amplitude. With a frequency of
/// 0 the phase never moves and the output is constant.
///
/// Setters never fail: frequency is floored at 0 and amplitude is clamped
/// to [0, 1]. Non-finite values are treated as 0.
///
/// # Example
///
/// ```rust
/// use trem_core::{Oscillator, Waveform};
///
/// let mut osc = Oscillator::new(48000.0);
/// osc.set_frequency(2.0);
/// osc.set_waveform(Waveform::Triangle);
///
/// let value = osc.process();
/// assert!((-1.0..=1.0).contains(&value));
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    /// Current phase position [0.0, 1.0)
    phase: f32,
    /// Phase increment per sample
    phase_inc: f32,
    frequency: f32,
    amplitude: f32,
    sample_rate: f32,
    waveform: Waveform,
    /// Last value returned by `process`
    last: f32,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Oscillator {
    /// Create a stopped (0 Hz), full-amplitude sine oscillator.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: 0.0,
            frequency: 0.0,
            amplitude: 1.0,
            sample_rate,
            waveform: Waveform::Sine,
            last: 0.0,
        }
    }

    /// Set frequency in Hz. Negative and non-finite values become 0.
    #[inline]
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = if freq_hz.is_finite() {
            freq_hz.max(0.0)
        } else {
            0.0
        };
        self.update_increment();
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Set output amplitude, clamped to [0, 1].
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = if amplitude.is_finite() {
            amplitude.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Current amplitude.
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Set waveform. Takes effect on the next sample; phase is preserved.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Current waveform.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Set phase directly (0.0 - 1.0).
    ///
    /// 0.0 = 0°, 0.25 = 90°, 0.5 = 180°, 0.75 = 270°
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = if phase.is_finite() {
            phase - floorf(phase)
        } else {
            0.0
        };
    }

    /// Current phase (0.0 - 1.0).
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Reset phase to 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.last = 0.0;
    }

    /// Value returned by the most recent [`process`](Self::process) call.
    pub fn last(&self) -> f32 {
        self.last
    }

    /// Advance one sample and return the scaled waveform value at the new phase.
    #[inline]
    pub fn process(&mut self) -> f32 {
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= floorf(self.phase);
        }
        self.last = self.waveform.evaluate(self.phase) * self.amplitude;
        self.last
    }

    /// Advance one sample and return the value mapped to 0.0 - 1.0.
    ///
    /// The mapping is `(value + 1) / 2` on the amplitude-scaled output.
    #[inline]
    pub fn process_unipolar(&mut self) -> f32 {
        (self.process() + 1.0) * 0.5
    }

    /// Set sample rate, keeping the frequency in Hz.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_increment();
    }

    /// Current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn update_increment(&mut self) {
        self.phase_inc = if self.sample_rate > 0.0 {
            self.frequency / self.sample_rate
        } else {
            0.0
        };
    }
}
