//! Core Effect trait.
//!
//! The [`Effect`] trait is the per-sample processing contract used by the
//! tremolo unit and anything else placed in the pedal's wet path.
//!
//! ## Design Decisions
//!
//! - **Mono processing**: Single `f32` input/output. The pedal runs two
//!   channels by applying one modulation gain to both.
//!
//! - **Object-safe**: `dyn Effect` works, but the pedal uses static dispatch.
//!
//! - **No allocations**: All methods are safe to call from the audio
//!   callback.

/// Core trait for all audio effects.
///
/// # Example
///
/// ```rust
/// use trem_core::Effect;
///
/// struct Gain {
///     gain: f32,
/// }
///
/// impl Effect for Gain {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.gain
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
/// ```
pub trait Effect {
    /// Process a single sample, advancing internal state by one sample.
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples.
    ///
    /// Default implementation calls `process()` for each sample.
    ///
    /// # Panics
    /// Debug builds panic if `input.len() != output.len()`.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            input.len(),
            output.len(),
            "Input and output buffers must have same length"
        );
        for (inp, out) in input.iter().zip(output.iter_mut()) {
            *out = self.process(*inp);
        }
    }

    /// Process a block of samples in-place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Update the sample rate and any rate-dependent state.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Reset internal state without changing parameters.
    fn reset(&mut self);
}
