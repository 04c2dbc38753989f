//! Time conversions for the transition windows.
//!
//! `no_std` compatible; rounding goes through `libm`.

use libm::roundf;

/// Number of whole samples covering `seconds` at `sample_rate`.
///
/// Computed as `round(sample_rate * seconds)`. Negative, NaN or infinite
/// products yield 0 so a misconfigured window degrades to "instant"
/// instead of a stuck transition.
///
/// # Example
/// ```rust
/// use trem_core::samples_for_duration;
///
/// assert_eq!(samples_for_duration(48000.0, 0.02), 960);
/// assert_eq!(samples_for_duration(48000.0, 0.25), 12000);
/// assert_eq!(samples_for_duration(48000.0, -1.0), 0);
/// ```
#[inline]
pub fn samples_for_duration(sample_rate: f32, seconds: f32) -> u32 {
    let samples = roundf(sample_rate * seconds);
    if samples.is_finite() && samples > 0.0 {
        samples as u32
    } else {
        0
    }
}
