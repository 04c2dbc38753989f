//! Effect on/off transition policies.
//!
//! Toggling the effect must not pop. Two strategies exist, depending on the
//! hardware:
//!
//! - [`HardSwitch`]: pedals with a true-bypass relay. On a toggle the
//!   hardware mute is asserted immediately, the relay flips after
//!   `bypass_toggle_samples`, and the mute releases after
//!   `mute_off_samples`. The relay click lands inside the mute window.
//! - [`Crossfade`]: pedals without a relay. Dry and wet signals are
//!   blended with a linear ramp over `crossfade_samples`.
//!
//! Both implement [`Transition`]: arm on a toggle edge, advance once per
//! sample, and report the current dry/wet [`Mix`] and [`HardwareLines`].
//! [`TransitionPolicy`] is the closed enum the pedal stores, chosen at
//! configuration time.
//!
//! # Sample timing
//!
//! Sample index `i` counts from the toggle edge (`i = 0` is the first sample
//! processed after [`Transition::arm`]). State observed *before* advancing
//! sample `i`:
//!
//! | Policy | Quantity | Value |
//! |--------|----------|-------|
//! | HardSwitch | `mute` | true for `0 <= i <= mute_off_samples` |
//! | HardSwitch | `bypass` | new value from `i = bypass_toggle_samples + 1` |
//! | Crossfade | mix at `i` | `fade = i / crossfade_samples` while `i < crossfade_samples` |
//! | Crossfade | `is_transitioning` | false once `i` reaches `crossfade_samples` |
//!
//! A second toggle during a transition re-arms from zero; nothing of the
//! previous sequence survives.

use crate::math::samples_for_duration;

/// Default hardware mute window (20 ms).
pub const DEFAULT_MUTE_OFF_SECONDS: f32 = 0.02;

/// Default delay before the bypass relay flips (10 ms).
pub const DEFAULT_BYPASS_TOGGLE_SECONDS: f32 = 0.01;

/// Default dry/wet crossfade window (250 ms).
pub const DEFAULT_CROSSFADE_SECONDS: f32 = 0.25;

/// Dry/wet gain pair applied to one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mix {
    /// Gain applied to the unprocessed input.
    pub dry: f32,
    /// Gain applied to the tremolo output.
    pub wet: f32,
}

impl Mix {
    /// Fully dry (effect off).
    pub const DRY: Mix = Mix { dry: 1.0, wet: 0.0 };
    /// Fully wet (effect on).
    pub const WET: Mix = Mix { dry: 0.0, wet: 1.0 };

    /// Settled mix for an effect state.
    #[inline]
    pub const fn settled(effect_on: bool) -> Self {
        if effect_on { Self::WET } else { Self::DRY }
    }

    /// Blend one dry and one wet sample.
    #[inline]
    pub fn apply(self, dry: f32, wet: f32) -> f32 {
        dry * self.dry + wet * self.wet
    }
}

/// Levels the bypass relay and hardware mute should be driven to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HardwareLines {
    /// Relay in bypass position (input wired straight to output).
    pub bypass: bool,
    /// Output muted.
    pub mute: bool,
}

impl HardwareLines {
    /// Both lines released (relay on the processing path, not muted).
    pub const RELEASED: HardwareLines = HardwareLines {
        bypass: false,
        mute: false,
    };
}

/// Per-sample contract shared by all transition policies.
pub trait Transition {
    /// Start a transition towards `effect_on` (called on a toggle edge).
    ///
    /// Re-arming during a transition restarts from the new edge.
    fn arm(&mut self, effect_on: bool);

    /// Advance one sample and return the mix for that sample.
    fn advance(&mut self) -> Mix;

    /// Mix that would apply without advancing.
    fn mix(&self) -> Mix;

    /// Current relay/mute levels.
    fn hardware(&self) -> HardwareLines;

    /// Whether a transition is still in flight.
    fn is_transitioning(&self) -> bool;

    /// Target effect state (the state most recently armed).
    fn effect_on(&self) -> bool;
}

/// Which transition policy the pedal runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum TransitionKind {
    /// Relay bypass with mute sequencing.
    #[default]
    HardSwitch,
    /// Linear dry/wet crossfade.
    Crossfade,
}

impl TransitionKind {
    /// Configuration label.
    pub const fn name(self) -> &'static str {
        match self {
            TransitionKind::HardSwitch => "hard_switch",
            TransitionKind::Crossfade => "crossfade",
        }
    }

    /// Lookup by configuration label (case-insensitive, `-` or `_`).
    pub fn from_name(name: &str) -> Option<Self> {
        [TransitionKind::HardSwitch, TransitionKind::Crossfade]
            .into_iter()
            .find(|k| {
                let label = k.name();
                label.len() == name.len()
                    && label
                        .bytes()
                        .zip(name.bytes())
                        .all(|(a, b)| a == b.to_ascii_lowercase() || (a == b'_' && b == b'-'))
            })
    }
}

/// Transition windows expressed in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTimings {
    /// Samples the hardware mute stays asserted after a toggle.
    pub mute_off_samples: u32,
    /// Samples before the bypass relay flips after a toggle.
    pub bypass_toggle_samples: u32,
    /// Length of the dry/wet crossfade.
    pub crossfade_samples: u32,
}

impl TransitionTimings {
    /// Convert windows given in seconds, rounding to whole samples.
    ///
    /// # Example
    ///
    /// ```rust
    /// use trem_core::TransitionTimings;
    ///
    /// let t = TransitionTimings::from_seconds(48000.0, 0.02, 0.01, 0.25);
    /// assert_eq!(t.mute_off_samples, 960);
    /// assert_eq!(t.bypass_toggle_samples, 480);
    /// assert_eq!(t.crossfade_samples, 12000);
    /// ```
    pub fn from_seconds(
        sample_rate: f32,
        mute_off_seconds: f32,
        bypass_toggle_seconds: f32,
        crossfade_seconds: f32,
    ) -> Self {
        Self {
            mute_off_samples: samples_for_duration(sample_rate, mute_off_seconds),
            bypass_toggle_samples: samples_for_duration(sample_rate, bypass_toggle_seconds),
            crossfade_samples: samples_for_duration(sample_rate, crossfade_seconds),
        }
    }

    /// Default windows (20 ms mute, 10 ms relay, 250 ms crossfade).
    pub fn defaults(sample_rate: f32) -> Self {
        Self::from_seconds(
            sample_rate,
            DEFAULT_MUTE_OFF_SECONDS,
            DEFAULT_BYPASS_TOGGLE_SECONDS,
            DEFAULT_CROSSFADE_SECONDS,
        )
    }
}

/// Relay bypass sequencer with hardware mute.
///
/// Two countdowns armed on each toggle edge. While muted, both decrement
/// every sample; the relay flips to `!effect_on` when the bypass countdown
/// drops below zero and the mute releases when the mute countdown does.
/// The dry/wet mix switches at the edge itself, under the mute.
///
/// The bypass window is clamped to the mute window so the relay always
/// moves while the output is muted.
///
/// # Example
///
/// ```rust
/// use trem_core::{HardSwitch, Transition};
///
/// let mut seq = HardSwitch::new(4, 2, false);
/// seq.arm(true);
/// assert!(seq.hardware().mute);
///
/// for _ in 0..3 {
///     seq.advance();
/// }
/// assert!(!seq.hardware().bypass); // relay flipped after 3 samples
/// ```
#[derive(Debug, Clone)]
pub struct HardSwitch {
    effect_on: bool,
    bypass_on: bool,
    mute_on: bool,
    samples_til_mute_off: i64,
    samples_til_bypass_toggle: i64,
    mute_off_samples: u32,
    bypass_toggle_samples: u32,
}

impl HardSwitch {
    /// Create a settled sequencer: unmuted, relay matching `effect_on`.
    pub fn new(mute_off_samples: u32, bypass_toggle_samples: u32, effect_on: bool) -> Self {
        Self {
            effect_on,
            bypass_on: !effect_on,
            mute_on: false,
            samples_til_mute_off: 0,
            samples_til_bypass_toggle: 0,
            mute_off_samples,
            bypass_toggle_samples: bypass_toggle_samples.min(mute_off_samples),
        }
    }

    /// Mute window in samples.
    pub fn mute_off_samples(&self) -> u32 {
        self.mute_off_samples
    }

    /// Relay delay in samples (after clamping to the mute window).
    pub fn bypass_toggle_samples(&self) -> u32 {
        self.bypass_toggle_samples
    }

    /// Remaining mute countdown.
    pub fn samples_til_mute_off(&self) -> i64 {
        self.samples_til_mute_off
    }

    /// Remaining relay countdown.
    pub fn samples_til_bypass_toggle(&self) -> i64 {
        self.samples_til_bypass_toggle
    }
}

impl Transition for HardSwitch {
    fn arm(&mut self, effect_on: bool) {
        self.effect_on = effect_on;
        self.mute_on = true;
        self.samples_til_mute_off = i64::from(self.mute_off_samples);
        self.samples_til_bypass_toggle = i64::from(self.bypass_toggle_samples);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            effect_on,
            mute_off_samples = self.mute_off_samples,
            bypass_toggle_samples = self.bypass_toggle_samples,
            "hard switch armed"
        );
    }

    #[inline]
    fn advance(&mut self) -> Mix {
        if self.mute_on {
            self.samples_til_mute_off -= 1;
            self.samples_til_bypass_toggle -= 1;

            if self.samples_til_mute_off < 0 {
                self.mute_on = false;
            }

            // Relay must move while still muted or the click is audible.
            if self.samples_til_bypass_toggle < 0 {
                self.bypass_on = !self.effect_on;
            }
        }
        self.mix()
    }

    #[inline]
    fn mix(&self) -> Mix {
        Mix::settled(self.effect_on)
    }

    fn hardware(&self) -> HardwareLines {
        HardwareLines {
            bypass: self.bypass_on,
            mute: self.mute_on,
        }
    }

    fn is_transitioning(&self) -> bool {
        self.mute_on
    }

    fn effect_on(&self) -> bool {
        self.effect_on
    }
}

/// Linear dry/wet crossfade sequencer.
///
/// On a toggle the ramp restarts at zero towards the new state. While
/// crossfading, sample `i` uses `fade = i / crossfade_samples`:
/// towards effect-on `dry = 1 - fade, wet = fade`, towards effect-off the
/// complement. `dry + wet == 1` throughout. When the counter reaches the
/// window length the crossfade ends and the mix settles to pure dry or
/// pure wet.
///
/// The relay line simply follows `!effect_on`; there is no mute sequence.
///
/// # Example
///
/// ```rust
/// use trem_core::{Crossfade, Transition};
///
/// let mut fade = Crossfade::new(4, false);
/// fade.arm(true);
///
/// let first = fade.advance();
/// assert_eq!(first.dry, 1.0);
/// let second = fade.advance();
/// assert_eq!(second.wet, 0.25);
/// ```
#[derive(Debug, Clone)]
pub struct Crossfade {
    effect_on: bool,
    crossfading: bool,
    crossfading_to_effect_on: bool,
    samples_since_toggle: u32,
    crossfade_samples: u32,
    mix: Mix,
}

impl Crossfade {
    /// Create a settled crossfader.
    pub fn new(crossfade_samples: u32, effect_on: bool) -> Self {
        Self {
            effect_on,
            crossfading: false,
            crossfading_to_effect_on: effect_on,
            samples_since_toggle: 0,
            crossfade_samples,
            mix: Mix::settled(effect_on),
        }
    }

    /// Crossfade window in samples.
    pub fn crossfade_samples(&self) -> u32 {
        self.crossfade_samples
    }

    /// Samples advanced since the last toggle edge.
    pub fn samples_since_toggle(&self) -> u32 {
        self.samples_since_toggle
    }

    /// Direction of the current (or last) crossfade.
    pub fn crossfading_to_effect_on(&self) -> bool {
        self.crossfading_to_effect_on
    }
}

impl Transition for Crossfade {
    fn arm(&mut self, effect_on: bool) {
        self.effect_on = effect_on;
        self.samples_since_toggle = 0;
        self.crossfading = true;
        self.crossfading_to_effect_on = effect_on;
        self.mix = Mix::settled(!effect_on);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            effect_on,
            crossfade_samples = self.crossfade_samples,
            "crossfade armed"
        );
    }

    #[inline]
    fn advance(&mut self) -> Mix {
        if self.crossfading {
            if self.samples_since_toggle < self.crossfade_samples {
                let fade = self.samples_since_toggle as f32 / self.crossfade_samples as f32;
                self.mix = if self.crossfading_to_effect_on {
                    Mix {
                        dry: 1.0 - fade,
                        wet: fade,
                    }
                } else {
                    Mix {
                        dry: fade,
                        wet: 1.0 - fade,
                    }
                };
                self.samples_since_toggle += 1;
            } else {
                self.crossfading = false;
                self.mix = Mix::settled(self.effect_on);
            }
        }
        self.mix
    }

    #[inline]
    fn mix(&self) -> Mix {
        self.mix
    }

    fn hardware(&self) -> HardwareLines {
        HardwareLines {
            bypass: !self.effect_on,
            mute: false,
        }
    }

    fn is_transitioning(&self) -> bool {
        self.crossfading
    }

    fn effect_on(&self) -> bool {
        self.effect_on
    }
}

/// The transition policy selected at configuration time.
///
/// Closed set of variants dispatched by `match`, so the audio path has no
/// virtual calls.
#[derive(Debug, Clone)]
pub enum TransitionPolicy {
    /// Relay bypass with mute sequencing.
    HardSwitch(HardSwitch),
    /// Linear dry/wet crossfade.
    Crossfade(Crossfade),
}

impl TransitionPolicy {
    /// Build the policy for `kind` from sample-count timings, settled at `effect_on`.
    pub fn new(kind: TransitionKind, timings: &TransitionTimings, effect_on: bool) -> Self {
        match kind {
            TransitionKind::HardSwitch => TransitionPolicy::HardSwitch(HardSwitch::new(
                timings.mute_off_samples,
                timings.bypass_toggle_samples,
                effect_on,
            )),
            TransitionKind::Crossfade => {
                TransitionPolicy::Crossfade(Crossfade::new(timings.crossfade_samples, effect_on))
            }
        }
    }

    /// Which variant this is.
    pub fn kind(&self) -> TransitionKind {
        match self {
            TransitionPolicy::HardSwitch(_) => TransitionKind::HardSwitch,
            TransitionPolicy::Crossfade(_) => TransitionKind::Crossfade,
        }
    }
}

impl Transition for TransitionPolicy {
    fn arm(&mut self, effect_on: bool) {
        match self {
            TransitionPolicy::HardSwitch(t) => t.arm(effect_on),
            TransitionPolicy::Crossfade(t) => t.arm(effect_on),
        }
    }

    #[inline]
    fn advance(&mut self) -> Mix {
        match self {
            TransitionPolicy::HardSwitch(t) => t.advance(),
            TransitionPolicy::Crossfade(t) => t.advance(),
        }
    }

    fn mix(&self) -> Mix {
        match self {
            TransitionPolicy::HardSwitch(t) => t.mix(),
            TransitionPolicy::Crossfade(t) => t.mix(),
        }
    }

    fn hardware(&self) -> HardwareLines {
        match self {
            TransitionPolicy::HardSwitch(t) => t.hardware(),
            TransitionPolicy::Crossfade(t) => t.hardware(),
        }
    }

    fn is_transitioning(&self) -> bool {
        match self {
            TransitionPolicy::HardSwitch(t) => t.is_transitioning(),
            TransitionPolicy::Crossfade(t) => t.is_transitioning(),
        }
    }

    fn effect_on(&self) -> bool {
        match self {
            TransitionPolicy::HardSwitch(t) => t.effect_on(),
            TransitionPolicy::Crossfade(t) => t.effect_on(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_switch_initial_state() {
        let seq = HardSwitch::new(960, 480, false);
        assert_eq!(
            seq.hardware(),
            HardwareLines {
                bypass: true,
                mute: false
            }
        );
        assert_eq!(seq.mix(), Mix::DRY);
        assert!(!seq.is_transitioning());
    }

    #[test]
    fn test_hard_switch_48k_sequence() {
        let timings = TransitionTimings::defaults(48000.0);
        let mut seq = HardSwitch::new(
            timings.mute_off_samples,
            timings.bypass_toggle_samples,
            false,
        );
        seq.arm(true);

        let mut bypass_flip = None;
        let mut mute_clear = None;
        for i in 0..2000u32 {
            let lines = seq.hardware();
            if bypass_flip.is_none() && !lines.bypass {
                bypass_flip = Some(i);
            }
            if mute_clear.is_none() && !lines.mute {
                mute_clear = Some(i);
            }
            seq.advance();
        }

        assert_eq!(bypass_flip, Some(481));
        assert_eq!(mute_clear, Some(961));
    }

    #[test]
    fn test_hard_switch_mix_switches_at_edge() {
        let mut seq = HardSwitch::new(10, 5, false);
        seq.arm(true);
        assert_eq!(seq.advance(), Mix::WET);
        seq.arm(false);
        assert_eq!(seq.advance(), Mix::DRY);
    }

    #[test]
    fn test_hard_switch_rearm_restarts_countdowns() {
        let mut seq = HardSwitch::new(10, 5, false);
        seq.arm(true);
        for _ in 0..8 {
            seq.advance();
        }
        // Relay already moved to the effect path.
        assert!(!seq.hardware().bypass);

        seq.arm(false);
        assert_eq!(seq.samples_til_mute_off(), 10);
        assert_eq!(seq.samples_til_bypass_toggle(), 5);
        for _ in 0..5 {
            seq.advance();
            assert!(!seq.hardware().bypass, "relay must hold until the new countdown expires");
        }
        seq.advance();
        assert!(seq.hardware().bypass);
    }

    #[test]
    fn test_hard_switch_clamps_bypass_to_mute() {
        let seq = HardSwitch::new(10, 50, false);
        assert_eq!(seq.bypass_toggle_samples(), 10);
    }

    #[test]
    fn test_crossfade_halfway_48k() {
        let timings = TransitionTimings::defaults(48000.0);
        let mut fade = Crossfade::new(timings.crossfade_samples, false);
        fade.arm(true);

        let mut mix = fade.mix();
        for _ in 0..=6000 {
            mix = fade.advance();
        }
        assert!((mix.dry - 0.5).abs() < 1e-4);
        assert!((mix.wet - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_crossfade_ends_at_window() {
        let mut fade = Crossfade::new(100, false);
        fade.arm(true);
        for i in 0..100 {
            assert!(fade.is_transitioning(), "still fading at sample {}", i);
            let mix = fade.advance();
            assert!((mix.dry + mix.wet - 1.0).abs() < 1e-6);
        }
        assert_eq!(fade.samples_since_toggle(), 100);
        assert_eq!(fade.advance(), Mix::WET);
        assert!(!fade.is_transitioning());
    }

    #[test]
    fn test_crossfade_towards_off_starts_wet() {
        let mut fade = Crossfade::new(100, true);
        fade.arm(false);
        assert_eq!(fade.advance(), Mix::WET);
        let next = fade.advance();
        assert!((next.dry - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_crossfade_rearm_restarts_ramp() {
        let mut fade = Crossfade::new(100, false);
        fade.arm(true);
        for _ in 0..60 {
            fade.advance();
        }
        fade.arm(false);
        assert_eq!(fade.samples_since_toggle(), 0);
        assert!(!fade.crossfading_to_effect_on());
        assert_eq!(fade.advance(), Mix::WET);
    }

    #[test]
    fn test_crossfade_zero_window_is_instant() {
        let mut fade = Crossfade::new(0, false);
        fade.arm(true);
        assert_eq!(fade.advance(), Mix::WET);
        assert!(!fade.is_transitioning());
    }

    #[test]
    fn test_crossfade_relay_follows_state() {
        let mut fade = Crossfade::new(10, false);
        assert!(fade.hardware().bypass);
        fade.arm(true);
        assert_eq!(fade.hardware(), HardwareLines::RELEASED);
    }

    #[test]
    fn test_policy_dispatch() {
        let timings = TransitionTimings::defaults(48000.0);
        let mut policy = TransitionPolicy::new(TransitionKind::Crossfade, &timings, false);
        assert_eq!(policy.kind(), TransitionKind::Crossfade);
        policy.arm(true);
        assert!(policy.is_transitioning());
        assert!(policy.effect_on());

        let policy = TransitionPolicy::new(TransitionKind::HardSwitch, &timings, true);
        assert_eq!(policy.kind(), TransitionKind::HardSwitch);
        assert_eq!(policy.mix(), Mix::WET);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(TransitionKind::from_name("crossfade"), Some(TransitionKind::Crossfade));
        assert_eq!(TransitionKind::from_name("Hard-Switch"), Some(TransitionKind::HardSwitch));
        assert_eq!(TransitionKind::from_name("relay"), None);
    }

    #[test]
    fn test_mix_apply() {
        let mix = Mix { dry: 0.25, wet: 0.75 };
        assert!((mix.apply(1.0, 0.0) - 0.25).abs() < 1e-6);
        assert!((mix.apply(0.0, 1.0) - 0.75).abs() < 1e-6);
    }
}
