//! The pedal context: all real-time state and the per-block entry point.
//!
//! [`Pedal`] owns the tremolo, the rate modulator and the transition policy.
//! The audio callback calls [`Pedal::process_block`] (or
//! [`Pedal::run_block`] when it talks to a [`PlatformController`]) once per
//! block. Per block:
//!
//! 1. Knob values are mapped onto the oscillators; they hold for the block.
//! 2. A footswitch rising edge flips the effect and arms the transition.
//! 3. The relay and mute levels are sampled once.
//! 4. Samples are processed in order. Each sample advances the rate
//!    modulator, the tremolo and the transition, then mixes dry and wet.
//!
//! Both oscillators run every sample whether the effect is on or off, so
//! the modulation phase is continuous across toggles.

use trem_core::{
    Effect, HardwareLines, ParamDescriptor, ParamFlags, ParamScale, ParamUnit, RATE_BASE_HZ,
    RATE_SPAN_MAX_HZ, RateModulator, Transition, TransitionKind, TransitionPolicy,
    TransitionTimings, Tremolo, TremoloType,
};

use crate::{PlatformController, Settings, ids};

/// Descriptors of the three knobs, in panel order.
///
/// - Knob 1: tremolo rate span, 0 - 20 Hz, linear. The tremolo runs at
///   `1 Hz + span · multiplier`.
/// - Knob 2: depth, 0 - 100 %, linear.
/// - Knob 3: modulation rate position, 0 - 1 with a squared taper.
pub const KNOB_PARAMS: [ParamDescriptor; 3] = [
    ParamDescriptor::rate_hz(0.0, RATE_SPAN_MAX_HZ, 0.0)
        .with_name("Rate", "Rate")
        .with_string_id("rate"),
    ParamDescriptor::depth().with_string_id("depth"),
    ParamDescriptor {
        name: "Mod Rate",
        short_name: "ModRate",
        unit: ParamUnit::None,
        min: 0.0,
        max: 1.0,
        default: 0.0,
        step: 0.01,
        string_id: "mod_rate",
        scale: ParamScale::Power(2.0),
        flags: ParamFlags::NONE,
    },
];

/// Control readings sampled once per block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BlockControls {
    /// Normalized knob positions (0.0 - 1.0), panel order.
    pub knobs: [f32; 3],
    /// Debounced footswitch level.
    pub footswitch_pressed: bool,
}

/// What a block produced besides audio.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BlockReport {
    /// LED brightness: effect on, tremolo envelope.
    pub leds: [f32; 2],
    /// Relay and mute levels to drive.
    pub hardware: HardwareLines,
    /// Whether this block saw a footswitch edge.
    pub toggled: bool,
}

/// All real-time pedal state.
///
/// Created once at startup and mutated only by the audio callback.
///
/// # Example
///
/// ```rust
/// use trem_core::{TransitionKind, TransitionTimings};
/// use trem_platform::{BlockControls, Pedal, Settings};
///
/// let mut pedal = Pedal::new(48000.0, TransitionKind::Crossfade, TransitionTimings::defaults(48000.0));
/// let input = [0.25f32; 4];
/// let (mut l, mut r) = ([0.0f32; 4], [0.0f32; 4]);
///
/// let report = pedal.process_block(
///     Settings::default(),
///     BlockControls::default(),
///     (&input, &input),
///     (&mut l, &mut r),
/// );
/// assert!(!pedal.effect_on());
/// assert_eq!(l, input); // bypassed
/// assert_eq!(report.leds, [0.0, 0.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Pedal {
    sample_rate: f32,
    tremolo: Tremolo,
    rate_mod: RateModulator,
    transition: TransitionPolicy,
    timings: TransitionTimings,
    rate_span_hz: f32,
    controls: BlockControls,
    envelope: f32,
}

impl Pedal {
    /// Create a pedal with the effect off and the transition settled.
    pub fn new(sample_rate: f32, kind: TransitionKind, timings: TransitionTimings) -> Self {
        let mut tremolo = Tremolo::new(sample_rate);
        tremolo.set_depth(0.0);

        Self {
            sample_rate,
            tremolo,
            rate_mod: RateModulator::new(sample_rate),
            transition: TransitionPolicy::new(kind, &timings, false),
            timings,
            rate_span_hz: 0.0,
            controls: BlockControls::default(),
            envelope: 1.0,
        }
    }

    /// Sample rate the pedal was built for.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Whether the effect is (or is transitioning to) on.
    pub fn effect_on(&self) -> bool {
        self.transition.effect_on()
    }

    /// The active transition policy.
    pub fn transition(&self) -> &TransitionPolicy {
        &self.transition
    }

    /// Transition windows in samples.
    pub fn timings(&self) -> TransitionTimings {
        self.timings
    }

    /// The tremolo unit.
    pub fn tremolo(&self) -> &Tremolo {
        &self.tremolo
    }

    /// The rate modulator.
    pub fn rate_modulator(&self) -> &RateModulator {
        &self.rate_mod
    }

    /// Tremolo rate span set by knob 1, in Hz.
    pub fn rate_span_hz(&self) -> f32 {
        self.rate_span_hz
    }

    /// Envelope of the most recently processed sample.
    pub fn envelope(&self) -> f32 {
        self.envelope
    }

    /// Controls seen by the most recent block.
    pub fn controls(&self) -> BlockControls {
        self.controls
    }

    /// Reset oscillator phases and settle the transition in its current state.
    pub fn reset(&mut self) {
        self.tremolo.reset();
        self.rate_mod.reset();
        self.transition =
            TransitionPolicy::new(self.transition.kind(), &self.timings, self.effect_on());
        self.envelope = 1.0;
    }

    /// Process one block.
    ///
    /// `input` and `output` are (left, right) slices, normally of the same
    /// length. If they differ, only the shortest length is processed and
    /// any output past it is zeroed.
    pub fn process_block(
        &mut self,
        settings: Settings,
        controls: BlockControls,
        input: (&[f32], &[f32]),
        output: (&mut [f32], &mut [f32]),
    ) -> BlockReport {
        let (in_l, in_r) = input;
        let (out_l, out_r) = output;
        let frames = in_l.len().min(in_r.len()).min(out_l.len()).min(out_r.len());
        let (out_l, tail_l) = out_l.split_at_mut(frames);
        let (out_r, tail_r) = out_r.split_at_mut(frames);
        tail_l.fill(0.0);
        tail_r.fill(0.0);

        self.apply_controls(settings, &controls);

        let toggled = controls.footswitch_pressed && !self.controls.footswitch_pressed;
        self.controls = controls;
        if toggled {
            let effect_on = !self.transition.effect_on();
            self.transition.arm(effect_on);

            #[cfg(feature = "tracing")]
            tracing::debug!(
                effect_on,
                transition = self.transition.kind().name(),
                "effect toggled"
            );
        }

        let hardware = if settings.relay_bypass_enabled {
            self.transition.hardware()
        } else {
            HardwareLines::RELEASED
        };

        let harmonic = settings.tremolo_type == TremoloType::Harmonic;
        let frames = in_l.iter().zip(in_r.iter()).zip(out_l.iter_mut().zip(out_r.iter_mut()));
        for ((&dry_l, &dry_r), (left, right)) in frames {
            let sweep = self.rate_mod.next_multiplier();
            let multiplier = if harmonic { sweep } else { 1.0 };
            self.tremolo
                .set_frequency(RATE_BASE_HZ + self.rate_span_hz * multiplier);

            let gain = self.tremolo.next_gain();
            let mix = self.transition.advance();
            *left = mix.apply(dry_l, dry_l * gain);
            *right = mix.apply(dry_r, dry_r * gain);
            self.envelope = gain;
        }

        let effect_on = self.transition.effect_on();
        BlockReport {
            leds: [
                if effect_on { 1.0 } else { 0.0 },
                if effect_on { self.envelope } else { 0.0 },
            ],
            hardware,
            toggled,
        }
    }

    /// Process one block against a hardware controller.
    ///
    /// Polls the controller, reads knobs and footswitch (keeping the last
    /// known value for any control that does not answer), runs
    /// [`process_block`](Self::process_block), then writes the LEDs, relay
    /// and mute and flushes.
    pub fn run_block<C: PlatformController + ?Sized>(
        &mut self,
        controller: &mut C,
        settings: Settings,
        input: (&[f32], &[f32]),
        output: (&mut [f32], &mut [f32]),
    ) -> BlockReport {
        controller.poll();

        let mut controls = self.controls;
        for (knob, id) in controls.knobs.iter_mut().zip(ids::KNOBS) {
            if let Some(state) = controller.read_control(id) {
                *knob = state.value;
            }
        }
        if let Some(state) = controller.read_control(ids::FOOTSWITCH) {
            controls.footswitch_pressed = state.is_on();
        }

        let report = self.process_block(settings, controls, input, output);

        controller.write_control(ids::LED_EFFECT, report.leds[0]);
        controller.write_control(ids::LED_ENVELOPE, report.leds[1]);
        controller.write_control(ids::RELAY_BYPASS, gate(report.hardware.bypass));
        controller.write_control(ids::MUTE, gate(report.hardware.mute));
        controller.flush();

        report
    }

    fn apply_controls(&mut self, settings: Settings, controls: &BlockControls) {
        let [rate, depth, mod_rate] = controls.knobs;

        self.rate_span_hz = KNOB_PARAMS[0].denormalize(rate);
        self.tremolo.set_depth(KNOB_PARAMS[1].denormalize(depth) / 100.0);
        self.rate_mod.set_knob(KNOB_PARAMS[2].denormalize(mod_rate));

        self.tremolo.set_waveform(settings.tremolo_waveform);
        self.rate_mod.set_waveform(settings.mod_waveform);
    }
}

#[inline]
fn gate(level: bool) -> f32 {
    if level { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trem_core::{Mix, Waveform};

    const SR: f32 = 48000.0;
    const BLOCK: usize = 4;

    fn pedal(kind: TransitionKind) -> Pedal {
        Pedal::new(SR, kind, TransitionTimings::defaults(SR))
    }

    fn run(
        pedal: &mut Pedal,
        settings: Settings,
        controls: BlockControls,
        input: f32,
    ) -> ([f32; BLOCK], [f32; BLOCK], BlockReport) {
        let buf = [input; BLOCK];
        let mut l = [0.0; BLOCK];
        let mut r = [0.0; BLOCK];
        let report = pedal.process_block(settings, controls, (&buf, &buf), (&mut l, &mut r));
        (l, r, report)
    }

    fn press(knobs: [f32; 3]) -> BlockControls {
        BlockControls {
            knobs,
            footswitch_pressed: true,
        }
    }

    fn release(knobs: [f32; 3]) -> BlockControls {
        BlockControls {
            knobs,
            footswitch_pressed: false,
        }
    }

    #[test]
    fn test_starts_bypassed() {
        let mut p = pedal(TransitionKind::HardSwitch);
        let (l, r, report) = run(&mut p, Settings::default(), BlockControls::default(), 0.3);
        assert_eq!(l, [0.3; BLOCK]);
        assert_eq!(r, [0.3; BLOCK]);
        assert!(report.hardware.bypass);
        assert!(!report.hardware.mute);
        assert!(!report.toggled);
    }

    #[test]
    fn test_held_footswitch_toggles_once() {
        let mut p = pedal(TransitionKind::HardSwitch);
        let knobs = [0.0; 3];
        let (_, _, report) = run(&mut p, Settings::default(), press(knobs), 0.0);
        assert!(report.toggled);
        for _ in 0..10 {
            let (_, _, report) = run(&mut p, Settings::default(), press(knobs), 0.0);
            assert!(!report.toggled);
        }
        assert!(p.effect_on());

        run(&mut p, Settings::default(), release(knobs), 0.0);
        let (_, _, report) = run(&mut p, Settings::default(), press(knobs), 0.0);
        assert!(report.toggled);
        assert!(!p.effect_on());
    }

    #[test]
    fn test_hard_switch_lines_per_block_at_48k() {
        let mut p = pedal(TransitionKind::HardSwitch);
        let settings = Settings::default();
        let knobs = [0.5, 0.5, 0.0];

        let mut reports = Vec::new();
        reports.push(run(&mut p, settings, press(knobs), 0.1).2);
        for _ in 1..300 {
            reports.push(run(&mut p, settings, release(knobs), 0.1).2);
        }

        // Block k starts at sample 4k
        assert!(reports[0].hardware.mute);
        assert!(reports[240].hardware.mute, "sample 960 still muted");
        assert!(!reports[241].hardware.mute, "sample 964 unmuted");
        assert!(reports[120].hardware.bypass, "sample 480 relay unchanged");
        assert!(!reports[121].hardware.bypass, "sample 484 relay on effect path");
    }

    #[test]
    fn test_relay_disabled_holds_lines_low() {
        let mut p = pedal(TransitionKind::HardSwitch);
        let settings = Settings {
            relay_bypass_enabled: false,
            ..Settings::default()
        };
        let (_, _, report) = run(&mut p, settings, press([0.0; 3]), 0.0);
        assert!(report.toggled);
        assert_eq!(report.hardware, HardwareLines::RELEASED);
        for _ in 0..500 {
            let (_, _, report) = run(&mut p, settings, release([0.0; 3]), 0.0);
            assert_eq!(report.hardware, HardwareLines::RELEASED);
        }
    }

    #[test]
    fn test_zero_depth_effect_on_is_transparent() {
        let mut p = pedal(TransitionKind::HardSwitch);
        let settings = Settings::default();
        let knobs = [0.7, 0.0, 0.0];
        run(&mut p, settings, press(knobs), 0.0);
        for i in 0..100 {
            let input = (i as f32 * 0.01).sin() * 0.8;
            let (l, r, _) = run(&mut p, settings, release(knobs), input);
            assert_eq!(l, [input; BLOCK]);
            assert_eq!(r, [input; BLOCK]);
        }
    }

    #[test]
    fn test_leds_follow_effect_and_envelope() {
        let mut p = pedal(TransitionKind::HardSwitch);
        let settings = Settings::default();
        let knobs = [0.25, 0.6, 0.0];

        let (_, _, report) = run(&mut p, settings, release(knobs), 0.5);
        assert_eq!(report.leds, [0.0, 0.0]);

        run(&mut p, settings, press(knobs), 0.5);
        for _ in 0..2000 {
            let (_, _, report) = run(&mut p, settings, release(knobs), 0.5);
            assert_eq!(report.leds[0], 1.0);
            assert!((0.4 - 1e-6..=1.0).contains(&report.leds[1]));
            assert_eq!(report.leds[1], p.envelope());
        }
    }

    #[test]
    fn test_simple_type_uses_static_rate() {
        let mut p = pedal(TransitionKind::HardSwitch);
        let settings = Settings::default();
        run(&mut p, settings, release([0.5, 0.5, 1.0]), 0.0);
        assert!((p.rate_span_hz() - 10.0).abs() < 1e-5);
        assert!((p.tremolo().frequency() - 11.0).abs() < 1e-5);
    }

    #[test]
    fn test_harmonic_floor_uses_static_rate() {
        let mut p = pedal(TransitionKind::HardSwitch);
        let settings = Settings {
            tremolo_type: TremoloType::Harmonic,
            ..Settings::default()
        };
        // 0.05² = 0.0025, below the modulation floor
        run(&mut p, settings, release([0.5, 0.5, 0.05]), 0.0);
        assert!(!p.rate_modulator().is_active());
        assert!((p.tremolo().frequency() - 11.0).abs() < 1e-5);
    }

    #[test]
    fn test_harmonic_sweeps_rate() {
        let mut p = pedal(TransitionKind::HardSwitch);
        let settings = Settings {
            tremolo_type: TremoloType::Harmonic,
            ..Settings::default()
        };
        let knobs = [0.5, 0.5, 1.0];
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for _ in 0..12000 {
            run(&mut p, settings, release(knobs), 0.0);
            min = min.min(p.tremolo().frequency());
            max = max.max(p.tremolo().frequency());
        }
        assert!(max > 10.9, "max {max}");
        assert_eq!(min, 0.0);
    }

    #[test]
    fn test_mod_rate_knob_is_squared() {
        let mut p = pedal(TransitionKind::HardSwitch);
        run(&mut p, Settings::default(), release([0.0, 0.0, 0.5]), 0.0);
        assert!((p.rate_modulator().knob() - 0.25).abs() < 1e-6);
        assert!((p.rate_modulator().frequency() - 0.76).abs() < 1e-5);
    }

    #[test]
    fn test_waveforms_follow_settings() {
        let mut p = pedal(TransitionKind::HardSwitch);
        let settings = Settings {
            tremolo_waveform: Waveform::Square,
            mod_waveform: Waveform::Ramp,
            ..Settings::default()
        };
        run(&mut p, settings, release([0.0; 3]), 0.0);
        assert_eq!(p.tremolo().waveform(), Waveform::Square);
        assert_eq!(p.rate_modulator().waveform(), Waveform::Ramp);
    }

    #[test]
    fn test_crossfade_midpoint() {
        let mut p = pedal(TransitionKind::Crossfade);
        let settings = Settings::default();
        let knobs = [0.2, 1.0, 0.0];
        run(&mut p, settings, press(knobs), 0.0);
        // 4 samples in the first block, 1499 more blocks -> 6000 advanced
        for _ in 0..1499 {
            run(&mut p, settings, release(knobs), 0.0);
        }
        let Mix { dry, wet } = p.transition().mix();
        assert!((dry - 0.5).abs() < 1e-3, "dry {dry}");
        assert!((wet - 0.5).abs() < 1e-3, "wet {wet}");
    }

    #[test]
    fn test_crossfade_relay_follows_effect() {
        let mut p = pedal(TransitionKind::Crossfade);
        let settings = Settings::default();
        let (_, _, report) = run(&mut p, settings, press([0.0; 3]), 0.0);
        assert_eq!(report.hardware, HardwareLines::RELEASED);
        assert!(p.transition().is_transitioning());
    }

    #[test]
    fn test_phase_runs_while_bypassed() {
        let mut p = pedal(TransitionKind::HardSwitch);
        let settings = Settings::default();
        run(&mut p, settings, release([0.5, 1.0, 0.0]), 0.0);
        let first = p.envelope();
        for _ in 0..100 {
            run(&mut p, settings, release([0.5, 1.0, 0.0]), 0.0);
        }
        assert_ne!(p.envelope(), first);
    }

    #[test]
    fn test_reset_keeps_effect_state() {
        let mut p = pedal(TransitionKind::HardSwitch);
        run(&mut p, Settings::default(), press([0.0; 3]), 0.0);
        p.reset();
        assert!(p.effect_on());
        assert!(!p.transition().is_transitioning());
        assert_eq!(p.envelope(), 1.0);
    }

    #[test]
    fn test_short_input_zeroes_output_tail() {
        let mut p = pedal(TransitionKind::HardSwitch);
        let input = [0.5f32; 3];
        let mut l = [9.0f32; 5];
        let mut r = [9.0f32; 4];
        p.process_block(
            Settings::default(),
            BlockControls::default(),
            (&input, &input[..2]),
            (&mut l, &mut r),
        );
        assert_eq!(l, [0.5, 0.5, 0.0, 0.0, 0.0]);
        assert_eq!(r, [0.5, 0.5, 0.0, 0.0]);
    }
}
