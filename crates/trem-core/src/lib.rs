//! Trem Core - DSP and sequencing primitives for a tremolo pedal
//!
//! This crate holds everything that runs inside the audio callback: the
//! oscillators, the tremolo unit, the harmonic rate modulator, and the
//! state machines that make effect on/off toggles click-free.
//!
//! # Core Abstractions
//!
//! ## Signal Generation
//!
//! - [`Oscillator`] - Phase-accumulating low-frequency oscillator (5 waveforms)
//! - [`RateModulator`] - Slow oscillator that sweeps the tremolo rate
//!
//! ## Effects
//!
//! - [`Effect`] - Object-safe per-sample processing trait
//! - [`Tremolo`] - Amplitude modulation with depth control
//!
//! ## Bypass Transitions
//!
//! - [`HardSwitch`] - Relay bypass with hardware mute sequencing
//! - [`Crossfade`] - Linear dry/wet crossfade
//! - [`TransitionPolicy`] - Enum dispatch over both
//!
//! ## Parameters
//!
//! - [`ParameterInfo`] / [`ParamDescriptor`] - Introspectable parameter metadata
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded targets.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! trem-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use trem_core::{Effect, Tremolo, Waveform};
//!
//! let mut tremolo = Tremolo::new(48000.0);
//! tremolo.set_frequency(6.0);
//! tremolo.set_depth(0.8);
//! tremolo.set_waveform(Waveform::Sine);
//!
//! let mut buffer = [0.5f32; 64];
//! tremolo.process_block_inplace(&mut buffer);
//! assert!(buffer.iter().all(|s| s.abs() <= 0.5));
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations, locks, or I/O in processing paths
//! - **No dependencies on std**: `libm` for math
//! - **Deterministic**: Same settings and input give bit-identical output

#![cfg_attr(not(feature = "std"), no_std)]

pub mod effect;
pub mod math;
pub mod modulation;
pub mod oscillator;
pub mod param_info;
pub mod transition;
pub mod tremolo;

// Re-export main types at crate root
pub use effect::Effect;
pub use math::samples_for_duration;
pub use modulation::{MOD_FREQ_MIN_HZ, MOD_FREQ_SPAN_HZ, MOD_KNOB_FLOOR, RateModulator};
pub use oscillator::{Oscillator, Waveform};
pub use param_info::{ParamDescriptor, ParamFlags, ParamScale, ParamUnit, ParameterInfo};
pub use transition::{
    Crossfade, DEFAULT_BYPASS_TOGGLE_SECONDS, DEFAULT_CROSSFADE_SECONDS, DEFAULT_MUTE_OFF_SECONDS,
    HardSwitch, HardwareLines, Mix, Transition, TransitionKind, TransitionPolicy,
    TransitionTimings,
};
pub use tremolo::{RATE_BASE_HZ, RATE_SPAN_MAX_HZ, Tremolo, TremoloType};
