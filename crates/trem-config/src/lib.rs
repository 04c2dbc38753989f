//! Startup configuration for the trem tremolo pedal.
//!
//! A [`PedalConfig`] is read once at power-up from a TOML file. It fixes the
//! sample rate, block size and transition policy, seeds the menu
//! [`Settings`](trem_platform::Settings), and routes MIDI CC numbers onto
//! settings parameters. Nothing is written back at runtime.
//!
//! # Example
//!
//! ```rust
//! use trem_config::PedalConfig;
//! use trem_core::TransitionKind;
//!
//! let config = PedalConfig::from_toml(r#"
//!     transition = "crossfade"
//!
//!     [timing]
//!     crossfade_ms = 100.0
//!
//!     [[midi.cc]]
//!     cc = 21
//!     param = "trem_wave"
//! "#).unwrap();
//!
//! assert_eq!(config.transition_kind(), Ok(TransitionKind::Crossfade));
//! assert_eq!(config.timings().crossfade_samples, 4800);
//!
//! let control = config.control_loop().unwrap();
//! assert_eq!(control.cc_map().routes().count(), 1);
//! ```

mod config;
mod error;

/// Configuration file locations.
pub mod paths;

/// Configuration validation.
pub mod validation;

pub use config::{CcRoute, MidiConfig, PedalConfig, SettingsConfig, TimingConfig};
pub use error::ConfigError;
pub use paths::{default_config_path, find_config, user_config_dir};
pub use validation::{
    BLOCK_SIZE_RANGE, CC_MAP_CAPACITY, MAX_CC, SAMPLE_RATE_RANGE, ValidationError,
    ValidationResult, validate_config,
};
