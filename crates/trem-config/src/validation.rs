//! Configuration validation.
//!
//! [`validate_config`] checks a parsed [`PedalConfig`] against the limits
//! the pedal can actually run with and reports every problem at once. The
//! name resolvers ([`parse_transition`], [`parse_waveform`], ...) are shared
//! with the conversions on [`PedalConfig`], so a config that validates
//! always converts.
//!
//! # Example
//!
//! ```rust
//! use trem_config::{PedalConfig, ValidationError, validate_config};
//!
//! let mut config = PedalConfig::default();
//! assert!(validate_config(&config).is_ok());
//!
//! config.block_size = 0;
//! assert_eq!(validate_config(&config), Err(ValidationError::BlockSize(0)));
//! ```

use std::collections::HashSet;
use std::ops::RangeInclusive;

use thiserror::Error;
use trem_core::{ParameterInfo, TransitionKind, TremoloType, Waveform};
use trem_platform::Settings;

use crate::config::PedalConfig;

/// Sample rates the pedal accepts, in Hz.
pub const SAMPLE_RATE_RANGE: RangeInclusive<u32> = 8000..=192_000;

/// Block sizes the pedal accepts, in samples.
pub const BLOCK_SIZE_RANGE: RangeInclusive<usize> = 1..=4096;

/// Highest MIDI continuous controller number.
pub const MAX_CC: u32 = 127;

/// Number of CC routes the control loop can hold.
pub const CC_MAP_CAPACITY: usize = 16;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Sample rate outside [`SAMPLE_RATE_RANGE`].
    #[error("sample rate {0} Hz outside 8000..=192000")]
    SampleRate(u32),

    /// Block size outside [`BLOCK_SIZE_RANGE`].
    #[error("block size {0} outside 1..=4096")]
    BlockSize(usize),

    /// A timing window that is zero, negative or not a number.
    #[error("timing '{field}' must be a positive number of milliseconds, got {value}")]
    NonPositiveWindow {
        /// Name of the timing field.
        field: String,
        /// The rejected value.
        value: f32,
    },

    /// The relay would flip after the mute releases.
    #[error("bypass_toggle_ms ({bypass_toggle_ms}) must be shorter than mute_off_ms ({mute_off_ms})")]
    WindowOrder {
        /// Relay window.
        bypass_toggle_ms: f32,
        /// Mute window.
        mute_off_ms: f32,
    },

    /// A name that matches no known option.
    #[error("unknown {field} '{value}'")]
    UnknownName {
        /// What kind of name was expected.
        field: String,
        /// The rejected name.
        value: String,
    },

    /// CC number above [`MAX_CC`].
    #[error("CC {0} outside 0..=127")]
    CcOutOfRange(u32),

    /// The same CC routed twice.
    #[error("CC {0} is mapped more than once")]
    DuplicateCc(u32),

    /// More routes than the control loop holds.
    #[error("{count} CC routes exceed the capacity of {capacity}")]
    TooManyCcRoutes {
        /// Routes in the config.
        count: usize,
        /// Routes the control loop holds.
        capacity: usize,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    fn unknown(field: &str, value: &str) -> Self {
        ValidationError::UnknownName {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Resolve a transition policy name (`hard_switch` or `crossfade`).
pub fn parse_transition(name: &str) -> ValidationResult<TransitionKind> {
    TransitionKind::from_name(name).ok_or_else(|| ValidationError::unknown("transition", name))
}

/// Resolve a tremolo type name (`simple` or `harmonic`).
pub fn parse_tremolo_type(name: &str) -> ValidationResult<TremoloType> {
    TremoloType::from_name(name).ok_or_else(|| ValidationError::unknown("tremolo type", name))
}

/// Resolve a waveform name. `field` names the setting in the error.
pub fn parse_waveform(field: &str, name: &str) -> ValidationResult<Waveform> {
    Waveform::from_name(name).ok_or_else(|| ValidationError::unknown(field, name))
}

/// Resolve a [`Settings`] parameter by string id or display name.
pub fn parse_param(name: &str) -> ValidationResult<usize> {
    Settings::default()
        .find_param_by_name(name)
        .ok_or_else(|| ValidationError::unknown("parameter", name))
}

fn check_window(field: &str, value: f32, errors: &mut Vec<ValidationError>) -> bool {
    if value.is_finite() && value > 0.0 {
        true
    } else {
        errors.push(ValidationError::NonPositiveWindow {
            field: field.to_string(),
            value,
        });
        false
    }
}

/// Validate a whole configuration, collecting every problem.
pub fn validate_config(config: &PedalConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if !SAMPLE_RATE_RANGE.contains(&config.sample_rate) {
        errors.push(ValidationError::SampleRate(config.sample_rate));
    }
    if !BLOCK_SIZE_RANGE.contains(&config.block_size) {
        errors.push(ValidationError::BlockSize(config.block_size));
    }

    let timing = &config.timing;
    let mute_ok = check_window("mute_off_ms", timing.mute_off_ms, &mut errors);
    let bypass_ok = check_window("bypass_toggle_ms", timing.bypass_toggle_ms, &mut errors);
    check_window("crossfade_ms", timing.crossfade_ms, &mut errors);
    if mute_ok && bypass_ok && timing.bypass_toggle_ms >= timing.mute_off_ms {
        errors.push(ValidationError::WindowOrder {
            bypass_toggle_ms: timing.bypass_toggle_ms,
            mute_off_ms: timing.mute_off_ms,
        });
    }

    let settings = &config.settings;
    let names = [
        parse_transition(&config.transition).err(),
        parse_tremolo_type(&settings.tremolo_type).err(),
        parse_waveform("tremolo waveform", &settings.tremolo_waveform).err(),
        parse_waveform("mod waveform", &settings.mod_waveform).err(),
    ];
    errors.extend(names.into_iter().flatten());

    let routes = &config.midi.cc;
    if routes.len() > CC_MAP_CAPACITY {
        errors.push(ValidationError::TooManyCcRoutes {
            count: routes.len(),
            capacity: CC_MAP_CAPACITY,
        });
    }
    let mut seen = HashSet::new();
    for route in routes {
        if route.cc > MAX_CC {
            errors.push(ValidationError::CcOutOfRange(route.cc));
        } else if !seen.insert(route.cc) {
            errors.push(ValidationError::DuplicateCc(route.cc));
        }
        if let Err(e) = parse_param(&route.param) {
            errors.push(e);
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CcRoute;
    use trem_platform::settings::{PARAM_MIDI, PARAM_MOD_WAVEFORM, PARAM_TREMOLO_TYPE};

    #[test]
    fn defaults_validate() {
        assert_eq!(validate_config(&PedalConfig::default()), Ok(()));
    }

    #[test]
    fn sample_rate_bounds_are_inclusive() {
        let mut config = PedalConfig::default();
        for ok in [8000, 44100, 192_000] {
            config.sample_rate = ok;
            assert!(validate_config(&config).is_ok(), "{ok}");
        }
        config.sample_rate = 7999;
        assert_eq!(validate_config(&config), Err(ValidationError::SampleRate(7999)));
        config.sample_rate = 192_001;
        assert_eq!(
            validate_config(&config),
            Err(ValidationError::SampleRate(192_001))
        );
    }

    #[test]
    fn block_size_bounds() {
        let mut config = PedalConfig::default();
        config.block_size = 4096;
        assert!(validate_config(&config).is_ok());
        config.block_size = 4097;
        assert_eq!(validate_config(&config), Err(ValidationError::BlockSize(4097)));
    }

    #[test]
    fn windows_must_be_positive() {
        let mut config = PedalConfig::default();
        config.timing.crossfade_ms = 0.0;
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::NonPositiveWindow { ref field, .. }) if field == "crossfade_ms"
        ));

        config.timing.crossfade_ms = f32::NAN;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn bypass_must_precede_unmute() {
        let mut config = PedalConfig::default();
        config.timing.bypass_toggle_ms = 20.0;
        assert_eq!(
            validate_config(&config),
            Err(ValidationError::WindowOrder {
                bypass_toggle_ms: 20.0,
                mute_off_ms: 20.0,
            })
        );
    }

    #[test]
    fn negative_bypass_reports_only_the_window() {
        let mut config = PedalConfig::default();
        config.timing.bypass_toggle_ms = -1.0;
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::NonPositiveWindow { .. })
        ));
    }

    #[test]
    fn names_resolve_case_insensitively() {
        assert_eq!(parse_transition("Hard-Switch"), Ok(TransitionKind::HardSwitch));
        assert_eq!(parse_transition("crossfade"), Ok(TransitionKind::Crossfade));
        assert_eq!(parse_tremolo_type("HARMONIC"), Ok(TremoloType::Harmonic));
        assert_eq!(parse_waveform("w", "ramp"), Ok(Waveform::Ramp));
        assert_eq!(parse_param("trem_type"), Ok(PARAM_TREMOLO_TYPE));
        assert_eq!(parse_param("Osc Wave"), Ok(PARAM_MOD_WAVEFORM));
        assert_eq!(parse_param("midi"), Ok(PARAM_MIDI));
    }

    #[test]
    fn unknown_names_are_reported() {
        let err = parse_waveform("mod waveform", "wobble").unwrap_err();
        assert_eq!(err.to_string(), "unknown mod waveform 'wobble'");
        assert!(parse_transition("fade").is_err());
        assert!(parse_param("volume").is_err());
    }

    #[test]
    fn cc_rules() {
        let mut config = PedalConfig::default();
        config.midi.cc = vec![
            CcRoute::new(21, "trem_wave"),
            CcRoute::new(21, "osc_wave"),
            CcRoute::new(128, "midi"),
        ];
        assert_eq!(
            validate_config(&config),
            Err(ValidationError::Multiple(vec![
                ValidationError::DuplicateCc(21),
                ValidationError::CcOutOfRange(128),
            ]))
        );
    }

    #[test]
    fn cc_capacity() {
        let mut config = PedalConfig::default();
        config.midi.cc = (0..=CC_MAP_CAPACITY as u32)
            .map(|cc| CcRoute::new(cc, "trem_wave"))
            .collect();
        assert_eq!(
            validate_config(&config),
            Err(ValidationError::TooManyCcRoutes {
                count: CC_MAP_CAPACITY + 1,
                capacity: CC_MAP_CAPACITY,
            })
        );
    }

    #[test]
    fn multiple_errors_are_joined() {
        let mut config = PedalConfig::default();
        config.sample_rate = 0;
        config.transition = "fade".to_string();
        let err = validate_config(&config).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("multiple validation errors"), "got: {msg}");
        assert!(msg.contains("sample rate 0 Hz"), "got: {msg}");
        assert!(msg.contains("unknown transition 'fade'"), "got: {msg}");
    }
}
