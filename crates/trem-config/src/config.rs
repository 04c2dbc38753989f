//! Pedal configuration file format.

use serde::{Deserialize, Serialize};
use std::path::Path;

use trem_core::{
    DEFAULT_BYPASS_TOGGLE_SECONDS, DEFAULT_CROSSFADE_SECONDS, DEFAULT_MUTE_OFF_SECONDS,
    TransitionKind, TransitionTimings,
};
use trem_platform::{ControlLoop, Pedal, Settings};

use crate::error::ConfigError;
use crate::validation::{
    CC_MAP_CAPACITY, MAX_CC, ValidationError, ValidationResult, parse_param, parse_transition,
    parse_tremolo_type, parse_waveform, validate_config,
};

/// Startup configuration for the pedal.
///
/// Every field has a default, so an empty file describes the stock pedal.
///
/// # TOML Format
///
/// ```toml
/// sample_rate = 48000
/// block_size = 4
/// transition = "hard_switch"
///
/// [timing]
/// mute_off_ms = 20.0
/// bypass_toggle_ms = 10.0
/// crossfade_ms = 250.0
///
/// [settings]
/// tremolo_type = "harmonic"
/// tremolo_waveform = "sine"
/// mod_waveform = "triangle"
/// true_bypass = true
/// midi = true
///
/// [[midi.cc]]
/// cc = 21
/// param = "trem_wave"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PedalConfig {
    /// Audio sample rate in Hz.
    pub sample_rate: u32,

    /// Samples per audio callback.
    pub block_size: usize,

    /// Transition policy: `hard_switch` or `crossfade`.
    pub transition: String,

    /// Transition windows.
    pub timing: TimingConfig,

    /// Menu settings at power-up.
    pub settings: SettingsConfig,

    /// MIDI routing.
    pub midi: MidiConfig,
}

/// Transition windows in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Time from the footswitch edge until the mute releases.
    pub mute_off_ms: f32,
    /// Time from the footswitch edge until the relay flips.
    pub bypass_toggle_ms: f32,
    /// Length of a dry/wet crossfade.
    pub crossfade_ms: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            mute_off_ms: DEFAULT_MUTE_OFF_SECONDS * 1000.0,
            bypass_toggle_ms: DEFAULT_BYPASS_TOGGLE_SECONDS * 1000.0,
            crossfade_ms: DEFAULT_CROSSFADE_SECONDS * 1000.0,
        }
    }
}

/// Menu settings by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsConfig {
    /// `simple` or `harmonic`.
    pub tremolo_type: String,
    /// Tremolo LFO shape.
    pub tremolo_waveform: String,
    /// Rate-modulation LFO shape.
    pub mod_waveform: String,
    /// Drive the relay and mute lines.
    pub true_bypass: bool,
    /// Accept MIDI input.
    pub midi: bool,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self::from(Settings::default())
    }
}

impl From<Settings> for SettingsConfig {
    fn from(settings: Settings) -> Self {
        Self {
            tremolo_type: settings.tremolo_type.name().to_ascii_lowercase(),
            tremolo_waveform: settings.tremolo_waveform.name().to_ascii_lowercase(),
            mod_waveform: settings.mod_waveform.name().to_ascii_lowercase(),
            true_bypass: settings.relay_bypass_enabled,
            midi: settings.midi_enabled,
        }
    }
}

/// MIDI continuous-controller routes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MidiConfig {
    /// CC number to settings parameter.
    pub cc: Vec<CcRoute>,
}

/// One CC route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CcRoute {
    /// Controller number (0-127).
    pub cc: u32,
    /// Settings parameter, by string id (`trem_wave`) or display name.
    pub param: String,
}

impl CcRoute {
    /// Route `cc` to `param`.
    pub fn new(cc: u32, param: impl Into<String>) -> Self {
        Self {
            cc,
            param: param.into(),
        }
    }
}

impl Default for PedalConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            block_size: 4,
            transition: TransitionKind::default().name().to_string(),
            timing: TimingConfig::default(),
            settings: SettingsConfig::default(),
            midi: MidiConfig::default(),
        }
    }
}

impl PedalConfig {
    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml(&content)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            path = %path.display(),
            sample_rate = config.sample_rate,
            transition = %config.transition,
            "loaded pedal config"
        );

        Ok(config)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: PedalConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as TOML, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field; see [`validate_config`].
    pub fn validate(&self) -> ValidationResult<()> {
        validate_config(self)
    }

    /// Sample rate as used by the DSP.
    pub fn sample_rate_hz(&self) -> f32 {
        self.sample_rate as f32
    }

    /// Configured transition policy.
    pub fn transition_kind(&self) -> ValidationResult<TransitionKind> {
        parse_transition(&self.transition)
    }

    /// Transition windows converted to samples at the configured rate.
    pub fn timings(&self) -> TransitionTimings {
        TransitionTimings::from_seconds(
            self.sample_rate_hz(),
            self.timing.mute_off_ms / 1000.0,
            self.timing.bypass_toggle_ms / 1000.0,
            self.timing.crossfade_ms / 1000.0,
        )
    }

    /// Power-up menu settings.
    pub fn pedal_settings(&self) -> ValidationResult<Settings> {
        let s = &self.settings;
        Ok(Settings {
            tremolo_type: parse_tremolo_type(&s.tremolo_type)?,
            tremolo_waveform: parse_waveform("tremolo waveform", &s.tremolo_waveform)?,
            mod_waveform: parse_waveform("mod waveform", &s.mod_waveform)?,
            relay_bypass_enabled: s.true_bypass,
            midi_enabled: s.midi,
        })
    }

    /// Control loop seeded with the power-up settings and the CC map.
    pub fn control_loop(&self) -> ValidationResult<ControlLoop<CC_MAP_CAPACITY>> {
        let mut control = ControlLoop::new(self.pedal_settings()?);
        for route in &self.midi.cc {
            let cc = u8::try_from(route.cc)
                .ok()
                .filter(|_| route.cc <= MAX_CC)
                .ok_or(ValidationError::CcOutOfRange(route.cc))?;
            let param = parse_param(&route.param)?;
            if !control.map_cc(cc, param) {
                return Err(ValidationError::TooManyCcRoutes {
                    count: self.midi.cc.len(),
                    capacity: CC_MAP_CAPACITY,
                });
            }
        }
        Ok(control)
    }

    /// Audio-side pedal for this configuration, effect off.
    pub fn build_pedal(&self) -> ValidationResult<Pedal> {
        Ok(Pedal::new(
            self.sample_rate_hz(),
            self.transition_kind()?,
            self.timings(),
        ))
    }
}
