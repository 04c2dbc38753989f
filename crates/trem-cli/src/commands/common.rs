//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use std::path::Path;
use trem_config::{PedalConfig, find_config};

/// Load `path`, else the user config file if present, else defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<PedalConfig> {
    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => find_config(),
    };

    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "using config file");
            PedalConfig::load(&path).with_context(|| format!("loading {}", path.display()))
        }
        None => Ok(PedalConfig::default()),
    }
}

/// Parse a knob position for clap's `value_parser`.
pub fn parse_knob(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("knob position {value} outside 0.0..=1.0"))
    }
}

/// Parse a non-negative time in seconds.
pub fn parse_seconds(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("time {value} must be zero or more seconds"))
    }
}

/// Convert linear amplitude to dBFS, floored at -120.
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        (20.0 * linear.log10()).max(-120.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knob_range() {
        assert_eq!(parse_knob("0.5"), Ok(0.5));
        assert_eq!(parse_knob("1"), Ok(1.0));
        assert!(parse_knob("1.5").is_err());
        assert!(parse_knob("loud").is_err());
    }

    #[test]
    fn seconds_non_negative() {
        assert_eq!(parse_seconds("2.5"), Ok(2.5));
        assert!(parse_seconds("-1").is_err());
        assert!(parse_seconds("inf").is_err());
    }

    #[test]
    fn db_floor() {
        assert_eq!(linear_to_db(0.0), -120.0);
        assert!((linear_to_db(1.0)).abs() < 1e-6);
        assert!((linear_to_db(0.5) + 6.0206).abs() < 1e-3);
    }
}
