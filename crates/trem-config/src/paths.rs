//! Where the pedal looks for its configuration file.
//!
//! - Linux: `~/.config/trem/pedal.toml`
//! - macOS: `~/Library/Application Support/trem/pedal.toml`
//! - Windows: `%APPDATA%\trem\pedal.toml`

use std::path::PathBuf;

const APP_NAME: &str = "trem";

/// File name of the pedal configuration.
pub const CONFIG_FILE_NAME: &str = "pedal.toml";

/// Returns the user-specific configuration directory.
///
/// Falls back to the working directory if the platform has none.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE_NAME)
}

/// The default configuration file, if one exists.
pub fn find_config() -> Option<PathBuf> {
    let path = default_config_path();
    path.is_file().then_some(path)
}
