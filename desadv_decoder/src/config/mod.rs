//! Configuration: compile-time bounds and runtime preferences
//!
//! Compile-time bounds live in `constants`; they are part of the binary and
//! not overridable. Runtime preferences come from an optional TOML settings
//! file, with environment variables (`DESADV_*`) filling anything the file
//! leaves out.

pub mod constants;
pub mod runtime;

pub use constants::compile_time;

use runtime::{BatchPreferences, DecoderPreferences, LoggingPreferences};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the settings file
pub const SETTINGS_PATH_VAR: &str = "DESADV_CONFIG_PATH";

/// Default settings file looked up in the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "desadv.toml";

/// All runtime preferences, as read from the settings file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub decoder: DecoderPreferences,
    pub batch: BatchPreferences,
    pub logging: LoggingPreferences,
}

/// Settings loading errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Cannot read settings file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings file '{path}' is not valid TOML: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load settings from the configured location, falling back to
    /// environment-driven defaults when no file exists.
    ///
    /// A file named by `DESADV_CONFIG_PATH` must exist and parse; the
    /// implicit `desadv.toml` is optional.
    pub fn load_default() -> Result<Self, SettingsError> {
        if let Ok(path) = std::env::var(SETTINGS_PATH_VAR) {
            return Self::load(Path::new(&path));
        }

        let implicit = Path::new(DEFAULT_SETTINGS_FILE);
        if implicit.exists() {
            return Self::load(implicit);
        }

        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::runtime::LogLevel;
    use std::io::Write;

    #[test]
    fn test_load_settings_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[batch]\n\
             inbox_path = \"/var/edi/inbox\"\n\
             progress_reporting = false\n\
             \n\
             [logging]\n\
             min_log_level = \"Debug\"\n\
             use_structured_logging = true\n\
             enable_console_logging = true\n"
        )
        .unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.batch.inbox_path, "/var/edi/inbox");
        assert!(!settings.batch.progress_reporting);
        assert_eq!(settings.logging.min_log_level, LogLevel::Debug);
        // Section missing from the file falls back to defaults
        assert!(settings.decoder.include_position_in_errors);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "not toml at all [").unwrap();

        let err = Settings::load(file.path()).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = Settings::load(Path::new("/nonexistent/desadv.toml")).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }
}
