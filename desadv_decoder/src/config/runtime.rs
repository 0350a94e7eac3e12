// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;

/// Which delimiter grammar an inbox file is expected to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatVariant {
    /// Newline-terminated records with pipe-separated elements
    LegacyPipe,
    /// Standard EDIFACT control characters with release escaping
    Edifact,
}

impl Default for FormatVariant {
    fn default() -> Self {
        FormatVariant::LegacyPipe
    }
}

/// Error policy during assembly and reconciliation.
///
/// `Strict` is the legacy behavior: the first field or product error aborts
/// the whole document. `Permissive` collects errors per line group and keeps
/// going. Both are preserved deliberately; callers choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strictness {
    Strict,
    Permissive,
}

impl Default for Strictness {
    fn default() -> Self {
        Strictness::Strict
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderPreferences {
    /// Whether to enable detailed performance logging (user preference)
    pub enable_performance_logging: bool,

    /// Whether to include segment positions in error messages
    pub include_position_in_errors: bool,

    /// Whether to log every dispatched segment at debug level
    pub log_segment_dispatch: bool,
}

impl Default for DecoderPreferences {
    fn default() -> Self {
        Self {
            enable_performance_logging: env::var("DESADV_ENABLE_PERFORMANCE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            include_position_in_errors: env::var("DESADV_INCLUDE_POSITIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_segment_dispatch: env::var("DESADV_LOG_SEGMENT_DISPATCH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchPreferences {
    /// Inbox directory scanned for candidate interchange files
    pub inbox_path: String,

    /// Whether to print per-file progress to stdout
    pub progress_reporting: bool,
}

impl Default for BatchPreferences {
    fn default() -> Self {
        Self {
            inbox_path: env::var("DESADV_INBOX_PATH").unwrap_or_else(|_| "/tmp".to_string()),
            progress_reporting: env::var("DESADV_PROGRESS_REPORTING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

/// Log level as exposed to configuration files and env vars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    /// Convert to the event-system log level
    pub fn to_events_log_level(self) -> crate::logging::LogLevel {
        match self {
            LogLevel::Error => crate::logging::LogLevel::Error,
            LogLevel::Warning => crate::logging::LogLevel::Warning,
            LogLevel::Info => crate::logging::LogLevel::Info,
            LogLevel::Debug => crate::logging::LogLevel::Debug,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Minimum level that reaches the logger
    pub min_log_level: LogLevel,

    /// Emit JSON events instead of console lines
    pub use_structured_logging: bool,

    /// Whether console logging is enabled at all
    pub enable_console_logging: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        let min_log_level = match env::var("DESADV_LOG_LEVEL").ok().as_deref() {
            Some("error") => LogLevel::Error,
            Some("warning") => LogLevel::Warning,
            Some("debug") => LogLevel::Debug,
            _ => LogLevel::Info,
        };
        Self {
            min_log_level,
            use_structured_logging: env::var("DESADV_STRUCTURED_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var("DESADV_CONSOLE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = DecoderPreferences::default();
        assert!(prefs.include_position_in_errors);

        let batch = BatchPreferences::default();
        assert!(!batch.inbox_path.is_empty());
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            LogLevel::Warning.to_events_log_level(),
            crate::logging::LogLevel::Warning
        );
    }
}
