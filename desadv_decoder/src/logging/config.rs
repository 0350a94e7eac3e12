//! Configuration access for the logging subsystem
//!
//! Resource bounds come from compile-time constants; presentation choices
//! (level, structured vs console) come from runtime user preferences.

use crate::config::compile_time::logging::*;
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

type EventsLogLevel = crate::logging::events::LogLevel;

// ============================================================================
// RUNTIME PREFERENCES STORAGE
// ============================================================================

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Initialize runtime preferences
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized".to_string())
}

/// Get runtime preferences (with fallback to defaults)
fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

// ============================================================================
// CONFIGURATION ACCESS FUNCTIONS
// ============================================================================

/// Get minimum log level (user preference)
pub fn get_min_log_level() -> EventsLogLevel {
    get_runtime_preferences().min_log_level.to_events_log_level()
}

/// Check if structured logging is enabled (user preference)
pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

/// Check if console logging is enabled (user preference)
pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}

/// Get error buffer size (compile-time resource constant)
pub fn get_error_buffer_size() -> usize {
    MAX_ERROR_COLLECTION
}

/// Get maximum log events per file (compile-time resource constant)
pub fn get_max_log_events_per_file() -> usize {
    MAX_LOG_EVENTS_PER_FILE
}

/// Get maximum log message length (compile-time resource constant)
pub fn get_max_log_message_length() -> usize {
    MAX_LOG_MESSAGE_LENGTH
}

// ============================================================================
// CONFIGURATION VALIDATION
// ============================================================================

/// Validate current configuration settings
pub fn validate_config() -> Result<(), String> {
    if MAX_ERROR_COLLECTION < 100 {
        return Err(format!(
            "Error collection buffer too small: {}",
            MAX_ERROR_COLLECTION
        ));
    }

    if MAX_LOG_EVENTS_PER_FILE > MAX_ERROR_COLLECTION {
        return Err("Max log events per file exceeds total buffer size".to_string());
    }

    Ok(())
}

/// Get configuration summary for diagnostics
pub fn get_config_summary() -> String {
    let preferences = get_runtime_preferences();

    format!(
        "Logging Configuration:\n\
         === Resource Constants (Compile-time) ===\n\
         - Error collection buffer: {}\n\
         - Max events per file: {}\n\
         - Max message length: {}\n\
         === User Preferences (Runtime) ===\n\
         - Min log level: {:?}\n\
         - Structured logging: {}\n\
         - Console logging: {}",
        MAX_ERROR_COLLECTION,
        MAX_LOG_EVENTS_PER_FILE,
        MAX_LOG_MESSAGE_LENGTH,
        preferences.min_log_level,
        preferences.use_structured_logging,
        preferences.enable_console_logging,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(validate_config().is_ok());
    }

    #[test]
    fn test_compile_time_constants() {
        assert!(MAX_ERROR_COLLECTION > 0);
        assert!(MAX_LOG_EVENTS_PER_FILE > 0);
        assert!(MAX_LOG_EVENTS_PER_FILE <= MAX_ERROR_COLLECTION);
    }

    #[test]
    fn test_config_summary() {
        let summary = get_config_summary();
        assert!(summary.contains("Logging Configuration"));
        assert!(summary.contains("Min log level"));
    }
}
