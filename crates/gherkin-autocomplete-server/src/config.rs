//! Server configuration parsed from environment variables.
//!
//! This module provides configuration types and parsing for the language
//! server. All settings can be overridden via environment variables prefixed
//! with `GHERKIN_AUTOCOMPLETE_LSP_`.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ServerError;

/// Log level enumeration matching tracing crate levels.
///
/// Defaults to `Info` when not specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Most verbose logging, includes all trace spans.
    Trace,
    /// Debug-level information for development.
    Debug,
    /// Standard informational messages.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for failures.
    Error,
}

impl FromStr for LogLevel {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ServerError::InvalidConfig(format!(
                "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Default cap on the number of feature files scanned under the workspace
/// root during a full rebuild.
const DEFAULT_MAX_WORKSPACE_FILES: usize = 1000;

/// Configuration for the language server.
///
/// All settings can be overridden via environment variables prefixed with
/// `GHERKIN_AUTOCOMPLETE_LSP_`.
///
/// # Environment Variables
///
/// - `GHERKIN_AUTOCOMPLETE_LSP_LOG_LEVEL`: Sets the log level (trace, debug,
///   info, warn, error)
/// - `GHERKIN_AUTOCOMPLETE_LSP_FEATURE_LIBRARIES`: Additional feature-library
///   roots scanned during a full rebuild, separated with the platform path
///   separator (`:` on Unix, `;` on Windows)
/// - `GHERKIN_AUTOCOMPLETE_LSP_MAX_FILES`: Cap on the number of feature files
///   scanned under the workspace root
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: LogLevel,
    /// Additional library roots scanned for feature documents.
    pub feature_libraries: Vec<PathBuf>,
    /// Cap on the number of feature files scanned under the workspace root.
    pub max_workspace_files: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            feature_libraries: Vec::new(),
            max_workspace_files: DEFAULT_MAX_WORKSPACE_FILES,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `GHERKIN_AUTOCOMPLETE_LSP_LOG_LEVEL`,
    /// `GHERKIN_AUTOCOMPLETE_LSP_FEATURE_LIBRARIES`, and
    /// `GHERKIN_AUTOCOMPLETE_LSP_MAX_FILES`. Falls back to defaults for
    /// missing values.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::InvalidConfig` if an environment variable
    /// contains an invalid value.
    pub fn from_env() -> Result<Self, ServerError> {
        let log_level = match env::var("GHERKIN_AUTOCOMPLETE_LSP_LOG_LEVEL") {
            Ok(val) => val.parse()?,
            Err(_) => LogLevel::default(),
        };

        let feature_libraries = match env::var("GHERKIN_AUTOCOMPLETE_LSP_FEATURE_LIBRARIES") {
            Ok(val) => env::split_paths(&val).collect(),
            Err(_) => Vec::new(),
        };

        let max_workspace_files = match env::var("GHERKIN_AUTOCOMPLETE_LSP_MAX_FILES") {
            Ok(val) => val.parse().map_err(|_| {
                ServerError::InvalidConfig(format!(
                    "invalid file cap '{val}', expected a positive integer"
                ))
            })?,
            Err(_) => DEFAULT_MAX_WORKSPACE_FILES,
        };

        Ok(Self {
            log_level,
            feature_libraries,
            max_workspace_files,
        })
    }

    /// Apply optional overrides to an existing configuration.
    ///
    /// This is intended for CLI overrides that should take precedence over
    /// environment-based defaults. An empty library list leaves the
    /// environment-provided roots in place.
    #[must_use]
    pub fn apply_overrides(
        mut self,
        log_level: Option<LogLevel>,
        feature_libraries: Vec<PathBuf>,
    ) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }

        if !feature_libraries.is_empty() {
            self.feature_libraries = feature_libraries;
        }

        self
    }

    /// Create a new configuration with the specified log level.
    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parses_valid_values() {
        assert_eq!("trace".parse::<LogLevel>().ok(), Some(LogLevel::Trace));
        assert_eq!("debug".parse::<LogLevel>().ok(), Some(LogLevel::Debug));
        assert_eq!("info".parse::<LogLevel>().ok(), Some(LogLevel::Info));
        assert_eq!("warn".parse::<LogLevel>().ok(), Some(LogLevel::Warn));
        assert_eq!("warning".parse::<LogLevel>().ok(), Some(LogLevel::Warn));
        assert_eq!("error".parse::<LogLevel>().ok(), Some(LogLevel::Error));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        assert_eq!("TRACE".parse::<LogLevel>().ok(), Some(LogLevel::Trace));
        assert_eq!("Debug".parse::<LogLevel>().ok(), Some(LogLevel::Debug));
        assert_eq!("INFO".parse::<LogLevel>().ok(), Some(LogLevel::Info));
    }

    #[test]
    fn log_level_rejects_invalid_values() {
        let result = "invalid".parse::<LogLevel>();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unknown log level"));
    }

    #[test]
    fn log_level_as_filter_str_returns_correct_strings() {
        assert_eq!(LogLevel::Trace.as_filter_str(), "trace");
        assert_eq!(LogLevel::Debug.as_filter_str(), "debug");
        assert_eq!(LogLevel::Info.as_filter_str(), "info");
        assert_eq!(LogLevel::Warn.as_filter_str(), "warn");
        assert_eq!(LogLevel::Error.as_filter_str(), "error");
    }

    #[test]
    fn server_config_default_values() {
        let config = ServerConfig::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.feature_libraries.is_empty());
        assert_eq!(config.max_workspace_files, 1000);
    }

    #[test]
    fn server_config_with_log_level_builder() {
        let config = ServerConfig::default().with_log_level(LogLevel::Debug);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn server_config_apply_overrides_updates_selected_fields() {
        let roots = vec![PathBuf::from("/srv/features")];
        let config = ServerConfig::default().apply_overrides(Some(LogLevel::Error), roots.clone());
        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(config.feature_libraries, roots);

        let config = ServerConfig::default().apply_overrides(None, Vec::new());
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.feature_libraries.is_empty());
    }
}
