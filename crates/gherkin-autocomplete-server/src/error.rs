//! Semantic error types for the language server.
//!
//! This module defines error types that provide meaningful context about
//! failures during language server operations. Errors are designed to be
//! inspectable by callers for appropriate handling. Per-document and
//! per-root indexing failures carry their own types in [`crate::indexing`]
//! and [`crate::discovery`]; nothing in this module is ever surfaced to a
//! query caller.

use thiserror::Error;

/// Errors that can occur during language server operations.
///
/// Each variant provides specific context about the failure, enabling
/// appropriate error handling and user-facing messages.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Server received a request before initialisation completed.
    #[error("server not initialised")]
    NotInitialised,

    /// Server received a duplicate initialisation request.
    #[error("server already initialised")]
    AlreadyInitialised,

    /// An invalid configuration value was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An I/O failure from the runtime or the protocol main loop.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_initialised_error_displays_message() {
        let error = ServerError::NotInitialised;
        assert_eq!(error.to_string(), "server not initialised");
    }

    #[test]
    fn already_initialised_error_displays_message() {
        let error = ServerError::AlreadyInitialised;
        assert_eq!(error.to_string(), "server already initialised");
    }

    #[test]
    fn invalid_config_error_displays_message() {
        let error = ServerError::InvalidConfig("unknown log level".to_string());
        assert_eq!(
            error.to_string(),
            "invalid configuration: unknown log level"
        );
    }

    #[test]
    fn io_error_converts_from_std_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: ServerError = io_err.into();
        assert!(error.to_string().contains("file not found"));
    }
}
