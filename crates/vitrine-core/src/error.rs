//! Error types module
//!
//! `CoreError` covers failures that originate in this crate: the access gate
//! and local I/O. Configuration problems go through `anyhow` in `config.rs`.
//! Every error type in the workspace also implements [`ErrorMetadata`] so the
//! console can decide how loudly to log it and what to show the operator.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for rejections the operator can act on
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented and logged.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "UPLOAD_NETWORK_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether re-submitting the same form may succeed
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the operator
    fn suggested_action(&self) -> Option<&'static str>;

    /// Operator-facing notice (may differ from the internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ErrorMetadata for CoreError {
    fn error_code(&self) -> &'static str {
        match self {
            CoreError::InvalidInput(_) => "INVALID_INPUT",
            CoreError::AccessDenied(_) => "ACCESS_DENIED",
            CoreError::Io(_) => "IO_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, CoreError::InvalidInput(_) | CoreError::AccessDenied(_))
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            CoreError::InvalidInput(_) => Some("Check the entered values and try again"),
            CoreError::AccessDenied(_) => Some("Unlock the console with the passcode"),
            CoreError::Io(_) => None,
        }
    }

    fn client_message(&self) -> String {
        match self {
            CoreError::Io(_) => "Local file access failed".to_string(),
            other => other.to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            CoreError::InvalidInput(_) | CoreError::AccessDenied(_) => LogLevel::Debug,
            CoreError::Io(_) => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_access_denied() {
        let err = CoreError::AccessDenied("wrong passcode".to_string());
        assert_eq!(err.error_code(), "ACCESS_DENIED");
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "Access denied: wrong passcode");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_invalid_input() {
        let err = CoreError::InvalidInput("passcode must not be empty".to_string());
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.is_recoverable());
        assert_eq!(
            err.suggested_action(),
            Some("Check the entered values and try again")
        );
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_io_hides_details() {
        let err = CoreError::from(io::Error::new(io::ErrorKind::Other, "disk on fire"));
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Local file access failed");
        assert_eq!(err.log_level(), LogLevel::Error);
        assert!(err.suggested_action().is_none());
    }
}
