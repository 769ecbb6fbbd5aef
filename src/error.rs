//! Error Handling Infrastructure
//!
//! This module defines all error types used throughout emptrack.
//! Every error carries a human-readable message and maps to a stable error code.
//!
//! # Error Categories
//! - `ConnectionFailed`: Database connection errors (fatal at startup)
//! - `QueryFailed`: Statement preparation or execution errors
//! - `InvalidInput`: Missing configuration values or empty selection lists
//! - `ConfigError`: Configuration file or environment errors
//! - `TerminalFailed`: Prompt or stdout I/O errors

use thiserror::Error;

/// Main error type for emptrack operations
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Database connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Statement execution failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Invalid input or missing required parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error (file not found, invalid JSON, missing env var)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Prompt could not be shown or read, or output could not be written
    #[error("Terminal I/O failed: {0}")]
    TerminalFailed(String),
}

impl TrackerError {
    /// Convert error to a stable error code string
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ConnectionFailed(_) => "CONNECTION_FAILED",
            Self::QueryFailed(_) => "QUERY_FAILED",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::TerminalFailed(_) => "TERMINAL_FAILED",
        }
    }

    /// Human-readable message. Never contains credentials.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed(message.into())
    }

    /// Create a query failed error
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self::QueryFailed(message.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a terminal I/O error
    pub fn terminal_failed(message: impl Into<String>) -> Self {
        Self::TerminalFailed(message.into())
    }
}

impl From<dialoguer::Error> for TrackerError {
    fn from(err: dialoguer::Error) -> Self {
        Self::terminal_failed(err.to_string())
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        Self::terminal_failed(err.to_string())
    }
}

/// Result type alias for emptrack operations
pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(TrackerError::connection_failed("test").error_code(), "CONNECTION_FAILED");
        assert_eq!(TrackerError::query_failed("test").error_code(), "QUERY_FAILED");
        assert_eq!(TrackerError::invalid_input("test").error_code(), "INVALID_INPUT");
        assert_eq!(TrackerError::config_error("test").error_code(), "CONFIG_ERROR");
        assert_eq!(TrackerError::terminal_failed("test").error_code(), "TERMINAL_FAILED");
    }

    #[test]
    fn test_error_messages() {
        let err = TrackerError::query_failed("duplicate key value violates unique constraint");
        assert!(err.message().starts_with("Query execution failed"));
        assert!(err.message().contains("duplicate key"));

        let err = TrackerError::invalid_input("No departments exist yet");
        assert_eq!(err.message(), "Invalid input: No departments exist yet");
    }

    #[test]
    fn test_io_error_becomes_terminal_error() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed");
        let err = TrackerError::from(io);
        assert!(matches!(err, TrackerError::TerminalFailed(_)));
        assert!(err.message().contains("stdin closed"));
    }
}
