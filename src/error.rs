//! Structured error types for configuration operations.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Key errors
    InvalidIdentifier,
    MissingKey,
    UnknownAttribute,

    // Usage errors
    TypeMismatch,

    // Source errors
    Io,
    Parse,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::InvalidIdentifier => "invalid identifier",
            ErrorCode::MissingKey => "missing key",
            ErrorCode::UnknownAttribute => "unknown attribute",
            ErrorCode::TypeMismatch => "type mismatch",
            ErrorCode::Io => "i/o error",
            ErrorCode::Parse => "parse error",
        };
        f.write_str(name)
    }
}

/// Structured error for configuration operations.
///
/// Every variant of [`ErrorCode`] is raised immediately to the caller;
/// nothing in this crate retries or swallows a `ConfError`.
#[derive(Debug, Error, Serialize)]
#[error("{message}")]
pub struct ConfError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl ConfError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            key: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    // Convenience constructors

    pub fn invalid_identifier(key: &str) -> Self {
        Self::new(
            ErrorCode::InvalidIdentifier,
            format!("'{}' is not a valid identifier", key),
        )
        .with_key(key)
    }

    pub fn missing_key(key: &str) -> Self {
        Self::new(ErrorCode::MissingKey, format!("missing key: '{}'", key)).with_key(key)
    }

    pub fn unknown_attribute(key: &str) -> Self {
        Self::new(
            ErrorCode::UnknownAttribute,
            format!("'conf' object has no attribute '{}'", key),
        )
        .with_key(key)
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TypeMismatch, message)
    }

    pub fn io(path: &std::path::Path, err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::Io,
            format!("failed to read '{}': {}", path.display(), err),
        )
    }

    pub fn parse(path: &std::path::Path, err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::Parse,
            format!("failed to parse '{}': {}", path.display(), err),
        )
    }

    /// Whether this error has the given code.
    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code
    }
}

/// Result type for configuration operations.
pub type ConfResult<T> = std::result::Result<T, ConfError>;
