//! Error types for satchel
//!
//! All modules use `SatchelResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for satchel operations
pub type SatchelResult<T> = Result<T, SatchelError>;

/// All errors that can occur in satchel
#[derive(Error, Debug)]
pub enum SatchelError {
    // Caller errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Illegal operation: {0}")]
    IllegalOperation(String),

    // Session errors
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Key not set: {0}")]
    KeyNotSet(String),

    #[error("Failed to persist session {id}: {reason}")]
    SessionPersist { id: String, reason: String },

    #[error("Corrupt session file {path}: {reason}")]
    SessionCorrupt { path: PathBuf, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl SatchelError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }

    /// Create an illegal operation error
    pub fn illegal_operation(reason: impl Into<String>) -> Self {
        Self::IllegalOperation(reason.into())
    }

    /// Whether the error was caused by the caller's input rather than the environment
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::IllegalOperation(_) | Self::KeyNotSet(_)
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::SessionNotFound(_) => Some("Run: satchel open"),
            Self::SessionCorrupt { .. } => Some("Run: satchel close to discard the session"),
            Self::ConfigInvalid { .. } => Some("Run: satchel config init --force"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SatchelError::invalid_argument("id must not be empty");
        assert_eq!(err.to_string(), "Invalid argument: id must not be empty");
    }

    #[test]
    fn error_hint() {
        let err = SatchelError::SessionNotFound("abc".to_string());
        assert_eq!(err.hint(), Some("Run: satchel open"));
        assert_eq!(SatchelError::Internal("x".to_string()).hint(), None);
    }

    #[test]
    fn error_caller_classification() {
        assert!(SatchelError::illegal_operation("second store").is_caller_error());
        assert!(!SatchelError::Internal("boom".to_string()).is_caller_error());
    }
}
