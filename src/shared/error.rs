//! Shared Error Types
//!
//! Error types produced by the platform-agnostic layer: decoding client
//! commands and decoding stored documents.
//!
//! # Error Categories
//!
//! - `CommandError` - a client frame could not be turned into a `Command`
//! - `SharedError` - document (de)serialization and validation failures
//!
//! # Usage
//!
//! ```rust
//! use xfcanvas::shared::error::SharedError;
//!
//! let error = SharedError::validation("content", "Document must be a JSON array");
//! ```
use thiserror::Error;

/// Reasons a client frame is rejected at the decode boundary
///
/// These are never connection-fatal: the session reports them to the
/// originating client and keeps reading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("command '{0}' requires a JSON payload")]
    MissingPayload(String),

    #[error("malformed JSON payload: {0}")]
    MalformedJson(String),

    #[error("payload must be a JSON object")]
    NotAnObject,

    #[error("payload is missing the 'id' field")]
    MissingId,

    /// `field` names the offending key (`id`, `parent` or `after`)
    #[error("field '{field}' is not a valid element id: {value}")]
    InvalidId {
        field: &'static str,
        value: String,
    },
}

/// Shared error types that can occur in both frontend and backend
#[derive(Debug, Error, Clone)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
