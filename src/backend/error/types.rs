/**
 * Backend Error Types
 *
 * Errors raised while setting up a collaboration connection or while
 * processing one of its commands.
 *
 * # Error Categories
 *
 * ## Connection-fatal
 *
 * Raised before the websocket upgrade completes; the client gets an HTTP
 * error response and nothing is registered:
 * - Unknown project
 * - Invalid or expired share token
 *
 * ## Per-command
 *
 * Raised inside a live session and reported to the originating client
 * only; the connection stays open:
 * - Malformed command
 * - Persistence failure
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::TokenError;
use crate::backend::projects::StoreError;
use crate::shared::{CommandError, Rejection, RejectionKind};

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// Project (or other resource) does not exist
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message
        message: String,
    },

    /// Share token rejected
    #[error(transparent)]
    Unauthorized(#[from] TokenError),

    /// Client command could not be decoded
    #[error(transparent)]
    InvalidCommand(#[from] CommandError),

    /// Persistence collaborator failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BackendError {
    /// Create a new not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `NotFound` / `Store(NotFound)` - 404 Not Found
    /// - `Unauthorized` - 401 Unauthorized
    /// - `InvalidCommand` - 400 Bad Request
    /// - everything else - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidCommand(_) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::NotFound { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Error frame for the originating client of a failed command
    pub fn to_rejection(&self) -> Rejection {
        let kind = match self {
            Self::InvalidCommand(_) => RejectionKind::InvalidCommand,
            _ => RejectionKind::PersistenceFailed,
        };
        Rejection::new(kind, self.message())
    }
}
