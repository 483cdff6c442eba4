//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Server state moved on under a concurrent writer (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// The request never completed (connect, timeout, body read)
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Http(_))
    }

    /// The server answered and refused the change
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ClientError::Conflict(_)
                | ClientError::Validation(_)
                | ClientError::NotFound(_)
                | ClientError::Forbidden(_)
                | ClientError::Unauthorized
        )
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
