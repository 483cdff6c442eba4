//! Seating error types
//!
//! Every failure leaves the board consistent and interactive. Local rejections
//! happen before any mutation; commit failures happen after the optimistic
//! change and are rolled back before the error reaches the caller.

use gala_client::ClientError;
use shared::error::{AppError, ErrorCode};
use shared::models::{Capability, Role};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeatingError {
    /// Initial fetch failed; previous state is kept
    #[error("Failed to load seating: {0}")]
    Load(#[source] ClientError),

    /// Local capacity pre-check failed; no request was sent
    #[error("Table {table_number} is full ({capacity} seats)")]
    CapacityExceeded { table_number: u32, capacity: u32 },

    /// Customization input rejected before any request
    #[error("{field}: {message}")]
    Validation {
        code: ErrorCode,
        field: String,
        message: String,
    },

    /// Server refused an optimistic change; local state was rolled back
    #[error("Update rejected by server: {0}")]
    CommitConflict(#[source] ClientError),

    /// Request never completed; local state was rolled back
    #[error("Network failure: {0}")]
    NetworkFailure(#[source] ClientError),

    #[error("Guest {0} not found")]
    GuestNotFound(i64),

    #[error("Table {0} not found")]
    TableNotFound(u32),

    /// Guest already has an operation in flight
    #[error("Guest {0} has a pending update")]
    GuestBusy(i64),

    /// Table already has a customization update in flight
    #[error("Table {0} has a pending update")]
    TableBusy(u32),

    #[error("Role {role} lacks {capability:?}")]
    PermissionDenied { role: Role, capability: Capability },

    #[error("Seating board has no event loaded")]
    NotInitialized,
}

impl SeatingError {
    pub fn validation(code: ErrorCode, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Classify a failed commit: transport errors vs. server rejections
    pub fn from_commit(err: ClientError) -> Self {
        if err.is_transport() {
            Self::NetworkFailure(err)
        } else {
            Self::CommitConflict(err)
        }
    }

    /// Error code for front-end localisation
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Load(_) => ErrorCode::SeatingLoadFailed,
            Self::CapacityExceeded { .. } => ErrorCode::TableFull,
            Self::Validation { code, .. } => *code,
            Self::CommitConflict(_) => ErrorCode::SeatingConflict,
            Self::NetworkFailure(_) => ErrorCode::NetworkError,
            Self::GuestNotFound(_) => ErrorCode::GuestNotFound,
            Self::TableNotFound(_) => ErrorCode::TableNotFound,
            Self::GuestBusy(_) => ErrorCode::GuestBusy,
            Self::TableBusy(_) => ErrorCode::TableBusy,
            Self::PermissionDenied { .. } => ErrorCode::PermissionDenied,
            Self::NotInitialized => ErrorCode::SeatingNotInitialized,
        }
    }

    /// Whether local state was rolled back because of this error
    pub fn is_rollback(&self) -> bool {
        matches!(self, Self::CommitConflict(_) | Self::NetworkFailure(_))
    }
}

/// Field-validation failures from the shared limits
impl From<AppError> for SeatingError {
    fn from(err: AppError) -> Self {
        let field = err
            .details
            .as_ref()
            .and_then(|d| d.get("field"))
            .and_then(|v| v.as_str())
            .unwrap_or("input")
            .to_string();
        Self::Validation {
            code: err.code,
            field,
            message: err.message,
        }
    }
}

pub type SeatingResult<T> = Result<T, SeatingError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::validation::validate_custom_capacity;

    #[test]
    fn test_codes() {
        let err = SeatingError::CapacityExceeded {
            table_number: 3,
            capacity: 8,
        };
        assert_eq!(err.code(), ErrorCode::TableFull);
        assert_eq!(err.to_string(), "Table 3 is full (8 seats)");
        assert!(!err.is_rollback());

        assert_eq!(SeatingError::GuestBusy(1).code(), ErrorCode::GuestBusy);
        assert_eq!(
            SeatingError::NotInitialized.code(),
            ErrorCode::SeatingNotInitialized
        );
    }

    #[test]
    fn test_from_commit_classification() {
        let err = SeatingError::from_commit(ClientError::Conflict("table full".into()));
        assert!(matches!(err, SeatingError::CommitConflict(_)));
        assert_eq!(err.code(), ErrorCode::SeatingConflict);
        assert!(err.is_rollback());

        let err = SeatingError::from_commit(ClientError::Internal("boom".into()));
        assert!(matches!(err, SeatingError::CommitConflict(_)));
    }

    #[test]
    fn test_from_app_error_keeps_field() {
        let err: SeatingError = validate_custom_capacity(Some(30)).unwrap_err().into();
        match err {
            SeatingError::Validation { code, field, .. } => {
                assert_eq!(code, ErrorCode::ValueOutOfRange);
                assert_eq!(field, "custom_capacity");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
