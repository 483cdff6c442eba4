//! Unified error codes for the Gala platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 7xxx: Seating errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 7xxx: Seating ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table is at effective capacity
    TableFull = 7002,
    /// Guest not found in the event
    GuestNotFound = 7003,
    /// Guest has an operation in flight
    GuestBusy = 7004,
    /// Table has a customization update in flight
    TableBusy = 7005,
    /// Captain is not seated at the table
    CaptainNotSeated = 7006,
    /// Custom capacity below current occupancy
    CapacityBelowOccupancy = 7007,
    /// Server rejected an optimistic change
    SeatingConflict = 7101,
    /// Seating data could not be loaded
    SeatingLoadFailed = 7102,
    /// Seating board has no event
    SeatingNotInitialized = 7103,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Network error
    NetworkError = 9101,
    /// Request timed out
    TimeoutError = 9102,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Seating
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableFull => "Table is at capacity",
            ErrorCode::GuestNotFound => "Guest not found",
            ErrorCode::GuestBusy => "Guest has a pending seating update",
            ErrorCode::TableBusy => "Table has a pending update",
            ErrorCode::CaptainNotSeated => "Captain must be seated at the table",
            ErrorCode::CapacityBelowOccupancy => "Capacity cannot be lower than seated guests",
            ErrorCode::SeatingConflict => "Seating changed on the server, please retry",
            ErrorCode::SeatingLoadFailed => "Failed to load seating",
            ErrorCode::SeatingNotInitialized => "Seating board is not initialized",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Request timed out",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),

            // Seating
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableFull),
            7003 => Ok(ErrorCode::GuestNotFound),
            7004 => Ok(ErrorCode::GuestBusy),
            7005 => Ok(ErrorCode::TableBusy),
            7006 => Ok(ErrorCode::CaptainNotSeated),
            7007 => Ok(ErrorCode::CapacityBelowOccupancy),
            7101 => Ok(ErrorCode::SeatingConflict),
            7102 => Ok(ErrorCode::SeatingLoadFailed),
            7103 => Ok(ErrorCode::SeatingNotInitialized),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9101 => Ok(ErrorCode::NetworkError),
            9102 => Ok(ErrorCode::TimeoutError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);

        // Seating
        assert_eq!(ErrorCode::TableNotFound.code(), 7001);
        assert_eq!(ErrorCode::TableFull.code(), 7002);
        assert_eq!(ErrorCode::GuestNotFound.code(), 7003);
        assert_eq!(ErrorCode::GuestBusy.code(), 7004);
        assert_eq!(ErrorCode::SeatingConflict.code(), 7101);
        assert_eq!(ErrorCode::SeatingLoadFailed.code(), 7102);

        assert_eq!(ErrorCode::NetworkError.code(), 9101);
    }

    #[test]
    fn test_try_from_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::TableFull,
            ErrorCode::CapacityBelowOccupancy,
            ErrorCode::SeatingNotInitialized,
            ErrorCode::TimeoutError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::TableFull).unwrap();
        assert_eq!(json, "7002");
        let code: ErrorCode = serde_json::from_str("7101").unwrap();
        assert_eq!(code, ErrorCode::SeatingConflict);
        assert!(serde_json::from_str::<ErrorCode>("65000").is_err());
    }
}
