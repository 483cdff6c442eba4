//! Input validation helpers
//!
//! Limits for table customization, shared by the board's local pre-checks and
//! the API so both reject the same input.

use crate::error::{AppError, ErrorCode};
use crate::models::TableCustomizationUpdate;

/// Smallest allowed custom capacity
pub const MIN_CUSTOM_CAPACITY: u32 = 1;

/// Largest allowed custom capacity
pub const MAX_CUSTOM_CAPACITY: u32 = 20;

/// Table display names
pub const MAX_TABLE_NAME_LEN: usize = 50;

/// Validate that a custom capacity, if present, is within range.
pub fn validate_custom_capacity(value: Option<u32>) -> Result<(), AppError> {
    if let Some(v) = value
        && !(MIN_CUSTOM_CAPACITY..=MAX_CUSTOM_CAPACITY).contains(&v)
    {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!(
                "custom_capacity must be between {MIN_CUSTOM_CAPACITY} and {MAX_CUSTOM_CAPACITY} (got {v})"
            ),
        )
        .with_detail("field", "custom_capacity"));
    }
    Ok(())
}

/// Validate that an optional table name is within the length limit.
pub fn validate_table_name(value: Option<&str>) -> Result<(), AppError> {
    if let Some(v) = value {
        let len = v.chars().count();
        if len > MAX_TABLE_NAME_LEN {
            return Err(AppError::validation(format!(
                "table_name is too long ({len} chars, max {MAX_TABLE_NAME_LEN})"
            ))
            .with_detail("field", "table_name"));
        }
    }
    Ok(())
}

/// Trim a name and map blank input to `None`.
pub fn normalize_table_name(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Field checks that need no seating context.
pub fn validate_customization_fields(update: &TableCustomizationUpdate) -> Result<(), AppError> {
    validate_custom_capacity(update.custom_capacity)?;
    validate_table_name(update.table_name.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_bounds() {
        assert!(validate_custom_capacity(None).is_ok());
        assert!(validate_custom_capacity(Some(1)).is_ok());
        assert!(validate_custom_capacity(Some(20)).is_ok());

        let err = validate_custom_capacity(Some(0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert!(validate_custom_capacity(Some(21)).is_err());
    }

    #[test]
    fn test_table_name_length_counts_chars() {
        assert!(validate_table_name(None).is_ok());
        assert!(validate_table_name(Some(&"a".repeat(50))).is_ok());
        assert!(validate_table_name(Some(&"é".repeat(50))).is_ok());

        let err = validate_table_name(Some(&"a".repeat(51))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_normalize_table_name() {
        assert_eq!(normalize_table_name(None), None);
        assert_eq!(normalize_table_name(Some("   ".into())), None);
        assert_eq!(
            normalize_table_name(Some("  Sponsors ".into())),
            Some("Sponsors".to_string())
        );
    }
}
