//! # Error Types
//!
//! Domain-specific error types for vstock-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vstock-core errors (this file)                                        │
//! │  ├── CoreError        - Import failures, wrapped validation errors     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  vstock-db errors (separate crate)                                     │
//! │  └── DbError          - Persistence failures, version conflicts        │
//! │                                                                         │
//! │  Server API errors (in app)                                            │
//! │  └── ApiError         - What the presentation layer sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Presentation           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An unknown barcode on a movement is NOT an error: the ledger reports it as
//! [`crate::MovementOutcome::ItemNotFound`] and still records the movement.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core ledger errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A bulk import row could not be normalized.
    ///
    /// ## When This Occurs
    /// - Quantity cell holds text that is not a number
    /// - Quantity cell holds a fractional number
    /// - A cell holds a nested array/object
    ///
    /// The import is all-or-nothing: the stock table is left untouched.
    #[error("Import row {row}, column '{column}': {reason}")]
    ImportMalformed {
        row: usize,
        column: String,
        reason: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an ImportMalformed error for a 1-based row number.
    pub fn import_malformed(
        row: usize,
        column: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CoreError::ImportMalformed {
            row,
            column: column.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_message() {
        let err = CoreError::import_malformed(3, "Quantité", "'beaucoup' is not a whole number");
        assert_eq!(
            err.to_string(),
            "Import row 3, column 'Quantité': 'beaucoup' is not a whole number"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        };
        assert!(err.to_string().starts_with("quantity must be between 0"));

        let err = ValidationError::NotAllowed {
            field: "language".to_string(),
            allowed: vec!["fr".to_string(), "en".to_string()],
        };
        assert_eq!(err.to_string(), "language must be one of: [\"fr\", \"en\"]");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
