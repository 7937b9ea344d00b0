//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Vehicle Stock                          │
//! │                                                                         │
//! │  Handler: Result<Json<T>, ApiError>                                    │
//! │       │                                                                 │
//! │       ├── ValidationError ─────────► 400 VALIDATION_ERROR              │
//! │       ├── CoreError::ImportMalformed ► 422 IMPORT_MALFORMED            │
//! │       ├── DbError::VersionConflict ──► 409 CONFLICT                    │
//! │       └── other DbError ─────────────► 500 DATABASE_ERROR              │
//! │                                                                         │
//! │  Body: { "code": "IMPORT_MALFORMED", "message": "..." }                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An unknown barcode is not an error: it answers 200 with a warning notice.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use vstock_core::{CoreError, ValidationError};
use vstock_db::DbError;

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "CONFLICT",
///   "message": "Snapshot version conflict: expected 3, found 4"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Import rows could not be normalized (422)
    ImportMalformed,

    /// Stored snapshot moved on since it was loaded (409)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,
}

impl ErrorCode {
    /// HTTP status for this code.
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::ImportMalformed => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::VersionConflict { .. } => ApiError::new(ErrorCode::Conflict, err.to_string()),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::NotFound { .. }
            | DbError::QueryFailed(_)
            | DbError::TransactionFailed(_)
            | DbError::CorruptRow { .. }
            | DbError::Internal(_) => {
                // Log the actual error but return a generic message
                tracing::error!(error = %err, "Database operation failed");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ImportMalformed { .. } => {
                ApiError::new(ErrorCode::ImportMalformed, err.to_string())
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_serialize_screaming() {
        let err = ApiError::new(ErrorCode::ImportMalformed, "bad row");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "IMPORT_MALFORMED");
        assert_eq!(json["message"], "bad row");
    }

    #[test]
    fn test_db_error_mapping() {
        let conflict: ApiError = DbError::VersionConflict {
            expected: 1,
            actual: 2,
        }
        .into();
        assert_eq!(conflict.code, ErrorCode::Conflict);
        assert_eq!(conflict.code.status(), StatusCode::CONFLICT);

        let query: ApiError = DbError::QueryFailed("disk I/O error".into()).into();
        assert_eq!(query.code, ErrorCode::DatabaseError);
        assert!(!query.message.contains("disk"));
    }

    #[test]
    fn test_core_error_mapping() {
        let import: ApiError = CoreError::import_malformed(2, "Quantité", "nope").into();
        assert_eq!(import.code.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let validation: ApiError = CoreError::Validation(ValidationError::OutOfRange {
            field: "quantity".into(),
            min: 0,
            max: i64::MAX,
        })
        .into();
        assert_eq!(validation.code, ErrorCode::ValidationError);
    }
}
