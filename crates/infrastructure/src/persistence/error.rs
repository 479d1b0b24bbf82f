//! Shared error mapping for the SQLite persistence layer

use application::error::ApplicationError;
use rusqlite::ErrorCode;

/// Map a rusqlite error to an application-layer error
///
/// Constraint violations become [`ApplicationError::Conflict`].
pub fn map_sqlite_error(e: rusqlite::Error) -> ApplicationError {
    match e {
        rusqlite::Error::QueryReturnedNoRows => {
            ApplicationError::NotFound("Database record not found".to_string())
        },
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            ApplicationError::Conflict(message.unwrap_or_else(|| failure.to_string()))
        },
        other => ApplicationError::Internal(format!("Database error: {other}")),
    }
}

/// Map a pool checkout error
pub fn map_pool_error(e: r2d2::Error) -> ApplicationError {
    ApplicationError::Internal(format!("Database pool error: {e}"))
}

/// Map a stored document that no longer deserializes
pub fn map_document_error(e: serde_json::Error) -> ApplicationError {
    ApplicationError::Internal(format!("Invalid stored document: {e}"))
}
