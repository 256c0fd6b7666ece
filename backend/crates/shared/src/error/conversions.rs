//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`].

use super::app_error::AppError;
use super::kind::ErrorKind;

// ============================================================================
// Standard library conversions
// ============================================================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::Forbidden,
            _ => ErrorKind::Storage,
        };
        AppError::new(kind, "I/O operation failed").with_source(err)
    }
}

impl From<std::fmt::Error> for AppError {
    fn from(err: std::fmt::Error) -> Self {
        AppError::internal("Formatting error").with_source(err)
    }
}

// ============================================================================
// rust_decimal conversions (feature-gated)
// ============================================================================

#[cfg(feature = "decimal")]
impl From<rust_decimal::Error> for AppError {
    fn from(err: rust_decimal::Error) -> Self {
        AppError::validation("Amount must be a number")
            .with_action("Use digits with an optional decimal point, e.g. 19.99")
            .with_source(err)
    }
}

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::not_found("Record not found").with_source(err),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                AppError::storage("Database connection unavailable").with_source(err)
            }
            sqlx::Error::Database(db_err) => {
                // SQLite extended result codes
                // https://www.sqlite.org/rescode.html
                let app_err = if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        // SQLITE_CONSTRAINT_UNIQUE / SQLITE_CONSTRAINT_PRIMARYKEY
                        "2067" | "1555" => AppError::conflict("Duplicate value"),
                        // SQLITE_CONSTRAINT_FOREIGNKEY
                        "787" => AppError::conflict("Referenced record is missing"),
                        // SQLITE_CONSTRAINT_CHECK
                        "275" => AppError::validation("Check constraint violation"),
                        // SQLITE_CONSTRAINT_NOTNULL
                        "1299" => AppError::validation("Required field is null"),
                        // SQLITE_BUSY / SQLITE_LOCKED and their extended forms
                        "5" | "6" | "261" | "517" | "262" => {
                            AppError::storage("Database is busy")
                        }
                        _ => AppError::storage("Database error"),
                    }
                } else {
                    AppError::storage("Database error")
                };
                app_err.with_source(err)
            }
            sqlx::Error::Io(_) => {
                AppError::storage("Database connection error").with_source(err)
            }
            sqlx::Error::Protocol(_) => {
                AppError::internal("Database protocol error").with_source(err)
            }
            sqlx::Error::Decode(_) | sqlx::Error::ColumnDecode { .. } => {
                AppError::internal("Stored data could not be decoded").with_source(err)
            }
            _ => AppError::storage("Database error").with_source(err),
        }
    }
}
