//! Marketplace Error Types
//!
//! This module provides marketplace-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! Callers receive an `AppError` through [`MarketError::into_app_error`]:
//! user errors keep their message, storage and internal failures are logged
//! and replaced with a generic one.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::{PasswordHashError, PasswordPolicyError};
use thiserror::Error;

use crate::domain::value_object::{
    course_name::CourseNameError,
    email::EmailError,
    money::{Money, MoneyError},
    user_name::UserNameError,
};

/// Marketplace-specific result type alias
pub type MarketResult<T> = Result<T, MarketError>;

/// Message shown for any storage or internal failure
const GENERIC_FAILURE: &str = "Operation failed, please try again";

/// Marketplace-specific error variants
#[derive(Debug, Error)]
pub enum MarketError {
    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------
    #[error("All fields must be filled in")]
    MissingFields,

    #[error("{0}")]
    InvalidUserName(UserNameError),

    #[error("Email address is invalid")]
    InvalidEmail(#[from] EmailError),

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("{0}")]
    InvalidPassword(PasswordPolicyError),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("You must accept the terms of service")]
    TermsNotAccepted,

    #[error("{0}")]
    InvalidCourseName(#[from] CourseNameError),

    #[error("Course {field} must be at least {min} characters")]
    InvalidCourseField { field: &'static str, min: usize },

    #[error("{0}")]
    InvalidAmount(#[from] MoneyError),

    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    #[error("Balance cannot be negative")]
    NegativeBalance,

    // ------------------------------------------------------------------
    // Authentication / authorization
    // ------------------------------------------------------------------
    #[error("Incorrect password")]
    InvalidCredentials,

    #[error("You are not signed in")]
    NotAuthenticated,

    #[error("Administrator privileges required")]
    AdminRequired,

    #[error("You cannot delete your own account")]
    SelfDeletion,

    // ------------------------------------------------------------------
    // Lookups and conflicts
    // ------------------------------------------------------------------
    #[error("No user with this email address exists")]
    UserNotFound,

    #[error("Course not found")]
    CourseNotFound,

    #[error("User name is already taken")]
    UserNameTaken,

    #[error("Email address is already in use")]
    EmailTaken,

    #[error("A course with this name already exists")]
    CourseNameTaken,

    #[error("You already own this course")]
    AlreadyOwned,

    #[error("Insufficient funds: balance {balance}, price {price}")]
    InsufficientFunds { balance: Money, price: Money },

    // ------------------------------------------------------------------
    // Failures
    // ------------------------------------------------------------------
    /// Storage failure inside a unit of work
    #[error("Storage error in {operation}: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] PasswordHashError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MarketError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        use MarketError::*;
        match self {
            MissingFields
            | InvalidUserName(_)
            | InvalidEmail(_)
            | PasswordTooShort { .. }
            | InvalidPassword(_)
            | PasswordMismatch
            | TermsNotAccepted
            | InvalidCourseName(_)
            | InvalidCourseField { .. }
            | InvalidAmount(_)
            | NonPositiveAmount
            | NegativeBalance => ErrorKind::Validation,
            InvalidCredentials | NotAuthenticated => ErrorKind::Unauthorized,
            AdminRequired | SelfDeletion => ErrorKind::Forbidden,
            UserNotFound | CourseNotFound => ErrorKind::NotFound,
            UserNameTaken | EmailTaken | CourseNameTaken | AlreadyOwned => ErrorKind::Conflict,
            InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Storage { .. } => ErrorKind::Storage,
            PasswordHash(_) | Internal(_) => ErrorKind::Internal,
        }
    }

    /// Convert to AppError
    ///
    /// Storage and internal details never reach the message.
    pub fn to_app_error(&self) -> AppError {
        let kind = self.kind();
        if kind.is_storage_failure() {
            return AppError::new(kind, GENERIC_FAILURE);
        }

        let err = AppError::new(kind, self.to_string());
        match self {
            MarketError::InsufficientFunds { .. } => {
                err.with_action("Top up your balance and try again")
            }
            MarketError::NotAuthenticated => err.with_action("Please sign in"),
            _ => err,
        }
    }

    /// Log, then convert to AppError
    ///
    /// A constraint violation that slipped past the pre-checks (two writers
    /// racing for the same name) keeps its conflict or validation kind.
    pub fn into_app_error(self) -> AppError {
        self.log();
        match self {
            MarketError::Storage { source, .. } => {
                let converted = AppError::from(source);
                if converted.is_user_error() {
                    converted
                } else {
                    AppError::new(converted.kind(), GENERIC_FAILURE)
                }
            }
            other => other.to_app_error(),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            MarketError::Storage { operation, source } => {
                tracing::error!(operation, error = %source, "Marketplace storage error");
            }
            MarketError::PasswordHash(e) => {
                tracing::error!(error = %e, "Password hashing error");
            }
            MarketError::Internal(msg) => {
                tracing::error!(message = %msg, "Marketplace internal error");
            }
            MarketError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            MarketError::AdminRequired | MarketError::SelfDeletion => {
                tracing::warn!(error = %self, "Rejected privileged operation");
            }
            _ => {
                tracing::debug!(error = %self, "Marketplace request rejected");
            }
        }
    }
}

impl From<MarketError> for AppError {
    fn from(err: MarketError) -> Self {
        err.into_app_error()
    }
}

impl From<UserNameError> for MarketError {
    fn from(err: UserNameError) -> Self {
        MarketError::InvalidUserName(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(MarketError::MissingFields.kind(), ErrorKind::Validation);
        assert_eq!(MarketError::InvalidCredentials.kind(), ErrorKind::Unauthorized);
        assert_eq!(MarketError::SelfDeletion.kind(), ErrorKind::Forbidden);
        assert_eq!(MarketError::UserNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(MarketError::EmailTaken.kind(), ErrorKind::Conflict);
        assert_eq!(
            MarketError::InsufficientFunds {
                balance: Money::parse("10").unwrap(),
                price: Money::parse("20").unwrap()
            }
            .kind(),
            ErrorKind::InsufficientFunds
        );
        assert_eq!(
            MarketError::Internal("boom".into()).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_storage_details_hidden() {
        let err = MarketError::Storage {
            operation: "user.create",
            source: sqlx::Error::PoolTimedOut,
        };
        let app_err = err.into_app_error();
        assert_eq!(app_err.kind(), ErrorKind::Storage);
        assert_eq!(app_err.message(), GENERIC_FAILURE);
    }

    #[test]
    fn test_user_message_kept() {
        let app_err = MarketError::PasswordTooShort { min: 5 }.to_app_error();
        assert_eq!(app_err.message(), "Password must be at least 5 characters");

        let app_err: AppError = MarketError::InvalidEmail(EmailError::InvalidFormat).into();
        assert_eq!(app_err.message(), "Email address is invalid");
    }

    #[test]
    fn test_insufficient_funds_action() {
        let app_err = MarketError::InsufficientFunds {
            balance: Money::parse("10").unwrap(),
            price: Money::parse("20").unwrap(),
        }
        .to_app_error();
        assert!(app_err.action().is_some());
        assert!(app_err.message().contains("20.00"));
    }
}
