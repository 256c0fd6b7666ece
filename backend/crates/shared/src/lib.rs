//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - Failure classification ([`error::kind::ErrorKind`]) and the user-facing
//!   [`error::app_error::AppError`] value
//! - Typed entity identifiers ([`id::Id`])
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
