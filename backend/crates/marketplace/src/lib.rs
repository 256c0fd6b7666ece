//! Marketplace Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, session, repository traits
//! - `application/` - Use cases and the [`MarketplaceService`] facade
//! - `infra/` - SQLite implementation with per-operation units of work
//!
//! ## Features
//! - Registration and sign-in with email + password
//! - Balances, course purchases and administrator enrollment changes
//! - Course catalog with search, sorting and paging
//!
//! ## Security Model
//! - Passwords hashed with bcrypt, upgraded on sign-in when the cost changes
//! - Sessions are plain values owned by the caller; no global state
//! - Storage failures reach callers only as a generic message

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::config::MarketplaceConfig;
pub use application::service::MarketplaceService;
pub use domain::entity::session::Session;
pub use error::{MarketError, MarketResult};
pub use infra::sqlite::{MIGRATOR, SqliteStore};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
}

#[cfg(test)]
mod tests;
