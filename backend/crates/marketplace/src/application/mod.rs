//! Application Layer
//!
//! Use cases and the service facade that drives them.

pub mod authenticate;
pub mod balance;
pub mod catalog;
pub mod change_password;
pub mod config;
pub mod course_admin;
pub(crate) mod credentials;
pub mod enrollment;
pub(crate) mod input;
pub mod purchase;
pub mod register;
pub mod service;
pub mod user_admin;

// Re-exports
pub use authenticate::AuthenticateUseCase;
pub use balance::BalanceUseCase;
pub use catalog::{CatalogQuery, CatalogSort, CatalogUseCase, Page};
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use config::MarketplaceConfig;
pub use course_admin::{CourseAdminUseCase, NewCourseInput};
pub use enrollment::EnrollmentUseCase;
pub use purchase::PurchaseCourseUseCase;
pub use register::{RegisterInput, RegisterUseCase};
pub use service::MarketplaceService;
pub use user_admin::UserAdminUseCase;
