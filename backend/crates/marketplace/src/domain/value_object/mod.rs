//! Value Object Module

pub mod course_name;
pub mod email;
pub mod money;
pub mod user_name;
pub mod user_password;
pub mod user_role;

pub use kernel::id::{CourseId, UserId};
