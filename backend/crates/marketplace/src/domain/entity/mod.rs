//! Entity Module

pub mod course;
pub mod enrolled_user;
pub mod session;
pub mod user;
