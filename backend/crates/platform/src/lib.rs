//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing and verification (bcrypt, salted per hash)
//! - Zeroization of clear text passwords

pub mod password;
