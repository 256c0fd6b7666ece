//! Application Configuration
//!
//! Configuration for the marketplace application layer.

use platform::password::{DEFAULT_COST, MIN_COST, PasswordHasher};

use crate::error::MarketResult;

/// Marketplace application configuration
#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    /// bcrypt work factor for new hashes
    pub password_cost: u32,
    /// Minimum password length (characters)
    pub min_password_length: usize,
    /// Minimum length of course description and link
    pub min_course_field_length: usize,
    /// Courses per catalog page
    pub catalog_page_size: usize,
    /// Administrator account seeded at startup, if any
    pub admin_email: Option<String>,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            password_cost: DEFAULT_COST,
            min_password_length: 5,
            min_course_field_length: 3,
            catalog_page_size: 5,
            admin_email: None,
        }
    }
}

impl MarketplaceConfig {
    /// Create config for development (cheaper hashing)
    pub fn development() -> Self {
        Self {
            password_cost: 10,
            ..Default::default()
        }
    }

    /// Create config for tests (minimum bcrypt cost)
    pub fn for_tests() -> Self {
        Self {
            password_cost: MIN_COST,
            ..Default::default()
        }
    }

    /// Hasher for the configured work factor
    pub fn hasher(&self) -> MarketResult<PasswordHasher> {
        Ok(PasswordHasher::new(self.password_cost)?)
    }
}
