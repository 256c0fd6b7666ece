//! User Password Value Object
//!
//! Domain value object for user passwords.
//! Delegates to `platform::password` for cryptographic operations.
//!
//! ## Usage
//! ```rust
//! use marketplace::domain::value_object::user_password::{RawPassword, UserPassword};
//! use platform::password::PasswordHasher;
//!
//! let raw = RawPassword::new("secret1".to_string(), 5).unwrap();
//! let hasher = PasswordHasher::new(4).unwrap();
//!
//! let hashed = UserPassword::from_raw(&raw, &hasher).unwrap();
//! assert!(hashed.verify(&raw));
//! ```

use platform::password::{ClearTextPassword, HashedPassword, PasswordHasher};
use std::fmt;

use crate::error::{MarketError, MarketResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// Wrapper around `ClearTextPassword` that applies the minimum length
/// policy. Memory is zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a new raw password, requiring at least `min_length` characters
    pub fn new(raw: String, min_length: usize) -> MarketResult<Self> {
        let password = Self::for_verification(raw)?;
        password.ensure_hashable()?;
        password.ensure_min_length(min_length)?;
        Ok(password)
    }

    /// Wrap without the length policy
    ///
    /// Used when checking a password that was set under an older policy,
    /// including one longer than bcrypt reads.
    pub fn for_verification(raw: String) -> MarketResult<Self> {
        ClearTextPassword::for_verification(raw)
            .map(Self)
            .map_err(MarketError::InvalidPassword)
    }

    pub fn ensure_min_length(&self, min_length: usize) -> MarketResult<()> {
        if self.0.char_count() < min_length {
            return Err(MarketError::PasswordTooShort { min: min_length });
        }
        Ok(())
    }

    /// Must pass before the password is hashed
    pub fn ensure_hashable(&self) -> MarketResult<()> {
        self.0.ensure_hashable().map_err(MarketError::InvalidPassword)
    }

    /// Compare with a confirmation entry
    pub fn matches(&self, other: &RawPassword) -> bool {
        self.0.matches(&other.0)
    }

    pub fn as_clear_text(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed password for storage
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password with a fresh salt
    pub fn from_raw(raw: &RawPassword, hasher: &PasswordHasher) -> MarketResult<Self> {
        let hashed = hasher.hash(raw.as_clear_text())?;
        Ok(Self(hashed))
    }

    /// Restore from a stored hash string
    pub fn from_db(hash: impl Into<String>) -> MarketResult<Self> {
        HashedPassword::from_stored(hash)
            .map(Self)
            .map_err(|e| MarketError::Internal(format!("Stored password hash is unreadable: {e}")))
    }

    /// Verify a raw password against this hash
    pub fn verify(&self, raw: &RawPassword) -> bool {
        self.0.verify(raw.as_clear_text())
    }

    /// Hash string for storage
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Check whether the hash was produced with a different work factor
    pub fn needs_rehash(&self, cost: u32) -> bool {
        self.0.needs_rehash(cost)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserPassword([HASH])")
    }
}
