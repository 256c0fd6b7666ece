//! Password Hashing and Verification
//!
//! Salted adaptive password hashing with:
//! - bcrypt (`$2b$` modular-crypt strings, cost factor configurable)
//! - A fresh random salt for every hash, so equal passwords never share a hash
//! - Zeroization of clear text passwords
//! - Verification of `$2a$` / `$2y$` hashes written by older stores
//!
//! Length minimums are business policy and are enforced by the caller;
//! this module only rejects input that bcrypt cannot represent faithfully.

use std::fmt;

use bcrypt::HashParts;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// bcrypt only reads the first 72 bytes of its input
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Default work factor
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// Smallest cost bcrypt accepts
pub const MIN_COST: u32 = 4;

/// Largest cost bcrypt accepts
pub const MAX_COST: u32 = 31;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is empty
    #[error("Password cannot be empty")]
    Empty,

    /// Password is longer than bcrypt can hash
    #[error("Password must be at most {max} bytes (got {actual})")]
    TooLong { max: usize, actual: usize },

    /// Password contains control characters
    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(#[from] bcrypt::BcryptError),

    /// Invalid hash format
    #[error("Invalid password hash format")]
    InvalidHashFormat,

    /// Work factor outside the range bcrypt supports
    #[error("bcrypt cost must be between 4 and 31 (got {0})")]
    CostOutOfRange(u32),
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone`
/// - Debug output is redacted
///
/// ## Examples
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("secret1".to_string()).unwrap();
/// assert_eq!(password.char_count(), 7);
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password
    ///
    /// The input is taken as typed. It is not trimmed or normalized, so
    /// hashes produced elsewhere for the same bytes still verify.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::for_verification(raw)?;
        password.ensure_hashable()?;
        Ok(password)
    }

    /// Accept input of any length for checking against an existing hash
    ///
    /// bcrypt reads only the first 72 bytes, so a longer password set by an
    /// older store still verifies. Such input must not be hashed anew.
    pub fn for_verification(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self(raw);

        if password.0.is_empty() {
            return Err(PasswordPolicyError::Empty);
        }

        if password.0.chars().any(|ch| ch.is_control() && ch != '\t') {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(password)
    }

    /// Fail if bcrypt would silently drop part of the input
    pub fn ensure_hashable(&self) -> Result<(), PasswordPolicyError> {
        if self.0.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_BYTES,
                actual: self.0.len(),
            });
        }
        Ok(())
    }

    /// Create without validation (for testing)
    #[cfg(test)]
    pub fn new_unchecked(raw: String) -> Self {
        Self(raw)
    }

    /// Number of Unicode scalar values, used for length policies
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Compare two clear text passwords (confirmation fields)
    pub fn matches(&self, other: &ClearTextPassword) -> bool {
        self.0 == other.0
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hasher
// ============================================================================

/// bcrypt hasher with a fixed work factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher for the given cost factor
    pub fn new(cost: u32) -> Result<Self, PasswordHashError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(PasswordHashError::CostOutOfRange(cost));
        }
        Ok(Self { cost })
    }

    /// Configured work factor
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a freshly generated 128-bit salt
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let hash = bcrypt::hash(password.as_bytes(), self.cost)?;
        Ok(HashedPassword { hash })
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

// ============================================================================
// Hashed Password (safe to store)
// ============================================================================

/// bcrypt hash in modular-crypt format
///
/// ## Examples
/// ```rust
/// use platform::password::{ClearTextPassword, PasswordHasher};
///
/// let password = ClearTextPassword::new("secret1".to_string()).unwrap();
/// let hashed = PasswordHasher::new(4).unwrap().hash(&password).unwrap();
/// assert!(hashed.verify(&password));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from a stored hash string (e.g., from database)
    pub fn from_stored(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();

        hash.parse::<HashParts>()
            .map_err(|_| PasswordHashError::InvalidHashFormat)?;

        Ok(Self { hash })
    }

    /// Get the hash string for storage
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash
    ///
    /// Returns `false` for a wrong password and for an unreadable hash.
    pub fn verify(&self, password: &ClearTextPassword) -> bool {
        match bcrypt::verify(password.as_bytes(), &self.hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash could not be verified");
                false
            }
        }
    }

    /// Work factor this hash was produced with
    pub fn cost(&self) -> Option<u32> {
        self.hash.parse::<HashParts>().ok().map(|p| p.get_cost())
    }

    /// Check if the hash was produced with a different cost than `target`
    pub fn needs_rehash(&self, target: u32) -> bool {
        self.cost() != Some(target)
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}
