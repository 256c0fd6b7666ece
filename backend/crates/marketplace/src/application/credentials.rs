//! Password hashing and verification on the blocking pool

use platform::password::PasswordHasher;

use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{MarketError, MarketResult};

pub(crate) async fn hash_password(
    hasher: PasswordHasher,
    raw: RawPassword,
) -> MarketResult<UserPassword> {
    tokio::task::spawn_blocking(move || UserPassword::from_raw(&raw, &hasher))
        .await
        .map_err(|e| MarketError::Internal(format!("Hashing task failed: {e}")))?
}

/// Returns the password back so the caller can re-hash it
pub(crate) async fn verify_password(
    stored: UserPassword,
    raw: RawPassword,
) -> MarketResult<(bool, RawPassword)> {
    tokio::task::spawn_blocking(move || (stored.verify(&raw), raw))
        .await
        .map_err(|e| MarketError::Internal(format!("Verification task failed: {e}")))
}
