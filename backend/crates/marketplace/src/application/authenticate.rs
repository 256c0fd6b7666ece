//! Authenticate Use Case
//!
//! Signs a user in by email and password and hands back the session value.

use std::sync::Arc;

use crate::application::config::MarketplaceConfig;
use crate::application::credentials::{hash_password, verify_password};
use crate::application::input::require_filled;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{MarketError, MarketResult};

/// Authenticate use case
pub struct AuthenticateUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<MarketplaceConfig>,
}

impl<U> AuthenticateUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<MarketplaceConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, email: &str, password: String) -> MarketResult<Session> {
        require_filled(&[email, &password])?;

        let email = Email::new(email)?;
        let password = RawPassword::for_verification(password)?;
        password.ensure_min_length(self.config.min_password_length)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(MarketError::UserNotFound)?;

        let (valid, password) = verify_password(user.password_hash.clone(), password).await?;
        if !valid {
            tracing::warn!(user_id = %user.user_id, "Password verification failed");
            return Err(MarketError::InvalidCredentials);
        }

        if user.password_hash.needs_rehash(self.config.password_cost) {
            match self.upgrade_hash(user.clone(), password).await {
                Ok(()) => tracing::info!(user_id = %user.user_id, "Password hash upgraded"),
                // The sign in still succeeds with the old hash
                Err(e) => {
                    tracing::warn!(user_id = %user.user_id, error = %e, "Password hash upgrade failed")
                }
            }
        }

        tracing::info!(
            user_id = %user.user_id,
            user_role = %user.user_role,
            "User signed in"
        );

        Ok(Session::for_user(&user))
    }

    /// End the session
    pub fn logout(&self, session: Session) -> Session {
        if let Some(user_id) = session.user_id() {
            tracing::info!(user_id = %user_id, "User signed out");
        }
        Session::Anonymous
    }

    /// Re-hash with the configured cost
    async fn upgrade_hash(&self, mut user: User, password: RawPassword) -> MarketResult<()> {
        password.ensure_hashable()?;
        let password_hash = hash_password(self.config.hasher()?, password).await?;
        user.set_password(password_hash);
        self.user_repo.update(&user).await
    }
}
