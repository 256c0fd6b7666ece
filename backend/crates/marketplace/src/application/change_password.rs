//! Change Password Use Case
//!
//! Users change their own password by proving the old one; administrators
//! can reset any password without it.

use std::sync::Arc;

use crate::application::config::MarketplaceConfig;
use crate::application::credentials::{hash_password, verify_password};
use crate::application::input::require_filled;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{MarketError, MarketResult};

/// Change password input
pub struct ChangePasswordInput {
    pub email: String,
    pub old_password: String,
    pub new_password: String,
    pub repeat_password: String,
}

/// Change password use case
pub struct ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<MarketplaceConfig>,
}

impl<U> ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<MarketplaceConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: ChangePasswordInput) -> MarketResult<()> {
        require_filled(&[
            &input.email,
            &input.old_password,
            &input.new_password,
            &input.repeat_password,
        ])?;

        let new_password = RawPassword::for_verification(input.new_password)?;
        let repeat = RawPassword::for_verification(input.repeat_password)?;
        if !new_password.matches(&repeat) {
            return Err(MarketError::PasswordMismatch);
        }

        let email = Email::new(&input.email)?;
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(MarketError::UserNotFound)?;

        let old_password = RawPassword::for_verification(input.old_password)?;
        let (valid, _) = verify_password(user.password_hash.clone(), old_password).await?;
        if !valid {
            tracing::warn!(user_id = %user.user_id, "Password change with wrong old password");
            return Err(MarketError::InvalidCredentials);
        }

        self.store_new_password(user, new_password).await?;

        Ok(())
    }

    /// Administrator override; the old password is not required
    pub async fn reset(
        &self,
        session: &Session,
        email: &str,
        new_password: String,
    ) -> MarketResult<()> {
        let admin_id = *session.require_admin()?;
        require_filled(&[email, &new_password])?;

        let email = Email::new(email)?;
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(MarketError::UserNotFound)?;

        let user_id = user.user_id;
        self.store_new_password(user, RawPassword::for_verification(new_password)?)
            .await?;

        tracing::info!(admin_id = %admin_id, user_id = %user_id, "Password reset by administrator");

        Ok(())
    }

    async fn store_new_password(&self, mut user: User, password: RawPassword) -> MarketResult<()> {
        // Length policy is checked after the old password, as the form does
        password.ensure_hashable()?;
        password.ensure_min_length(self.config.min_password_length)?;

        let password_hash = hash_password(self.config.hasher()?, password).await?;
        user.set_password(password_hash);
        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user.user_id, "Password changed");

        Ok(())
    }
}
