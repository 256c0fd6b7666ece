//! Register Use Case
//!
//! Creates a new user account.

use std::sync::Arc;

use crate::application::config::MarketplaceConfig;
use crate::application::credentials::hash_password;
use crate::application::input::require_filled;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::RawPassword,
    user_role::UserRole,
};
use crate::error::{MarketError, MarketResult};

/// Register input
pub struct RegisterInput {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub repeat_password: String,
    pub accepted_terms: bool,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<MarketplaceConfig>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<MarketplaceConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> MarketResult<User> {
        self.register(input, UserRole::User).await
    }

    /// Create the configured administrator unless that email is registered
    ///
    /// Returns `None` when the account already exists.
    pub async fn seed_admin(
        &self,
        user_name: String,
        email: String,
        password: String,
    ) -> MarketResult<Option<User>> {
        let parsed = Email::new(&email)?;
        if self.user_repo.exists_by_email(&parsed).await? {
            tracing::debug!(email = %parsed, "Administrator already present");
            return Ok(None);
        }

        let input = RegisterInput {
            user_name,
            email,
            repeat_password: password.clone(),
            password,
            accepted_terms: true,
        };

        self.register(input, UserRole::Admin).await.map(Some)
    }

    async fn register(&self, input: RegisterInput, user_role: UserRole) -> MarketResult<User> {
        require_filled(&[
            &input.user_name,
            &input.email,
            &input.password,
            &input.repeat_password,
        ])?;

        // Checks run in the order the registration form reports them
        let user_name = UserName::new(&input.user_name)?;
        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Err(MarketError::UserNameTaken);
        }

        let email = Email::new(&input.email)?;
        if self.user_repo.exists_by_email(&email).await? {
            return Err(MarketError::EmailTaken);
        }

        let password = RawPassword::new(input.password, self.config.min_password_length)?;
        let repeat = RawPassword::for_verification(input.repeat_password)?;
        if !password.matches(&repeat) {
            return Err(MarketError::PasswordMismatch);
        }

        if !input.accepted_terms {
            return Err(MarketError::TermsNotAccepted);
        }

        let password_hash = hash_password(self.config.hasher()?, password).await?;

        let mut user = User::new(user_name, email, password_hash);
        user.set_role(user_role);

        self.user_repo.create(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            user_role = %user.user_role,
            "User registered"
        );

        Ok(user)
    }
}
