//! User Administration Use Case
//!
//! Account listing, deletion and the dashboard refresh.

use std::sync::Arc;

use crate::application::input::require_filled;
use crate::domain::entity::{enrolled_user::EnrolledUser, session::Session, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::{MarketError, MarketResult};

pub struct UserAdminUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UserAdminUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Delete another user's account together with their enrollments
    pub async fn delete_user(&self, session: &Session, email: &str) -> MarketResult<()> {
        let admin_id = *session.require_admin()?;
        require_filled(&[email])?;

        let email = Email::new(email)?;
        if session.email() == Some(&email) {
            return Err(MarketError::SelfDeletion);
        }

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(MarketError::UserNotFound)?;

        if user.user_id == admin_id {
            return Err(MarketError::SelfDeletion);
        }

        if !self.user_repo.delete(&user.user_id).await? {
            return Err(MarketError::UserNotFound);
        }

        tracing::info!(admin_id = %admin_id, user_id = %user.user_id, "User deleted");

        Ok(())
    }

    /// All accounts (administrator)
    pub async fn list_users(&self, session: &Session) -> MarketResult<Vec<User>> {
        session.require_admin()?;
        self.user_repo.list_all().await
    }

    /// Reload the signed-in user with their courses
    pub async fn current_user(&self, session: &Session) -> MarketResult<EnrolledUser> {
        let user_id = session.require_user()?;

        self.user_repo
            .find_with_courses(user_id)
            .await?
            .ok_or(MarketError::UserNotFound)
    }

    /// Whether an email is registered; never writes
    pub async fn email_exists(&self, email: &str) -> MarketResult<bool> {
        let email = Email::new(email)?;
        self.user_repo.exists_by_email(&email).await
    }

    /// Whether a user name is taken; never writes
    pub async fn user_exists(&self, user_name: &str) -> MarketResult<bool> {
        let user_name = UserName::new(user_name)?;
        self.user_repo.exists_by_user_name(&user_name).await
    }
}
