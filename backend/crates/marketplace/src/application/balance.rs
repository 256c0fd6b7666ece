//! Balance Use Case
//!
//! Top-ups by the account owner, plus administrator inspection and override.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::application::input::require_filled;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, money::Money};
use crate::error::{MarketError, MarketResult};

pub struct BalanceUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> BalanceUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Add funds to the signed-in user's balance
    pub async fn top_up(&self, session: &Session, amount: Decimal) -> MarketResult<User> {
        let user_id = session.require_user()?;

        if amount <= Decimal::ZERO {
            return Err(MarketError::NonPositiveAmount);
        }
        let amount = Money::new(amount)?;

        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(MarketError::UserNotFound)?;

        user.top_up(amount)?;
        self.user_repo.update(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            amount = %amount,
            balance = %user.balance,
            "Balance topped up"
        );

        Ok(user)
    }

    /// Overwrite a user's balance (administrator correction)
    pub async fn set_balance(
        &self,
        session: &Session,
        email: &str,
        amount: Decimal,
    ) -> MarketResult<User> {
        let admin_id = *session.require_admin()?;

        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MarketError::NegativeBalance);
        }
        let amount = Money::new(amount)?;

        let mut user = self.find_by_email(email).await?;
        let previous = user.balance;

        user.set_balance(amount);
        self.user_repo.update(&user).await?;

        tracing::info!(
            admin_id = %admin_id,
            user_id = %user.user_id,
            previous = %previous,
            balance = %user.balance,
            "Balance set by administrator"
        );

        Ok(user)
    }

    /// Current balance of any user (administrator)
    pub async fn balance_of(&self, session: &Session, email: &str) -> MarketResult<Money> {
        session.require_admin()?;
        Ok(self.find_by_email(email).await?.balance)
    }

    async fn find_by_email(&self, email: &str) -> MarketResult<User> {
        require_filled(&[email])?;
        let email = Email::new(email)?;

        self.user_repo
            .find_by_email(&email)
            .await?
            .ok_or(MarketError::UserNotFound)
    }
}
