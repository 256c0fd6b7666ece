//! User Entity
//!
//! Account holder with credentials, balance and role.

use crate::domain::value_object::{
    UserId, email::Email, money::Money, user_name::UserName, user_password::UserPassword,
    user_role::UserRole,
};
use crate::error::MarketResult;

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// User name (unique, for display)
    pub user_name: UserName,
    /// Email (unique, for login)
    pub email: Email,
    /// bcrypt hash of the password
    pub password_hash: UserPassword,
    /// Account balance, never negative
    pub balance: Money,
    /// Role (User, Admin)
    pub user_role: UserRole,
}

impl User {
    /// Create a new user with an empty balance and the default role
    pub fn new(user_name: UserName, email: Email, password_hash: UserPassword) -> Self {
        Self {
            user_id: UserId::new(),
            user_name,
            email,
            password_hash,
            balance: Money::ZERO,
            user_role: UserRole::default(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user_role.is_admin()
    }

    pub fn can_afford(&self, price: Money) -> bool {
        self.balance >= price
    }

    /// Add funds to the balance
    pub fn top_up(&mut self, amount: Money) -> MarketResult<()> {
        self.balance = self.balance.checked_add(amount)?;
        Ok(())
    }

    /// Take funds from the balance, failing if they do not cover `amount`
    pub fn debit(&mut self, amount: Money) -> MarketResult<()> {
        self.balance = self.balance.checked_sub(amount)?;
        Ok(())
    }

    pub fn set_balance(&mut self, balance: Money) {
        self.balance = balance;
    }

    pub fn set_password(&mut self, password_hash: UserPassword) {
        self.password_hash = password_hash;
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.user_role = role;
    }
}
