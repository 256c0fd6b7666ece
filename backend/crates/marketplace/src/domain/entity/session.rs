//! Session
//!
//! The acting identity for service calls. The caller owns the value and
//! passes it to every operation that needs to know who is acting.
//!
//! ```text
//! Anonymous --authenticate--> Authenticated --logout--> Anonymous
//! ```

use crate::domain::entity::user::User;
use crate::domain::value_object::{UserId, email::Email, user_role::UserRole};
use crate::error::{MarketError, MarketResult};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated {
        user_id: UserId,
        email: Email,
        user_role: UserRole,
    },
}

impl Session {
    /// Session for a user who just signed in
    pub fn for_user(user: &User) -> Self {
        Session::Authenticated {
            user_id: user.user_id,
            email: user.email.clone(),
            user_role: user.user_role,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Session::Authenticated { user_id, .. } => Some(user_id),
            Session::Anonymous => None,
        }
    }

    pub fn email(&self) -> Option<&Email> {
        match self {
            Session::Authenticated { email, .. } => Some(email),
            Session::Anonymous => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Session::Authenticated {
                user_role: UserRole::Admin,
                ..
            }
        )
    }

    /// Id of the signed-in user, or `NotAuthenticated`
    pub fn require_user(&self) -> MarketResult<&UserId> {
        self.user_id().ok_or(MarketError::NotAuthenticated)
    }

    /// Fails unless an administrator is signed in
    pub fn require_admin(&self) -> MarketResult<&UserId> {
        let user_id = self.require_user()?;
        if !self.is_admin() {
            return Err(MarketError::AdminRequired);
        }
        Ok(user_id)
    }
}
