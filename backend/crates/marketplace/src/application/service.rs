//! Marketplace Service
//!
//! Single entry point for callers. Each method builds the use case it
//! needs, runs it, and hands back an `AppResult`: failures are logged
//! once here and converted to a user-facing message.

use std::sync::Arc;

use kernel::error::app_error::AppResult;
use rust_decimal::Decimal;

use crate::application::{
    authenticate::AuthenticateUseCase,
    balance::BalanceUseCase,
    catalog::{CatalogQuery, CatalogUseCase, Page},
    change_password::{ChangePasswordInput, ChangePasswordUseCase},
    config::MarketplaceConfig,
    course_admin::{CourseAdminUseCase, NewCourseInput},
    enrollment::EnrollmentUseCase,
    purchase::PurchaseCourseUseCase,
    register::{RegisterInput, RegisterUseCase},
    user_admin::UserAdminUseCase,
};
use crate::domain::entity::{
    course::Course, enrolled_user::EnrolledUser, session::Session, user::User,
};
use crate::domain::repository::{CourseRepository, UserRepository};
use crate::domain::value_object::{CourseId, money::Money};
use crate::error::MarketError;

/// Account, catalog and enrollment operations over one store
pub struct MarketplaceService<S>
where
    S: UserRepository + CourseRepository,
{
    store: Arc<S>,
    config: Arc<MarketplaceConfig>,
}

impl<S> Clone for MarketplaceService<S>
where
    S: UserRepository + CourseRepository,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S> MarketplaceService<S>
where
    S: UserRepository + CourseRepository,
{
    pub fn new(store: S, config: MarketplaceConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &MarketplaceConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ------------------------------------------------------------------
    // Accounts
    // ------------------------------------------------------------------

    pub async fn register(&self, input: RegisterInput) -> AppResult<User> {
        RegisterUseCase::new(self.store.clone(), self.config.clone())
            .execute(input)
            .await
            .map_err(MarketError::into_app_error)
    }

    /// Create the administrator account if its email is not registered yet
    pub async fn seed_admin(
        &self,
        user_name: String,
        email: String,
        password: String,
    ) -> AppResult<Option<User>> {
        RegisterUseCase::new(self.store.clone(), self.config.clone())
            .seed_admin(user_name, email, password)
            .await
            .map_err(MarketError::into_app_error)
    }

    pub async fn authenticate(&self, email: &str, password: String) -> AppResult<Session> {
        AuthenticateUseCase::new(self.store.clone(), self.config.clone())
            .execute(email, password)
            .await
            .map_err(MarketError::into_app_error)
    }

    pub fn logout(&self, session: Session) -> Session {
        AuthenticateUseCase::new(self.store.clone(), self.config.clone()).logout(session)
    }

    pub async fn change_password(&self, input: ChangePasswordInput) -> AppResult<()> {
        ChangePasswordUseCase::new(self.store.clone(), self.config.clone())
            .execute(input)
            .await
            .map_err(MarketError::into_app_error)
    }

    pub async fn reset_password(
        &self,
        session: &Session,
        email: &str,
        new_password: String,
    ) -> AppResult<()> {
        ChangePasswordUseCase::new(self.store.clone(), self.config.clone())
            .reset(session, email, new_password)
            .await
            .map_err(MarketError::into_app_error)
    }

    /// Reload the signed-in user with their courses
    pub async fn current_user(&self, session: &Session) -> AppResult<EnrolledUser> {
        UserAdminUseCase::new(self.store.clone())
            .current_user(session)
            .await
            .map_err(MarketError::into_app_error)
    }

    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        UserAdminUseCase::new(self.store.clone())
            .email_exists(email)
            .await
            .map_err(MarketError::into_app_error)
    }

    pub async fn user_exists(&self, user_name: &str) -> AppResult<bool> {
        UserAdminUseCase::new(self.store.clone())
            .user_exists(user_name)
            .await
            .map_err(MarketError::into_app_error)
    }

    pub async fn list_users(&self, session: &Session) -> AppResult<Vec<User>> {
        UserAdminUseCase::new(self.store.clone())
            .list_users(session)
            .await
            .map_err(MarketError::into_app_error)
    }

    pub async fn delete_user(&self, session: &Session, email: &str) -> AppResult<()> {
        UserAdminUseCase::new(self.store.clone())
            .delete_user(session, email)
            .await
            .map_err(MarketError::into_app_error)
    }

    // ------------------------------------------------------------------
    // Balance
    // ------------------------------------------------------------------

    /// Add funds to the signed-in user's balance
    pub async fn adjust_balance(&self, session: &Session, amount: Decimal) -> AppResult<User> {
        BalanceUseCase::new(self.store.clone())
            .top_up(session, amount)
            .await
            .map_err(MarketError::into_app_error)
    }

    pub async fn set_balance(
        &self,
        session: &Session,
        email: &str,
        amount: Decimal,
    ) -> AppResult<User> {
        BalanceUseCase::new(self.store.clone())
            .set_balance(session, email, amount)
            .await
            .map_err(MarketError::into_app_error)
    }

    pub async fn balance_of(&self, session: &Session, email: &str) -> AppResult<Money> {
        BalanceUseCase::new(self.store.clone())
            .balance_of(session, email)
            .await
            .map_err(MarketError::into_app_error)
    }

    // ------------------------------------------------------------------
    // Enrollment
    // ------------------------------------------------------------------

    pub async fn purchase_course(
        &self,
        session: &Session,
        course_id: &CourseId,
    ) -> AppResult<EnrolledUser> {
        PurchaseCourseUseCase::new(self.store.clone(), self.store.clone())
            .execute(session, course_id)
            .await
            .map_err(MarketError::into_app_error)
    }

    pub async fn assign_course(
        &self,
        session: &Session,
        email: &str,
        course_name: &str,
    ) -> AppResult<bool> {
        EnrollmentUseCase::new(self.store.clone(), self.store.clone())
            .assign(session, email, course_name)
            .await
            .map_err(MarketError::into_app_error)
    }

    pub async fn remove_course(
        &self,
        session: &Session,
        email: &str,
        course_name: &str,
    ) -> AppResult<bool> {
        EnrollmentUseCase::new(self.store.clone(), self.store.clone())
            .remove(session, email, course_name)
            .await
            .map_err(MarketError::into_app_error)
    }

    pub async fn courses_of(&self, session: &Session, email: &str) -> AppResult<Vec<Course>> {
        EnrollmentUseCase::new(self.store.clone(), self.store.clone())
            .courses_of(session, email)
            .await
            .map_err(MarketError::into_app_error)
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    pub async fn add_course(&self, session: &Session, input: NewCourseInput) -> AppResult<Course> {
        CourseAdminUseCase::new(self.store.clone(), self.config.clone())
            .add_course(session, input)
            .await
            .map_err(MarketError::into_app_error)
    }

    pub async fn delete_course(&self, session: &Session, name: &str) -> AppResult<()> {
        CourseAdminUseCase::new(self.store.clone(), self.config.clone())
            .delete_course(session, name)
            .await
            .map_err(MarketError::into_app_error)
    }

    pub async fn list_courses(&self) -> AppResult<Vec<Course>> {
        CatalogUseCase::new(self.store.clone(), self.config.clone())
            .list()
            .await
            .map_err(MarketError::into_app_error)
    }

    /// Random selection for the dashboard highlights
    pub async fn featured_courses(&self, count: usize) -> AppResult<Vec<Course>> {
        CatalogUseCase::new(self.store.clone(), self.config.clone())
            .featured(count)
            .await
            .map_err(MarketError::into_app_error)
    }

    pub async fn search_courses(&self, query: &CatalogQuery) -> AppResult<Page<Course>> {
        CatalogUseCase::new(self.store.clone(), self.config.clone())
            .search(query)
            .await
            .map_err(MarketError::into_app_error)
    }
}
