//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//!
//! Every method runs in its own unit of work. A lookup that finds nothing
//! returns `Ok(None)`; `Err` is reserved for storage failures.

use crate::domain::entity::{course::Course, enrolled_user::EnrolledUser, user::User};
use crate::domain::value_object::{
    CourseId, UserId, course_name::CourseName, email::Email, user_name::UserName,
};
use crate::error::MarketResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> MarketResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> MarketResult<Option<User>>;

    /// Find user by user name
    async fn find_by_user_name(&self, user_name: &UserName) -> MarketResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> MarketResult<Option<User>>;

    /// Check if user name exists
    async fn exists_by_user_name(&self, user_name: &UserName) -> MarketResult<bool>;

    /// Check if email exists
    async fn exists_by_email(&self, email: &Email) -> MarketResult<bool>;

    /// Load a user together with all enrolled courses
    async fn find_with_courses(&self, user_id: &UserId) -> MarketResult<Option<EnrolledUser>>;

    /// Load a user by email together with all enrolled courses
    async fn find_with_courses_by_email(&self, email: &Email)
    -> MarketResult<Option<EnrolledUser>>;

    /// Update scalar columns (name, email, password, balance, role)
    async fn update(&self, user: &User) -> MarketResult<()>;

    /// Update scalar columns and replace the enrollment set in one unit of work
    async fn save_enrollments(&self, enrolled: &EnrolledUser) -> MarketResult<()>;

    /// Delete a user and their enrollments; `false` if no such user
    async fn delete(&self, user_id: &UserId) -> MarketResult<bool>;

    /// All users ordered by user name
    async fn list_all(&self) -> MarketResult<Vec<User>>;
}

/// Course repository trait
#[trait_variant::make(CourseRepository: Send)]
pub trait LocalCourseRepository {
    /// Create a new course
    async fn create(&self, course: &Course) -> MarketResult<()>;

    /// Find course by ID
    async fn find_by_id(&self, course_id: &CourseId) -> MarketResult<Option<Course>>;

    /// Find course by name
    async fn find_by_name(&self, name: &CourseName) -> MarketResult<Option<Course>>;

    /// Check if course name exists
    async fn exists_by_name(&self, name: &CourseName) -> MarketResult<bool>;

    /// All courses ordered by name
    async fn list_all(&self) -> MarketResult<Vec<Course>>;

    /// Delete a course and its enrollments; `false` if no such course
    async fn delete(&self, course_id: &CourseId) -> MarketResult<bool>;
}
