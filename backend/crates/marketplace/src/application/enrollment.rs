//! Enrollment Use Case
//!
//! Administrator assignment and removal of courses. Both are idempotent:
//! assigning an owned course or removing one that is not assigned succeeds
//! without writing anything.

use std::sync::Arc;

use crate::application::input::require_filled;
use crate::domain::entity::{course::Course, enrolled_user::EnrolledUser, session::Session};
use crate::domain::repository::{CourseRepository, UserRepository};
use crate::domain::value_object::{course_name::CourseName, email::Email};
use crate::error::{MarketError, MarketResult};

pub struct EnrollmentUseCase<U, C>
where
    U: UserRepository,
    C: CourseRepository,
{
    user_repo: Arc<U>,
    course_repo: Arc<C>,
}

impl<U, C> EnrollmentUseCase<U, C>
where
    U: UserRepository,
    C: CourseRepository,
{
    pub fn new(user_repo: Arc<U>, course_repo: Arc<C>) -> Self {
        Self {
            user_repo,
            course_repo,
        }
    }

    /// Grant a course; returns `false` if the user already had it
    pub async fn assign(
        &self,
        session: &Session,
        email: &str,
        course_name: &str,
    ) -> MarketResult<bool> {
        session.require_admin()?;
        let (mut enrolled, course) = self.load(email, course_name).await?;

        let course_id = course.course_id;
        if !enrolled.enroll(course) {
            tracing::debug!(user_id = %enrolled.user.user_id, course_id = %course_id, "Course already assigned");
            return Ok(false);
        }

        self.user_repo.save_enrollments(&enrolled).await?;

        tracing::info!(
            user_id = %enrolled.user.user_id,
            course = %course_name.trim(),
            "Course assigned"
        );

        Ok(true)
    }

    /// Revoke a course; returns `false` if the user did not have it
    pub async fn remove(
        &self,
        session: &Session,
        email: &str,
        course_name: &str,
    ) -> MarketResult<bool> {
        session.require_admin()?;
        let (mut enrolled, course) = self.load(email, course_name).await?;

        if !enrolled.withdraw(&course.course_id) {
            tracing::debug!(user_id = %enrolled.user.user_id, course = %course.name, "Course not assigned");
            return Ok(false);
        }

        self.user_repo.save_enrollments(&enrolled).await?;

        tracing::info!(
            user_id = %enrolled.user.user_id,
            course = %course.name,
            "Course removed"
        );

        Ok(true)
    }

    /// Courses owned by a user (administrator)
    pub async fn courses_of(&self, session: &Session, email: &str) -> MarketResult<Vec<Course>> {
        session.require_admin()?;
        require_filled(&[email])?;

        let email = Email::new(email)?;
        let enrolled = self
            .user_repo
            .find_with_courses_by_email(&email)
            .await?
            .ok_or(MarketError::UserNotFound)?;

        Ok(enrolled.courses)
    }

    async fn load(&self, email: &str, course_name: &str) -> MarketResult<(EnrolledUser, Course)> {
        require_filled(&[email, course_name])?;

        let email = Email::new(email)?;
        let enrolled = self
            .user_repo
            .find_with_courses_by_email(&email)
            .await?
            .ok_or(MarketError::UserNotFound)?;

        // A name too short to be valid cannot match a stored course
        let name = CourseName::new(course_name).map_err(|_| MarketError::CourseNotFound)?;
        let course = self
            .course_repo
            .find_by_name(&name)
            .await?
            .ok_or(MarketError::CourseNotFound)?;

        Ok((enrolled, course))
    }
}
