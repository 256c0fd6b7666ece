//! Purchase Course Use Case
//!
//! Debits the signed-in user and enrolls them in a course. The new balance
//! and the enrollment are written in one unit of work.

use std::sync::Arc;

use crate::domain::entity::{enrolled_user::EnrolledUser, session::Session};
use crate::domain::repository::{CourseRepository, UserRepository};
use crate::domain::value_object::CourseId;
use crate::error::{MarketError, MarketResult};

pub struct PurchaseCourseUseCase<U, C>
where
    U: UserRepository,
    C: CourseRepository,
{
    user_repo: Arc<U>,
    course_repo: Arc<C>,
}

impl<U, C> PurchaseCourseUseCase<U, C>
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

    pub async fn execute(
        &self,
        session: &Session,
        course_id: &CourseId,
    ) -> MarketResult<EnrolledUser> {
        let user_id = session.require_user()?;

        let course = self
            .course_repo
            .find_by_id(course_id)
            .await?
            .ok_or(MarketError::CourseNotFound)?;

        let mut enrolled = self
            .user_repo
            .find_with_courses(user_id)
            .await?
            .ok_or(MarketError::UserNotFound)?;

        if enrolled.owns(&course.course_id) {
            return Err(MarketError::AlreadyOwned);
        }

        if !enrolled.user.can_afford(course.price) {
            tracing::debug!(
                user_id = %user_id,
                balance = %enrolled.user.balance,
                price = %course.price,
                "Purchase rejected"
            );
            return Err(MarketError::InsufficientFunds {
                balance: enrolled.user.balance,
                price: course.price,
            });
        }

        let price = course.price;
        let course_name = course.name.clone();

        enrolled.user.debit(price)?;
        enrolled.enroll(course);

        self.user_repo.save_enrollments(&enrolled).await?;

        tracing::info!(
            user_id = %user_id,
            course = %course_name,
            price = %price,
            balance = %enrolled.user.balance,
            "Course purchased"
        );

        Ok(enrolled)
    }
}
