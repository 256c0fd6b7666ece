//! Course Administration Use Case
//!
//! Adding and deleting catalog courses.

use std::sync::Arc;

use crate::application::config::MarketplaceConfig;
use crate::application::input::{require_filled, require_min_length};
use crate::domain::entity::{course::Course, session::Session};
use crate::domain::repository::CourseRepository;
use crate::domain::value_object::{course_name::CourseName, money::Money};
use crate::error::{MarketError, MarketResult};

/// New course input, as typed into the admin form
pub struct NewCourseInput {
    pub name: String,
    pub description: String,
    pub price: String,
    pub link: String,
}

pub struct CourseAdminUseCase<C>
where
    C: CourseRepository,
{
    course_repo: Arc<C>,
    config: Arc<MarketplaceConfig>,
}

impl<C> CourseAdminUseCase<C>
where
    C: CourseRepository,
{
    pub fn new(course_repo: Arc<C>, config: Arc<MarketplaceConfig>) -> Self {
        Self {
            course_repo,
            config,
        }
    }

    pub async fn add_course(&self, session: &Session, input: NewCourseInput) -> MarketResult<Course> {
        let admin_id = *session.require_admin()?;
        require_filled(&[&input.name, &input.description, &input.price, &input.link])?;

        let name = CourseName::new(&input.name)?;
        if self.course_repo.exists_by_name(&name).await? {
            return Err(MarketError::CourseNameTaken);
        }

        let price = Money::parse(&input.price)?;

        let min = self.config.min_course_field_length;
        let link = require_min_length(&input.link, "link", min)?;
        let description = require_min_length(&input.description, "description", min)?;

        let course = Course::new(name, description, price, link);
        self.course_repo.create(&course).await?;

        tracing::info!(
            admin_id = %admin_id,
            course_id = %course.course_id,
            course = %course.name,
            price = %course.price,
            "Course added"
        );

        Ok(course)
    }

    pub async fn delete_course(&self, session: &Session, name: &str) -> MarketResult<()> {
        let admin_id = *session.require_admin()?;
        require_filled(&[name])?;

        let name = CourseName::new(name).map_err(|_| MarketError::CourseNotFound)?;
        let course = self
            .course_repo
            .find_by_name(&name)
            .await?
            .ok_or(MarketError::CourseNotFound)?;

        if !self.course_repo.delete(&course.course_id).await? {
            return Err(MarketError::CourseNotFound);
        }

        tracing::info!(admin_id = %admin_id, course = %course.name, "Course deleted");

        Ok(())
    }
}
