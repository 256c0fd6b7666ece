//! Enrolled User Aggregate
//!
//! A user loaded together with every course they own. Enrollment changes
//! go through this aggregate and are persisted with
//! `UserRepository::save_enrollments`.

use crate::domain::entity::{course::Course, user::User};
use crate::domain::value_object::CourseId;

#[derive(Debug, Clone)]
pub struct EnrolledUser {
    pub user: User,
    pub courses: Vec<Course>,
}

impl EnrolledUser {
    pub fn new(user: User, courses: Vec<Course>) -> Self {
        Self { user, courses }
    }

    pub fn owns(&self, course_id: &CourseId) -> bool {
        self.courses.iter().any(|c| &c.course_id == course_id)
    }

    /// Add a course; returns `false` when it was already owned
    pub fn enroll(&mut self, course: Course) -> bool {
        if self.owns(&course.course_id) {
            return false;
        }
        self.courses.push(course);
        true
    }

    /// Remove a course; returns `false` when it was not owned
    pub fn withdraw(&mut self, course_id: &CourseId) -> bool {
        let before = self.courses.len();
        self.courses.retain(|c| &c.course_id != course_id);
        self.courses.len() != before
    }

    pub fn course_ids(&self) -> impl Iterator<Item = &CourseId> {
        self.courses.iter().map(|c| &c.course_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        course_name::CourseName, email::Email, money::Money, user_name::UserName,
        user_password::{RawPassword, UserPassword},
    };
    use platform::password::PasswordHasher;

    fn enrolled() -> EnrolledUser {
        let raw = RawPassword::new("secret1".to_string(), 5).unwrap();
        let user = User::new(
            UserName::new("alice").unwrap(),
            Email::new("alice@x.com").unwrap(),
            UserPassword::from_raw(&raw, &PasswordHasher::new(4).unwrap()).unwrap(),
        );
        EnrolledUser::new(user, Vec::new())
    }

    fn course(name: &str) -> Course {
        Course::new(
            CourseName::new(name).unwrap(),
            "desc".to_string(),
            Money::parse("20").unwrap(),
            "https://example.com".to_string(),
        )
    }

    #[test]
    fn test_enroll_is_idempotent() {
        let mut user = enrolled();
        let rust = course("Rust");

        assert!(user.enroll(rust.clone()));
        assert!(!user.enroll(rust.clone()));
        assert_eq!(user.courses.len(), 1);
        assert!(user.owns(&rust.course_id));
    }

    #[test]
    fn test_withdraw() {
        let mut user = enrolled();
        let rust = course("Rust");
        let sql = course("SQL");
        user.enroll(rust.clone());
        user.enroll(sql.clone());

        assert!(user.withdraw(&rust.course_id));
        assert!(!user.withdraw(&rust.course_id));
        assert_eq!(user.course_ids().collect::<Vec<_>>(), vec![&sql.course_id]);
    }
}
