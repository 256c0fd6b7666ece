//! Course Entity

use crate::domain::value_object::{CourseId, course_name::CourseName, money::Money};

/// Course offered in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub course_id: CourseId,
    pub name: CourseName,
    pub description: String,
    pub price: Money,
    /// External link to the course material
    pub link: String,
}

impl Course {
    pub fn new(name: CourseName, description: String, price: Money, link: String) -> Self {
        Self {
            course_id: CourseId::new(),
            name,
            description,
            price,
            link,
        }
    }
}
