use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum length for course name (in characters)
pub const COURSE_NAME_MIN_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CourseNameError {
    #[error("Course name cannot be empty")]
    Empty,

    #[error("Course name must be at least {min} characters")]
    TooShort { min: usize },
}

/// Unique course name, trimmed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
#[serde(try_from = "String", into = "String")]
pub struct CourseName(String);

impl CourseName {
    pub fn new(input: impl AsRef<str>) -> Result<Self, CourseNameError> {
        let value = input.as_ref().trim();

        if value.is_empty() {
            return Err(CourseNameError::Empty);
        }

        if value.chars().count() < COURSE_NAME_MIN_LENGTH {
            return Err(CourseNameError::TooShort {
                min: COURSE_NAME_MIN_LENGTH,
            });
        }

        Ok(Self(value.to_string()))
    }

    #[inline]
    pub fn from_db<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring match for catalog search
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        self.0.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl TryFrom<String> for CourseName {
    type Error = CourseNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CourseName> for String {
    fn from(name: CourseName) -> Self {
        name.0
    }
}

impl AsRef<str> for CourseName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
