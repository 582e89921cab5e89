//! JSON seed data for [`InMemoryLms`](crate::InMemoryLms).
//!
//! ```json
//! {
//!   "users": [{"id": 1, "username": "admin", "is_admin": true, "password_hash": "$2b$..."}],
//!   "categories": [{"code": "MATH", "name": "Mathematics"}],
//!   "courses": [{"code": "ALGEBRA", "title": "Algebra", "category_code": "MATH"}]
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FixtureError;
use crate::host::UserAccount;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub users: Vec<UserAccount>,
    #[serde(default)]
    pub categories: Vec<FixtureCategory>,
    #[serde(default)]
    pub courses: Vec<FixtureCourse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCategory {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub parent_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCourse {
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub category_code: Option<String>,
    #[serde(default = "default_visibility")]
    pub visibility: i64,
    #[serde(default = "default_language")]
    pub course_language: String,
    #[serde(default)]
    pub teachers: Vec<i64>,
}

fn default_visibility() -> i64 {
    2
}

pub(crate) fn default_language() -> String {
    "english".to_string()
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let raw = fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let fixture: Fixture = serde_json::from_str(&raw).map_err(|source| FixtureError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fixture.check()?;
        Ok(fixture)
    }

    /// Rejects duplicate keys and dangling references.
    pub fn check(&self) -> Result<(), FixtureError> {
        let mut user_ids = HashSet::new();
        let mut usernames = HashSet::new();
        for user in &self.users {
            if !user_ids.insert(user.id) {
                return Err(FixtureError::Invalid(format!("duplicate user id {}", user.id)));
            }
            if !usernames.insert(user.username.as_str()) {
                return Err(FixtureError::Invalid(format!(
                    "duplicate username `{}`",
                    user.username
                )));
            }
        }

        let mut category_codes = HashSet::new();
        for category in &self.categories {
            if let Some(parent) = &category.parent_code
                && !category_codes.contains(parent.as_str())
            {
                return Err(FixtureError::Invalid(format!(
                    "category `{}` references unknown parent `{}`",
                    category.code, parent
                )));
            }
            if !category_codes.insert(category.code.as_str()) {
                return Err(FixtureError::Invalid(format!(
                    "duplicate category code `{}`",
                    category.code
                )));
            }
        }

        let mut course_codes = HashSet::new();
        for course in &self.courses {
            if !course_codes.insert(course.code.as_str()) {
                return Err(FixtureError::Invalid(format!(
                    "duplicate course code `{}`",
                    course.code
                )));
            }
            if let Some(category) = &course.category_code
                && !category_codes.contains(category.as_str())
            {
                return Err(FixtureError::Invalid(format!(
                    "course `{}` references unknown category `{}`",
                    course.code, category
                )));
            }
            if let Some(teacher) = course.teachers.iter().find(|id| !user_ids.contains(*id)) {
                return Err(FixtureError::Invalid(format!(
                    "course `{}` references unknown teacher {}",
                    course.code, teacher
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Fixture {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_defaults_are_applied() {
        let fixture = parse(
            r#"{
                "users": [{"id": 1, "username": "admin", "password_hash": "x"}],
                "courses": [{"code": "ALG", "title": "Algebra"}]
            }"#,
        );

        assert!(fixture.check().is_ok());
        assert_eq!(fixture.users[0].status, 5);
        assert!(!fixture.users[0].is_admin);
        assert_eq!(fixture.courses[0].visibility, 2);
        assert_eq!(fixture.courses[0].course_language, "english");
        assert!(fixture.categories.is_empty());
    }

    #[test]
    fn test_duplicate_username_is_invalid() {
        let fixture = parse(
            r#"{"users": [
                {"id": 1, "username": "admin", "password_hash": "x"},
                {"id": 2, "username": "admin", "password_hash": "y"}
            ]}"#,
        );

        assert!(matches!(fixture.check(), Err(FixtureError::Invalid(_))));
    }

    #[test]
    fn test_dangling_references_are_invalid() {
        let unknown_category = parse(r#"{"courses": [{"code": "A", "title": "A", "category_code": "NOPE"}]}"#);
        assert!(unknown_category.check().is_err());

        let unknown_teacher = parse(r#"{"courses": [{"code": "A", "title": "A", "teachers": [9]}]}"#);
        assert!(unknown_teacher.check().is_err());

        let unknown_parent = parse(r#"{"categories": [{"code": "B", "name": "B", "parent_code": "A"}]}"#);
        assert!(unknown_parent.check().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Fixture::load(Path::new("/nonexistent/fixture.json")).unwrap_err();
        assert!(matches!(err, FixtureError::Io { .. }));
    }
}
