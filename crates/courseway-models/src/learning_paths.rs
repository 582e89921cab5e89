//! Learning path DTOs and records.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use courseway_validation::{Constrained, Constraints};

use crate::serde_helpers::deserialize_numeric_id;
use crate::{numeric_id, required_text, unsigned};

/// `{course_code}/learningpath/{learningpath_id}` path segments.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct LearningPathPath {
    pub course_code: String,
    #[serde(deserialize_with = "deserialize_numeric_id")]
    pub learningpath_id: i64,
}

impl Constrained for LearningPathPath {
    fn constraints() -> Constraints {
        Constraints::new()
            .required("course_code", required_text())
            .required("learningpath_id", numeric_id())
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLearningPathDto {
    #[validate(length(max = 255, message = "value is too long."))]
    pub name: String,
    /// Author; defaults to the authenticated account
    pub user_id: Option<i64>,
    pub category_id: Option<i64>,
}

impl Constrained for CreateLearningPathDto {
    fn constraints() -> Constraints {
        Constraints::new()
            .required("name", required_text())
            .optional("user_id", unsigned())
            .optional("category_id", unsigned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LearningPath {
    pub id: i64,
    pub course_code: String,
    pub name: String,
    pub category_id: i64,
    pub creator_id: i64,
    pub display_order: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLearningPathCategoryDto {
    pub name: String,
}

impl Constrained for CreateLearningPathCategoryDto {
    fn constraints() -> Constraints {
        Constraints::new().required("name", required_text())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LearningPathCategory {
    pub id: i64,
    pub course_code: String,
    pub name: String,
    pub position: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSectionDto {
    pub title: String,
    /// Parent item; 0 or absent places the section at the top level
    pub parent_id: Option<i64>,
    /// Item to insert after; absent appends
    pub previous_id: Option<i64>,
}

impl Constrained for CreateSectionDto {
    fn constraints() -> Constraints {
        Constraints::new()
            .required("title", required_text())
            .optional("parent_id", unsigned())
            .optional("previous_id", unsigned())
    }
}

/// One entry of a learning path: a section (`dir`), a document or a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LearningPathItem {
    pub id: i64,
    pub learning_path_id: i64,
    #[schema(example = "dir")]
    pub item_type: String,
    pub title: String,
    pub parent_id: i64,
    pub previous_id: i64,
    pub display_order: i64,
    /// Document or test this item points to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerequisite: Option<i64>,
    /// Account that added the item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
}
