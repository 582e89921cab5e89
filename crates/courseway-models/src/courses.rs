//! Course domain DTOs and records.
//!
//! Covers courses, course categories, course descriptions and per-tool introduction
//! texts.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use courseway_validation::{Check, Constrained, Constraints, ValueType};

use crate::serde_helpers::{deserialize_optional_flag, deserialize_optional_numeric};
use crate::{required_text, text, unsigned};

/// Tool identifiers accepted by the tool introduction endpoint.
pub const TOOL_IDS: &[&str] = &[
    "document",
    "final_item",
    "readout_text",
    "thumbnail",
    "hotpotatoes",
    "calendar_event",
    "link",
    "link_category",
    "course_description",
    "search",
    "learnpath",
    "learnpath_category",
    "agenda",
    "announcement",
    "forum",
    "forum_category",
    "forum_thread",
    "forum_post",
    "forum_attachment",
    "forum_thread_qualify",
    "thread",
    "post",
    "dropbox",
    "quiz",
    "test_category",
    "user",
    "group",
    "blog_management",
    "chat",
    "student_publication",
    "tracking",
    "homepage_link",
    "course_setting",
    "backup",
    "copy_course_content",
    "recycle_course",
    "course_homepage",
    "course_rights",
    "file_upload",
    "course_maintenance",
    "survey",
    "wiki",
    "glossary",
    "gradebook",
    "notebook",
    "attendance",
    "course_progress",
    "portfolio",
    "compilatio",
    "xapi",
];

/// `{course_code}` path segment.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct CoursePath {
    /// Unique string identifier of the course
    pub course_code: String,
}

impl Constrained for CoursePath {
    fn constraints() -> Constraints {
        Constraints::new().required("course_code", required_text())
    }
}

/// Query parameters for the course listing.
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseListQuery {
    /// Offset of the first course returned
    #[serde(default, deserialize_with = "deserialize_optional_numeric")]
    pub from: Option<i64>,
    /// Maximum number of courses; 0 or absent returns all
    #[serde(default, deserialize_with = "deserialize_optional_numeric")]
    pub howmany: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_numeric")]
    pub visibility: Option<i64>,
    /// Title (or code) prefix
    pub startwith: Option<String>,
    #[serde(
        rename = "alsoSearchCode",
        default,
        deserialize_with = "deserialize_optional_flag"
    )]
    #[param(value_type = Option<String>)]
    pub also_search_code: Option<bool>,
}

impl Constrained for CourseListQuery {
    fn constraints() -> Constraints {
        Constraints::new()
            .optional("from", [Check::Type(ValueType::Numeric)])
            .optional("howmany", [Check::Type(ValueType::Numeric)])
            .optional("visibility", [Check::Type(ValueType::Numeric)])
            .optional("startwith", text())
            .optional("alsoSearchCode", [Check::choice(["true", "false"])])
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(max = 250, message = "value is too long."))]
    #[schema(example = "Introduction to Algebra")]
    pub title: String,
    /// Creator; defaults to the authenticated account
    pub user_id: Option<i64>,
    pub intro_text: Option<String>,
    #[validate(length(max = 40, message = "value is too long."))]
    pub wanted_code: Option<String>,
    pub course_language: Option<String>,
    pub disk_quota: Option<i64>,
    pub visibility: Option<i64>,
    pub course_category: Option<String>,
    pub department_name: Option<String>,
    pub department_url: Option<String>,
    pub subscribe: Option<i64>,
    pub unsubscribe: Option<i64>,
    #[serde(default)]
    pub teachers: Vec<i64>,
}

impl Constrained for CreateCourseDto {
    fn constraints() -> Constraints {
        let mut user_id = vec![Check::NotBlank];
        user_id.extend(unsigned());

        Constraints::new()
            .required("title", required_text())
            .optional("user_id", user_id)
            .optional("intro_text", text())
            .optional("wanted_code", text())
            .optional("course_language", text())
            .optional("disk_quota", unsigned())
            .optional("visibility", unsigned())
            .optional("course_category", text())
            .optional("department_name", text())
            .optional("department_url", text())
            .optional("subscribe", unsigned())
            .optional("unsubscribe", unsigned())
            .optional(
                "teachers",
                [Check::Type(ValueType::Array), Check::all(unsigned())],
            )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub directory: String,
    pub course_language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_code: Option<String>,
    pub visibility: i64,
    pub disk_quota: i64,
    pub subscribe: i64,
    pub unsubscribe: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro_text: Option<String>,
    #[serde(default)]
    pub teachers: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDescriptionDto {
    pub description_type: i64,
    pub title: String,
    pub content: String,
}

impl Constrained for CreateCourseDescriptionDto {
    fn constraints() -> Constraints {
        Constraints::new()
            .required("description_type", unsigned())
            .required("title", required_text())
            .required("content", text())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CourseDescription {
    pub id: i64,
    pub course_code: String,
    pub description_type: i64,
    pub title: String,
    pub content: String,
}

/// `{course_code}/tool/{tool_id}` path segments.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct ToolIntroPath {
    pub course_code: String,
    /// One of the host's tool identifiers, e.g. `course_homepage`
    pub tool_id: String,
}

impl Constrained for ToolIntroPath {
    fn constraints() -> Constraints {
        Constraints::new()
            .required("course_code", required_text())
            .required("tool_id", [Check::choice(TOOL_IDS.iter().copied())])
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ToolIntroDto {
    pub intro_text: String,
    #[serde(default, deserialize_with = "deserialize_optional_numeric")]
    pub session_id: Option<i64>,
}

impl Constrained for ToolIntroDto {
    fn constraints() -> Constraints {
        Constraints::new()
            .required("intro_text", text())
            .optional(
                "session_id",
                [Check::NotBlank, Check::Type(ValueType::Numeric)],
            )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ToolIntro {
    pub course_code: String,
    pub tool_id: String,
    pub session_id: i64,
    pub intro_text: String,
}

/// `{category_code}` path segment.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct CategoryPath {
    pub category_code: String,
}

impl Constrained for CategoryPath {
    fn constraints() -> Constraints {
        Constraints::new().required("category_code", required_text())
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourseCategoryDto {
    #[schema(example = "Mathematics")]
    pub name: String,
    #[validate(length(max = 40, message = "value is too long."))]
    #[schema(example = "MATH")]
    pub category_code: String,
    pub parent_code: Option<String>,
}

impl Constrained for CreateCourseCategoryDto {
    fn constraints() -> Constraints {
        Constraints::new()
            .required("name", required_text())
            .required("category_code", required_text())
            .optional("parent_code", text())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CourseCategory {
    pub id: i64,
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
    pub children_count: i64,
    pub courses_count: i64,
}

/// Everything the host holds for one course, grouped by resource type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CourseResources {
    pub documents: Vec<crate::documents::Document>,
    pub learning_paths: Vec<crate::learning_paths::LearningPath>,
    pub tests: Vec<crate::quizzes::Test>,
    pub questions: Vec<crate::quizzes::Question>,
}

impl CourseResources {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
            && self.learning_paths.is_empty()
            && self.tests.is_empty()
            && self.questions.is_empty()
    }
}
