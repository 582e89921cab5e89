//! # Courseway Models
//!
//! Request DTOs and response records shared by the HTTP layer and the host LMS
//! collaborator.
//!
//! Every request DTO implements [`courseway_validation::Constrained`], declaring the
//! rules its raw JSON, query or path input must satisfy before it is deserialized,
//! and `validator::Validate` for the checks that only make sense on typed values.
//!
//! - [`auth`]: login
//! - [`users`]: user listing
//! - [`courses`]: courses, categories, descriptions, tool intros
//! - [`learning_paths`]: learning paths, their categories and sections
//! - [`documents`]: course and learning-path documents
//! - [`quizzes`]: tests, questions and answers

pub mod auth;
pub mod courses;
pub mod documents;
pub mod learning_paths;
pub mod quizzes;
pub mod serde_helpers;
pub mod users;

use courseway_validation::{Check, ValueType};

pub use auth::{LoginRequest, LoginResponse};
pub use courses::{
    CategoryPath, Course, CourseCategory, CourseDescription, CourseListQuery, CoursePath,
    CourseResources, CreateCourseCategoryDto, CreateCourseDescriptionDto, CreateCourseDto,
    TOOL_IDS, ToolIntro, ToolIntroDto, ToolIntroPath,
};
pub use documents::{CreateLearningPathDocumentDto, Document, DocumentListQuery};
pub use learning_paths::{
    CreateLearningPathCategoryDto, CreateLearningPathDto, CreateSectionDto, LearningPath,
    LearningPathCategory, LearningPathItem, LearningPathPath,
};
pub use quizzes::{
    Answer, CourseQuestionPath, CreateAnswerDto, CreateLearningPathTestDto, CreateQuestionDto,
    CreateTestDto, Question, QuestionPath, Test, TestPath,
};
pub use users::{UserFilter, UserSummary};

pub(crate) fn required_text() -> [Check; 2] {
    [Check::NotBlank, Check::Type(ValueType::String)]
}

pub(crate) fn text() -> [Check; 1] {
    [Check::Type(ValueType::String)]
}

pub(crate) fn unsigned() -> [Check; 2] {
    [Check::Type(ValueType::Integer), Check::PositiveOrZero]
}

pub(crate) fn numeric_id() -> [Check; 2] {
    [Check::NotBlank, Check::Type(ValueType::Numeric)]
}
