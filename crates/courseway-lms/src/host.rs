//! The collaborator interface consumed by the route layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use courseway_models::{
    Answer, Course, CourseCategory, CourseDescription, CourseListQuery, CourseResources,
    CreateAnswerDto, CreateCourseCategoryDto, CreateCourseDescriptionDto, CreateCourseDto,
    CreateLearningPathDocumentDto, CreateLearningPathDto, CreateQuestionDto, CreateSectionDto,
    CreateTestDto, Document, LearningPath, LearningPathCategory, LearningPathItem, Question, Test,
    ToolIntro, UserFilter, UserSummary,
};

use crate::error::LmsResult;

/// Account as stored by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub email: Option<String>,
    /// 1: teacher, 5: student
    #[serde(default = "default_status")]
    pub status: i64,
    #[serde(default)]
    pub is_admin: bool,
    /// bcrypt hash
    pub password_hash: String,
}

fn default_status() -> i64 {
    5
}

impl UserAccount {
    pub fn to_summary(&self) -> UserSummary {
        UserSummary {
            user_id: self.id,
            username: self.username.clone(),
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            email: self.email.clone(),
        }
    }
}

#[async_trait]
pub trait Lms: Send + Sync {
    // Users
    async fn find_user(&self, username: &str) -> LmsResult<Option<UserAccount>>;
    async fn find_user_by_id(&self, user_id: i64) -> LmsResult<Option<UserAccount>>;
    /// Checks `password` against the account's stored credential.
    async fn check_password(&self, user: &UserAccount, password: &str) -> LmsResult<bool>;
    async fn list_users(&self, filter: &UserFilter) -> LmsResult<Vec<UserAccount>>;

    // Courses
    async fn list_courses(&self, query: &CourseListQuery) -> LmsResult<Vec<Course>>;
    async fn find_course(&self, code: &str) -> LmsResult<Option<Course>>;
    /// Creates a course. `Conflict` when the wanted or generated code is taken.
    async fn create_course(&self, input: &CreateCourseDto, creator_id: i64) -> LmsResult<Course>;
    async fn delete_course(&self, code: &str) -> LmsResult<bool>;
    /// `Conflict` when the course already has a description of this type.
    async fn add_course_description(
        &self,
        course_code: &str,
        input: &CreateCourseDescriptionDto,
    ) -> LmsResult<CourseDescription>;
    async fn set_tool_intro(
        &self,
        course_code: &str,
        tool_id: &str,
        session_id: i64,
        intro_text: &str,
    ) -> LmsResult<ToolIntro>;
    async fn course_resources(&self, course_code: &str) -> LmsResult<CourseResources>;

    // Course categories
    async fn list_categories(&self) -> LmsResult<Vec<CourseCategory>>;
    async fn find_category(&self, code: &str) -> LmsResult<Option<CourseCategory>>;
    async fn create_category(&self, input: &CreateCourseCategoryDto) -> LmsResult<CourseCategory>;
    async fn delete_category(&self, code: &str) -> LmsResult<bool>;

    // Learning paths
    async fn list_learning_paths(&self, course_code: &str) -> LmsResult<Vec<LearningPath>>;
    async fn find_learning_path(
        &self,
        course_code: &str,
        learning_path_id: i64,
    ) -> LmsResult<Option<LearningPath>>;
    async fn create_learning_path(
        &self,
        course_code: &str,
        input: &CreateLearningPathDto,
        creator_id: i64,
    ) -> LmsResult<LearningPath>;
    async fn list_learning_path_categories(
        &self,
        course_code: &str,
    ) -> LmsResult<Vec<LearningPathCategory>>;
    async fn create_learning_path_category(
        &self,
        course_code: &str,
        name: &str,
    ) -> LmsResult<LearningPathCategory>;
    async fn list_sections(&self, learning_path_id: i64) -> LmsResult<Vec<LearningPathItem>>;
    /// Every item of the learning path, whatever its type.
    async fn list_learning_path_items(
        &self,
        learning_path_id: i64,
    ) -> LmsResult<Vec<LearningPathItem>>;
    async fn create_section(
        &self,
        learning_path_id: i64,
        input: &CreateSectionDto,
    ) -> LmsResult<LearningPathItem>;

    // Documents
    /// Documents directly inside `folder` (`/` for the root).
    async fn list_documents(&self, course_code: &str, folder: &str) -> LmsResult<Vec<Document>>;
    async fn list_learning_path_documents(
        &self,
        learning_path_id: i64,
    ) -> LmsResult<Vec<Document>>;
    /// Creates an HTML document and appends it to the learning path.
    async fn create_learning_path_document(
        &self,
        course_code: &str,
        learning_path_id: i64,
        input: &CreateLearningPathDocumentDto,
        creator_id: i64,
    ) -> LmsResult<Document>;

    // Tests
    async fn list_tests(&self, course_code: &str) -> LmsResult<Vec<Test>>;
    async fn find_test(&self, course_code: &str, test_id: i64) -> LmsResult<Option<Test>>;
    async fn create_test(&self, course_code: &str, input: &CreateTestDto) -> LmsResult<Test>;
    async fn delete_test(&self, course_code: &str, test_id: i64) -> LmsResult<bool>;
    /// Appends an existing test to a learning path as a `quiz` item.
    async fn add_test_to_learning_path(
        &self,
        learning_path_id: i64,
        test: &Test,
        parent_id: i64,
        previous_id: Option<i64>,
        author_id: i64,
    ) -> LmsResult<LearningPathItem>;

    // Questions
    async fn list_questions(&self, course_code: &str, test_id: i64) -> LmsResult<Vec<Question>>;
    async fn find_question(
        &self,
        course_code: &str,
        question_id: i64,
    ) -> LmsResult<Option<Question>>;
    /// Creates a question, attached to `test_id` when given.
    async fn create_question(
        &self,
        course_code: &str,
        test_id: Option<i64>,
        input: &CreateQuestionDto,
    ) -> LmsResult<Question>;
    async fn delete_question(&self, course_code: &str, question_id: i64) -> LmsResult<bool>;
    /// Detaches a question from a test without deleting it.
    async fn remove_question_from_test(
        &self,
        course_code: &str,
        test_id: i64,
        question_id: i64,
    ) -> LmsResult<bool>;

    // Answers
    async fn list_answers(&self, question_id: i64) -> LmsResult<Vec<Answer>>;
    async fn create_answer(
        &self,
        question_id: i64,
        input: &CreateAnswerDto,
        default_destination: &str,
    ) -> LmsResult<Answer>;
}
