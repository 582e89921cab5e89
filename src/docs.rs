use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use courseway_core::ErrorBody;
use courseway_models::{
    Answer, Course, CourseCategory, CourseDescription, CourseResources, CreateAnswerDto,
    CreateCourseCategoryDto, CreateCourseDescriptionDto, CreateCourseDto,
    CreateLearningPathCategoryDto, CreateLearningPathDocumentDto, CreateLearningPathDto,
    CreateLearningPathTestDto, CreateQuestionDto, CreateSectionDto, CreateTestDto, Document,
    LearningPath, LearningPathCategory, LearningPathItem, LoginRequest, LoginResponse, Question,
    Test, ToolIntro, ToolIntroDto, UserSummary,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::users::controller::get_users,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::courses::controller::add_course_description,
        crate::modules::courses::controller::set_tool_intro,
        crate::modules::courses::controller::backup_course,
        crate::modules::courses::controller::get_course_resources,
        crate::modules::courses::controller::get_categories,
        crate::modules::courses::controller::create_category,
        crate::modules::courses::controller::get_category,
        crate::modules::courses::controller::delete_category,
        crate::modules::learning_paths::controller::get_learning_paths,
        crate::modules::learning_paths::controller::create_learning_path,
        crate::modules::learning_paths::controller::get_learning_path_categories,
        crate::modules::learning_paths::controller::create_learning_path_category,
        crate::modules::learning_paths::controller::get_sections,
        crate::modules::learning_paths::controller::create_section,
        crate::modules::documents::controller::get_documents,
        crate::modules::documents::controller::get_learning_path_documents,
        crate::modules::documents::controller::create_learning_path_document,
        crate::modules::quizzes::controller::get_tests,
        crate::modules::quizzes::controller::create_test,
        crate::modules::quizzes::controller::get_test,
        crate::modules::quizzes::controller::delete_test,
        crate::modules::quizzes::controller::create_learning_path_test,
        crate::modules::quizzes::controller::get_questions,
        crate::modules::quizzes::controller::create_test_question,
        crate::modules::quizzes::controller::remove_test_question,
        crate::modules::quizzes::controller::create_question,
        crate::modules::quizzes::controller::get_question,
        crate::modules::quizzes::controller::delete_question,
        crate::modules::quizzes::controller::get_answers,
        crate::modules::quizzes::controller::create_answer,
    ),
    components(
        schemas(
            ErrorBody,
            LoginRequest,
            LoginResponse,
            UserSummary,
            Course,
            CreateCourseDto,
            CourseDescription,
            CreateCourseDescriptionDto,
            ToolIntro,
            ToolIntroDto,
            CourseResources,
            CourseCategory,
            CreateCourseCategoryDto,
            LearningPath,
            CreateLearningPathDto,
            LearningPathCategory,
            CreateLearningPathCategoryDto,
            LearningPathItem,
            CreateSectionDto,
            Document,
            CreateLearningPathDocumentDto,
            Test,
            CreateTestDto,
            CreateLearningPathTestDto,
            Question,
            CreateQuestionDto,
            Answer,
            CreateAnswerDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Token issuance for host administrators"),
        (name = "Users", description = "Host user accounts"),
        (name = "Courses", description = "Courses, descriptions, tool intros and resources"),
        (name = "Course categories", description = "Course category tree"),
        (name = "Learning paths", description = "Learning paths, their categories and sections"),
        (name = "Documents", description = "Course documents and learning path documents"),
        (name = "Tests", description = "Tests, questions and answers")
    ),
    info(
        title = "Courseway API",
        version = "0.1.0",
        description = "REST API over a Chamilo-style learning management system. Every route except login needs a bearer token issued to an administrator.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| *p == "/api/v1/auth"));
        assert!(
            paths
                .iter()
                .any(|p| *p == "/api/v1/course/{course_code}/test/{test_id}/question/{question_id}/answer")
        );
        assert_eq!(doc.paths.paths.len(), 32);
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
