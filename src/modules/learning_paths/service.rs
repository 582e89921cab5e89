use tracing::{info, instrument};

use courseway_core::AppError;
use courseway_lms::Lms;
use courseway_models::{
    CreateLearningPathCategoryDto, CreateLearningPathDto, CreateSectionDto, LearningPath,
    LearningPathCategory, LearningPathItem,
};

use crate::utils::host_helpers::{
    COURSE_NOT_FOUND_MESSAGE, host_failure, host_unavailable, require_course,
    require_learning_path,
};

fn course_not_found() -> String {
    COURSE_NOT_FOUND_MESSAGE.to_string()
}

pub struct LearningPathService;

impl LearningPathService {
    #[instrument(skip(lms))]
    pub async fn list_learning_paths(
        lms: &dyn Lms,
        course_code: &str,
    ) -> Result<Vec<LearningPath>, AppError> {
        require_course(lms, course_code, course_not_found).await?;
        lms.list_learning_paths(course_code)
            .await
            .map_err(host_unavailable)
    }

    /// Creates a learning path authored by `dto.user_id`, or by `creator_id` when absent.
    #[instrument(skip(lms, dto), fields(learning_path.name = %dto.name))]
    pub async fn create_learning_path(
        lms: &dyn Lms,
        course_code: &str,
        dto: CreateLearningPathDto,
        creator_id: i64,
    ) -> Result<LearningPath, AppError> {
        require_course(lms, course_code, course_not_found).await?;

        let author_id = dto.user_id.unwrap_or(creator_id);
        let learning_path = lms
            .create_learning_path(course_code, &dto, author_id)
            .await
            .map_err(host_failure("Learning path could not be created."))?;

        info!(learning_path.id = learning_path.id, "Learning path created");
        Ok(learning_path)
    }

    #[instrument(skip(lms))]
    pub async fn list_categories(
        lms: &dyn Lms,
        course_code: &str,
    ) -> Result<Vec<LearningPathCategory>, AppError> {
        require_course(lms, course_code, course_not_found).await?;
        lms.list_learning_path_categories(course_code)
            .await
            .map_err(host_unavailable)
    }

    #[instrument(skip(lms))]
    pub async fn create_category(
        lms: &dyn Lms,
        course_code: &str,
        dto: CreateLearningPathCategoryDto,
    ) -> Result<LearningPathCategory, AppError> {
        require_course(lms, course_code, course_not_found).await?;

        lms.create_learning_path_category(course_code, &dto.name)
            .await
            .map_err(host_failure("Learning path category could not be created."))
    }

    #[instrument(skip(lms))]
    pub async fn list_sections(
        lms: &dyn Lms,
        course_code: &str,
        learning_path_id: i64,
    ) -> Result<Vec<LearningPathItem>, AppError> {
        require_course(lms, course_code, course_not_found).await?;
        require_learning_path(lms, course_code, learning_path_id).await?;

        lms.list_sections(learning_path_id)
            .await
            .map_err(host_unavailable)
    }

    #[instrument(skip(lms))]
    pub async fn create_section(
        lms: &dyn Lms,
        course_code: &str,
        learning_path_id: i64,
        dto: CreateSectionDto,
    ) -> Result<LearningPathItem, AppError> {
        require_course(lms, course_code, course_not_found).await?;
        require_learning_path(lms, course_code, learning_path_id).await?;

        let section = lms
            .create_section(learning_path_id, &dto)
            .await
            .map_err(host_failure("Section could not be created."))?;

        info!(section.id = section.id, "Section created");
        Ok(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courseway_core::ErrorKind;
    use courseway_lms::{Fixture, FixtureCourse, InMemoryLms};

    fn lms() -> InMemoryLms {
        InMemoryLms::from_fixture(Fixture {
            users: vec![],
            categories: vec![],
            courses: vec![FixtureCourse {
                code: "ALGEBRA".to_string(),
                title: "Algebra".to_string(),
                category_code: None,
                visibility: 2,
                course_language: "english".to_string(),
                teachers: vec![],
            }],
        })
    }

    fn section(title: &str, previous_id: Option<i64>) -> CreateSectionDto {
        CreateSectionDto {
            title: title.to_string(),
            parent_id: None,
            previous_id,
        }
    }

    #[tokio::test]
    async fn test_sections_need_an_existing_path() {
        let err = LearningPathService::create_section(&lms(), "ALGEBRA", 404, section("Intro", None))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Learning path with id 404 not found.");
    }

    #[tokio::test]
    async fn test_create_path_and_sections() {
        let lms = lms();
        let learning_path = LearningPathService::create_learning_path(
            &lms,
            "ALGEBRA",
            CreateLearningPathDto {
                name: "Basics".to_string(),
                user_id: None,
                category_id: None,
            },
            7,
        )
        .await
        .unwrap();
        assert_eq!(learning_path.creator_id, 7);

        let first = LearningPathService::create_section(
            &lms,
            "ALGEBRA",
            learning_path.id,
            section("Intro", None),
        )
        .await
        .unwrap();
        LearningPathService::create_section(
            &lms,
            "ALGEBRA",
            learning_path.id,
            section("Next", Some(first.id)),
        )
        .await
        .unwrap();

        let sections = LearningPathService::list_sections(&lms, "ALGEBRA", learning_path.id)
            .await
            .unwrap();
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Intro", "Next"]);

        let err = LearningPathService::create_section(
            &lms,
            "ALGEBRA",
            learning_path.id,
            section("Orphan", Some(9999)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unprocessable);
        assert_eq!(err.message, "Section could not be created.");
    }
}
