use anyhow::anyhow;
use tracing::{info, instrument};

use courseway_core::AppError;
use courseway_lms::{Lms, LmsError};
use courseway_models::{
    Course, CourseCategory, CourseDescription, CourseListQuery, CourseResources,
    CreateCourseCategoryDto, CreateCourseDescriptionDto, CreateCourseDto, ToolIntro, ToolIntroDto,
};

use crate::utils::host_helpers::{
    COURSE_NOT_FOUND_MESSAGE, host_failure, host_unavailable, require_course,
};

pub const COURSES_NOT_FOUND_MESSAGE: &str = "Courses not found.";
pub const DUPLICATE_CODE_MESSAGE: &str = "The provided or generated `wanted_code` already exists in database. Try adding a custom `wanted_code`.";
pub const DUPLICATE_DESCRIPTION_MESSAGE: &str =
    "There is already a course description with this type.";
pub const CATEGORY_NOT_FOUND_MESSAGE: &str = "Category not found.";
pub const BACKUP_NOT_IMPLEMENTED_MESSAGE: &str =
    "Course backups are packaged by the host LMS and cannot be produced through this API.";

fn course_not_found() -> String {
    COURSE_NOT_FOUND_MESSAGE.to_string()
}

pub struct CourseService;

impl CourseService {
    #[instrument(skip(lms))]
    pub async fn list_courses(
        lms: &dyn Lms,
        query: CourseListQuery,
    ) -> Result<Vec<Course>, AppError> {
        let courses = lms.list_courses(&query).await.map_err(host_unavailable)?;
        if courses.is_empty() {
            return Err(AppError::not_found(anyhow!(COURSES_NOT_FOUND_MESSAGE)));
        }
        Ok(courses)
    }

    #[instrument(skip(lms))]
    pub async fn get_course(lms: &dyn Lms, course_code: &str) -> Result<Course, AppError> {
        require_course(lms, course_code, course_not_found).await
    }

    /// Creates a course owned by `dto.user_id`, or by `creator_id` when absent.
    ///
    /// Every listed teacher must be a known host account.
    #[instrument(skip(lms, dto), fields(course.title = %dto.title))]
    pub async fn create_course(
        lms: &dyn Lms,
        dto: CreateCourseDto,
        creator_id: i64,
    ) -> Result<Course, AppError> {
        for teacher_id in &dto.teachers {
            let teacher = lms
                .find_user_by_id(*teacher_id)
                .await
                .map_err(host_unavailable)?;
            if teacher.is_none() {
                return Err(AppError::bad_request(anyhow!(
                    "[teacher]: The teacher with id {} does not exist.",
                    teacher_id
                )));
            }
        }

        let owner_id = dto.user_id.unwrap_or(creator_id);
        let course = lms
            .create_course(&dto, owner_id)
            .await
            .map_err(|err| match err {
                LmsError::Conflict(_) => AppError::bad_request(anyhow!(DUPLICATE_CODE_MESSAGE)),
                other => host_failure("Course could not be created.")(other),
            })?;

        info!(course.code = %course.code, course.id = course.id, "Course created");
        Ok(course)
    }

    #[instrument(skip(lms))]
    pub async fn delete_course(lms: &dyn Lms, course_code: &str) -> Result<(), AppError> {
        require_course(lms, course_code, course_not_found).await?;

        let deleted = lms
            .delete_course(course_code)
            .await
            .map_err(host_failure("Course could not be deleted."))?;
        if !deleted {
            return Err(AppError::unprocessable(anyhow!("Course could not be deleted.")));
        }

        info!(course.code = %course_code, "Course deleted");
        Ok(())
    }

    #[instrument(skip(lms, dto))]
    pub async fn add_description(
        lms: &dyn Lms,
        course_code: &str,
        dto: CreateCourseDescriptionDto,
    ) -> Result<CourseDescription, AppError> {
        require_course(lms, course_code, course_not_found).await?;

        lms.add_course_description(course_code, &dto)
            .await
            .map_err(|err| match err {
                LmsError::Conflict(_) => {
                    AppError::unprocessable(anyhow!(DUPLICATE_DESCRIPTION_MESSAGE))
                }
                other => host_failure("Course description could not be created.")(other),
            })
    }

    #[instrument(skip(lms, dto))]
    pub async fn set_tool_intro(
        lms: &dyn Lms,
        course_code: &str,
        tool_id: &str,
        dto: ToolIntroDto,
    ) -> Result<ToolIntro, AppError> {
        require_course(lms, course_code, course_not_found).await?;

        lms.set_tool_intro(
            course_code,
            tool_id,
            dto.session_id.unwrap_or(0),
            &dto.intro_text,
        )
        .await
        .map_err(host_failure("Introduction text could not be saved."))
    }

    /// Backups are packaged by the host; only the course lookup happens here.
    #[instrument(skip(lms))]
    pub async fn backup_course(lms: &dyn Lms, course_code: &str) -> Result<(), AppError> {
        require_course(lms, course_code, course_not_found).await?;
        Err(AppError::not_implemented(anyhow!(BACKUP_NOT_IMPLEMENTED_MESSAGE)))
    }

    #[instrument(skip(lms))]
    pub async fn course_resources(
        lms: &dyn Lms,
        course_code: &str,
    ) -> Result<CourseResources, AppError> {
        require_course(lms, course_code, course_not_found).await?;

        lms.course_resources(course_code)
            .await
            .map_err(host_failure("Resources could not be listed."))
    }

    #[instrument(skip(lms))]
    pub async fn list_categories(lms: &dyn Lms) -> Result<Vec<CourseCategory>, AppError> {
        lms.list_categories().await.map_err(host_unavailable)
    }

    #[instrument(skip(lms))]
    pub async fn get_category(
        lms: &dyn Lms,
        category_code: &str,
    ) -> Result<CourseCategory, AppError> {
        lms.find_category(category_code)
            .await
            .map_err(host_unavailable)?
            .ok_or_else(|| AppError::not_found(anyhow!(CATEGORY_NOT_FOUND_MESSAGE)))
    }

    #[instrument(skip(lms, dto), fields(category.code = %dto.category_code))]
    pub async fn create_category(
        lms: &dyn Lms,
        dto: CreateCourseCategoryDto,
    ) -> Result<CourseCategory, AppError> {
        if let Some(parent_code) = dto.parent_code.as_deref().filter(|code| !code.is_empty()) {
            let parent = lms
                .find_category(parent_code)
                .await
                .map_err(host_unavailable)?;
            if parent.is_none() {
                return Err(AppError::bad_request(anyhow!(
                    "Category parent with code `{}` does not exist.",
                    parent_code
                )));
            }
        }

        let category = lms
            .create_category(&dto)
            .await
            .map_err(host_failure("Category could not be created"))?;

        info!(category.id = category.id, "Category created");
        Ok(category)
    }

    #[instrument(skip(lms))]
    pub async fn delete_category(lms: &dyn Lms, category_code: &str) -> Result<(), AppError> {
        Self::get_category(lms, category_code).await?;

        let deleted = lms
            .delete_category(category_code)
            .await
            .map_err(host_failure("Could not delete category."))?;
        if !deleted {
            return Err(AppError::unprocessable(anyhow!("Could not delete category.")));
        }

        info!(category.code = %category_code, "Category deleted");
        Ok(())
    }
}
