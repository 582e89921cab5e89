use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use courseway_core::{AppError, ErrorBody};
use courseway_models::{
    CategoryPath, Course, CourseCategory, CourseDescription, CourseListQuery, CoursePath,
    CourseResources, CreateCourseCategoryDto, CreateCourseDescriptionDto, CreateCourseDto,
    ToolIntro, ToolIntroDto, ToolIntroPath,
};

use super::service::CourseService;
use crate::middleware::role::AdminUser;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath, ValidatedQuery};

/// List courses
#[utoipa::path(
    get,
    path = "/api/v1/courses",
    params(CourseListQuery),
    responses(
        (status = 200, description = "Courses", body = Vec<Course>),
        (status = 400, description = "Invalid query", body = ErrorBody),
        (status = 404, description = "No course matched", body = ErrorBody)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_courses(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedQuery(query): ValidatedQuery<CourseListQuery>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = CourseService::list_courses(state.lms.as_ref(), query).await?;
    Ok(Json(courses))
}

/// Create a course
#[utoipa::path(
    post,
    path = "/api/v1/course",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Validation error, unknown teacher or duplicate code", body = ErrorBody),
        (status = 422, description = "Course could not be created", body = ErrorBody)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin))]
pub async fn create_course(
    State(state): State<AppState>,
    admin: AdminUser,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = CourseService::create_course(state.lms.as_ref(), dto, admin.user_id()).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// Get a course by code
#[utoipa::path(
    get,
    path = "/api/v1/course/{course_code}",
    params(CoursePath),
    responses(
        (status = 200, description = "Course details", body = Course),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_course(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<CoursePath>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::get_course(state.lms.as_ref(), &path.course_code).await?;
    Ok(Json(course))
}

/// Delete a course and everything it holds
#[utoipa::path(
    delete,
    path = "/api/v1/course/{course_code}",
    params(CoursePath),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 404, description = "Course not found", body = ErrorBody),
        (status = 422, description = "Course could not be deleted", body = ErrorBody)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn delete_course(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<CoursePath>,
) -> Result<StatusCode, AppError> {
    CourseService::delete_course(state.lms.as_ref(), &path.course_code).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a description section to a course
#[utoipa::path(
    post,
    path = "/api/v1/course/{course_code}/description",
    params(CoursePath),
    request_body = CreateCourseDescriptionDto,
    responses(
        (status = 201, description = "Description created", body = CourseDescription),
        (status = 404, description = "Course not found", body = ErrorBody),
        (status = 422, description = "Duplicate description type", body = ErrorBody)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn add_course_description(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<CoursePath>,
    ValidatedJson(dto): ValidatedJson<CreateCourseDescriptionDto>,
) -> Result<(StatusCode, Json<CourseDescription>), AppError> {
    let description =
        CourseService::add_description(state.lms.as_ref(), &path.course_code, dto).await?;
    Ok((StatusCode::CREATED, Json(description)))
}

/// Set the introduction text of a course tool
#[utoipa::path(
    post,
    path = "/api/v1/course/{course_code}/tool/{tool_id}/intro_text",
    params(ToolIntroPath),
    request_body = ToolIntroDto,
    responses(
        (status = 201, description = "Introduction saved", body = ToolIntro),
        (status = 400, description = "Unknown tool or validation error", body = ErrorBody),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn set_tool_intro(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<ToolIntroPath>,
    ValidatedJson(dto): ValidatedJson<ToolIntroDto>,
) -> Result<(StatusCode, Json<ToolIntro>), AppError> {
    let intro =
        CourseService::set_tool_intro(state.lms.as_ref(), &path.course_code, &path.tool_id, dto)
            .await?;
    Ok((StatusCode::CREATED, Json(intro)))
}

/// Course backup (packaged by the host LMS)
#[utoipa::path(
    get,
    path = "/api/v1/course/{course_code}/backup",
    params(CoursePath),
    responses(
        (status = 404, description = "Course not found", body = ErrorBody),
        (status = 501, description = "Not available through the API", body = ErrorBody)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn backup_course(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<CoursePath>,
) -> Result<StatusCode, AppError> {
    CourseService::backup_course(state.lms.as_ref(), &path.course_code).await?;
    Ok(StatusCode::OK)
}

/// List every resource of a course, grouped by type
#[utoipa::path(
    get,
    path = "/api/v1/course/{course_code}/resources",
    params(CoursePath),
    responses(
        (status = 200, description = "Course resources", body = CourseResources),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_course_resources(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<CoursePath>,
) -> Result<Json<CourseResources>, AppError> {
    let resources = CourseService::course_resources(state.lms.as_ref(), &path.course_code).await?;
    Ok(Json(resources))
}

/// List course categories
#[utoipa::path(
    get,
    path = "/api/v1/courses/categories",
    responses(
        (status = 200, description = "Categories", body = Vec<CourseCategory>)
    ),
    tag = "Course categories",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_categories(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<CourseCategory>>, AppError> {
    let categories = CourseService::list_categories(state.lms.as_ref()).await?;
    Ok(Json(categories))
}

/// Create a course category
#[utoipa::path(
    post,
    path = "/api/v1/courses/category",
    request_body = CreateCourseCategoryDto,
    responses(
        (status = 201, description = "Category created", body = CourseCategory),
        (status = 400, description = "Validation error or unknown parent", body = ErrorBody),
        (status = 422, description = "Category could not be created", body = ErrorBody)
    ),
    tag = "Course categories",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn create_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(dto): ValidatedJson<CreateCourseCategoryDto>,
) -> Result<(StatusCode, Json<CourseCategory>), AppError> {
    let category = CourseService::create_category(state.lms.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Get a course category by code
#[utoipa::path(
    get,
    path = "/api/v1/courses/category/{category_code}",
    params(CategoryPath),
    responses(
        (status = 200, description = "Category details", body = CourseCategory),
        (status = 404, description = "Category not found", body = ErrorBody)
    ),
    tag = "Course categories",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<CategoryPath>,
) -> Result<Json<CourseCategory>, AppError> {
    let category = CourseService::get_category(state.lms.as_ref(), &path.category_code).await?;
    Ok(Json(category))
}

/// Delete a course category
#[utoipa::path(
    delete,
    path = "/api/v1/courses/category/{category_code}",
    params(CategoryPath),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found", body = ErrorBody),
        (status = 422, description = "Category could not be deleted", body = ErrorBody)
    ),
    tag = "Course categories",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn delete_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<CategoryPath>,
) -> Result<StatusCode, AppError> {
    CourseService::delete_category(state.lms.as_ref(), &path.category_code).await?;
    Ok(StatusCode::NO_CONTENT)
}
