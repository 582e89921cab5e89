use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use courseway_core::{AppError, ErrorBody};
use courseway_models::{
    CoursePath, CreateLearningPathCategoryDto, CreateLearningPathDto, CreateSectionDto,
    LearningPath, LearningPathCategory, LearningPathItem, LearningPathPath,
};

use super::service::LearningPathService;
use crate::middleware::role::AdminUser;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

/// List the learning paths of a course
#[utoipa::path(
    get,
    path = "/api/v1/course/{course_code}/learningpaths",
    params(CoursePath),
    responses(
        (status = 200, description = "Learning paths", body = Vec<LearningPath>),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    tag = "Learning paths",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_learning_paths(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<CoursePath>,
) -> Result<Json<Vec<LearningPath>>, AppError> {
    let paths =
        LearningPathService::list_learning_paths(state.lms.as_ref(), &path.course_code).await?;
    Ok(Json(paths))
}

/// Create a learning path
#[utoipa::path(
    post,
    path = "/api/v1/course/{course_code}/learningpath",
    params(CoursePath),
    request_body = CreateLearningPathDto,
    responses(
        (status = 201, description = "Learning path created", body = LearningPath),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Course not found", body = ErrorBody),
        (status = 422, description = "Learning path could not be created", body = ErrorBody)
    ),
    tag = "Learning paths",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin))]
pub async fn create_learning_path(
    State(state): State<AppState>,
    admin: AdminUser,
    ValidatedPath(path): ValidatedPath<CoursePath>,
    ValidatedJson(dto): ValidatedJson<CreateLearningPathDto>,
) -> Result<(StatusCode, Json<LearningPath>), AppError> {
    let learning_path = LearningPathService::create_learning_path(
        state.lms.as_ref(),
        &path.course_code,
        dto,
        admin.user_id(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(learning_path)))
}

/// List the learning path categories of a course
#[utoipa::path(
    get,
    path = "/api/v1/course/{course_code}/learningpaths/categories",
    params(CoursePath),
    responses(
        (status = 200, description = "Learning path categories", body = Vec<LearningPathCategory>),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    tag = "Learning paths",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_learning_path_categories(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<CoursePath>,
) -> Result<Json<Vec<LearningPathCategory>>, AppError> {
    let categories =
        LearningPathService::list_categories(state.lms.as_ref(), &path.course_code).await?;
    Ok(Json(categories))
}

/// Create a learning path category
#[utoipa::path(
    post,
    path = "/api/v1/course/{course_code}/learningpaths/category",
    params(CoursePath),
    request_body = CreateLearningPathCategoryDto,
    responses(
        (status = 201, description = "Category created", body = LearningPathCategory),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    tag = "Learning paths",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn create_learning_path_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<CoursePath>,
    ValidatedJson(dto): ValidatedJson<CreateLearningPathCategoryDto>,
) -> Result<(StatusCode, Json<LearningPathCategory>), AppError> {
    let category =
        LearningPathService::create_category(state.lms.as_ref(), &path.course_code, dto).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// List the sections of a learning path
#[utoipa::path(
    get,
    path = "/api/v1/course/{course_code}/learningpath/{learningpath_id}/sections",
    params(LearningPathPath),
    responses(
        (status = 200, description = "Sections in display order", body = Vec<LearningPathItem>),
        (status = 404, description = "Course or learning path not found", body = ErrorBody)
    ),
    tag = "Learning paths",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_sections(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<LearningPathPath>,
) -> Result<Json<Vec<LearningPathItem>>, AppError> {
    let sections = LearningPathService::list_sections(
        state.lms.as_ref(),
        &path.course_code,
        path.learningpath_id,
    )
    .await?;
    Ok(Json(sections))
}

/// Add a section to a learning path
#[utoipa::path(
    post,
    path = "/api/v1/course/{course_code}/learningpath/{learningpath_id}/section",
    params(LearningPathPath),
    request_body = CreateSectionDto,
    responses(
        (status = 201, description = "Section created", body = LearningPathItem),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Course or learning path not found", body = ErrorBody),
        (status = 422, description = "Unknown parent or previous item", body = ErrorBody)
    ),
    tag = "Learning paths",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn create_section(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<LearningPathPath>,
    ValidatedJson(dto): ValidatedJson<CreateSectionDto>,
) -> Result<(StatusCode, Json<LearningPathItem>), AppError> {
    let section = LearningPathService::create_section(
        state.lms.as_ref(),
        &path.course_code,
        path.learningpath_id,
        dto,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(section)))
}
