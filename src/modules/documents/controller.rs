use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use courseway_core::{AppError, ErrorBody};
use courseway_models::{
    CoursePath, CreateLearningPathDocumentDto, Document, DocumentListQuery, LearningPathPath,
};

use super::service::DocumentService;
use crate::middleware::role::AdminUser;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath, ValidatedQuery};

/// List the documents of a course folder
#[utoipa::path(
    get,
    path = "/api/v1/course/{course_code}/documents",
    params(CoursePath, DocumentListQuery),
    responses(
        (status = 200, description = "Documents directly inside the folder", body = Vec<Document>),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_documents(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<CoursePath>,
    ValidatedQuery(query): ValidatedQuery<DocumentListQuery>,
) -> Result<Json<Vec<Document>>, AppError> {
    let documents =
        DocumentService::list_documents(state.lms.as_ref(), &path.course_code, query).await?;
    Ok(Json(documents))
}

/// List the documents of a learning path
#[utoipa::path(
    get,
    path = "/api/v1/course/{course_code}/learningpath/{learningpath_id}/documents",
    params(LearningPathPath),
    responses(
        (status = 200, description = "Documents in path order", body = Vec<Document>),
        (status = 404, description = "Course or learning path not found", body = ErrorBody)
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_learning_path_documents(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<LearningPathPath>,
) -> Result<Json<Vec<Document>>, AppError> {
    let documents = DocumentService::list_learning_path_documents(
        state.lms.as_ref(),
        &path.course_code,
        path.learningpath_id,
    )
    .await?;
    Ok(Json(documents))
}

/// Create an HTML document inside a learning path
#[utoipa::path(
    post,
    path = "/api/v1/course/{course_code}/learningpath/{learningpath_id}/document",
    params(LearningPathPath),
    request_body = CreateLearningPathDocumentDto,
    responses(
        (status = 201, description = "Document created", body = Document),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Course or learning path not found", body = ErrorBody),
        (status = 422, description = "Document could not be created", body = ErrorBody)
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin))]
pub async fn create_learning_path_document(
    State(state): State<AppState>,
    admin: AdminUser,
    ValidatedPath(path): ValidatedPath<LearningPathPath>,
    ValidatedJson(dto): ValidatedJson<CreateLearningPathDocumentDto>,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let document = DocumentService::create_learning_path_document(
        state.lms.as_ref(),
        &path.course_code,
        path.learningpath_id,
        dto,
        admin.user_id(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(document)))
}
