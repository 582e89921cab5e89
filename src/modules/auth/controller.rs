use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use courseway_core::{AppError, ErrorBody};
use courseway_models::{LoginRequest, LoginResponse};

use super::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Log in with a host administrator account and receive a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/auth",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Token issued, valid for 12 hours", body = LoginResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Invalid password or not an administrator", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    let response = AuthService::login(state.lms.as_ref(), dto, &state.jwt_config).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
