use axum::{Json, extract::State};
use tracing::instrument;

use courseway_core::{AppError, ErrorBody};
use courseway_models::{UserFilter, UserSummary};

use super::service::UserService;
use crate::middleware::role::AdminUser;
use crate::state::AppState;
use crate::validator::ValidatedQuery;

/// List host users matching the given filters
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(UserFilter),
    responses(
        (status = 200, description = "Matching users", body = Vec<UserSummary>),
        (status = 400, description = "Invalid filter", body = ErrorBody),
        (status = 401, description = "Not an administrator", body = ErrorBody),
        (status = 403, description = "Missing or invalid token", body = ErrorBody)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedQuery(filter): ValidatedQuery<UserFilter>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let users = UserService::list_users(state.lms.as_ref(), filter).await?;
    Ok(Json(users))
}
