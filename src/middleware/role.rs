//! Administrator check for protected routes.
//!
//! Tokens are only ever issued to administrators, but the account may have lost the
//! privilege (or disappeared) since. Every protected route therefore re-checks the
//! host account behind the token.

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use courseway_core::AppError;
use courseway_lms::UserAccount;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub const ADMIN_REQUIRED_MESSAGE: &str = "You need to have admin role to access this.";

/// Authenticated administrator, resolved from the host.
#[derive(Debug, Clone)]
pub struct AdminUser(pub UserAccount);

impl AdminUser {
    pub fn user_id(&self) -> i64 {
        self.0.id
    }
}

async fn resolve_admin(parts: &mut Parts, state: &AppState) -> Result<AdminUser, AppError> {
    if let Some(admin) = parts.extensions.get::<AdminUser>() {
        return Ok(admin.clone());
    }

    let auth_user = AuthUser::from_request_parts(parts, state).await?;

    let account = state
        .lms
        .find_user_by_id(auth_user.user_id())
        .await
        .map_err(AppError::internal)?;

    match account {
        Some(account) if account.is_admin => Ok(AdminUser(account)),
        _ => {
            warn!(user.name = %auth_user.username(), "Token holder is not an administrator");
            Err(AppError::forbidden(anyhow!(ADMIN_REQUIRED_MESSAGE)))
        }
    }
}

/// Route layer rejecting requests whose token does not belong to an administrator.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let admin = resolve_admin(&mut parts, &state).await?;

    parts.extensions.insert(admin);
    Ok(next.run(Request::from_parts(parts, body)).await)
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_admin(parts, state).await
    }
}
