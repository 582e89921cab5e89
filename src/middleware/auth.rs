use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::{debug, warn};

use courseway_auth::{Claims, verify_token};
use courseway_core::AppError;
use courseway_observability::track_gate_rejection;

use crate::state::AppState;

pub const TOKEN_NOT_FOUND_MESSAGE: &str = "Token not found.";

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer.token().to_string())
}

fn rejection_status(state: &AppState) -> StatusCode {
    StatusCode::from_u16(state.gate_config.rejection_status).unwrap_or(StatusCode::FORBIDDEN)
}

/// Token gate in front of every protected path.
///
/// Allowlisted paths and paths outside the API base pass straight through. Anything
/// else needs a valid `Authorization: Bearer <token>` header, otherwise the request is
/// answered here and never reaches routing. Verified [`Claims`] are stored in the
/// request extensions.
pub async fn require_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !state.gate_config.is_protected(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let status = rejection_status(&state);

    let Some(token) = bearer_token(req.headers()) else {
        track_gate_rejection();
        debug!(path = %req.uri().path(), "Request without bearer token");
        return Err(AppError::token_rejected(status, anyhow!(TOKEN_NOT_FOUND_MESSAGE)));
    };

    let claims = verify_token(&token, &state.jwt_config).map_err(|e| {
        track_gate_rejection();
        warn!(path = %req.uri().path(), reason = %e.message, "Token rejected");
        AppError::token_rejected(status, e.error)
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Claims of the token that passed the gate.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> i64 {
        self.0.uid
    }

    pub fn username(&self) -> &str {
        &self.0.uname
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>() {
            return Ok(AuthUser(claims.clone()));
        }

        // Routes mounted outside the gate still verify the header themselves.
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            AppError::token_rejected(rejection_status(state), anyhow!(TOKEN_NOT_FOUND_MESSAGE))
        })?;
        let claims = verify_token(&token, &state.jwt_config)
            .map_err(|e| AppError::token_rejected(rejection_status(state), e.error))?;

        Ok(AuthUser(claims))
    }
}
