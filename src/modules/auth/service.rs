use anyhow::anyhow;
use tracing::{info, instrument, warn};

use courseway_auth::issue_token;
use courseway_config::JwtConfig;
use courseway_core::AppError;
use courseway_lms::Lms;
use courseway_models::{LoginRequest, LoginResponse};
use courseway_observability::{track_auth_failure, track_token_issued};

use crate::utils::host_helpers::host_unavailable;

pub const USER_NOT_FOUND_MESSAGE: &str = "User not found.";
pub const INVALID_PASSWORD_MESSAGE: &str = "Invalid password.";
pub const NOT_ADMIN_MESSAGE: &str = "User must be an administrator.";

pub struct AuthService;

impl AuthService {
    /// Checks the credentials against the host and issues a token.
    ///
    /// Tokens are only issued to administrators.
    #[instrument(skip(lms, dto, jwt_config), fields(user.name = %dto.username))]
    pub async fn login(
        lms: &dyn Lms,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let Some(user) = lms
            .find_user(&dto.username)
            .await
            .map_err(host_unavailable)?
        else {
            track_auth_failure("unknown_user");
            warn!("Login for unknown user");
            return Err(AppError::not_found(anyhow!(USER_NOT_FOUND_MESSAGE)));
        };

        let password_ok = lms
            .check_password(&user, &dto.password)
            .await
            .map_err(host_unavailable)?;
        if !password_ok {
            track_auth_failure("invalid_password");
            warn!("Login with wrong password");
            return Err(AppError::unauthenticated(anyhow!(INVALID_PASSWORD_MESSAGE)));
        }

        if !user.is_admin {
            track_auth_failure("not_admin");
            warn!("Login refused for non-administrator");
            return Err(AppError::unauthenticated(anyhow!(NOT_ADMIN_MESSAGE)));
        }

        let issued = issue_token(&user.username, user.id, jwt_config)?;
        track_token_issued();
        info!(user.id = user.id, expires = issued.expires, "Token issued");

        Ok(LoginResponse {
            username: user.username,
            token: issued.token,
            expires: issued.expires,
        })
    }
}
