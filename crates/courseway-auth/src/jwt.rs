//! JWT issuance and verification.
//!
//! Tokens are HS256-signed with the shared secret from [`JwtConfig`] and live for
//! [`TOKEN_LIFETIME_SECS`]. Expiry is checked here instead of by `jsonwebtoken` so the
//! boundary is exact: a token is rejected from the second its `exp` is reached.
//!
//! Every failure is an `Unauthenticated` [`AppError`]. The HTTP status it is finally
//! rendered with is decided by the caller.

use anyhow::anyhow;
use chrono::Utc;
use data_encoding::BASE64;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};
use rand::RngCore;
use serde::Serialize;
use utoipa::ToSchema;

use courseway_config::JwtConfig;
use courseway_core::AppError;

use crate::claims::Claims;

/// Fixed token lifetime: 12 hours.
pub const TOKEN_LIFETIME_SECS: i64 = 12 * 60 * 60;

/// A freshly signed token and its expiry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IssuedToken {
    pub token: String,
    /// Expiry timestamp (Unix seconds)
    pub expires: i64,
}

fn token_id() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    BASE64.encode(&bytes)
}

/// Issues a token for an account whose credentials and privilege were already checked.
///
/// # Arguments
///
/// * `username` - The account's username, stored as `uname`
/// * `user_id` - The account's numeric id, stored as `uid`
/// * `jwt_config` - Configuration holding the signing secret
///
/// # Errors
///
/// Returns an internal error if encoding fails.
pub fn issue_token(
    username: &str,
    user_id: i64,
    jwt_config: &JwtConfig,
) -> Result<IssuedToken, AppError> {
    issue_token_at(username, user_id, Utc::now().timestamp(), jwt_config)
}

/// Same as [`issue_token`] with an explicit issuance time.
pub fn issue_token_at(
    username: &str,
    user_id: i64,
    issued_at: i64,
    jwt_config: &JwtConfig,
) -> Result<IssuedToken, AppError> {
    let claims = Claims {
        iat: issued_at,
        exp: issued_at + TOKEN_LIFETIME_SECS,
        jti: token_id(),
        uname: username.to_string(),
        uid: user_id,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("Failed to create token: {}", e)))?;

    Ok(IssuedToken {
        token,
        expires: claims.exp,
    })
}

/// Verifies a token against the current time.
///
/// # Errors
///
/// Returns an `Unauthenticated` error if:
/// - The token is malformed or not HS256
/// - The signature does not verify
/// - The token has expired or was issued in the future
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    verify_token_at(token, Utc::now().timestamp(), jwt_config)
}

/// Same as [`verify_token`] with an explicit clock.
pub fn verify_token_at(token: &str, now: i64, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp", "iat"]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        let reason = match e.kind() {
            JwtErrorKind::InvalidToken => "Wrong number of segments".to_string(),
            JwtErrorKind::InvalidSignature => "Signature verification failed".to_string(),
            JwtErrorKind::InvalidAlgorithm => "Algorithm not allowed".to_string(),
            JwtErrorKind::MissingRequiredClaim(claim) => {
                format!("Missing required claim `{}`", claim)
            }
            JwtErrorKind::Base64(_) | JwtErrorKind::Json(_) | JwtErrorKind::Utf8(_) => {
                "Malformed token".to_string()
            }
            _ => "Invalid token".to_string(),
        };
        AppError::unauthenticated(anyhow!(reason))
    })?;

    if claims.iat > now {
        return Err(AppError::unauthenticated(anyhow!(
            "Cannot handle token prior to {}",
            claims.iat
        )));
    }

    if now >= claims.exp {
        return Err(AppError::unauthenticated(anyhow!("Expired token")));
    }

    Ok(claims)
}
