//! Login request and response.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use courseway_validation::{Constrained, Constraints};

use crate::required_text;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "password123")]
    pub password: String,
}

impl Constrained for LoginRequest {
    fn constraints() -> Constraints {
        Constraints::new()
            .required("username", required_text())
            .required("password", required_text())
    }
}

/// Successful login. The password is never echoed back.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub username: String,
    pub token: String,
    /// Expiry timestamp (Unix seconds)
    pub expires: i64,
}
