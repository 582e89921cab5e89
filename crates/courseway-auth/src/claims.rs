//! JWT claim structure for API tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims embedded in every API token.
///
/// # Fields
///
/// - `iat`: issued-at timestamp
/// - `exp`: expiry timestamp, always `iat` plus the token lifetime
/// - `jti`: base64 of 16 random bytes; makes every issuance unique and is otherwise unused
/// - `uname`: username of the authenticated account
/// - `uid`: numeric id of the authenticated account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Issued-at timestamp (Unix seconds)
    pub iat: i64,
    /// Expiration timestamp (Unix seconds)
    pub exp: i64,
    /// Unique token id
    pub jti: String,
    /// Subject username
    pub uname: String,
    /// Subject user id
    pub uid: i64,
}
