//! # Courseway Auth
//!
//! Stateless bearer tokens for the Courseway API.
//!
//! - [`claims`]: the token payload
//! - [`jwt`]: issuance and verification (HS256, fixed 12 hour lifetime)
//!
//! Tokens are never stored server-side. A token is valid until its expiry passes or
//! its signature stops verifying; there is no revocation list.
//!
//! # Example
//!
//! ```ignore
//! use courseway_auth::{issue_token, verify_token};
//! use courseway_config::JwtConfig;
//!
//! let config = JwtConfig::from_env()?;
//! let issued = issue_token("admin", 1, &config)?;
//! let claims = verify_token(&issued.token, &config)?;
//! assert_eq!(claims.uname, "admin");
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{IssuedToken, TOKEN_LIFETIME_SECS, issue_token, issue_token_at, verify_token, verify_token_at};
