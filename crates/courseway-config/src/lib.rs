//! # Courseway Config
//!
//! Configuration types for the Courseway API, loaded once at startup from environment
//! variables and carried in the application state.
//!
//! - [`jwt`]: token signing secret
//! - [`gate`]: protected prefix, unauthenticated allowlist and rejection status
//! - [`server`]: bind address and the error details toggle
//! - [`cors`]: allowed origins
//! - [`lms`]: where the reference host loads its fixture from
//!
//! Each type exposes `from_env()` and a `from_vars` variant that reads from any
//! lookup function, which is what the tests use.
//!
//! # Example
//!
//! ```ignore
//! use courseway_config::{AuthGateConfig, CorsConfig, JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env()?;
//! let gate_config = AuthGateConfig::from_env()?;
//! let server_config = ServerConfig::from_env()?;
//! let cors_config = CorsConfig::from_env();
//! ```

pub mod cors;
pub mod error;
pub mod gate;
pub mod jwt;
pub mod lms;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use error::ConfigError;
pub use gate::AuthGateConfig;
pub use jwt::JwtConfig;
pub use lms::LmsConfig;
pub use server::ServerConfig;

/// Interprets common truthy spellings used in environment files.
pub(crate) fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
