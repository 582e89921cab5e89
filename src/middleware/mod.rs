//! Middleware and extractors for request authentication.
//!
//! # Modules
//!
//! - [`auth`]: the token gate and the [`auth::AuthUser`] extractor
//! - [`role`]: the administrator check and the [`role::AdminUser`] extractor
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`auth::require_token`] verifies the token for every protected path, before routing
//! 3. [`role::require_admin`] resolves the host account behind the token on protected routes
//! 4. Handlers receive the account through the [`role::AdminUser`] extractor
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::role::AdminUser;
//!
//! async fn create_course(admin: AdminUser) -> Result<impl IntoResponse, AppError> {
//!     let creator_id = admin.user_id();
//!     // ...
//! }
//! ```

pub mod auth;
pub mod role;
