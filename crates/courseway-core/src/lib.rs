//! # Courseway Core
//!
//! Core types shared by every Courseway crate.
//!
//! - [`errors`]: the closed error taxonomy ([`ErrorKind`]) and [`AppError`], which
//!   converts into an HTTP response at the outermost boundary
//! - [`render`]: the uniform JSON error body and its optional diagnostics
//! - [`password`]: bcrypt hashing for fixture accounts
//!
//! # Example
//!
//! ```ignore
//! use anyhow::anyhow;
//! use courseway_core::{AppError, render};
//!
//! let error = AppError::not_found(anyhow!("Course not found."));
//! let body = render(&error, false);
//! assert_eq!(body.title, "404 Not Found");
//! ```

pub mod errors;
pub mod password;
pub mod render;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorKind};
pub use password::{hash_password, hash_password_with_cost};
pub use render::{ErrorBody, ErrorReport, render, render_diagnostics};
