//! # Courseway API
//!
//! A REST API in front of a Chamilo-style learning management system. The host owns
//! courses, documents, learning paths and tests; this crate owns the HTTP surface:
//!
//! - **Validation**: every body, query and path is checked against declarative field
//!   constraints before a handler runs, and violations come back as one joined message
//! - **Authentication**: administrators log in at `/auth` and receive a 12 hour HS256
//!   bearer token; a gate in front of routing rejects anything under the API base
//!   without a valid one
//! - **Errors**: a closed taxonomy rendered as a uniform JSON body, with diagnostics only
//!   when the operator enables them
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── courseway-core/          # AppError, ErrorKind, error body rendering
//! ├── courseway-config/        # Environment configuration
//! ├── courseway-auth/          # Token issuance and verification
//! ├── courseway-validation/    # Constraint engine and validation gate
//! ├── courseway-models/        # DTOs, records and their constraints
//! ├── courseway-lms/           # Host LMS trait and the in-memory host
//! ├── courseway-observability/ # Logging and metrics
//! └── courseway-cli/           # Operator tools
//! src/
//! ├── middleware/              # Token gate and admin check
//! ├── modules/                 # auth, users, courses, learning_paths, documents, quizzes
//! └── utils/                   # Host error translation and lookups
//! ```
//!
//! Each feature module has a `controller.rs` (handlers and OpenAPI annotations), a
//! `service.rs` (calls into the host) and a `router.rs`.
//!
//! ## Quick Start
//!
//! ```bash
//! JWT_SECRET=change-me
//! LMS_FIXTURE=fixtures/demo.json
//! DEBUG=0
//! cargo run --bin courseway
//! ```
//!
//! Swagger UI is served at `/api/v1/swagger` and the OpenAPI document at `/api/v1/openapi`.

pub mod docs;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;

// Re-export workspace crates for convenience
pub use courseway_auth;
pub use courseway_config;
pub use courseway_core;
pub use courseway_lms;
pub use courseway_models;
