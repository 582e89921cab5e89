//! Shared helpers for the route modules.
//!
//! - [`host_helpers`]: entity lookups that end a request with `NotFound`, and the
//!   translation of host failures into the error taxonomy

pub mod host_helpers;
