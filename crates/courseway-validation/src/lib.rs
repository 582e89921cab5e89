//! # Courseway Validation
//!
//! Shape-checking for incoming requests.
//!
//! A [`Constraints`] value maps field names to a [`Rule`] (`Required` or `Optional`)
//! wrapping one or more [`Check`]s. [`validate`] evaluates it against an untyped JSON
//! map and returns every [`Violation`] found; [`validate_or_fail`] turns a non-empty
//! result into a single `BadRequest` whose message joins the violations with `" | "`.
//!
//! The untyped map never travels further than this boundary: once it passes, callers
//! deserialize it into a typed request struct.
//!
//! # Example
//!
//! ```ignore
//! use courseway_validation::{Check, Constraints, ValueType, validate_or_fail};
//!
//! let constraints = Constraints::new()
//!     .required("title", [Check::NotBlank, Check::Type(ValueType::String)])
//!     .optional("user_id", [Check::Type(ValueType::Integer), Check::PositiveOrZero]);
//!
//! validate_or_fail(&input, &constraints, "course.create")?;
//! ```

pub mod engine;
pub mod gate;
pub mod rule;
pub mod violation;

// Re-export commonly used types at crate root
pub use engine::validate;
pub use gate::{Constrained, join_violations, validate_or_fail};
pub use rule::{Check, Constraints, Rule, ValueType};
pub use violation::Violation;
