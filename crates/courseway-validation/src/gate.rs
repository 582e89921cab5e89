//! Validation gate: the single entry point the route layer uses.

use anyhow::anyhow;
use serde_json::{Map, Value};
use tracing::debug;

use courseway_core::AppError;

use crate::engine::validate;
use crate::rule::Constraints;
use crate::violation::Violation;

/// Separator between violations in a gate failure message.
pub const VIOLATION_SEPARATOR: &str = " | ";

/// Request types that declare the constraints their raw input must satisfy.
pub trait Constrained {
    fn constraints() -> Constraints;

    /// Constraints for a specific input. Override when a rule depends on another field.
    fn constraints_for(_input: &Map<String, Value>) -> Constraints {
        Self::constraints()
    }
}

pub fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(VIOLATION_SEPARATOR)
}

/// Fails with `BadRequest` when `input` violates `constraints`.
///
/// `context` names the request being checked and only appears in logs.
pub fn validate_or_fail(
    input: &Map<String, Value>,
    constraints: &Constraints,
    context: &str,
) -> Result<(), AppError> {
    let violations = validate(input, constraints);
    if violations.is_empty() {
        return Ok(());
    }

    debug!(
        validation.context = %context,
        violations = violations.len(),
        "Request rejected by validation"
    );

    Err(AppError::bad_request(anyhow!(join_violations(&violations))))
}
