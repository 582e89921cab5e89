//! Validated request extractors.
//!
//! Each extractor runs the same pipeline before a handler sees its input:
//!
//! 1. read the raw input as a JSON object (body) or a map of strings (query, path)
//! 2. check it against the DTO's [`Constrained`] specification
//! 3. deserialize it into the DTO
//! 4. run the DTO's `validator` rules
//!
//! Every failure is a `BadRequest` whose message lists the violations joined by `" | "`.

use std::any::type_name;
use std::collections::HashMap;

use anyhow::anyhow;
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request, rejection::BytesRejection},
    http::{StatusCode, request::Parts},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use courseway_core::{AppError, ErrorKind};
use courseway_observability::track_validation_failure;
use courseway_validation::{Constrained, Violation, join_violations, validate_or_fail};

pub const MALFORMED_BODY_MESSAGE: &str = "Check your request syntax.";
pub const NOT_AN_OBJECT_MESSAGE: &str = "Request body must be a JSON object.";
pub const BODY_TOO_LARGE_MESSAGE: &str = "Request body is too large.";

/// Short type name used to label validation logs and metrics.
fn context_of<T>() -> &'static str {
    let name = type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}

fn collect_violations(errors: &ValidationErrors, prefix: &str, out: &mut Vec<Violation>) {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in fields {
        match kind {
            ValidationErrorsKind::Field(errors) => {
                for error in errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| "This value is not valid.".to_string());
                    out.push(Violation::new(format!("{}[{}]", prefix, field), message));
                }
            }
            // Nested DTOs are flattened into their parent's JSON, so their fields keep the parent prefix.
            ValidationErrorsKind::Struct(inner) => collect_violations(inner, prefix, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    let item_prefix = format!("{}[{}][{}]", prefix, field, index);
                    collect_violations(inner, &item_prefix, out);
                }
            }
        }
    }
}

fn format_errors(errors: &ValidationErrors) -> String {
    let mut violations = Vec::new();
    collect_violations(errors, "", &mut violations);
    join_violations(&violations)
}

/// Runs the constraint, deserialization and `validator` stages over `input`.
pub fn check_input<T>(input: Map<String, Value>) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate + Constrained,
{
    let context = context_of::<T>();

    let constraints = T::constraints_for(&input);
    validate_or_fail(&input, &constraints, context)
        .inspect_err(|_| track_validation_failure(context))?;

    let value: T = serde_json::from_value(Value::Object(input)).map_err(|e| {
        track_validation_failure(context);
        AppError::bad_request(anyhow!("{} {}", MALFORMED_BODY_MESSAGE, e))
    })?;

    value.validate().map_err(|errors| {
        track_validation_failure(context);
        AppError::bad_request(anyhow!(format_errors(&errors)))
    })?;

    Ok(value)
}

/// Parses a request body into a JSON object. An empty body counts as `{}`.
pub fn parse_body(bytes: &[u8]) -> Result<Map<String, Value>, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::bad_request(anyhow!(NOT_AN_OBJECT_MESSAGE))),
        Err(_) => Err(AppError::bad_request(anyhow!(MALFORMED_BODY_MESSAGE))),
    }
}

/// Keeps the body limit visible as 413; any other read failure is a syntax error.
fn body_rejection(rejection: BytesRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::new(
            ErrorKind::BadRequest,
            StatusCode::PAYLOAD_TOO_LARGE,
            anyhow!(BODY_TOO_LARGE_MESSAGE),
        )
    } else {
        AppError::bad_request(anyhow!(MALFORMED_BODY_MESSAGE))
    }
}

fn string_map(raw: HashMap<String, String>) -> Map<String, Value> {
    raw.into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Constrained,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(body_rejection)?;

        let input = parse_body(&bytes)?;
        Ok(ValidatedJson(check_input(input)?))
    }
}

/// Query string checked as a map of strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + Constrained,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request(anyhow!(MALFORMED_BODY_MESSAGE)))?;

        Ok(ValidatedQuery(check_input(string_map(raw))?))
    }
}

/// Path parameters checked as a map of strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Validate + Constrained,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::internal(anyhow!("Path parameters unavailable: {}", e)))?;

        Ok(ValidatedPath(check_input(string_map(raw))?))
    }
}
