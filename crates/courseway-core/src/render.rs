//! Uniform JSON error body.
//!
//! The client always receives `title`, `description` and `message`. The diagnostics
//! fields (`type`, `code`, `file`, `line`, `trace`) are only written when the server
//! runs with error details enabled, which is an operator setting and never derived
//! from the request.

use std::backtrace::BacktraceStatus;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{AppError, ErrorKind};

/// Description used for uncaught failures.
pub const UNDEFINED_DESCRIPTION: &str = "Undefined error. Contact your system administrator.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Status code and reason phrase, e.g. `404 Not Found`
    #[schema(example = "404 Not Found")]
    pub title: String,
    pub description: String,
    #[schema(example = "Course not found.")]
    pub message: String,
    /// Taxonomy tag
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<String>>,
}

/// Detailed body attached to every error response as an extension.
///
/// [`render_diagnostics`] swaps it in when details are enabled.
#[derive(Debug, Clone)]
pub struct ErrorReport(pub ErrorBody);

pub fn status_title(status: StatusCode) -> String {
    format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Status")
    )
}

fn status_description(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "The server cannot or will not process the request due to an apparent client error.",
        401 => "The request requires valid user authentication.",
        403 => "You are not permitted to perform the requested operation.",
        404 => "The requested resource could not be found. Please verify the URI and try again.",
        405 => "The request method is not supported for the requested resource.",
        413 => "The request is larger than the server is willing or able to process.",
        500 => "Unexpected condition encountered preventing server from fulfilling request.",
        501 => "The server does not support the functionality required to fulfill the request.",
        _ => "",
    }
}

fn trace_lines(error: &anyhow::Error) -> Vec<String> {
    let mut lines: Vec<String> = error.chain().map(|cause| cause.to_string()).collect();

    let backtrace = error.backtrace();
    if backtrace.status() == BacktraceStatus::Captured {
        lines.extend(
            backtrace
                .to_string()
                .lines()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty()),
        );
    }

    lines
}

/// Builds the response body for `error`.
///
/// With `show_details` off the body has exactly the `title`, `description` and
/// `message` keys.
pub fn render(error: &AppError, show_details: bool) -> ErrorBody {
    let description = match error.kind {
        ErrorKind::ServerError => UNDEFINED_DESCRIPTION.to_string(),
        ErrorKind::Unprocessable => error.message.clone(),
        _ => status_description(error.status).to_string(),
    };

    let mut body = ErrorBody {
        title: status_title(error.status),
        description,
        message: error.message.clone(),
        kind: None,
        code: None,
        file: None,
        line: None,
        trace: None,
    };

    if show_details {
        body.kind = Some(error.kind.tag().to_string());
        body.code = Some(error.status.as_u16());
        body.file = Some(error.location.file().to_string());
        body.line = Some(error.location.line());
        body.trace = Some(trace_lines(&error.error));
    }

    body
}

/// Replaces error bodies with their detailed report when `show_details` is set.
pub async fn render_diagnostics(
    State(show_details): State<bool>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;

    let Some(ErrorReport(detailed)) = response.extensions_mut().remove::<ErrorReport>() else {
        return response;
    };

    if show_details && let Ok(bytes) = serde_json::to_vec(&detailed) {
        response.headers_mut().remove(header::CONTENT_LENGTH);
        *response.body_mut() = Body::from(bytes);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn keys(body: &ErrorBody) -> Vec<String> {
        let value = serde_json::to_value(body).unwrap();
        let mut keys: Vec<String> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_render_without_details_has_three_keys() {
        let errors = [
            AppError::bad_request(anyhow!("bad")),
            AppError::unauthenticated(anyhow!("Invalid password.")),
            AppError::token_rejected(StatusCode::FORBIDDEN, anyhow!("Expired token")),
            AppError::forbidden(anyhow!("no admin")),
            AppError::not_found(anyhow!("Course not found.")),
            AppError::method_not_allowed(anyhow!("nope")),
            AppError::unprocessable(anyhow!("Course could not be created.")),
            AppError::not_implemented(anyhow!("later")),
            AppError::internal(anyhow!("boom")),
        ];

        for error in errors {
            let body = render(&error, false);
            assert_eq!(keys(&body), vec!["description", "message", "title"]);
        }
    }

    #[test]
    fn test_render_with_details_adds_diagnostics() {
        let error = AppError::not_found(anyhow!("Course not found."));
        let body = render(&error, true);

        assert_eq!(body.kind.as_deref(), Some("RESOURCE_NOT_FOUND"));
        assert_eq!(body.code, Some(404));
        assert!(body.file.as_deref().unwrap().ends_with("render.rs"));
        assert!(body.line.is_some());
        assert_eq!(body.trace.as_ref().unwrap()[0], "Course not found.");
        assert_eq!(
            keys(&body),
            vec!["code", "description", "file", "line", "message", "title", "trace", "type"]
        );
    }

    #[test]
    fn test_render_titles_and_descriptions() {
        let body = render(&AppError::not_found(anyhow!("Test not found.")), false);
        assert_eq!(body.title, "404 Not Found");
        assert_eq!(
            body.description,
            "The requested resource could not be found. Please verify the URI and try again."
        );
        assert_eq!(body.message, "Test not found.");

        let body = render(&AppError::unprocessable(anyhow!("Test could not be created.")), false);
        assert_eq!(body.title, "422 Unprocessable Entity");
        assert_eq!(body.description, "Test could not be created.");

        let body = render(&AppError::internal(anyhow!("db down")), false);
        assert_eq!(body.title, "500 Internal Server Error");
        assert_eq!(body.description, UNDEFINED_DESCRIPTION);
        assert_eq!(body.message, crate::errors::INTERNAL_MESSAGE);
    }

    #[tokio::test]
    async fn test_render_diagnostics_swaps_body_when_enabled() {
        let app = axum::Router::new()
            .route(
                "/",
                axum::routing::get(|| async { AppError::bad_request(anyhow!("broken")) }),
            )
            .layer(axum::middleware::from_fn_with_state(true, render_diagnostics));

        let request = axum::http::Request::builder()
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["type"], "BAD_REQUEST");
        assert_eq!(body["code"], 400);
        assert_eq!(body["message"], "broken");
    }

    #[tokio::test]
    async fn test_render_diagnostics_keeps_plain_body_when_disabled() {
        let response = AppError::bad_request(anyhow!("broken")).into_response();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert!(body.get("type").is_none());
        assert!(body.get("trace").is_none());
    }
}
