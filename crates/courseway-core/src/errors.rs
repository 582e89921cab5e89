//! Application error type and the closed failure taxonomy.
//!
//! Every failure that reaches the HTTP boundary is an [`AppError`]. Each error carries
//! one [`ErrorKind`], the status it will be rendered with, the message shown to the
//! client, the underlying [`anyhow::Error`] and the source location that raised it.
//!
//! Constructors are `#[track_caller]`, so the location recorded for diagnostics is the
//! call site that built the error rather than this module.

use std::panic::Location;

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::render::{ErrorReport, render};

/// Message shown to clients for any uncaught failure.
pub const INTERNAL_MESSAGE: &str = "An internal error has occurred while processing your request.";

/// Closed set of failure categories a request can end with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed body or failed validation.
    BadRequest,
    /// Missing, invalid or expired credential.
    Unauthenticated,
    /// Valid credential without the required privilege.
    Forbidden,
    /// Referenced entity is absent.
    NotFound,
    /// Verb not supported on the matched route.
    MethodNotAllowed,
    /// Well-formed request whose state change could not be completed.
    Unprocessable,
    /// Intentionally stubbed endpoint.
    NotImplemented,
    /// Uncaught or unexpected failure.
    ServerError,
}

impl ErrorKind {
    /// Tag reported in the `type` diagnostics field.
    pub fn tag(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Unauthenticated => "UNAUTHENTICATED",
            ErrorKind::Forbidden => "INSUFFICIENT_PRIVILEGES",
            ErrorKind::NotFound => "RESOURCE_NOT_FOUND",
            ErrorKind::MethodNotAllowed => "NOT_ALLOWED",
            ErrorKind::Unprocessable => "UNPROCESSABLE_ENTITY",
            ErrorKind::NotImplemented => "NOT_IMPLEMENTED",
            ErrorKind::ServerError => "SERVER_ERROR",
        }
    }

    /// Status used when the raising site does not pick one.
    ///
    /// `Forbidden` maps to 401: privilege failures have always been reported that way
    /// and API consumers depend on it.
    pub fn default_status(self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorKind::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            ErrorKind::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub status: StatusCode,
    pub message: String,
    pub error: Error,
    pub location: &'static Location<'static>,
}

impl AppError {
    #[track_caller]
    pub fn new<E>(kind: ErrorKind, status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        let error = err.into();
        let message = match kind {
            ErrorKind::ServerError => INTERNAL_MESSAGE.to_string(),
            _ => error.to_string(),
        };

        Self {
            kind,
            status,
            message,
            error,
            location: Location::caller(),
        }
    }

    #[track_caller]
    fn of_kind<E>(kind: ErrorKind, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(kind, kind.default_status(), err)
    }

    #[track_caller]
    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::of_kind(ErrorKind::BadRequest, err)
    }

    /// Credential failure answered with 401, used by the login flow.
    #[track_caller]
    pub fn unauthenticated<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::of_kind(ErrorKind::Unauthenticated, err)
    }

    /// Credential failure answered with a configured status, used by the token gate.
    #[track_caller]
    pub fn token_rejected<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Unauthenticated, status, err)
    }

    #[track_caller]
    pub fn forbidden<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::of_kind(ErrorKind::Forbidden, err)
    }

    #[track_caller]
    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::of_kind(ErrorKind::NotFound, err)
    }

    #[track_caller]
    pub fn method_not_allowed<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::of_kind(ErrorKind::MethodNotAllowed, err)
    }

    #[track_caller]
    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::of_kind(ErrorKind::Unprocessable, err)
    }

    #[track_caller]
    pub fn not_implemented<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::of_kind(ErrorKind::NotImplemented, err)
    }

    #[track_caller]
    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::of_kind(ErrorKind::ServerError, err)
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.kind.tag())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            error!(
                error.kind = self.kind.tag(),
                error.file = self.location.file(),
                error.line = self.location.line(),
                error = ?self.error,
                "Request failed with a server error"
            );
        }

        let body = render(&self, false);
        let report = ErrorReport(render(&self, true));

        let mut response = (self.status, Json(body)).into_response();
        response.extensions_mut().insert(report);
        response
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    #[track_caller]
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_constructors_pick_kind_and_status() {
        let cases = [
            (AppError::bad_request(anyhow!("x")), ErrorKind::BadRequest, 400),
            (AppError::unauthenticated(anyhow!("x")), ErrorKind::Unauthenticated, 401),
            (AppError::forbidden(anyhow!("x")), ErrorKind::Forbidden, 401),
            (AppError::not_found(anyhow!("x")), ErrorKind::NotFound, 404),
            (AppError::method_not_allowed(anyhow!("x")), ErrorKind::MethodNotAllowed, 405),
            (AppError::unprocessable(anyhow!("x")), ErrorKind::Unprocessable, 422),
            (AppError::not_implemented(anyhow!("x")), ErrorKind::NotImplemented, 501),
            (AppError::internal(anyhow!("x")), ErrorKind::ServerError, 500),
        ];

        for (error, kind, status) in cases {
            assert_eq!(error.kind, kind);
            assert_eq!(error.status.as_u16(), status);
        }
    }

    #[test]
    fn test_token_rejected_uses_given_status() {
        let error = AppError::token_rejected(StatusCode::FORBIDDEN, anyhow!("Token not found."));
        assert_eq!(error.kind, ErrorKind::Unauthenticated);
        assert_eq!(error.status, StatusCode::FORBIDDEN);
        assert_eq!(error.message, "Token not found.");
    }

    #[test]
    fn test_server_error_hides_internal_message() {
        let error = AppError::internal(anyhow!("connection refused on 10.0.0.3"));
        assert_eq!(error.message, INTERNAL_MESSAGE);
        assert!(error.error.to_string().contains("10.0.0.3"));
    }

    #[test]
    fn test_location_points_at_raising_site() {
        let error = AppError::not_found(anyhow!("missing"));
        assert!(error.location.file().ends_with("errors.rs"));
        assert!(error.location.line() > 0);
    }

    #[test]
    fn test_from_any_error_is_server_error() {
        fn parse() -> Result<i32, AppError> {
            Ok("nope".parse::<i32>()?)
        }

        let error = parse().unwrap_err();
        assert_eq!(error.kind, ErrorKind::ServerError);
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_into_response_carries_report() {
        let response = AppError::bad_request(anyhow!("[title]: This field is missing.")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let report = response.extensions().get::<ErrorReport>().unwrap();
        assert_eq!(report.0.kind.as_deref(), Some("BAD_REQUEST"));
        assert_eq!(report.0.code, Some(400));
    }
}
