use anyhow::anyhow;
use tracing::warn;

use courseway_core::AppError;
use courseway_lms::{Lms, LmsError};
use courseway_models::{Course, LearningPath, Question, Test};

pub const COURSE_NOT_FOUND_MESSAGE: &str = "Course not found.";
pub const TEST_NOT_FOUND_MESSAGE: &str = "Test not found.";

/// Translates a host failure at the route boundary.
///
/// `Conflict` and `Rejected` become `Unprocessable` with `message`; an unavailable host
/// is a server error.
pub fn host_failure(message: &'static str) -> impl FnOnce(LmsError) -> AppError {
    move |err| match err {
        LmsError::Unavailable(source) => AppError::internal(source.context(message)),
        other => {
            warn!(error = %other, "Host refused the operation");
            AppError::unprocessable(anyhow::Error::new(other).context(message))
        }
    }
}

/// Host read failures only happen when the host itself is broken.
pub fn host_unavailable(err: LmsError) -> AppError {
    AppError::internal(err)
}

pub async fn require_course(
    lms: &dyn Lms,
    course_code: &str,
    not_found: impl FnOnce() -> String,
) -> Result<Course, AppError> {
    lms.find_course(course_code)
        .await
        .map_err(host_unavailable)?
        .ok_or_else(|| AppError::not_found(anyhow!(not_found())))
}

pub async fn require_learning_path(
    lms: &dyn Lms,
    course_code: &str,
    learning_path_id: i64,
) -> Result<LearningPath, AppError> {
    lms.find_learning_path(course_code, learning_path_id)
        .await
        .map_err(host_unavailable)?
        .ok_or_else(|| {
            AppError::not_found(anyhow!(
                "Learning path with id {} not found.",
                learning_path_id
            ))
        })
}

pub async fn require_test(
    lms: &dyn Lms,
    course_code: &str,
    test_id: i64,
) -> Result<Test, AppError> {
    lms.find_test(course_code, test_id)
        .await
        .map_err(host_unavailable)?
        .ok_or_else(|| AppError::not_found(anyhow!(TEST_NOT_FOUND_MESSAGE)))
}

pub async fn require_question(
    lms: &dyn Lms,
    course_code: &str,
    question_id: i64,
) -> Result<Question, AppError> {
    lms.find_question(course_code, question_id)
        .await
        .map_err(host_unavailable)?
        .ok_or_else(|| {
            AppError::not_found(anyhow!("Could not find question with id = {}", question_id))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use courseway_core::ErrorKind;

    #[test]
    fn test_host_failure_translation() {
        let err = host_failure("Course could not be created.")(LmsError::Rejected(
            "no code".to_string(),
        ));
        assert_eq!(err.kind, ErrorKind::Unprocessable);
        assert_eq!(err.message, "Course could not be created.");
        assert!(format!("{:#}", err.error).contains("no code"));

        let err = host_failure("Course could not be created.")(LmsError::Unavailable(anyhow!(
            "store poisoned"
        )));
        assert_eq!(err.kind, ErrorKind::ServerError);
    }

    #[tokio::test]
    async fn test_lookups_report_not_found() {
        let lms = courseway_lms::InMemoryLms::new();

        let err = require_course(&lms, "NOPE", || COURSE_NOT_FOUND_MESSAGE.to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Course not found.");

        let err = require_learning_path(&lms, "NOPE", 7).await.unwrap_err();
        assert_eq!(err.message, "Learning path with id 7 not found.");

        let err = require_question(&lms, "NOPE", 3).await.unwrap_err();
        assert_eq!(err.message, "Could not find question with id = 3");
    }
}
