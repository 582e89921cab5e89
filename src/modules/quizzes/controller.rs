use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use courseway_core::{AppError, ErrorBody};
use courseway_models::{
    Answer, CoursePath, CourseQuestionPath, CreateAnswerDto, CreateLearningPathTestDto,
    CreateQuestionDto, CreateTestDto, LearningPathPath, Question, QuestionPath, Test, TestPath,
};

use super::service::QuizService;
use crate::middleware::role::AdminUser;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

/// List the tests of a course
#[utoipa::path(
    get,
    path = "/api/v1/course/{course_code}/tests",
    params(CoursePath),
    responses(
        (status = 200, description = "Tests", body = Vec<Test>),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    tag = "Tests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_tests(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<CoursePath>,
) -> Result<Json<Vec<Test>>, AppError> {
    let tests = QuizService::list_tests(state.lms.as_ref(), &path.course_code).await?;
    Ok(Json(tests))
}

/// Create a test
#[utoipa::path(
    post,
    path = "/api/v1/course/{course_code}/test",
    params(CoursePath),
    request_body = CreateTestDto,
    responses(
        (status = 201, description = "Test created", body = Test),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Course not found", body = ErrorBody),
        (status = 422, description = "Test could not be created", body = ErrorBody)
    ),
    tag = "Tests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn create_test(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<CoursePath>,
    ValidatedJson(dto): ValidatedJson<CreateTestDto>,
) -> Result<(StatusCode, Json<Test>), AppError> {
    let test = QuizService::create_test(state.lms.as_ref(), &path.course_code, dto).await?;
    Ok((StatusCode::CREATED, Json(test)))
}

/// Get a test
#[utoipa::path(
    get,
    path = "/api/v1/course/{course_code}/test/{test_id}",
    params(TestPath),
    responses(
        (status = 200, description = "Test details", body = Test),
        (status = 404, description = "Course or test not found", body = ErrorBody)
    ),
    tag = "Tests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_test(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<TestPath>,
) -> Result<Json<Test>, AppError> {
    let test = QuizService::get_test(state.lms.as_ref(), &path.course_code, path.test_id).await?;
    Ok(Json(test))
}

/// Delete a test
#[utoipa::path(
    delete,
    path = "/api/v1/course/{course_code}/test/{test_id}",
    params(TestPath),
    responses(
        (status = 204, description = "Test deleted"),
        (status = 404, description = "Course or test not found", body = ErrorBody),
        (status = 422, description = "Test could not be deleted", body = ErrorBody)
    ),
    tag = "Tests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn delete_test(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<TestPath>,
) -> Result<StatusCode, AppError> {
    QuizService::delete_test(state.lms.as_ref(), &path.course_code, path.test_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create a test inside a learning path
#[utoipa::path(
    post,
    path = "/api/v1/course/{course_code}/learningpath/{learningpath_id}/test",
    params(LearningPathPath),
    request_body = CreateLearningPathTestDto,
    responses(
        (status = 201, description = "Test created and appended to the path", body = Test),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Course or learning path not found", body = ErrorBody),
        (status = 422, description = "Test could not be created", body = ErrorBody)
    ),
    tag = "Tests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin))]
pub async fn create_learning_path_test(
    State(state): State<AppState>,
    admin: AdminUser,
    ValidatedPath(path): ValidatedPath<LearningPathPath>,
    ValidatedJson(dto): ValidatedJson<CreateLearningPathTestDto>,
) -> Result<(StatusCode, Json<Test>), AppError> {
    let test = QuizService::create_learning_path_test(
        state.lms.as_ref(),
        &path.course_code,
        path.learningpath_id,
        dto,
        admin.user_id(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(test)))
}

/// List the questions of a test
#[utoipa::path(
    get,
    path = "/api/v1/course/{course_code}/test/{test_id}/questions",
    params(TestPath),
    responses(
        (status = 200, description = "Questions in test order", body = Vec<Question>),
        (status = 404, description = "Course or test not found", body = ErrorBody)
    ),
    tag = "Tests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_questions(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<TestPath>,
) -> Result<Json<Vec<Question>>, AppError> {
    let questions =
        QuizService::list_questions(state.lms.as_ref(), &path.course_code, path.test_id).await?;
    Ok(Json(questions))
}

/// Create a question inside a test
#[utoipa::path(
    post,
    path = "/api/v1/course/{course_code}/test/{test_id}/question",
    params(TestPath),
    request_body = CreateQuestionDto,
    responses(
        (status = 201, description = "Question created", body = Question),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Course or test not found", body = ErrorBody),
        (status = 422, description = "Question could not be created", body = ErrorBody)
    ),
    tag = "Tests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn create_test_question(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<TestPath>,
    ValidatedJson(dto): ValidatedJson<CreateQuestionDto>,
) -> Result<(StatusCode, Json<Question>), AppError> {
    let question = QuizService::create_question(
        state.lms.as_ref(),
        &path.course_code,
        Some(path.test_id),
        dto,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// Remove a question from a test without deleting it
#[utoipa::path(
    patch,
    path = "/api/v1/course/{course_code}/test/{test_id}/question/{question_id}",
    params(QuestionPath),
    responses(
        (status = 204, description = "Question removed from the test"),
        (status = 404, description = "Course, test or question not found", body = ErrorBody),
        (status = 422, description = "Question could not be removed", body = ErrorBody)
    ),
    tag = "Tests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn remove_test_question(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<QuestionPath>,
) -> Result<StatusCode, AppError> {
    QuizService::remove_question_from_test(
        state.lms.as_ref(),
        &path.course_code,
        path.test_id,
        path.question_id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create a question outside any test
#[utoipa::path(
    post,
    path = "/api/v1/course/{course_code}/question",
    params(CoursePath),
    request_body = CreateQuestionDto,
    responses(
        (status = 201, description = "Question created", body = Question),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Course not found", body = ErrorBody),
        (status = 422, description = "Question could not be created", body = ErrorBody)
    ),
    tag = "Tests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn create_question(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<CoursePath>,
    ValidatedJson(dto): ValidatedJson<CreateQuestionDto>,
) -> Result<(StatusCode, Json<Question>), AppError> {
    let question =
        QuizService::create_question(state.lms.as_ref(), &path.course_code, None, dto).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// Get a question
#[utoipa::path(
    get,
    path = "/api/v1/course/{course_code}/question/{question_id}",
    params(CourseQuestionPath),
    responses(
        (status = 200, description = "Question details", body = Question),
        (status = 404, description = "Course or question not found", body = ErrorBody)
    ),
    tag = "Tests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_question(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<CourseQuestionPath>,
) -> Result<Json<Question>, AppError> {
    let question =
        QuizService::get_question(state.lms.as_ref(), &path.course_code, path.question_id).await?;
    Ok(Json(question))
}

/// Delete a question
#[utoipa::path(
    delete,
    path = "/api/v1/course/{course_code}/question/{question_id}",
    params(CourseQuestionPath),
    responses(
        (status = 204, description = "Question deleted"),
        (status = 404, description = "Course or question not found", body = ErrorBody),
        (status = 422, description = "Question could not be deleted", body = ErrorBody)
    ),
    tag = "Tests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn delete_question(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<CourseQuestionPath>,
) -> Result<StatusCode, AppError> {
    QuizService::delete_question(state.lms.as_ref(), &path.course_code, path.question_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the answers of a question
#[utoipa::path(
    get,
    path = "/api/v1/course/{course_code}/test/{test_id}/question/{question_id}/answers",
    params(QuestionPath),
    responses(
        (status = 200, description = "Answers by position", body = Vec<Answer>),
        (status = 404, description = "Course, test or question not found", body = ErrorBody)
    ),
    tag = "Tests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_answers(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<QuestionPath>,
) -> Result<Json<Vec<Answer>>, AppError> {
    let answers = QuizService::list_answers(
        state.lms.as_ref(),
        &path.course_code,
        path.test_id,
        path.question_id,
    )
    .await?;
    Ok(Json(answers))
}

/// Add an answer to a question
#[utoipa::path(
    post,
    path = "/api/v1/course/{course_code}/test/{test_id}/question/{question_id}/answer",
    params(QuestionPath),
    request_body = CreateAnswerDto,
    responses(
        (status = 201, description = "Answer created", body = Answer),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Course, test or question not found", body = ErrorBody),
        (status = 422, description = "Answer could not be created", body = ErrorBody)
    ),
    tag = "Tests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn create_answer(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedPath(path): ValidatedPath<QuestionPath>,
    ValidatedJson(dto): ValidatedJson<CreateAnswerDto>,
) -> Result<(StatusCode, Json<Answer>), AppError> {
    let answer = QuizService::create_answer(
        state.lms.as_ref(),
        &path.course_code,
        path.test_id,
        path.question_id,
        dto,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(answer)))
}
