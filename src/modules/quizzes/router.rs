use axum::{
    Router,
    routing::{get, patch, post},
};

use super::controller::{
    create_answer, create_learning_path_test, create_question, create_test, create_test_question,
    delete_question, delete_test, get_answers, get_question, get_questions, get_test, get_tests,
    remove_test_question,
};
use crate::state::AppState;

pub fn init_quizzes_router() -> Router<AppState> {
    Router::new()
        .route("/course/{course_code}/tests", get(get_tests))
        .route("/course/{course_code}/test", post(create_test))
        .route(
            "/course/{course_code}/test/{test_id}",
            get(get_test).delete(delete_test),
        )
        .route(
            "/course/{course_code}/learningpath/{learningpath_id}/test",
            post(create_learning_path_test),
        )
        .route(
            "/course/{course_code}/test/{test_id}/questions",
            get(get_questions),
        )
        .route(
            "/course/{course_code}/test/{test_id}/question",
            post(create_test_question),
        )
        .route(
            "/course/{course_code}/test/{test_id}/question/{question_id}",
            patch(remove_test_question),
        )
        .route("/course/{course_code}/question", post(create_question))
        .route(
            "/course/{course_code}/question/{question_id}",
            get(get_question).delete(delete_question),
        )
        .route(
            "/course/{course_code}/test/{test_id}/question/{question_id}/answers",
            get(get_answers),
        )
        .route(
            "/course/{course_code}/test/{test_id}/question/{question_id}/answer",
            post(create_answer),
        )
}
