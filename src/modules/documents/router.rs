use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{create_learning_path_document, get_documents, get_learning_path_documents};
use crate::state::AppState;

pub fn init_documents_router() -> Router<AppState> {
    Router::new()
        .route("/course/{course_code}/documents", get(get_documents))
        .route(
            "/course/{course_code}/learningpath/{learningpath_id}/documents",
            get(get_learning_path_documents),
        )
        .route(
            "/course/{course_code}/learningpath/{learningpath_id}/document",
            post(create_learning_path_document),
        )
}
