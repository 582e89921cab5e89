use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_learning_path, create_learning_path_category, create_section,
    get_learning_path_categories, get_learning_paths, get_sections,
};
use crate::state::AppState;

pub fn init_learning_paths_router() -> Router<AppState> {
    Router::new()
        .route(
            "/course/{course_code}/learningpaths",
            get(get_learning_paths),
        )
        .route(
            "/course/{course_code}/learningpath",
            post(create_learning_path),
        )
        .route(
            "/course/{course_code}/learningpaths/categories",
            get(get_learning_path_categories),
        )
        .route(
            "/course/{course_code}/learningpaths/category",
            post(create_learning_path_category),
        )
        .route(
            "/course/{course_code}/learningpath/{learningpath_id}/sections",
            get(get_sections),
        )
        .route(
            "/course/{course_code}/learningpath/{learningpath_id}/section",
            post(create_section),
        )
}
