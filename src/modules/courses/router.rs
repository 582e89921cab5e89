use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    add_course_description, backup_course, create_category, create_course, delete_category,
    delete_course, get_categories, get_category, get_course, get_course_resources, get_courses,
    set_tool_intro,
};
use crate::state::AppState;

pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route("/courses", get(get_courses))
        .route("/course", post(create_course))
        .route("/course/{course_code}", get(get_course).delete(delete_course))
        .route(
            "/course/{course_code}/description",
            post(add_course_description),
        )
        .route(
            "/course/{course_code}/tool/{tool_id}/intro_text",
            post(set_tool_intro),
        )
        .route("/course/{course_code}/backup", get(backup_course))
        .route("/course/{course_code}/resources", get(get_course_resources))
        .route("/courses/categories", get(get_categories))
        .route("/courses/category", post(create_category))
        .route(
            "/courses/category/{category_code}",
            get(get_category).delete(delete_category),
        )
}
