pub mod auth;
pub mod courses;
pub mod documents;
pub mod learning_paths;
pub mod quizzes;
pub mod users;

pub use self::auth::router::init_auth_router;
pub use self::courses::router::init_courses_router;
pub use self::documents::router::init_documents_router;
pub use self::learning_paths::router::init_learning_paths_router;
pub use self::quizzes::router::init_quizzes_router;
pub use self::users::router::init_users_router;
