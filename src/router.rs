use anyhow::anyhow;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use courseway_config::CorsConfig;
use courseway_core::{AppError, render_diagnostics};
use courseway_observability::{logging_middleware, metrics_middleware};

use crate::docs::ApiDoc;
use crate::middleware::auth::require_token;
use crate::middleware::role::require_admin;
use crate::modules::{
    init_auth_router, init_courses_router, init_documents_router, init_learning_paths_router,
    init_quizzes_router, init_users_router,
};
use crate::state::AppState;

pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Route not found.";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed for this route.";

async fn route_not_found() -> AppError {
    AppError::not_found(anyhow!(ROUTE_NOT_FOUND_MESSAGE))
}

async fn method_not_allowed() -> AppError {
    AppError::method_not_allowed(anyhow!(METHOD_NOT_ALLOWED_MESSAGE))
}

/// Every API route, relative to the base path.
///
/// Login stays open; the rest additionally requires an administrator behind the token.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .merge(init_users_router())
        .merge(init_courses_router())
        .merge(init_learning_paths_router())
        .merge(init_documents_router())
        .merge(init_quizzes_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new().merge(init_auth_router()).merge(protected)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        let allowed: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        AllowOrigin::list(allowed)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            header::AUTHORIZATION,
        ])
}

/// Mounts `routes` under the base path and wraps them in the request pipeline.
///
/// Outermost first: request logging, CORS, error rendering, then the token gate. The
/// gate sits outside routing so rejected requests never reach a handler. Metrics wrap
/// the matched routes only.
pub fn layered(routes: Router<AppState>, state: AppState) -> Router {
    let base_path = state.gate_config.base_path.clone();
    let routes = routes
        .method_not_allowed_fallback(method_not_allowed)
        .route_layer(middleware::from_fn(metrics_middleware));

    let mounted = if base_path.is_empty() {
        Router::new().merge(routes)
    } else {
        Router::new().nest(&base_path, routes)
    };

    mounted
        .merge(
            SwaggerUi::new(format!("{}/swagger", base_path))
                .url(format!("{}/openapi", base_path), ApiDoc::openapi()),
        )
        .fallback(route_not_found)
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state.clone(), require_token))
        .layer(middleware::from_fn_with_state(
            state.server_config.display_error_details,
            render_diagnostics,
        ))
        .layer(cors_layer(&state.cors_config))
        .layer(middleware::from_fn(logging_middleware))
}

pub fn init_router(state: AppState) -> Router {
    let routes = api_routes(&state);
    layered(routes, state)
}

#[cfg(all(test, feature = "observability"))]
mod tests {
    #[test]
    fn test_default_features_enable_route_metrics() {
        assert_eq!(courseway_observability::metrics::UNMATCHED_ROUTE, "unmatched");
    }
}
