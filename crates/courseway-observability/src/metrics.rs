use std::sync::OnceLock;
use std::time::{Duration, Instant};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tracing::warn;

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

const REQUEST_DURATION_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

/// Check if observability is enabled via OBSERVABILITY_ENABLED env var
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true)
    })
}

/// Installs the Prometheus recorder and its upkeep task.
///
/// Returns `None` when observability is disabled or a recorder is already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if !is_observability_enabled() {
        return None;
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            REQUEST_DURATION_BUCKETS,
        )
        .and_then(|builder| builder.install_recorder())
        .inspect_err(|e| warn!(error = %e, "Prometheus recorder not installed"))
        .ok()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Some(handle)
}

/// `path` label for requests that reached no route.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Route template used as the `path` label.
///
/// Raw paths carry course codes and ids, so only matched templates are recorded.
pub fn route_label(matched: Option<&MatchedPath>) -> &str {
    matched.map_or(UNMATCHED_ROUTE, MatchedPath::as_str)
}

/// Records request count, latency and in-flight requests.
///
/// Mount with `Router::route_layer` so the matched route template is available.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = route_label(req.extensions().get::<MatchedPath>()).to_owned();

    gauge!("http_requests_active").increment(1.0);
    let response = next.run(req).await;
    gauge!("http_requests_active").decrement(1.0);

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    response
}

/// Router exposing the Prometheus scrape endpoint
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

pub fn track_token_issued() {
    if !is_observability_enabled() {
        return;
    }
    counter!("tokens_issued_total").increment(1);
}

/// Login or token verification failure, labelled by cause
pub fn track_auth_failure(reason: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("auth_failures_total", "reason" => reason.to_string()).increment(1);
}

pub fn track_validation_failure(context: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("validation_failures_total", "context" => context.to_string()).increment(1);
}

/// Request stopped by the auth gate before reaching a handler
pub fn track_gate_rejection() {
    if !is_observability_enabled() {
        return;
    }
    counter!("gate_rejections_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get};
    use tower::ServiceExt;

    async fn echo_route_label(req: Request, next: Next) -> Response {
        let label = route_label(req.extensions().get::<MatchedPath>()).to_owned();
        let mut response = next.run(req).await;
        response
            .headers_mut()
            .insert("x-route-label", label.parse().unwrap());
        response
    }

    async fn label_for(app: Router, uri: &str) -> String {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.headers()["x-route-label"].to_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_course_codes_share_route_label() {
        let routes = Router::new()
            .route("/course/{course_code}/tests", get(|| async { "ok" }))
            .route_layer(middleware::from_fn(echo_route_label));
        let app = Router::new().nest("/api/v1", routes);

        let mut labels: Vec<String> = Vec::new();
        for code in ["ALGEBRA", "C1", "C2", "HISTORY"] {
            labels.push(label_for(app.clone(), &format!("/api/v1/course/{code}/tests")).await);
        }
        labels.dedup();
        assert_eq!(labels, vec!["/api/v1/course/{course_code}/tests".to_string()]);
    }

    #[test]
    fn test_unknown_paths_share_unmatched_label() {
        assert_eq!(route_label(None), UNMATCHED_ROUTE);
    }
}
