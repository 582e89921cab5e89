//! Courseway Observability
//!
//! - Structured logging via `tracing` (console, rolling text and JSON files)
//! - Request logging middleware with per-request ids
//! - Prometheus metrics and the business counters the API reports
//!
//! Everything can be compiled out with `--no-default-features`, and switched off at
//! runtime with `OBSERVABILITY_ENABLED=false`.
//!
//! ```no_run
//! use courseway_observability::{init_metrics, init_tracing};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing("storage/logs").ok();
//!     let _handle = init_metrics();
//! }
//! ```

#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "observability")]
pub use logging::{DEFAULT_LOG_DIR, init_tracing, logging_middleware};
#[cfg(feature = "observability")]
pub use metrics::{
    init_metrics, is_observability_enabled, metrics_app, metrics_middleware, track_auth_failure,
    track_gate_rejection, track_token_issued, track_validation_failure,
};

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{Router, extract::Request, middleware::Next, response::Response};

    pub const DEFAULT_LOG_DIR: &str = "storage/logs";

    /// Stand-in so callers can name the handle type either way.
    #[derive(Clone, Debug)]
    pub struct PrometheusHandle;

    pub fn is_observability_enabled() -> bool {
        false
    }

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub fn init_tracing(_log_dir: &str) -> anyhow::Result<()> {
        Ok(())
    }

    pub fn init_metrics() -> Option<PrometheusHandle> {
        None
    }

    pub fn metrics_app(_handle: PrometheusHandle) -> Router {
        Router::new()
    }

    pub fn track_token_issued() {}
    pub fn track_auth_failure(_reason: &str) {}
    pub fn track_validation_failure(_context: &str) {}
    pub fn track_gate_rejection() {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
