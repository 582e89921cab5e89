use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use courseway::router::init_router;
use courseway::state::init_app_state;
use courseway_observability::{DEFAULT_LOG_DIR, init_metrics, init_tracing, metrics_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
    init_tracing(&log_dir)?;

    let state = init_app_state()?;
    let address = state.server_config.address();
    let base_path = state.gate_config.base_path.clone();

    let mut app = init_router(state);
    if let Some(handle) = init_metrics() {
        app = app.merge(metrics_app(handle));
    }

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {}", address))?;

    info!(%address, "Server running");
    info!("Swagger UI available at http://{}{}/swagger", address, base_path);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
