use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use courseway_config::{AuthGateConfig, CorsConfig, JwtConfig, LmsConfig, ServerConfig};
use courseway_lms::{InMemoryLms, Lms};

#[derive(Clone)]
pub struct AppState {
    pub lms: Arc<dyn Lms>,
    pub jwt_config: JwtConfig,
    pub gate_config: AuthGateConfig,
    pub server_config: ServerConfig,
    pub cors_config: CorsConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("gate_config", &self.gate_config)
            .field("server_config", &self.server_config)
            .field("cors_config", &self.cors_config)
            .finish_non_exhaustive()
    }
}

/// Builds the state from the environment. The host is seeded from `LMS_FIXTURE` when set.
pub fn init_app_state() -> anyhow::Result<AppState> {
    let lms_config = LmsConfig::from_env();
    let lms = match &lms_config.fixture_path {
        Some(path) => {
            let lms = InMemoryLms::load(path)
                .with_context(|| format!("loading host fixture {}", path.display()))?;
            info!(fixture = %path.display(), "Host LMS seeded from fixture");
            lms
        }
        None => {
            info!("No LMS_FIXTURE set, starting with an empty host");
            InMemoryLms::new()
        }
    };

    Ok(AppState {
        lms: Arc::new(lms),
        jwt_config: JwtConfig::from_env()?,
        gate_config: AuthGateConfig::from_env()?,
        server_config: ServerConfig::from_env()?,
        cors_config: CorsConfig::from_env(),
    })
}
