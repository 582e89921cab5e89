//! Token gate configuration.
//!
//! Every path under [`AuthGateConfig::base_path`] needs a bearer token except the
//! allowlisted prefixes (login, the machine-readable API description and the doc viewer).

use std::env;

use crate::error::ConfigError;

pub const DEFAULT_BASE_PATH: &str = "/api/v1";

/// Status returned for a missing or invalid token unless configured otherwise.
///
/// Existing consumers rely on 403 here even though 401 is the stricter reading.
pub const DEFAULT_REJECTION_STATUS: u16 = 403;

#[derive(Clone, Debug)]
pub struct AuthGateConfig {
    pub base_path: String,
    pub allowlist: Vec<String>,
    pub rejection_status: u16,
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

impl AuthGateConfig {
    pub fn new(base_path: &str) -> Self {
        let base_path = base_path.trim_end_matches('/').to_string();
        let allowlist = ["auth", "openapi", "swagger"]
            .iter()
            .map(|segment| format!("{}/{}", base_path, segment))
            .collect();

        Self {
            base_path,
            allowlist,
            rejection_status: DEFAULT_REJECTION_STATUS,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_path = lookup("API_BASE_PATH").unwrap_or_else(|| DEFAULT_BASE_PATH.to_string());
        if !base_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                key: "API_BASE_PATH",
                value: base_path,
                reason: "must start with `/`",
            });
        }

        let mut config = Self::new(&base_path);

        if let Some(raw) = lookup("AUTH_REJECTION_STATUS") {
            config.rejection_status = match raw.trim() {
                "401" => 401,
                "403" => 403,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "AUTH_REJECTION_STATUS",
                        value: raw,
                        reason: "expected 401 or 403",
                    });
                }
            };
        }

        Ok(config)
    }

    /// True when `path` requires a verified token.
    pub fn is_protected(&self, path: &str) -> bool {
        matches_prefix(path, &self.base_path)
            && !self
                .allowlist
                .iter()
                .any(|prefix| matches_prefix(path, prefix))
    }
}

impl Default for AuthGateConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowlist_bypasses_gate() {
        let config = AuthGateConfig::default();

        assert!(!config.is_protected("/api/v1/auth"));
        assert!(!config.is_protected("/api/v1/openapi"));
        assert!(!config.is_protected("/api/v1/swagger"));
        assert!(!config.is_protected("/api/v1/swagger/index.html"));
    }

    #[test]
    fn test_protected_paths() {
        let config = AuthGateConfig::default();

        assert!(config.is_protected("/api/v1/courses"));
        assert!(config.is_protected("/api/v1/course/MATH/tests"));
        assert!(config.is_protected("/api/v1/authors"));
        assert!(config.is_protected("/api/v1"));
    }

    #[test]
    fn test_paths_outside_base_are_open() {
        let config = AuthGateConfig::default();

        assert!(!config.is_protected("/metrics"));
        assert!(!config.is_protected("/api/v10/courses"));
    }

    #[test]
    fn test_rejection_status_from_vars() {
        let config = AuthGateConfig::from_vars(|key| match key {
            "AUTH_REJECTION_STATUS" => Some("401".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.rejection_status, 401);

        let err = AuthGateConfig::from_vars(|key| match key {
            "AUTH_REJECTION_STATUS" => Some("418".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "AUTH_REJECTION_STATUS", .. }));
    }

    #[test]
    fn test_custom_base_path() {
        let config = AuthGateConfig::from_vars(|key| match key {
            "API_BASE_PATH" => Some("/plugin/rest/".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.base_path, "/plugin/rest");
        assert!(!config.is_protected("/plugin/rest/auth"));
        assert!(config.is_protected("/plugin/rest/courses"));
    }
}
