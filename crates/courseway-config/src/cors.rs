use std::env;

#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self { allowed_origins }
    }

    /// True when any origin may call the API.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_any_origin() {
        let config = CorsConfig::from_vars(|_| None);
        assert!(config.allows_any_origin());
    }

    #[test]
    fn test_parses_origin_list() {
        let config = CorsConfig::from_vars(|_| {
            Some("https://lms.example.org, http://localhost:5173,".to_string())
        });
        assert_eq!(
            config.allowed_origins,
            vec!["https://lms.example.org", "http://localhost:5173"]
        );
        assert!(!config.allows_any_origin());
    }
}
