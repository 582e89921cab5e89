use std::env;

use crate::error::ConfigError;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    /// Shared HMAC secret used to sign and verify tokens
    pub secret: String,
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Requires a non-empty `JWT_SECRET`; there is no built-in fallback secret.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self { secret })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_required() {
        assert_eq!(
            JwtConfig::from_vars(|_| None).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
        assert!(JwtConfig::from_vars(|_| Some("   ".to_string())).is_err());
    }

    #[test]
    fn test_secret_is_read() {
        let config = JwtConfig::from_vars(|_| Some("s3cret".to_string())).unwrap();
        assert_eq!(config.secret, "s3cret");
    }
}
