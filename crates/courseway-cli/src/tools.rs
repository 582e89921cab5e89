use std::fmt;
use std::path::Path;

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};

use courseway_auth::{IssuedToken, issue_token};
use courseway_config::JwtConfig;
use courseway_core::hash_password_with_cost;
use courseway_lms::Fixture;

/// Counts of what a fixture seeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureSummary {
    pub users: usize,
    pub admins: usize,
    pub categories: usize,
    pub courses: usize,
}

impl fmt::Display for FixtureSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} users ({} administrators), {} categories, {} courses",
            self.users, self.admins, self.categories, self.courses
        )
    }
}

pub fn password_hash(password: &str, cost: u32) -> anyhow::Result<String> {
    if password.is_empty() {
        return Err(anyhow!("Password must not be empty"));
    }
    hash_password_with_cost(password, cost).map_err(|e| anyhow!(e.message))
}

/// Mints a token exactly as `POST /auth` would, without checking the host.
pub fn mint_token(
    username: &str,
    user_id: i64,
    jwt_config: &JwtConfig,
) -> anyhow::Result<IssuedToken> {
    issue_token(username, user_id, jwt_config).map_err(|e| anyhow!(e.message))
}

pub fn expiry_label(expires: i64) -> String {
    DateTime::<Utc>::from_timestamp(expires, 0)
        .map(|at| at.to_rfc3339())
        .unwrap_or_else(|| expires.to_string())
}

pub fn fixture_summary(path: &Path) -> anyhow::Result<FixtureSummary> {
    let fixture = Fixture::load(path)
        .with_context(|| format!("Fixture {} is not usable", path.display()))?;

    Ok(FixtureSummary {
        users: fixture.users.len(),
        admins: fixture.users.iter().filter(|u| u.is_admin).count(),
        categories: fixture.categories.len(),
        courses: fixture.courses.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_password_hash_verifies() {
        let hash = password_hash("secret", 4).unwrap();
        assert!(bcrypt::verify("secret", &hash).unwrap());
        assert!(password_hash("", 4).is_err());
    }

    #[test]
    fn test_mint_token_verifies() {
        let config = JwtConfig {
            secret: "cli_test_secret".to_string(),
        };
        let issued = mint_token("admin", 1, &config).unwrap();
        let claims = courseway_auth::verify_token(&issued.token, &config).unwrap();
        assert_eq!(claims.uname, "admin");
    }

    #[test]
    fn test_expiry_label() {
        assert_eq!(expiry_label(0), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_fixture_summary() {
        let path = std::env::temp_dir().join(format!("courseway-cli-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"{
                "users": [
                    {"id": 1, "username": "admin", "is_admin": true, "password_hash": "x"},
                    {"id": 2, "username": "jdoe", "password_hash": "y"}
                ],
                "courses": [{"code": "ALG", "title": "Algebra"}]
            }"#,
        )
        .unwrap();

        let summary = fixture_summary(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(
            summary,
            FixtureSummary {
                users: 2,
                admins: 1,
                categories: 0,
                courses: 1
            }
        );
    }
}
