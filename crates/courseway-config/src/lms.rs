use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug, Default)]
pub struct LmsConfig {
    /// JSON fixture seeding the in-memory host; `None` starts it empty
    pub fixture_path: Option<PathBuf>,
}

impl LmsConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            fixture_path: lookup("LMS_FIXTURE")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}
