use std::path::PathBuf;

use thiserror::Error;

pub type LmsResult<T> = Result<T, LmsError>;

/// Failure reported by the host for an operation on an entity that exists.
#[derive(Debug, Error)]
pub enum LmsError {
    /// The change collides with existing state, e.g. a duplicate course code.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The host declined the change.
    #[error("rejected: {0}")]
    Rejected(String),

    #[error("host unavailable: {0}")]
    Unavailable(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse fixture {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid fixture: {0}")]
    Invalid(String),
}
