//! Error types for the navigation tree.

use std::path::PathBuf;

/// Errors surfaced by the navigator API.
///
/// Filesystem races (missing parents, duplicate or stale events) are resolved
/// internally and never show up here.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid filter: {0}")]
    Filter(String),
}

impl NavError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NavError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<notify::Error> for NavError {
    fn from(err: notify::Error) -> Self {
        NavError::Watch(err.to_string())
    }
}

impl From<regex::Error> for NavError {
    fn from(err: regex::Error) -> Self {
        NavError::Filter(err.to_string())
    }
}

impl From<config::ConfigError> for NavError {
    fn from(err: config::ConfigError) -> Self {
        NavError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;

/// Reject empty path arguments up front.
pub(crate) fn require_path(path: &std::path::Path, what: &str) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(NavError::InvalidArgument(format!("{} must not be empty", what)));
    }
    Ok(())
}
