//! Configuration
//!
//! Layered settings for the navigator: defaults, a global file, a workspace
//! file, then `LOGNAV__*` environment variables.

mod facade;
mod merge;
mod paths;
mod sources;

pub use facade::ConfigLoader;
pub use paths::xdg_root::config_home;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_pattern() -> String {
    "*.log".to_string()
}

fn default_true() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    100
}

/// File-name filter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Wildcard pattern; empty matches nothing
    #[serde(default = "default_pattern")]
    pub pattern: String,

    #[serde(default = "default_true")]
    pub case_sensitive: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            case_sensitive: default_true(),
        }
    }
}

/// Tree loader settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Scan sibling files and subdirectories on the rayon pool
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            parallel: default_true(),
        }
    }
}

/// Watch runtime settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// How often the daemon loop re-checks its running flag
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Audit cache against tree after every event (always on in debug builds)
    #[serde(default)]
    pub audit: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            audit: false,
        }
    }
}

/// Top-level navigator configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigatorConfig {
    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub loader: LoaderConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    /// Navigation roots to load on startup
    #[serde(default)]
    pub roots: Vec<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,
}
