//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::NavigatorConfig;
use crate::error::Result;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from files and environment.
    pub fn load(workspace_root: &Path) -> Result<NavigatorConfig> {
        Ok(MergeService::load(workspace_root)?)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<NavigatorConfig> {
        Ok(MergeService::load_from_file(path)?)
    }
}
