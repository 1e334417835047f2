//! Collaborator hooks invoked by the navigator.
//!
//! Both hooks run after the navigator has released its state lock, so
//! implementations may read the navigator from inside the callback.

use crate::tree::FileNode;
use std::path::Path;

/// Reparses file content. Only called for selected files whose content changed.
pub trait ContentLoader: Send + Sync {
    /// Fire-and-forget; the navigator consumes no result.
    fn load_batch_for_selected_node(&self, file: &FileNode);
}

/// Owner of the presentation layer's root collection.
pub trait RootCollection: Send + Sync {
    /// A navigation root was deleted on disk or released.
    fn remove_root(&self, path: &Path);
}

/// Hooks that do nothing, for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl ContentLoader for NoopHooks {
    fn load_batch_for_selected_node(&self, _file: &FileNode) {}
}

impl RootCollection for NoopHooks {
    fn remove_root(&self, _path: &Path) {}
}
