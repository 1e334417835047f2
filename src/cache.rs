//! Node Cache
//!
//! Path-keyed index into the navigation tree. One entry per live node; typed
//! lookups treat a kind mismatch as absent.

use crate::tree::NodeKind;
use crate::types::NodeId;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheEntry {
    id: NodeId,
    kind: NodeKind,
}

#[derive(Debug, Default)]
pub struct NodeCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl NodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn get(&self, path: &Path) -> Option<NodeId> {
        self.entries.get(path).map(|e| e.id)
    }

    /// Lookup expecting `kind`; any other kind reads as absent.
    pub fn get_typed(&self, path: &Path, kind: NodeKind) -> Option<NodeId> {
        self.entries
            .get(path)
            .filter(|e| e.kind == kind)
            .map(|e| e.id)
    }

    pub fn get_folder(&self, path: &Path) -> Option<NodeId> {
        self.get_typed(path, NodeKind::Folder)
    }

    pub fn get_file(&self, path: &Path) -> Option<NodeId> {
        self.get_typed(path, NodeKind::File)
    }

    /// Register `path`, replacing any previous entry for it.
    pub(crate) fn insert(&mut self, path: PathBuf, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.entries
            .insert(path, CacheEntry { id, kind })
            .map(|e| e.id)
    }

    pub(crate) fn remove(&mut self, path: &Path) -> Option<NodeId> {
        self.entries.remove(path).map(|e| e.id)
    }

    /// Remove `path` and every key below it.
    pub(crate) fn remove_under(&mut self, path: &Path) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(path));
        before - self.entries.len()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }
}
