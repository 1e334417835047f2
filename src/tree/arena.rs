//! Arena that owns every navigation node.
//!
//! Folders reference children by [`NodeId`]; there are no parent pointers.
//! A node's parent is found through the cache by its computed parent path.

use super::node::{FileNode, FolderNode, NavigationNode};
use super::order;
use crate::types::NodeId;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct NavigationTree {
    nodes: HashMap<NodeId, NavigationNode>,
    roots: Vec<NodeId>,
    next_id: u64,
}

impl NavigationTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn allocate_id(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId(self.next_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every id in the arena, reachable or not.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn root_by_path(&self, path: &Path) -> Option<NodeId> {
        self.roots
            .iter()
            .copied()
            .find(|id| self.node(*id).map(|n| n.full_name() == path).unwrap_or(false))
    }

    pub fn node(&self, id: NodeId) -> Option<&NavigationNode> {
        self.nodes.get(&id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut NavigationNode> {
        self.nodes.get_mut(&id)
    }

    pub fn folder(&self, id: NodeId) -> Option<&FolderNode> {
        self.node(id).and_then(NavigationNode::as_folder)
    }

    pub(crate) fn folder_mut(&mut self, id: NodeId) -> Option<&mut FolderNode> {
        match self.nodes.get_mut(&id) {
            Some(NavigationNode::Folder(f)) => Some(f),
            _ => None,
        }
    }

    pub fn file(&self, id: NodeId) -> Option<&FileNode> {
        self.node(id).and_then(NavigationNode::as_file)
    }

    pub(crate) fn file_mut(&mut self, id: NodeId) -> Option<&mut FileNode> {
        match self.nodes.get_mut(&id) {
            Some(NavigationNode::File(f)) => Some(f),
            _ => None,
        }
    }

    pub(crate) fn insert(&mut self, node: NavigationNode) -> NodeId {
        let id = node.id();
        self.nodes.insert(id, node);
        id
    }

    pub(crate) fn push_root(&mut self, id: NodeId) {
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
    }

    pub(crate) fn remove_root_entry(&mut self, id: NodeId) -> bool {
        let before = self.roots.len();
        self.roots.retain(|r| *r != id);
        self.roots.len() != before
    }

    /// Find a direct child of `folder` by full path.
    pub fn child_by_path(&self, folder: NodeId, path: &Path) -> Option<NodeId> {
        self.folder(folder)?
            .children()
            .find(|id| self.node(*id).map(|n| n.full_name() == path).unwrap_or(false))
    }

    /// Insert `file` into `folder.files` at its descending position.
    pub(crate) fn insert_file_sorted(&mut self, folder: NodeId, file: NodeId) {
        let name = match self.file(file) {
            Some(f) => f.header.name.clone(),
            None => return,
        };
        let index = match self.folder(folder) {
            Some(parent) => order::descending_index(
                parent
                    .files
                    .iter()
                    .map(|id| self.node(*id).map(NavigationNode::name).unwrap_or("")),
                &name,
            ),
            None => return,
        };
        if let Some(parent) = self.folder_mut(folder) {
            parent.files.insert(index, file);
        }
    }

    pub(crate) fn push_directory(&mut self, folder: NodeId, child: NodeId) {
        if let Some(parent) = self.folder_mut(folder) {
            parent.directories.push(child);
        }
    }

    /// Unlink `child` from `folder`'s child lists. The child stays in the arena.
    pub(crate) fn detach_child(&mut self, folder: NodeId, child: NodeId) -> bool {
        match self.folder_mut(folder) {
            Some(parent) => {
                let before = parent.files.len() + parent.directories.len();
                parent.files.retain(|id| *id != child);
                parent.directories.retain(|id| *id != child);
                before != parent.files.len() + parent.directories.len()
            }
            None => false,
        }
    }

    /// Drop `id` and everything below it from the arena, clearing nested
    /// child lists on the way down. Returns the paths that were removed.
    pub(crate) fn remove_subtree(&mut self, id: NodeId) -> Vec<PathBuf> {
        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(folder) = self.folder_mut(current) {
                stack.extend(folder.files.drain(..));
                stack.extend(folder.directories.drain(..));
            }
            if let Some(node) = self.nodes.remove(&current) {
                removed.push(node.full_name().to_path_buf());
            }
        }
        removed
    }

    /// Every node reachable from the roots, as `(path, id)`, in preorder.
    pub fn reachable(&self) -> Vec<(PathBuf, NodeId)> {
        let mut out = Vec::new();
        for root in &self.roots {
            self.walk(*root, &mut |node| {
                out.push((node.full_name().to_path_buf(), node.id()));
            });
        }
        out
    }

    /// Preorder walk of the subtree at `id`.
    pub fn walk<F>(&self, id: NodeId, visit: &mut F)
    where
        F: FnMut(&NavigationNode),
    {
        let Some(node) = self.node(id) else {
            return;
        };
        visit(node);
        if let NavigationNode::Folder(folder) = node {
            for child in folder.children() {
                self.walk(child, visit);
            }
        }
    }
}
