//! Reconciler
//!
//! Applies one change event to the tree and cache. There is no explicit state
//! enum: each handler inspects what the tree and cache already hold and only
//! moves them toward what is on disk, so duplicate, coalesced or out-of-order
//! notifications degrade to no-ops. When a notification is ambiguous (a rename
//! whose old path was never seen, a create whose parent is unknown) the
//! handler re-derives state from disk through the create path instead of
//! failing.
//!
//! The caller holds the navigator's write lock for the whole of [`Reconciler::apply`].

use crate::error::{require_path, Result};
use crate::loader::{InitialVisibility, TreeLoader};
use crate::navigator::NavigatorState;
use crate::tree::{FileInfo, FileNode, NodeKind};
use crate::types::{parent_of, ChangeEvent, NodeId};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Side effects that must run after the write lock is released.
#[derive(Debug, Default)]
pub(crate) struct ReconcileOutcome {
    /// Roots removed from the tree, in removal order.
    pub removed_roots: Vec<PathBuf>,
    /// Selected files whose content changed.
    pub reload: Vec<FileNode>,
}

pub(crate) struct Reconciler<'a> {
    state: &'a mut NavigatorState,
    loader: &'a TreeLoader,
    outcome: ReconcileOutcome,
}

impl<'a> Reconciler<'a> {
    pub(crate) fn new(state: &'a mut NavigatorState, loader: &'a TreeLoader) -> Self {
        Self {
            state,
            loader,
            outcome: ReconcileOutcome::default(),
        }
    }

    /// Apply one event, then refresh visibility.
    pub(crate) fn apply(mut self, event: &ChangeEvent) -> Result<ReconcileOutcome> {
        match event {
            ChangeEvent::Created(path) => {
                require_path(path, "created path")?;
                self.on_created(path)?;
            }
            ChangeEvent::Deleted(path) => {
                require_path(path, "deleted path")?;
                self.on_deleted(path);
            }
            ChangeEvent::Changed(path) => {
                require_path(path, "changed path")?;
                self.on_changed(path)?;
            }
            ChangeEvent::Renamed { from, to } => {
                require_path(from, "old path")?;
                require_path(to, "new path")?;
                self.on_renamed(from, to)?;
            }
        }
        self.refresh_visibility();
        Ok(self.outcome)
    }

    /// Remove a whole root, e.g. on release.
    pub(crate) fn release_root(mut self, root: NodeId, path: &Path) -> ReconcileOutcome {
        self.remove_root(root, path);
        self.refresh_visibility();
        self.outcome
    }

    fn refresh_visibility(&mut self) {
        let NavigatorState { tree, filter, .. } = &mut *self.state;
        filter.apply_visibility(tree);
    }

    fn on_created(&mut self, path: &Path) -> Result<()> {
        let Some(parent_path) = parent_of(path) else {
            return Ok(());
        };

        let parent = match self.state.cache.get_folder(parent_path) {
            Some(id) => id,
            None => {
                if !self.state.is_inside_armed(parent_path) {
                    debug!(path = %path.display(), "Created outside any watched root; ignored");
                    return Ok(());
                }
                // Several levels may have been created at once.
                debug!(path = %path.display(), "Parent not loaded yet; creating it first");
                self.on_created(parent_path)?;
                match self.state.cache.get_folder(parent_path) {
                    Some(id) => id,
                    None => {
                        debug!(path = %path.display(), "Parent still missing; giving up");
                        return Ok(());
                    }
                }
            }
        };

        if self.state.filter.is_file(path) {
            self.create_file(parent, path);
        } else if self.state.filter.is_directory(path) {
            self.create_folder(parent, path);
        } else {
            debug!(path = %path.display(), "Created path is gone or not a regular file or directory; ignored");
        }
        Ok(())
    }

    fn create_file(&mut self, parent: NodeId, path: &Path) {
        match self.child_kind(parent, path) {
            Some(NodeKind::File) => return,
            Some(NodeKind::Folder) => {
                self.remove_child(parent, path);
            }
            None => {}
        }
        if !self.state.filter.is_supported_file(path) {
            return;
        }

        let info = match FileInfo::read(path) {
            Ok(info) => info,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "File vanished before load");
                return;
            }
        };

        self.drop_unlinked(path);
        let NavigatorState { tree, cache, .. } = &mut *self.state;
        let id = self.loader.attach_file(tree, cache, info);
        tree.insert_file_sorted(parent, id);
        debug!(path = %path.display(), id = %id, "File added");
    }

    fn create_folder(&mut self, parent: NodeId, path: &Path) {
        match self.child_kind(parent, path) {
            Some(NodeKind::Folder) => return,
            Some(NodeKind::File) => {
                self.remove_child(parent, path);
            }
            None => {}
        }

        let scanned = match self.loader.scan_folder(path, &self.state.filter) {
            Ok(scanned) => scanned,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Folder vanished before load");
                return;
            }
        };

        self.drop_unlinked(path);
        let NavigatorState {
            tree,
            cache,
            filter,
            ..
        } = &mut *self.state;
        let id = self
            .loader
            .attach_folder(tree, cache, scanned, InitialVisibility::Hidden, filter);
        tree.push_directory(parent, id);
        debug!(path = %path.display(), id = %id, "Folder added");
    }

    fn on_deleted(&mut self, path: &Path) {
        match parent_of(path).and_then(|p| self.state.cache.get_folder(p)) {
            Some(parent) => {
                if !self.remove_child(parent, path) {
                    self.drop_unlinked(path);
                }
            }
            None => match self.state.tree.root_by_path(path) {
                Some(root) => self.remove_root(root, path),
                None => self.drop_unlinked(path),
            },
        }
    }

    fn on_changed(&mut self, path: &Path) -> Result<()> {
        if let Some(id) = self.state.cache.get_file(path) {
            if let Ok(info) = FileInfo::read(path) {
                if let Some(file) = self.state.tree.file_mut(id) {
                    file.replace_info(info);
                }
            }
            // Unselected files are not reparsed until they get selected.
            if let Some(file) = self.state.tree.file(id).filter(|f| f.header.is_selected) {
                self.outcome.reload.push(file.clone());
            }
            return Ok(());
        }
        if self.state.cache.contains(path) {
            return Ok(());
        }
        self.on_created(path)
    }

    fn on_renamed(&mut self, from: &Path, to: &Path) -> Result<()> {
        if self.state.filter.is_file(to) {
            self.rename_file(from, to)
        } else if self.state.filter.is_directory(to) {
            self.rename_folder(from, to)
        } else {
            debug!(to = %to.display(), "Rename target vanished; dropping old path");
            self.on_deleted(from);
            Ok(())
        }
    }

    /// Directory renames never keep identity: the old subtree is dropped and
    /// the new path loaded fresh.
    fn rename_folder(&mut self, from: &Path, to: &Path) -> Result<()> {
        if self.state.cache.get_folder(to).is_some() {
            return Ok(());
        }
        if self.state.cache.contains(to) {
            self.on_deleted(to);
        }

        let Some(old) = self.state.cache.get_folder(from) else {
            return self.on_created(to);
        };

        if let Some(root) = self.state.tree.root_by_path(from) {
            debug_assert_eq!(root, old);
            self.remove_root(root, from);
            return Ok(());
        }

        if let Some(old_parent) = parent_of(from).and_then(|p| self.state.cache.get_folder(p)) {
            self.state.tree.detach_child(old_parent, old);
        }
        self.drop_subtree(old);

        if !self.state.filter.is_directory(to) {
            return Ok(());
        }
        let Some(new_parent) = parent_of(to).and_then(|p| self.state.cache.get_folder(p)) else {
            return self.on_created(to);
        };
        let scanned = match self.loader.scan_folder(to, &self.state.filter) {
            Ok(scanned) => scanned,
            Err(e) => {
                debug!(path = %to.display(), error = %e, "Renamed folder vanished before load");
                return Ok(());
            }
        };
        let NavigatorState {
            tree,
            cache,
            filter,
            ..
        } = &mut *self.state;
        let id = self
            .loader
            .attach_folder(tree, cache, scanned, InitialVisibility::Computed, filter);
        tree.push_directory(new_parent, id);
        debug!(from = %from.display(), to = %to.display(), id = %id, "Folder reloaded after rename");
        Ok(())
    }

    /// File renames keep the node: same id, new metadata, new sort position.
    fn rename_file(&mut self, from: &Path, to: &Path) -> Result<()> {
        if self.state.cache.get_file(to).is_some() {
            return Ok(());
        }
        if self.state.cache.contains(to) {
            self.on_deleted(to);
        }

        let Some(new_parent) = parent_of(to).and_then(|p| self.state.cache.get_folder(p)) else {
            self.on_deleted(from);
            return self.on_created(to);
        };

        let old_parent = parent_of(from).and_then(|p| self.state.cache.get_folder(p));
        let found = old_parent.and_then(|parent| {
            self.state
                .tree
                .child_by_path(parent, from)
                .filter(|id| self.state.tree.file(*id).is_some())
                .map(|id| (parent, id))
        });
        let Some((old_parent, node)) = found else {
            if !from.exists() {
                self.on_deleted(from);
            }
            return self.on_created(to);
        };

        if !self.state.filter.is_supported_file(to) {
            debug!(from = %from.display(), to = %to.display(), "Renamed out of the filter");
            self.remove_child(old_parent, from);
            return Ok(());
        }

        let info = match FileInfo::read(to) {
            Ok(info) => info,
            Err(e) => {
                debug!(path = %to.display(), error = %e, "Renamed file vanished");
                self.remove_child(old_parent, from);
                return Ok(());
            }
        };

        let NavigatorState { tree, cache, .. } = &mut *self.state;
        tree.detach_child(old_parent, node);
        cache.remove(from);
        if let Some(file) = tree.file_mut(node) {
            file.replace_info(info);
        }
        tree.insert_file_sorted(new_parent, node);
        cache.insert(to.to_path_buf(), node, NodeKind::File);
        debug!(from = %from.display(), to = %to.display(), id = %node, "File renamed in place");
        Ok(())
    }

    fn child_kind(&self, parent: NodeId, path: &Path) -> Option<NodeKind> {
        let tree = &self.state.tree;
        tree.child_by_path(parent, path)
            .and_then(|id| tree.node(id))
            .map(|node| node.kind())
    }

    /// Unlink and drop the child of `parent` at `path`. False when absent.
    fn remove_child(&mut self, parent: NodeId, path: &Path) -> bool {
        let Some(child) = self.state.tree.child_by_path(parent, path) else {
            return false;
        };
        self.state.tree.detach_child(parent, child);
        self.drop_subtree(child);
        debug!(path = %path.display(), "Removed");
        true
    }

    fn remove_root(&mut self, root: NodeId, path: &Path) {
        self.state.tree.remove_root_entry(root);
        self.drop_subtree(root);
        self.outcome.removed_roots.push(path.to_path_buf());
        debug!(path = %path.display(), "Root removed");
    }

    /// Drop a detached subtree from arena and cache together.
    fn drop_subtree(&mut self, id: NodeId) {
        let NavigatorState { tree, cache, .. } = &mut *self.state;
        for path in tree.remove_subtree(id) {
            // A newer node may already own the path.
            if !tree_contains(tree, cache, &path) {
                cache.remove(&path);
            }
        }
    }

    /// Clear a cache entry at `path` that is not linked into the tree.
    fn drop_unlinked(&mut self, path: &Path) {
        if let Some(stale) = self.state.cache.get(path) {
            debug!(path = %path.display(), id = %stale, "Dropping unlinked cache entry");
            self.state.cache.remove(path);
            self.drop_subtree(stale);
        }
    }
}

/// Whether the cache entry at `path` still points at a live node.
fn tree_contains(
    tree: &crate::tree::NavigationTree,
    cache: &crate::cache::NodeCache,
    path: &Path,
) -> bool {
    cache.get(path).and_then(|id| tree.node(id)).is_some()
}
