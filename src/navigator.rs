//! Navigator
//!
//! Facade over the navigation tree. The tree, the cache, the filter and the
//! list of armed roots live together behind one `RwLock`; every load, release
//! and reconciliation step takes the write lock for its whole duration, so an
//! outside reader never sees a node in the tree without its cache entry or
//! the other way round. Readers share the lock.
//!
//! Collaborator hooks run only after the write lock is dropped.

use crate::cache::NodeCache;
use crate::config::NavigatorConfig;
use crate::error::{require_path, NavError, Result};
use crate::filter::FilterEngine;
use crate::loader::{InitialVisibility, TreeLoader};
use crate::reconcile::{ReconcileOutcome, Reconciler};
use crate::tree::{FileNode, FolderNode, NavigationNode, NavigationTree};
use crate::types::{ChangeEvent, ChangeKind, NodeId};
use crate::views::TreeSnapshot;
use crate::watch::{ChangeSource, ContentLoader, NoopHooks, RootCollection};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Everything that must change atomically.
#[derive(Debug)]
pub(crate) struct NavigatorState {
    pub tree: NavigationTree,
    pub cache: NodeCache,
    pub filter: FilterEngine,
    /// Roots the change source is watching, in arm order
    pub armed: Vec<PathBuf>,
}

impl NavigatorState {
    /// Whether `path` is an armed root or lies below one.
    pub fn is_inside_armed(&self, path: &Path) -> bool {
        self.armed.iter().any(|root| path.starts_with(root))
    }

    fn disarm(&mut self, source: &dyn ChangeSource, root: &Path) {
        if let Err(e) = source.disarm_root(root) {
            warn!(root = %root.display(), error = %e, "Failed to stop watching root");
        }
        self.armed.retain(|r| r != root);
    }
}

/// Result of comparing the cache against the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    /// Reachable from a root but absent from the cache
    pub missing_from_cache: Vec<PathBuf>,
    /// Cached but not reachable from any root
    pub stale_in_cache: Vec<PathBuf>,
    /// Cached under the right path but pointing at another node
    pub misregistered: Vec<PathBuf>,
    /// Nodes in the arena that no root reaches
    pub orphans: Vec<NodeId>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.missing_from_cache.is_empty()
            && self.stale_in_cache.is_empty()
            && self.misregistered.is_empty()
            && self.orphans.is_empty()
    }

    fn compute(tree: &NavigationTree, cache: &NodeCache) -> Self {
        let mut report = Self::default();
        let reachable = tree.reachable();
        let reachable_ids: HashSet<NodeId> = reachable.iter().map(|(_, id)| *id).collect();
        let reachable_paths: HashMap<&Path, NodeId> =
            reachable.iter().map(|(p, id)| (p.as_path(), *id)).collect();

        for (path, id) in &reachable {
            match cache.get(path) {
                None => report.missing_from_cache.push(path.clone()),
                Some(cached) if cached != *id => report.misregistered.push(path.clone()),
                Some(_) => {}
            }
        }
        for path in cache.paths() {
            if !reachable_paths.contains_key(path) {
                report.stale_in_cache.push(path.to_path_buf());
            }
        }
        report.orphans = tree.ids().filter(|id| !reachable_ids.contains(id)).collect();

        report.missing_from_cache.sort();
        report.stale_in_cache.sort();
        report.misregistered.sort();
        report.orphans.sort();
        report
    }
}

/// Log navigator over one or more navigation roots.
pub struct Navigator {
    state: RwLock<NavigatorState>,
    loader: TreeLoader,
    source: Arc<dyn ChangeSource>,
    content: Arc<dyn ContentLoader>,
    root_owner: Arc<dyn RootCollection>,
    audit: bool,
}

impl Navigator {
    /// Create an empty navigator. The change source receives the configured
    /// filter pattern straight away.
    pub fn new(config: &NavigatorConfig, source: Arc<dyn ChangeSource>) -> Result<Self> {
        let filter = FilterEngine::new(&config.filter.pattern, config.filter.case_sensitive)?;
        source.set_filter_pattern(filter.pattern());

        Ok(Self {
            state: RwLock::new(NavigatorState {
                tree: NavigationTree::new(),
                cache: NodeCache::new(),
                filter,
                armed: Vec::new(),
            }),
            loader: TreeLoader::new(&config.loader),
            source,
            content: Arc::new(NoopHooks),
            root_owner: Arc::new(NoopHooks),
            audit: config.watch.audit || cfg!(debug_assertions),
        })
    }

    pub fn with_content_loader(mut self, content: Arc<dyn ContentLoader>) -> Self {
        self.content = content;
        self
    }

    pub fn with_root_collection(mut self, root_owner: Arc<dyn RootCollection>) -> Self {
        self.root_owner = root_owner;
        self
    }

    /// Enable or disable the audit and repair pass after each mutation.
    pub fn with_self_heal(mut self, enabled: bool) -> Self {
        self.audit = enabled;
        self
    }

    // Filter

    pub fn filter(&self) -> String {
        self.state.read().filter.pattern().to_string()
    }

    /// Replace the filter pattern, pass it on to the change source and
    /// recompute visibility. Tree membership is left alone.
    pub fn set_filter(&self, pattern: &str) -> Result<()> {
        let mut state = self.state.write();
        state.filter.set_filter(pattern)?;
        self.source.set_filter_pattern(state.filter.pattern());

        let NavigatorState { tree, filter, .. } = &mut *state;
        filter.apply_visibility(tree);
        info!(pattern = filter.pattern(), "Filter updated");
        Ok(())
    }

    // Loading

    /// Load `path` recursively and add it as a root.
    ///
    /// A navigation root is armed on the change source once its nodes are all
    /// in the tree and cache; a plain root is loaded but never watched.
    /// Loading a path that is already a root returns its existing id.
    pub fn load_file_system_content(&self, path: &Path, is_navigation_root: bool) -> Result<NodeId> {
        require_path(path, "path")?;
        let path = dunce::canonicalize(path).map_err(|e| NavError::io(path, e))?;

        let filter = {
            let state = self.state.read();
            if let Some(existing) = Self::existing_root(&state, &path)? {
                return Ok(existing);
            }
            state.filter.clone()
        };

        // Scan without holding the lock.
        let mut scanned = self.loader.scan_folder(&path, &filter)?;

        let mut state = self.state.write();
        if let Some(existing) = Self::existing_root(&state, &path)? {
            return Ok(existing);
        }
        if state.filter.pattern() != filter.pattern() {
            debug!(path = %path.display(), "Filter changed during scan; rescanning");
            scanned = self.loader.scan_folder(&path, &state.filter)?;
        }

        let node_count = scanned.node_count();
        let visibility = if is_navigation_root {
            InitialVisibility::Deferred
        } else {
            InitialVisibility::Computed
        };
        let NavigatorState {
            tree,
            cache,
            filter,
            armed,
        } = &mut *state;
        let id = self.loader.attach_folder(tree, cache, scanned, visibility, filter);
        tree.push_root(id);

        if is_navigation_root {
            if let Err(e) = self.source.arm_root(&path, filter.pattern()) {
                tree.remove_root_entry(id);
                for removed in tree.remove_subtree(id) {
                    cache.remove(&removed);
                }
                return Err(e);
            }
            armed.push(path.clone());
        }
        filter.apply_visibility(tree);

        info!(
            root = %path.display(),
            id = %id,
            nodes = node_count,
            watched = is_navigation_root,
            "Loaded root"
        );
        Ok(id)
    }

    /// Load and arm a navigation root.
    pub fn load_root(&self, path: &Path) -> Result<NodeId> {
        self.load_file_system_content(path, true)
    }

    fn existing_root(state: &NavigatorState, path: &Path) -> Result<Option<NodeId>> {
        if let Some(id) = state.tree.root_by_path(path) {
            return Ok(Some(id));
        }
        if state.cache.contains(path) {
            return Err(NavError::InvalidArgument(format!(
                "{} is already loaded inside another root",
                path.display()
            )));
        }
        let contains_root = state
            .tree
            .roots()
            .iter()
            .filter_map(|id| state.tree.node(*id))
            .any(|root| root.full_name().starts_with(path));
        if contains_root {
            return Err(NavError::InvalidArgument(format!(
                "{} contains an already loaded root",
                path.display()
            )));
        }
        Ok(None)
    }

    /// Stop watching a root and drop its subtree from tree and cache.
    /// Returns false when `path` is not a loaded root.
    pub fn release_file_system_content(&self, path: &Path) -> Result<bool> {
        require_path(path, "path")?;
        let path = dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

        let outcome = {
            let mut state = self.state.write();
            let Some(root) = state.tree.root_by_path(&path) else {
                debug!(root = %path.display(), "Release for unknown root ignored");
                return Ok(false);
            };
            if state.armed.contains(&path) {
                state.disarm(self.source.as_ref(), &path);
            }
            let outcome = Reconciler::new(&mut state, &self.loader).release_root(root, &path);
            let leftover = state.cache.remove_under(&path);
            if leftover > 0 {
                error!(root = %path.display(), leftover, "Cache entries survived release; dropped");
            }
            self.check_consistency(&mut state);
            outcome
        };

        info!(root = %path.display(), "Released root");
        self.run_hooks(outcome);
        Ok(true)
    }

    // Change events

    /// Apply one change event. Events for paths outside every armed root are
    /// dropped.
    pub fn handle_change(&self, event: &ChangeEvent) -> Result<()> {
        let outcome = {
            let mut state = self.state.write();
            let relevant = match event {
                ChangeEvent::Renamed { from, to } => {
                    state.is_inside_armed(from) || state.is_inside_armed(to)
                }
                other => state.is_inside_armed(other.path()),
            };
            if !relevant {
                require_path(event.path(), "path")?;
                debug!(?event, "Event outside watched roots ignored");
                return Ok(());
            }

            let outcome = Reconciler::new(&mut state, &self.loader).apply(event)?;
            for root in &outcome.removed_roots {
                state.disarm(self.source.as_ref(), root);
            }
            self.check_consistency(&mut state);
            outcome
        };

        self.run_hooks(outcome);
        Ok(())
    }

    /// Apply a change given as `(kind, new path, old path)`, the shape raw
    /// watchers report. A rename without its old path is an invalid argument.
    pub fn handle_change_parts(
        &self,
        kind: ChangeKind,
        new_path: &Path,
        old_path: Option<&Path>,
    ) -> Result<()> {
        let event = ChangeEvent::from_parts(kind, new_path.to_path_buf(), old_path.map(Path::to_path_buf))
            .ok_or_else(|| NavError::InvalidArgument("old path must not be empty".to_string()))?;
        self.handle_change(&event)
    }

    fn run_hooks(&self, outcome: ReconcileOutcome) {
        for root in &outcome.removed_roots {
            self.root_owner.remove_root(root);
        }
        for file in &outcome.reload {
            debug!(path = %file.info.path.display(), "Reloading selected file");
            self.content.load_batch_for_selected_node(file);
        }
    }

    // Consistency

    /// Compare cache against tree without changing either.
    pub fn audit(&self) -> ConsistencyReport {
        let state = self.state.read();
        ConsistencyReport::compute(&state.tree, &state.cache)
    }

    fn check_consistency(&self, state: &mut NavigatorState) {
        if !self.audit {
            return;
        }
        let report = ConsistencyReport::compute(&state.tree, &state.cache);
        if !report.is_consistent() {
            heal(state, &report);
        }
    }

    // Readers

    pub fn get(&self, path: &Path) -> Option<NavigationNode> {
        let state = self.state.read();
        state.cache.get(path).and_then(|id| state.tree.node(id)).cloned()
    }

    pub fn get_folder(&self, path: &Path) -> Option<FolderNode> {
        let state = self.state.read();
        state
            .cache
            .get_folder(path)
            .and_then(|id| state.tree.folder(id))
            .cloned()
    }

    pub fn get_file(&self, path: &Path) -> Option<FileNode> {
        let state = self.state.read();
        state
            .cache
            .get_file(path)
            .and_then(|id| state.tree.file(id))
            .cloned()
    }

    pub fn roots(&self) -> Vec<PathBuf> {
        let state = self.state.read();
        state
            .tree
            .roots()
            .iter()
            .filter_map(|id| state.tree.node(*id))
            .map(|node| node.full_name().to_path_buf())
            .collect()
    }

    pub fn armed_roots(&self) -> Vec<PathBuf> {
        self.state.read().armed.clone()
    }

    pub fn is_armed(&self, path: &Path) -> bool {
        self.state.read().armed.iter().any(|r| r == path)
    }

    /// Every cached path, sorted.
    pub fn cached_paths(&self) -> Vec<PathBuf> {
        let state = self.state.read();
        let mut paths: Vec<PathBuf> = state.cache.paths().map(Path::to_path_buf).collect();
        paths.sort();
        paths
    }

    /// Borrow tree and cache under the read lock.
    pub fn with_tree<R>(&self, read: impl FnOnce(&NavigationTree, &NodeCache) -> R) -> R {
        let state = self.state.read();
        read(&state.tree, &state.cache)
    }

    pub fn snapshot(&self) -> TreeSnapshot {
        let state = self.state.read();
        TreeSnapshot::capture(&state.tree, state.filter.pattern())
    }

    /// Mark a node selected or unselected. Selecting a file asks the content
    /// loader to parse it. Returns false for unknown paths.
    pub fn set_selected(&self, path: &Path, selected: bool) -> bool {
        let newly_selected_file = {
            let mut state = self.state.write();
            let Some(id) = state.cache.get(path) else {
                return false;
            };
            let Some(node) = state.tree.node_mut(id) else {
                return false;
            };
            let was_selected = node.is_selected();
            node.header_mut().is_selected = selected;
            match node {
                NavigationNode::File(file) if selected && !was_selected => Some(file.clone()),
                _ => None,
            }
        };

        if let Some(file) = newly_selected_file {
            self.content.load_batch_for_selected_node(&file);
        }
        true
    }
}

/// Bring the cache back in line with the tree. Every repair is an invariant
/// breach and is logged as such.
fn heal(state: &mut NavigatorState, report: &ConsistencyReport) {
    let NavigatorState { tree, cache, .. } = state;

    for orphan in &report.orphans {
        if tree.node(*orphan).is_some() {
            error!(id = %orphan, "Orphaned node in tree; dropping");
            tree.remove_subtree(*orphan);
        }
    }
    for path in &report.stale_in_cache {
        error!(path = %path.display(), "Cache entry not reachable from any root; dropping");
        cache.remove(path);
    }
    for (path, id) in tree.reachable() {
        if cache.get(&path) == Some(id) {
            continue;
        }
        error!(path = %path.display(), id = %id, "Tree node missing from cache; re-registering");
        if let Some(node) = tree.node(id) {
            cache.insert(path, id, node.kind());
        }
    }
}
