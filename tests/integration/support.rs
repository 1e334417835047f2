//! Shared fixtures: real directory trees in temp dirs and a change source
//! that records what the navigator asks of it.

use lognav::config::NavigatorConfig;
use lognav::error::Result;
use lognav::watch::{ChangeSource, RootCollection};
use lognav::{ChangeEvent, Navigator, NodeId};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Change source that never emits anything; tests feed events by hand.
#[derive(Default)]
pub struct RecordingChangeSource {
    pub armed: Mutex<Vec<PathBuf>>,
    pub disarmed: Mutex<Vec<PathBuf>>,
    pub patterns: Mutex<Vec<String>>,
}

impl RecordingChangeSource {
    pub fn is_armed(&self, path: &Path) -> bool {
        self.armed.lock().iter().any(|p| p == path)
    }
}

impl ChangeSource for RecordingChangeSource {
    fn arm_root(&self, path: &Path, _pattern: &str) -> Result<()> {
        self.armed.lock().push(path.to_path_buf());
        Ok(())
    }

    fn disarm_root(&self, path: &Path) -> Result<()> {
        self.armed.lock().retain(|p| p != path);
        self.disarmed.lock().push(path.to_path_buf());
        Ok(())
    }

    fn set_filter_pattern(&self, pattern: &str) {
        self.patterns.lock().push(pattern.to_string());
    }
}

/// Root collection owner that records removals.
#[derive(Default)]
pub struct RecordingRoots {
    pub removed: Mutex<Vec<PathBuf>>,
}

impl RootCollection for RecordingRoots {
    fn remove_root(&self, path: &Path) {
        self.removed.lock().push(path.to_path_buf());
    }
}

pub struct Fixture {
    _temp: TempDir,
    pub base: PathBuf,
    pub source: Arc<RecordingChangeSource>,
    pub roots: Arc<RecordingRoots>,
    pub nav: Navigator,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(NavigatorConfig::default())
    }

    pub fn with_pattern(pattern: &str) -> Self {
        let mut config = NavigatorConfig::default();
        config.filter.pattern = pattern.to_string();
        Self::with_config(config)
    }

    /// Self-heal is off so that consistency checks see the reconciler's
    /// own result.
    pub fn with_config(config: NavigatorConfig) -> Self {
        let temp = TempDir::new().unwrap();
        let base = dunce::canonicalize(temp.path()).unwrap();
        let source = Arc::new(RecordingChangeSource::default());
        let roots = Arc::new(RecordingRoots::default());
        let nav = Navigator::new(&config, source.clone())
            .unwrap()
            .with_root_collection(roots.clone())
            .with_self_heal(false);
        Self {
            _temp: temp,
            base,
            source,
            roots,
            nav,
        }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.base.join(rel)
    }

    /// Create directory `rel` under the base, with parents.
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Write file `rel` under the base, creating parents.
    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn apply(&self, event: ChangeEvent) {
        self.nav.handle_change(&event).unwrap();
    }

    pub fn id_of(&self, rel: &str) -> Option<NodeId> {
        self.nav.get(&self.path(rel)).map(|n| n.id())
    }

    /// File names of the folder at `rel`, in tree order.
    pub fn file_names(&self, rel: &str) -> Vec<String> {
        let folder = self.nav.get_folder(&self.path(rel)).unwrap();
        folder
            .files
            .iter()
            .map(|id| {
                self.nav
                    .with_tree(|tree, _| tree.node(*id).unwrap().name().to_string())
            })
            .collect()
    }

    /// Directory names of the folder at `rel`, in tree order.
    pub fn directory_names(&self, rel: &str) -> Vec<String> {
        let folder = self.nav.get_folder(&self.path(rel)).unwrap();
        folder
            .directories
            .iter()
            .map(|id| {
                self.nav
                    .with_tree(|tree, _| tree.node(*id).unwrap().name().to_string())
            })
            .collect()
    }
}

/// Cache keys equal the paths reachable from the roots, each pointing at the
/// node found there, and the arena holds nothing else.
pub fn assert_cache_matches_tree(nav: &Navigator) {
    nav.with_tree(|tree, cache| {
        let reachable = tree.reachable();
        let tree_paths: BTreeSet<PathBuf> = reachable.iter().map(|(p, _)| p.clone()).collect();
        let cache_paths: BTreeSet<PathBuf> = cache.paths().map(Path::to_path_buf).collect();
        assert_eq!(tree_paths, cache_paths);
        for (path, id) in &reachable {
            assert_eq!(cache.get(path), Some(*id), "cache entry for {:?}", path);
        }
        assert_eq!(tree.len(), reachable.len(), "unreachable nodes left in the arena");
    });
    assert!(nav.audit().is_consistent());
}
