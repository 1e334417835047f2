//! Change sources: the trait the navigator arms, and its `notify` implementation.

use super::events::convert_event;
use crate::error::{NavError, Result};
use crate::filter::WildcardMatcher;
use crate::types::ChangeEvent;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Emits change notifications for armed navigation roots.
pub trait ChangeSource: Send + Sync {
    /// Begin watching `path` recursively, pre-filtering with `pattern`.
    fn arm_root(&self, path: &Path, pattern: &str) -> Result<()>;

    /// Stop watching `path`. Unknown paths are ignored.
    fn disarm_root(&self, path: &Path) -> Result<()>;

    /// Replace the pre-filter pattern for every armed root.
    fn set_filter_pattern(&self, pattern: &str);
}

/// Change source backed by one `notify` watcher per armed root.
pub struct NotifyChangeSource {
    sender: Sender<ChangeEvent>,
    gate: Arc<RwLock<WildcardMatcher>>,
    case_sensitive: bool,
    watchers: Mutex<HashMap<PathBuf, RecommendedWatcher>>,
}

impl NotifyChangeSource {
    pub fn new(sender: Sender<ChangeEvent>, case_sensitive: bool) -> Self {
        Self {
            sender,
            gate: Arc::new(RwLock::new(WildcardMatcher::empty())),
            case_sensitive,
            watchers: Mutex::new(HashMap::new()),
        }
    }

    pub fn armed_roots(&self) -> Vec<PathBuf> {
        self.watchers.lock().keys().cloned().collect()
    }
}

/// Pre-filter: file events must match the pattern, directory events always
/// pass, deletes always pass since the path can no longer be classified.
fn passes(gate: &WildcardMatcher, event: &ChangeEvent) -> bool {
    match event {
        ChangeEvent::Created(path) => gate.matches_path(path) || path.is_dir(),
        ChangeEvent::Changed(path) => gate.matches_path(path),
        ChangeEvent::Deleted(_) => true,
        ChangeEvent::Renamed { from, to } => {
            gate.matches_path(from) || gate.matches_path(to) || to.is_dir()
        }
    }
}

impl ChangeSource for NotifyChangeSource {
    fn arm_root(&self, path: &Path, pattern: &str) -> Result<()> {
        if self.gate.read().pattern() != pattern.trim() {
            self.set_filter_pattern(pattern);
        }

        let tx = self.sender.clone();
        let gate = Arc::clone(&self.gate);
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) => {
                    let gate = gate.read();
                    for change in convert_event(&event) {
                        if !passes(&gate, &change) {
                            continue;
                        }
                        if let Err(e) = tx.send(change) {
                            error!("Error sending change event: {}", e);
                        }
                    }
                }
                Err(e) => warn!("Watch error: {}", e),
            }
        })?;

        watcher
            .watch(path, RecursiveMode::Recursive)
            .map_err(|e| NavError::Watch(format!("Failed to watch {}: {}", path.display(), e)))?;

        info!(root = %path.display(), pattern, "Watching navigation root");
        self.watchers.lock().insert(path.to_path_buf(), watcher);
        Ok(())
    }

    fn disarm_root(&self, path: &Path) -> Result<()> {
        if self.watchers.lock().remove(path).is_some() {
            info!(root = %path.display(), "Stopped watching navigation root");
        } else {
            debug!(root = %path.display(), "Disarm for unwatched root ignored");
        }
        Ok(())
    }

    fn set_filter_pattern(&self, pattern: &str) {
        match WildcardMatcher::compile(pattern, self.case_sensitive) {
            Ok(matcher) => *self.gate.write() = matcher,
            Err(e) => warn!(pattern, error = %e, "Keeping previous watch filter"),
        }
    }
}
