//! Core types for the log navigation tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// NodeID: identity of a node inside one navigation tree.
///
/// Allocated monotonically and never reused, so a surviving id after a rename
/// means the node object itself survived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of a raw filesystem change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    Created,
    Deleted,
    Changed,
    Renamed,
}

/// Filesystem change event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeEvent {
    Created(PathBuf),
    Deleted(PathBuf),
    Changed(PathBuf),
    Renamed { from: PathBuf, to: PathBuf },
}

impl ChangeEvent {
    /// Build an event from the `(kind, newPath, oldPath?)` triple a change
    /// source delivers. Returns `None` for a rename without its old path.
    pub fn from_parts(kind: ChangeKind, new_path: PathBuf, old_path: Option<PathBuf>) -> Option<Self> {
        match kind {
            ChangeKind::Created => Some(ChangeEvent::Created(new_path)),
            ChangeKind::Deleted => Some(ChangeEvent::Deleted(new_path)),
            ChangeKind::Changed => Some(ChangeEvent::Changed(new_path)),
            ChangeKind::Renamed => old_path.map(|from| ChangeEvent::Renamed { from, to: new_path }),
        }
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            ChangeEvent::Created(_) => ChangeKind::Created,
            ChangeEvent::Deleted(_) => ChangeKind::Deleted,
            ChangeEvent::Changed(_) => ChangeKind::Changed,
            ChangeEvent::Renamed { .. } => ChangeKind::Renamed,
        }
    }

    /// The path the event leaves behind: the target of a rename, otherwise the
    /// only path carried.
    pub fn path(&self) -> &Path {
        match self {
            ChangeEvent::Created(p) | ChangeEvent::Deleted(p) | ChangeEvent::Changed(p) => p,
            ChangeEvent::Renamed { to, .. } => to,
        }
    }
}

/// Parent directory of `path`, if any.
pub fn parent_of(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

/// Display name derived from the last path component.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
