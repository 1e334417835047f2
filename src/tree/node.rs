//! Navigation node types

use crate::error::{NavError, Result};
use crate::types::{display_name, NodeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Node kind, used for typed cache lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Folder,
    File,
}

/// Fields shared by folders and files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeHeader {
    pub id: NodeId,
    /// Absolute path; the cache key.
    pub full_name: PathBuf,
    pub name: String,
    pub is_visible: bool,
    pub is_selected: bool,
}

impl NodeHeader {
    pub(crate) fn new(id: NodeId, full_name: PathBuf) -> Self {
        let name = display_name(&full_name);
        Self {
            id,
            full_name,
            name,
            is_visible: false,
            is_selected: false,
        }
    }
}

fn to_utc(time: std::io::Result<SystemTime>) -> Option<DateTime<Utc>> {
    time.ok().map(DateTime::<Utc>::from)
}

/// Filesystem metadata snapshot of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
}

impl FileInfo {
    pub fn read(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| NavError::io(path, e))?;
        Ok(Self::from_metadata(path, &metadata))
    }

    pub fn from_metadata(path: &Path, metadata: &fs::Metadata) -> Self {
        Self {
            path: path.to_path_buf(),
            size: metadata.len(),
            modified: to_utc(metadata.modified()),
            created: to_utc(metadata.created()),
        }
    }

    pub fn name(&self) -> String {
        display_name(&self.path)
    }
}

/// Filesystem metadata snapshot of a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderInfo {
    pub path: PathBuf,
    pub modified: Option<DateTime<Utc>>,
}

impl FolderInfo {
    pub fn read(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| NavError::io(path, e))?;
        if !metadata.is_dir() {
            return Err(NavError::NotADirectory(path.to_path_buf()));
        }
        Ok(Self {
            path: path.to_path_buf(),
            modified: to_utc(metadata.modified()),
        })
    }
}

/// Directory node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderNode {
    pub header: NodeHeader,
    pub info: FolderInfo,
    /// Files in descending comparator order.
    pub files: Vec<NodeId>,
    /// Subdirectories in discovery order.
    pub directories: Vec<NodeId>,
}

impl FolderNode {
    /// Files first, then directories.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.files.iter().chain(self.directories.iter()).copied()
    }
}

/// File node. Content is owned by the content loader; the tree only tracks
/// identity and metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub header: NodeHeader,
    pub info: FileInfo,
}

impl FileNode {
    /// Swap in a new metadata snapshot, moving the node to `info.path`.
    pub(crate) fn replace_info(&mut self, info: FileInfo) {
        self.header.full_name = info.path.clone();
        self.header.name = info.name();
        self.info = info;
    }
}

/// Navigation node type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationNode {
    Folder(FolderNode),
    File(FileNode),
}

impl NavigationNode {
    pub fn header(&self) -> &NodeHeader {
        match self {
            NavigationNode::Folder(f) => &f.header,
            NavigationNode::File(f) => &f.header,
        }
    }

    pub fn header_mut(&mut self) -> &mut NodeHeader {
        match self {
            NavigationNode::Folder(f) => &mut f.header,
            NavigationNode::File(f) => &mut f.header,
        }
    }

    pub fn id(&self) -> NodeId {
        self.header().id
    }

    pub fn full_name(&self) -> &Path {
        &self.header().full_name
    }

    pub fn name(&self) -> &str {
        &self.header().name
    }

    pub fn is_visible(&self) -> bool {
        self.header().is_visible
    }

    pub fn is_selected(&self) -> bool {
        self.header().is_selected
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NavigationNode::Folder(_) => NodeKind::Folder,
            NavigationNode::File(_) => NodeKind::File,
        }
    }

    pub fn as_folder(&self) -> Option<&FolderNode> {
        match self {
            NavigationNode::Folder(f) => Some(f),
            NavigationNode::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            NavigationNode::File(f) => Some(f),
            NavigationNode::Folder(_) => None,
        }
    }
}
