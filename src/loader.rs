//! Tree Loader
//!
//! Builds navigation subtrees from disk in two steps:
//!
//! 1. [`TreeLoader::scan_folder`] reads the directory into a plain
//!    [`ScannedFolder`] value. It touches neither tree nor cache, so it can
//!    run on the rayon pool without holding any lock.
//! 2. [`TreeLoader::attach_folder`] allocates node ids, inserts the nodes into
//!    the arena and registers every one of them in the cache. Callers run it
//!    under the navigator's write lock so tree and cache change together.
//!
//! Parallel scanning never changes ordering: files are sorted by name, read,
//! and then inserted one by one with descending insertion; subdirectories keep
//! their enumeration order.

use crate::cache::NodeCache;
use crate::config::LoaderConfig;
use crate::error::{NavError, Result};
use crate::filter::FilterEngine;
use crate::tree::order::insert_descending;
use crate::tree::{
    FileInfo, FileNode, FolderInfo, FolderNode, NavigationNode, NavigationTree, NodeHeader,
    NodeKind,
};
use crate::types::NodeId;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A directory read from disk, not yet attached to any tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFolder {
    pub info: FolderInfo,
    /// Matching files in descending comparator order.
    pub files: Vec<FileInfo>,
    /// Subdirectories in enumeration order.
    pub directories: Vec<ScannedFolder>,
}

impl ScannedFolder {
    /// Number of nodes this scan will produce once attached.
    pub fn node_count(&self) -> usize {
        1 + self.files.len() + self.directories.iter().map(ScannedFolder::node_count).sum::<usize>()
    }
}

/// How the visibility of a freshly attached folder is initialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialVisibility {
    /// Leave as is; the next visibility pass decides (navigation roots).
    Deferred,
    /// Bottom-up from filter matches and child visibility.
    Computed,
    /// Hidden until the next visibility pass (folders created by events).
    Hidden,
}

#[derive(Debug, Clone)]
pub struct TreeLoader {
    parallel: bool,
}

impl Default for TreeLoader {
    fn default() -> Self {
        Self::new(&LoaderConfig::default())
    }
}

impl TreeLoader {
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            parallel: config.parallel,
        }
    }

    /// Scan `path` recursively. Fails only when `path` itself is not a
    /// readable directory; unreadable subdirectories come back empty.
    pub fn scan_folder(&self, path: &Path, filter: &FilterEngine) -> Result<ScannedFolder> {
        let info = FolderInfo::read(path)?;
        let entries = list_entries(path).map_err(|e| {
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walk failed"));
            NavError::io(path, source)
        })?;
        Ok(self.scan_entries(info, entries, filter))
    }

    fn scan_partial(&self, path: &Path, filter: &FilterEngine) -> ScannedFolder {
        let info = match FolderInfo::read(path) {
            Ok(info) => info,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read directory metadata");
                FolderInfo {
                    path: path.to_path_buf(),
                    modified: None,
                }
            }
        };
        match list_entries(path) {
            Ok(entries) => self.scan_entries(info, entries, filter),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable directory");
                ScannedFolder {
                    info,
                    files: Vec::new(),
                    directories: Vec::new(),
                }
            }
        }
    }

    fn scan_entries(&self, info: FolderInfo, entries: DirEntries, filter: &FilterEngine) -> ScannedFolder {
        let mut file_paths: Vec<PathBuf> = entries
            .files
            .into_iter()
            .filter(|p| filter.is_supported_file(p))
            .collect();
        file_paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let read = |p: &PathBuf| match FileInfo::read(p) {
            Ok(file) => Some(file),
            Err(e) => {
                debug!(path = %p.display(), error = %e, "File vanished during scan");
                None
            }
        };
        let loaded: Vec<FileInfo> = if self.parallel {
            file_paths.par_iter().filter_map(read).collect()
        } else {
            file_paths.iter().filter_map(read).collect()
        };

        let mut files = Vec::with_capacity(loaded.len());
        for file in loaded {
            insert_descending(&mut files, file, |f: &FileInfo| file_name_str(&f.path));
        }

        let directories: Vec<ScannedFolder> = if self.parallel {
            entries
                .directories
                .par_iter()
                .map(|d| self.scan_partial(d, filter))
                .collect()
        } else {
            entries
                .directories
                .iter()
                .map(|d| self.scan_partial(d, filter))
                .collect()
        };

        ScannedFolder {
            info,
            files,
            directories,
        }
    }

    /// Attach a scanned folder to `tree` and register every node in `cache`.
    /// The folder is returned detached from any parent; the caller links it.
    pub fn attach_folder(
        &self,
        tree: &mut NavigationTree,
        cache: &mut NodeCache,
        scanned: ScannedFolder,
        visibility: InitialVisibility,
        filter: &FilterEngine,
    ) -> NodeId {
        let id = tree.allocate_id();
        let path = scanned.info.path.clone();
        tree.insert(NavigationNode::Folder(FolderNode {
            header: NodeHeader::new(id, path.clone()),
            info: scanned.info,
            files: Vec::new(),
            directories: Vec::new(),
        }));

        for file in scanned.files {
            let file_id = self.attach_file(tree, cache, file);
            // Already in descending order; appending keeps it.
            if let Some(folder) = tree.folder_mut(id) {
                folder.files.push(file_id);
            }
        }

        let child_visibility = match visibility {
            InitialVisibility::Hidden => InitialVisibility::Computed,
            other => other,
        };
        for sub in scanned.directories {
            let sub_id = self.attach_folder(tree, cache, sub, child_visibility, filter);
            tree.push_directory(id, sub_id);
        }

        match visibility {
            InitialVisibility::Computed => {
                filter.update_visibility(tree, id);
            }
            InitialVisibility::Hidden => {
                if let Some(node) = tree.node_mut(id) {
                    node.header_mut().is_visible = false;
                }
            }
            InitialVisibility::Deferred => {}
        }

        cache.insert(path, id, NodeKind::Folder);
        id
    }

    /// Attach a single file node and register it. Not linked to any folder.
    pub fn attach_file(&self, tree: &mut NavigationTree, cache: &mut NodeCache, info: FileInfo) -> NodeId {
        let id = tree.allocate_id();
        let path = info.path.clone();
        tree.insert(NavigationNode::File(FileNode {
            header: NodeHeader::new(id, path.clone()),
            info,
        }));
        cache.insert(path, id, NodeKind::File);
        id
    }
}

fn file_name_str(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

struct DirEntries {
    files: Vec<PathBuf>,
    directories: Vec<PathBuf>,
}

/// Immediate children of `path`, split into files and directories.
///
/// Symlinked files are listed under the link path, the same way
/// [`FilterEngine::is_file`] sees them. Symlinked directories are skipped, so
/// a scan never recurses through a link. Fails only when `path` itself cannot
/// be read; a child that cannot be read is skipped.
fn list_entries(path: &Path) -> std::result::Result<DirEntries, walkdir::Error> {
    let mut files = Vec::new();
    let mut directories = Vec::new();
    for entry in WalkDir::new(path).min_depth(1).max_depth(1).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        let file_type = entry.file_type();
        if file_type.is_dir() {
            directories.push(entry.into_path());
        } else if file_type.is_file() || (file_type.is_symlink() && entry.path().is_file()) {
            files.push(entry.into_path());
        }
    }
    Ok(DirEntries { files, directories })
}
