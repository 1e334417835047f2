//! Lognav: Live Log Directory Navigation
//!
//! Keeps an in-memory tree of log directories consistent with the filesystem.
//! Roots are loaded recursively, filtered by a wildcard pattern, and then kept
//! up to date by applying change notifications one at a time.

pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod navigator;
mod reconcile;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod views;
pub mod watch;

pub use cache::NodeCache;
pub use config::{ConfigLoader, NavigatorConfig};
pub use error::{NavError, Result};
pub use filter::FilterEngine;
pub use navigator::{ConsistencyReport, Navigator};
pub use tree::{FileNode, FolderNode, NavigationNode, NavigationTree, NodeKind};
pub use types::{ChangeEvent, ChangeKind, NodeId};
pub use views::{NodeSnapshot, TreeSnapshot};
