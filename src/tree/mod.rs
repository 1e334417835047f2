//! Navigation tree: node types, sibling ordering, and the arena that owns them.

mod arena;
mod node;
pub mod order;

pub use arena::NavigationTree;
pub use node::{FileInfo, FileNode, FolderInfo, FolderNode, NavigationNode, NodeHeader, NodeKind};
