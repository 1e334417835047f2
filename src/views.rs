//! Tree Views
//!
//! Owned, serialisable copies of the navigation tree for consumers that must
//! not hold the navigator's lock (printing, JSON output, subscribers on other
//! threads).

use crate::tree::{NavigationNode, NavigationTree, NodeKind};
use crate::types::NodeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Snapshot of every root and its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// Filter pattern in effect when the snapshot was taken
    pub filter: String,
    pub roots: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub path: PathBuf,
    pub name: String,
    pub kind: NodeKind,
    pub visible: bool,
    pub selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    /// Files first (descending order), then subdirectories
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl TreeSnapshot {
    pub fn capture(tree: &NavigationTree, filter: &str) -> Self {
        Self {
            filter: filter.to_string(),
            roots: tree
                .roots()
                .iter()
                .filter_map(|id| NodeSnapshot::capture(tree, *id))
                .collect(),
        }
    }

    /// Copy without hidden nodes. Roots are always kept.
    pub fn visible_only(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            roots: self
                .roots
                .iter()
                .map(|root| {
                    let mut root = root.clone();
                    root.prune_hidden();
                    root
                })
                .collect(),
        }
    }

    /// Total number of nodes in the snapshot.
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(NodeSnapshot::node_count).sum()
    }
}

impl NodeSnapshot {
    pub fn capture(tree: &NavigationTree, id: NodeId) -> Option<Self> {
        let node = tree.node(id)?;
        let header = node.header();
        let (size, modified, children) = match node {
            NavigationNode::File(file) => (Some(file.info.size), file.info.modified, Vec::new()),
            NavigationNode::Folder(folder) => (
                None,
                folder.info.modified,
                folder
                    .children()
                    .filter_map(|child| NodeSnapshot::capture(tree, child))
                    .collect(),
            ),
        };
        Some(Self {
            id,
            path: header.full_name.clone(),
            name: header.name.clone(),
            kind: node.kind(),
            visible: header.is_visible,
            selected: header.is_selected,
            size,
            modified,
            children,
        })
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NodeSnapshot::node_count).sum::<usize>()
    }

    fn prune_hidden(&mut self) {
        self.children.retain(|child| child.visible);
        for child in &mut self.children {
            child.prune_hidden();
        }
    }
}
