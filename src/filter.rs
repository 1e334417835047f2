//! Name filtering and visibility.
//!
//! A single wildcard pattern (e.g. `*.log`) decides which files belong to the
//! navigation tree. The pattern is translated to an anchored regular
//! expression and matched against the file name only.

use crate::error::Result;
use crate::tree::{NavigationNode, NavigationTree};
use crate::types::NodeId;
use regex::Regex;
use std::path::Path;

/// Translate a wildcard pattern into an anchored regular expression.
///
/// `*` matches any run of characters and `?` exactly one; everything else is
/// literal.
pub fn wildcard_to_regex(pattern: &str) -> String {
    let escaped = regex::escape(pattern);
    format!("^{}$", escaped.replace(r"\*", ".*").replace(r"\?", "."))
}

/// Compiled wildcard pattern.
///
/// An empty pattern compiles to no matcher at all and matches nothing.
#[derive(Debug, Clone)]
pub struct WildcardMatcher {
    pattern: String,
    regex: Option<Regex>,
}

impl WildcardMatcher {
    pub fn compile(pattern: &str, case_sensitive: bool) -> Result<Self> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Ok(Self::empty());
        }

        let mut source = wildcard_to_regex(pattern);
        if !case_sensitive {
            source.insert_str(0, "(?i)");
        }

        Ok(Self {
            pattern: pattern.to_string(),
            regex: Some(Regex::new(&source)?),
        })
    }

    pub fn empty() -> Self {
        Self {
            pattern: String::new(),
            regex: None,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.as_ref().map(|r| r.is_match(name)).unwrap_or(false)
    }

    /// Match the last component of `path`.
    pub fn matches_path(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.is_match(&name.to_string_lossy()))
            .unwrap_or(false)
    }
}

/// Filter engine: file classification plus the visibility pass.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    matcher: WildcardMatcher,
    case_sensitive: bool,
}

impl FilterEngine {
    pub fn new(pattern: &str, case_sensitive: bool) -> Result<Self> {
        Ok(Self {
            matcher: WildcardMatcher::compile(pattern, case_sensitive)?,
            case_sensitive,
        })
    }

    /// Replace the current pattern. On error the previous pattern stays.
    pub fn set_filter(&mut self, pattern: &str) -> Result<()> {
        self.matcher = WildcardMatcher::compile(pattern, self.case_sensitive)?;
        Ok(())
    }

    pub fn pattern(&self) -> &str {
        self.matcher.pattern()
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn matcher(&self) -> &WildcardMatcher {
        &self.matcher
    }

    pub fn is_supported_file(&self, path: &Path) -> bool {
        self.matcher.matches_path(path)
    }

    /// True for regular files and for symlinks to them.
    pub fn is_file(&self, path: &Path) -> bool {
        std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
    }

    /// True for real directories only; a symlink to a directory is neither a
    /// file nor a directory here, matching what the loader lists.
    pub fn is_directory(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path).map(|m| m.is_dir()).unwrap_or(false)
    }

    /// Recompute `is_visible` for every node reachable from the roots.
    ///
    /// Files are visible when their name matches; folders when any descendant
    /// is visible.
    pub fn apply_visibility(&self, tree: &mut NavigationTree) {
        let roots: Vec<NodeId> = tree.roots().to_vec();
        for root in roots {
            self.update_visibility(tree, root);
        }
    }

    /// Bottom-up visibility for the subtree at `id`. Returns the new visibility.
    pub fn update_visibility(&self, tree: &mut NavigationTree, id: NodeId) -> bool {
        let children = match tree.node(id) {
            Some(NavigationNode::File(file)) => {
                let visible = self.matcher.is_match(&file.header.name);
                if let Some(node) = tree.node_mut(id) {
                    node.header_mut().is_visible = visible;
                }
                return visible;
            }
            Some(NavigationNode::Folder(folder)) => folder.children().collect::<Vec<_>>(),
            None => return false,
        };

        let mut visible = false;
        for child in children {
            // No short-circuit: every child must be refreshed.
            visible |= self.update_visibility(tree, child);
        }
        if let Some(node) = tree.node_mut(id) {
            node.header_mut().is_visible = visible;
        }
        visible
    }
}
