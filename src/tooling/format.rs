//! Format tree snapshots and change events as text.

use crate::error::Result;
use crate::tree::NodeKind;
use crate::types::ChangeEvent;
use crate::views::{NodeSnapshot, TreeSnapshot};
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Render the tree with two-space indentation per level.
///
/// Hidden nodes are skipped unless `include_hidden` is set, in which case they
/// are dimmed and tagged.
pub fn format_tree_text(snapshot: &TreeSnapshot, include_hidden: bool) -> String {
    let mut out = String::new();
    let filter = if snapshot.filter.is_empty() {
        "(none)"
    } else {
        snapshot.filter.as_str()
    };
    out.push_str(&format!(
        "{}  filter: {}\n",
        format_section_heading("Navigation Tree"),
        filter
    ));
    if snapshot.roots.is_empty() {
        out.push_str("No roots loaded.\n");
        return out;
    }
    for root in &snapshot.roots {
        push_node(&mut out, root, 0, include_hidden);
    }
    out
}

fn push_node(out: &mut String, node: &NodeSnapshot, depth: usize, include_hidden: bool) {
    // Roots are printed even when nothing below them matches.
    if depth > 0 && !node.visible && !include_hidden {
        return;
    }

    let indent = "  ".repeat(depth);
    let marker = if node.selected { "* " } else { "" };
    let label = match node.kind {
        NodeKind::Folder if depth == 0 => format!("{}", node.path.display().bold().blue()),
        NodeKind::Folder => format!("{}/", node.name.bold().blue()),
        NodeKind::File => {
            let size = node.size.map(human_size).unwrap_or_default();
            format!("{} {}", node.name, size.dimmed())
        }
    };
    if node.visible {
        out.push_str(&format!("{}{}{}\n", indent, marker, label));
    } else {
        out.push_str(&format!(
            "{}{}{} {}\n",
            indent,
            marker,
            label.dimmed(),
            "(hidden)".dimmed()
        ));
    }

    for child in &node.children {
        push_node(out, child, depth + 1, include_hidden);
    }
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// One line describing an applied change event.
pub fn format_event_line(event: &ChangeEvent, result: &Result<()>) -> String {
    let line = match event {
        ChangeEvent::Created(path) => format!("{} {}", "created".green(), path.display()),
        ChangeEvent::Deleted(path) => format!("{} {}", "deleted".red(), path.display()),
        ChangeEvent::Changed(path) => format!("{} {}", "changed".yellow(), path.display()),
        ChangeEvent::Renamed { from, to } => format!(
            "{} {} -> {}",
            "renamed".cyan(),
            from.display(),
            to.display()
        ),
    };
    match result {
        Ok(()) => line,
        Err(e) => format!("{} {}", line, format!("({})", e).red()),
    }
}
