//! Tooling
//!
//! Command-line surface over the navigator: argument parsing, command
//! execution and human-readable output.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
pub use format::{format_event_line, format_tree_text};
