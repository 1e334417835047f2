//! CLI Tooling
//!
//! Command-line interface for loading and watching log directory trees.

use crate::config::{ConfigLoader, NavigatorConfig};
use crate::error::{NavError, Result};
use crate::logging::LoggingConfig;
use crate::navigator::Navigator;
use crate::tooling::format::{format_event_line, format_tree_text};
use crate::types::ChangeEvent;
use crate::watch::{change_channel, NavigatorDaemon, NotifyChangeSource};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Lognav CLI - live navigation tree over log directories
#[derive(Parser)]
#[command(name = "lognav")]
#[command(about = "Mirror log directories as a filtered tree that follows filesystem changes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace directory (looked up for lognav.toml)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// File name filter, e.g. "*.log" (overrides config)
    #[arg(long)]
    pub filter: Option<String>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load roots once and print the tree
    Tree {
        /// Root directories (defaults to the configured roots)
        roots: Vec<PathBuf>,
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
        /// Include nodes hidden by the filter
        #[arg(long)]
        all: bool,
    },
    /// Load roots, watch them, and reprint the tree after every change
    Watch {
        /// Root directories (defaults to the configured roots)
        roots: Vec<PathBuf>,
        /// Include nodes hidden by the filter
        #[arg(long)]
        all: bool,
    },
}

/// CLI execution context
pub struct CliContext {
    config: NavigatorConfig,
    workspace_root: PathBuf,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self> {
        let config = if let Some(cfg_path) = &config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Ok(Self {
            config,
            workspace_root,
        })
    }

    /// Override the configured filter pattern.
    pub fn with_filter(mut self, pattern: Option<String>) -> Self {
        if let Some(pattern) = pattern {
            self.config.filter.pattern = pattern;
        }
        self
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Logging settings with CLI flags applied on top of the config.
    pub fn logging_config(&self, cli: &Cli) -> LoggingConfig {
        let mut logging = self.config.logging.clone();
        if let Some(level) = &cli.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &cli.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &cli.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &cli.log_file {
            logging.file = Some(file.clone());
        }
        logging
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String> {
        match command {
            Commands::Tree { roots, format, all } => self.handle_tree(roots, format, *all),
            Commands::Watch { roots, all } => self.handle_watch(roots, *all),
        }
    }

    fn resolve_roots(&self, roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let roots: Vec<PathBuf> = if roots.is_empty() {
            self.config.roots.clone()
        } else {
            roots.to_vec()
        };
        if roots.is_empty() {
            return Err(NavError::InvalidArgument(
                "no roots given and none configured".to_string(),
            ));
        }
        Ok(roots
            .into_iter()
            .map(|root| {
                if root.is_absolute() {
                    root
                } else {
                    self.workspace_root.join(root)
                }
            })
            .collect())
    }

    fn handle_tree(&self, roots: &[PathBuf], format: &str, all: bool) -> Result<String> {
        let roots = self.resolve_roots(roots)?;
        // Nothing gets armed, so no event ever reaches the channel.
        let (tx, _rx) = change_channel();
        let source = Arc::new(NotifyChangeSource::new(tx, self.config.filter.case_sensitive));
        let navigator = Navigator::new(&self.config, source)?;
        for root in &roots {
            navigator.load_file_system_content(root, false)?;
        }

        let snapshot = navigator.snapshot();
        match format {
            "json" => {
                let view = if all { snapshot } else { snapshot.visible_only() };
                serde_json::to_string_pretty(&view)
                    .map_err(|e| NavError::InvalidArgument(format!("Failed to serialize tree: {}", e)))
            }
            "text" => Ok(format_tree_text(&snapshot, all)),
            other => Err(NavError::InvalidArgument(format!(
                "Invalid format: {} (expected text or json)",
                other
            ))),
        }
    }

    fn handle_watch(&self, roots: &[PathBuf], all: bool) -> Result<String> {
        let roots = self.resolve_roots(roots)?;
        let (tx, rx) = change_channel();
        let source = Arc::new(NotifyChangeSource::new(tx, self.config.filter.case_sensitive));
        let navigator = Arc::new(Navigator::new(&self.config, source)?);
        for root in &roots {
            navigator.load_root(root)?;
        }
        println!("{}", format_tree_text(&navigator.snapshot(), all));

        let printer = Arc::clone(&navigator);
        let daemon = NavigatorDaemon::new(Arc::clone(&navigator), self.config.watch.clone())
            .with_listener(Box::new(move |event: &ChangeEvent, result: &Result<()>| {
                println!("{}", format_event_line(event, result));
                println!("{}", format_tree_text(&printer.snapshot(), all));
            }));

        info!(roots = roots.len(), "Watching; press Ctrl-C to stop");
        let processed = daemon.run(rx);
        Ok(format!("Processed {} change events", processed))
    }
}
