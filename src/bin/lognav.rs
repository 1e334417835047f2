//! Lognav CLI Binary
//!
//! Command-line interface for the log directory navigator.

use anyhow::Context;
use clap::Parser;
use lognav::logging::init_logging;
use lognav::tooling::{Cli, CliContext};
use std::process;

fn run(cli: &Cli) -> anyhow::Result<String> {
    let context = CliContext::new(cli.workspace.clone(), cli.config.clone())
        .context("Error loading configuration")?
        .with_filter(cli.filter.clone());

    init_logging(Some(&context.logging_config(cli))).context("Error initializing logging")?;

    Ok(context.execute(&cli.command)?)
}

fn main() {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
