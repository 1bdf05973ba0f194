//! FF7RText CLI - Command-line interface for the text asset tools

pub mod commands;
pub mod progress;

use std::path::PathBuf;

use clap::Parser;
use commands::Commands;
use tracing::Level;

use crate::config::ToolConfig;

#[derive(Parser)]
#[command(name = "ff7rtext", version)]
#[command(about = "FF7RText: text asset tools for FF7 Remake and FF7 Rebirth", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./ff7rtext.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Run the FF7RText CLI
///
/// # Errors
/// Returns an error if the config cannot be loaded or the command fails.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config =
        ToolConfig::load(cli.config.as_deref()).map_err(|e| anyhow::anyhow!(e.trace()))?;
    cli.command.execute(config)
}
