//! Subcommands

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::bail;
use clap::{Args, Subcommand};

use super::progress::{GEAR, LOOKING_GLASS, batch_bar, print_done, print_failure, print_step};
use crate::batch::{self, BatchProgress};
use crate::config::ToolConfig;
use crate::formats::Uasset;
use crate::interchange::TextFormat;
use crate::operations::Mode;

/// Options shared by the batch subcommands. Unset options keep the config
/// file value.
#[derive(Args, Debug, Clone, Default)]
pub struct BatchArgs {
    /// Editable text format
    #[arg(short, long, value_enum)]
    pub format: Option<TextFormat>,

    /// Output directory
    #[arg(short, long)]
    pub outdir: Option<PathBuf>,

    /// Worker threads (0 = one per CPU)
    #[arg(short = 'n', long)]
    pub num_workers: Option<usize>,

    /// Skip assets without entries
    #[arg(short, long)]
    pub ignore_empty: bool,
}

impl BatchArgs {
    fn apply(&self, config: &mut ToolConfig) {
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(outdir) = &self.outdir {
            config.outdir.clone_from(outdir);
        }
        if let Some(num_workers) = self.num_workers {
            config.num_workers = num_workers;
        }
        if self.ignore_empty {
            config.ignore_empty = true;
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export text assets to CSV or JSON
    Export {
        /// A .uasset file or a directory of them
        input: PathBuf,

        #[command(flatten)]
        args: BatchArgs,
    },

    /// Apply edited CSV or JSON onto the original assets
    Import {
        /// A .csv/.json file or a directory of them
        input: PathBuf,

        /// The original .uasset file or directory
        source: PathBuf,

        #[command(flatten)]
        args: BatchArgs,
    },

    /// Merge the subtitles of a second language into the first
    Dualsub {
        /// First language .uasset file or directory
        first: PathBuf,

        /// Second language .uasset file or directory
        second: PathBuf,

        #[command(flatten)]
        args: BatchArgs,
    },

    /// Resize the subtitle widget (Subtitle00.uasset, FF7 Rebirth only)
    Resize {
        /// Path to Subtitle00.uasset
        input: PathBuf,

        /// Widget width (shipped: 930)
        #[arg(long)]
        width: Option<f32>,

        /// Widget height (shipped: 210)
        #[arg(long)]
        height: Option<f32>,

        #[command(flatten)]
        args: BatchArgs,
    },

    /// Export, re-import and compare with the original assets
    Test {
        /// A .uasset file or a directory of them
        input: PathBuf,

        #[command(flatten)]
        args: BatchArgs,
    },

    /// Print the contents of one asset
    Info {
        /// Path to a .uasset file
        input: PathBuf,

        /// List names, entries and sub-entries
        #[arg(short, long)]
        detailed: bool,
    },
}

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the command fails or any file of a batch failed.
    pub fn execute(&self, mut config: ToolConfig) -> anyhow::Result<()> {
        match self {
            Commands::Export { input, args } => {
                args.apply(&mut config);
                run_batch(Mode::Export, input, None, &config)
            }
            Commands::Import {
                input,
                source,
                args,
            } => {
                args.apply(&mut config);
                run_batch(Mode::Import, input, Some(source), &config)
            }
            Commands::Dualsub {
                first,
                second,
                args,
            } => {
                args.apply(&mut config);
                run_batch(Mode::Dualsub, first, Some(second), &config)
            }
            Commands::Resize {
                input,
                width,
                height,
                args,
            } => {
                args.apply(&mut config);
                if let Some(width) = width {
                    config.widget_width = *width;
                }
                if let Some(height) = height {
                    config.widget_height = *height;
                }
                run_batch(Mode::Resize, input, None, &config)
            }
            Commands::Test { input, args } => {
                args.apply(&mut config);
                run_batch(Mode::Test, input, None, &config)
            }
            Commands::Info { input, detailed } => info(input, *detailed),
        }
    }
}

fn info(path: &Path, detailed: bool) -> anyhow::Result<()> {
    let uasset = Uasset::read_from_file(path).map_err(|e| anyhow::anyhow!(e.trace()))?;
    print!("{}", uasset.describe(detailed));
    Ok(())
}

fn run_batch(
    mode: Mode,
    input: &Path,
    second: Option<&Path>,
    config: &ToolConfig,
) -> anyhow::Result<()> {
    let start = Instant::now();

    println!("ff7rtext v{}", crate::VERSION);
    println!("mode: {}", mode.name());
    println!("outdir: {}", config.outdir.display());
    print_step(1, 2, LOOKING_GLASS, "Collecting files...");

    let pb = batch_bar(mode.name());
    let progress = |p: &BatchProgress| {
        pb.set_length(p.total as u64);
        pb.set_position(p.current as u64);
        pb.set_message(p.file.clone());
    };

    print_step(2, 2, GEAR, "Processing...");
    let result = batch::run(mode, input, second, config, progress)
        .map_err(|e| anyhow::anyhow!(e.trace()))?;
    pb.finish_and_clear();

    for message in result.results.iter().filter(|m| m.starts_with("Failed")) {
        print_failure(message);
    }

    match result.success_count {
        0 => println!("No files processed..."),
        1 => println!("Processed 1 file"),
        n => println!("Processed {n} files"),
    }
    if result.skipped_count > 0 {
        println!("Skipped {} files", result.skipped_count);
    }
    print_done(start.elapsed());

    if result.has_failures() {
        bail!("{} of {} files failed", result.fail_count, result.results.len());
    }
    Ok(())
}
