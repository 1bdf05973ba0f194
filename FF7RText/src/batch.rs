//! Batch processing
//!
//! Finds input files and runs one operation per file on a worker pool.
//! A failing file is reported and the rest of the batch continues.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{debug, error};
use walkdir::WalkDir;

use crate::config::ToolConfig;
use crate::error::{Error, Result};
use crate::operations::{FileOutcome, Mode, process_file};
use crate::widget::WIDGET_FILE_NAME;

/// Progress of a running batch.
#[derive(Debug, Clone)]
pub struct BatchProgress {
    /// Files started so far, this one included.
    pub current: usize,
    pub total: usize,
    /// Path of the file, relative to the batch root.
    pub file: String,
}

/// Result of a batch operation
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// Files that produced output
    pub success_count: usize,
    /// Files with nothing to write
    pub skipped_count: usize,
    /// Files that failed
    pub fail_count: usize,
    /// One message per file, in input order
    pub results: Vec<String>,
}

impl BatchResult {
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.fail_count > 0
    }
}

/// Find all files with extension `ext` under `dir`, sorted.
pub fn find_files<P: AsRef<Path>>(dir: P, ext: &str) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .is_some_and(|found| found.eq_ignore_ascii_case(ext))
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    files
}

/// Run `mode` on `input`, a file or a directory searched recursively.
///
/// `second` is the source asset path for imports and the second language
/// for dual subtitles.
///
/// # Errors
/// Returns [`Error::InvalidInput`] if `input` is missing, a single file
/// with the wrong extension, or a directory given to [`Mode::Resize`], and
/// [`Error::WorkerPool`] if the pool cannot be started. Per-file failures
/// are counted in the result instead.
pub fn run<F>(
    mode: Mode,
    input: &Path,
    second: Option<&Path>,
    config: &ToolConfig,
    progress: F,
) -> Result<BatchResult>
where
    F: Fn(&BatchProgress) + Send + Sync,
{
    let ext = mode.input_extension(config.format);
    if mode.needs_second_path() && second.is_none() {
        return Err(Error::InvalidInput {
            path: input.to_path_buf(),
            message: format!("{} needs a second path", mode.name()),
        });
    }

    if mode == Mode::Resize && input.is_dir() {
        return Err(Error::InvalidInput {
            path: input.to_path_buf(),
            message: format!("resize takes the {WIDGET_FILE_NAME} file, not a directory"),
        });
    }

    let (files, root) = if input.is_dir() {
        (find_files(input, ext), input.to_path_buf())
    } else if input.is_file() {
        let matches = input
            .extension()
            .is_some_and(|found| found.eq_ignore_ascii_case(ext));
        if !matches {
            return Err(Error::InvalidInput {
                path: input.to_path_buf(),
                message: format!("not .{ext}"),
            });
        }
        let root = input.parent().map(Path::to_path_buf).unwrap_or_default();
        (vec![input.to_path_buf()], root)
    } else {
        return Err(Error::InvalidInput {
            path: input.to_path_buf(),
            message: "path does not exist".to_string(),
        });
    };

    debug!("{}: {} input files under {}", mode.name(), files.len(), root.display());
    run_files(mode, &files, &root, second, config, progress)
}

/// Run `mode` on `files` in parallel.
///
/// # Errors
/// Returns [`Error::WorkerPool`] if the pool cannot be started.
pub fn run_files<F>(
    mode: Mode,
    files: &[PathBuf],
    root: &Path,
    second: Option<&Path>,
    config: &ToolConfig,
    progress: F,
) -> Result<BatchResult>
where
    F: Fn(&BatchProgress) + Send + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_workers)
        .build()?;

    let success_counter = AtomicUsize::new(0);
    let skip_counter = AtomicUsize::new(0);
    let fail_counter = AtomicUsize::new(0);
    let processed = AtomicUsize::new(0);
    let total = files.len();

    let results: Vec<String> = pool.install(|| {
        files
            .par_iter()
            .map(|file| {
                let display_path = file.strip_prefix(root).unwrap_or(file).display().to_string();

                let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
                progress(&BatchProgress {
                    current,
                    total,
                    file: display_path.clone(),
                });

                match process_file(mode, file, root, second, config) {
                    Ok(FileOutcome::Processed) => {
                        success_counter.fetch_add(1, Ordering::SeqCst);
                        format!("Processed: {display_path}")
                    }
                    Ok(FileOutcome::Skipped) => {
                        skip_counter.fetch_add(1, Ordering::SeqCst);
                        format!("Skipped: {display_path}")
                    }
                    Err(e) => {
                        fail_counter.fetch_add(1, Ordering::SeqCst);
                        error!("{}", e.trace());
                        format!("Failed {display_path}: {}", e.root())
                    }
                }
            })
            .collect()
    });

    Ok(BatchResult {
        success_count: success_counter.load(Ordering::SeqCst),
        skipped_count: skip_counter.load(Ordering::SeqCst),
        fail_count: fail_counter.load(Ordering::SeqCst),
        results,
    })
}
