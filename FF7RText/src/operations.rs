//! Per-file operations
//!
//! Each operation works on one asset and reports whether it produced output.
//! [`crate::batch`] fans them out over directories.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::ToolConfig;
use crate::dualsub;
use crate::error::{Error, Result, ResultExt};
use crate::formats::FormatVersion;
use crate::formats::asset::{Uasset, persist, uexp_path};
use crate::interchange::TextFormat;
use crate::widget::{WIDGET_FILE_NAME, resize_widget_file};

/// Extension of asset header files.
pub const UASSET_EXTENSION: &str = "uasset";

/// What to do with each input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Asset to CSV/JSON.
    Export,
    /// CSV/JSON applied onto a source asset.
    Import,
    /// Second language merged into the first.
    Dualsub,
    /// Subtitle widget resized.
    Resize,
    /// Export, import and compare with the original.
    Test,
}

impl Mode {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Export => "export",
            Self::Import => "import",
            Self::Dualsub => "dualsub",
            Self::Resize => "resize",
            Self::Test => "test",
        }
    }

    /// Whether the mode needs a second path (source assets or a second
    /// language).
    #[must_use]
    pub fn needs_second_path(self) -> bool {
        matches!(self, Self::Import | Self::Dualsub)
    }

    /// Extension of the files this mode picks up.
    #[must_use]
    pub fn input_extension(self, format: TextFormat) -> &'static str {
        match self {
            Self::Import => format.extension(),
            _ => UASSET_EXTENSION,
        }
    }
}

/// Outcome of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Processed,
    /// Nothing to write, e.g. an empty asset or no merged subtitles.
    Skipped,
}

/// Where one input file's outputs and companion input go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPlan {
    /// Directory holding the input file.
    pub parent: PathBuf,
    /// Input file name without extension.
    pub stem: String,
    /// Directory for this file's outputs.
    pub out_dir: PathBuf,
    /// The matching file under the second path.
    pub second: PathBuf,
}

impl PathPlan {
    /// Map `file`, found under `root`, to its output directory and its
    /// counterpart under `second`.
    ///
    /// The directory of `file` relative to `root` is kept. When `second` is
    /// absent or a directory, outputs go to `outdir/<root name>/<rel>` and the
    /// counterpart is `second/<rel>/<stem>.uasset`. When `second` is a file,
    /// outputs go to `outdir/<rel>` and the counterpart is that file.
    #[must_use]
    pub fn new(file: &Path, root: &Path, second: Option<&Path>, outdir: &Path) -> Self {
        let parent = file.parent().map(Path::to_path_buf).unwrap_or_default();
        let stem = file
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();
        let rel = file
            .strip_prefix(root)
            .ok()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let (out_dir, second) = match second {
            Some(second) if second.is_file() => (join_rel(outdir, &rel), second.to_path_buf()),
            _ => {
                let root_name = root.file_name().map(PathBuf::from).unwrap_or_default();
                let base = second.map(Path::to_path_buf).unwrap_or_default();
                (
                    join_rel(&outdir.join(root_name), &rel),
                    join_rel(&base, &rel).join(format!("{stem}.{UASSET_EXTENSION}")),
                )
            }
        };

        Self {
            parent,
            stem,
            out_dir,
            second,
        }
    }

    /// `<parent>/<stem>.<ext>`
    #[must_use]
    pub fn input_with_extension(&self, ext: &str) -> PathBuf {
        self.parent.join(format!("{}.{ext}", self.stem))
    }

    /// `<out_dir>/<stem>.<ext>`
    #[must_use]
    pub fn output_with_extension(&self, ext: &str) -> PathBuf {
        self.out_dir.join(format!("{}.{ext}", self.stem))
    }
}

fn join_rel(base: &Path, rel: &Path) -> PathBuf {
    if rel.as_os_str().is_empty() {
        base.to_path_buf()
    } else {
        base.join(rel)
    }
}

/// Export an asset's payload to `out_path`.
///
/// # Errors
/// Returns an error if the asset cannot be read or the output written.
pub fn export_asset(
    uasset_path: &Path,
    out_path: &Path,
    format: TextFormat,
    ignore_empty: bool,
) -> Result<FileOutcome> {
    let uasset = Uasset::read_from_file(uasset_path)?;
    if ignore_empty && uasset.uexp.entries.is_empty() {
        debug!("Skipping empty asset {}", uasset_path.display());
        return Ok(FileOutcome::Skipped);
    }

    let mut buffer = Vec::new();
    format
        .export(&uasset.uexp, &mut buffer)
        .with_context(|| format!("exporting {}", uasset_path.display()))?;
    info!("Writing {}", out_path.display());
    persist(out_path, &buffer)?;
    Ok(FileOutcome::Processed)
}

/// Apply the edits in `edits_path` onto the asset at `source_path` and write
/// the result to `out_path`.
///
/// The edit format follows the file extension, falling back to `format`.
///
/// # Errors
/// Returns an error if either input cannot be read, the edits do not match
/// the asset, or the output cannot be written.
pub fn import_asset(
    source_path: &Path,
    edits_path: &Path,
    out_path: &Path,
    format: TextFormat,
) -> Result<FileOutcome> {
    let mut uasset = Uasset::read_from_file(source_path)?;

    let format = edits_path
        .extension()
        .and_then(|ext| TextFormat::from_extension(&ext.to_string_lossy()))
        .unwrap_or(format);
    info!("Reading {}", edits_path.display());
    let edits = fs::File::open(edits_path)
        .with_context(|| format!("reading {}", edits_path.display()))?;
    format
        .import(&mut uasset.uexp, std::io::BufReader::new(edits))
        .with_context(|| format!("importing {}", edits_path.display()))?;

    uasset.write_to_file(out_path)?;
    Ok(FileOutcome::Processed)
}

/// Merge the subtitles of `second_path` into `first_path` and write the
/// result to `out_path`. Nothing is written when no entry merged.
///
/// # Errors
/// Returns an error if an asset cannot be read or written, or a merged
/// subtitle overflows.
pub fn dualsub_asset(
    first_path: &Path,
    second_path: &Path,
    out_path: &Path,
    ignore_empty: bool,
) -> Result<FileOutcome> {
    let mut first = Uasset::read_from_file(first_path)?;
    if ignore_empty && first.uexp.entries.is_empty() {
        return Ok(FileOutcome::Skipped);
    }
    let second = Uasset::read_from_file(second_path)?;

    let merged = dualsub::merge(&mut first.uexp, &second.uexp)
        .with_context(|| format!("merging {}", second_path.display()))?;
    if merged == 0 {
        debug!("No subtitles merged into {}", first_path.display());
        return Ok(FileOutcome::Skipped);
    }

    first.write_to_file(out_path)?;
    Ok(FileOutcome::Processed)
}

/// Resize the subtitle widget asset.
///
/// # Errors
/// Returns [`Error::InvalidInput`] unless the input is the widget asset,
/// and any error of the resize itself.
pub fn resize_asset(input: &Path, out_path: &Path, config: &ToolConfig) -> Result<FileOutcome> {
    let is_widget = input
        .file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with(WIDGET_FILE_NAME));
    if !is_widget {
        return Err(Error::InvalidInput {
            path: input.to_path_buf(),
            message: format!("resize only applies to {WIDGET_FILE_NAME}"),
        });
    }
    resize_widget_file(input, out_path, config.widget_size())?;
    Ok(FileOutcome::Processed)
}

/// Export an asset, import the export back and compare the rebuilt files
/// with the originals.
///
/// # Errors
/// Returns [`Error::RoundTripMismatch`] if any rebuilt file differs.
pub fn test_asset(uasset_path: &Path, plan: &PathPlan, format: TextFormat) -> Result<FileOutcome> {
    let edits_path = plan.output_with_extension(format.extension());
    let rebuilt_path = plan.output_with_extension(UASSET_EXTENSION);

    export_asset(uasset_path, &edits_path, format, false)?;
    import_asset(uasset_path, &edits_path, &rebuilt_path, format)?;

    let rebuilt = Uasset::read_from_file(&rebuilt_path)?;
    let mut pairs = vec![(uasset_path.to_path_buf(), rebuilt_path.clone())];
    if rebuilt.version() == FormatVersion::Legacy {
        pairs.push((uexp_path(uasset_path), uexp_path(&rebuilt_path)));
    }
    for (original, copy) in pairs {
        if !files_are_equal(&original, &copy)? {
            return Err(Error::RoundTripMismatch { path: original });
        }
    }
    Ok(FileOutcome::Processed)
}

/// Byte-compare two files.
///
/// # Errors
/// Returns an error if either file cannot be read.
pub fn files_are_equal(a: &Path, b: &Path) -> Result<bool> {
    debug!("Comparing {} and {}", a.display(), b.display());
    let left = fs::read(a).with_context(|| format!("reading {}", a.display()))?;
    let right = fs::read(b).with_context(|| format!("reading {}", b.display()))?;
    Ok(left == right)
}

/// Run `mode` on one input file found under `root`.
///
/// # Errors
/// Returns any error of the operation, with the input file as context.
pub fn process_file(
    mode: Mode,
    file: &Path,
    root: &Path,
    second: Option<&Path>,
    config: &ToolConfig,
) -> Result<FileOutcome> {
    let plan = PathPlan::new(file, root, second, &config.outdir);
    let uasset_path = plan.input_with_extension(UASSET_EXTENSION);
    let out_uasset = plan.output_with_extension(UASSET_EXTENSION);

    let outcome = match mode {
        Mode::Export => export_asset(
            &uasset_path,
            &plan.output_with_extension(config.format.extension()),
            config.format,
            config.ignore_empty,
        ),
        Mode::Import => import_asset(&plan.second, file, &out_uasset, config.format),
        Mode::Dualsub => dualsub_asset(&uasset_path, &plan.second, &out_uasset, config.ignore_empty),
        Mode::Resize => resize_asset(&uasset_path, &out_uasset, config),
        Mode::Test => test_asset(&uasset_path, &plan, config.format),
    };

    if let Ok(FileOutcome::Skipped) = outcome {
        warn!("Skipped {}", file.display());
    }
    outcome.with_context(|| format!("{} {}", mode.name(), file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plan_directory_input() {
        let plan = PathPlan::new(
            Path::new("/game/Text/sub/Menu.uasset"),
            Path::new("/game/Text"),
            None,
            Path::new("out"),
        );
        assert_eq!(plan.parent, PathBuf::from("/game/Text/sub"));
        assert_eq!(plan.stem, "Menu");
        assert_eq!(plan.out_dir, PathBuf::from("out/Text/sub"));
        assert_eq!(
            plan.output_with_extension("csv"),
            PathBuf::from("out/Text/sub/Menu.csv")
        );
    }

    #[test]
    fn test_plan_second_directory() {
        let dir = tempfile::tempdir().unwrap();
        let plan = PathPlan::new(
            Path::new("/edits/Text/sub/Menu.csv"),
            Path::new("/edits/Text"),
            Some(dir.path()),
            Path::new("out"),
        );
        assert_eq!(plan.second, dir.path().join("sub").join("Menu.uasset"));
        assert_eq!(plan.out_dir, PathBuf::from("out/Text/sub"));
    }

    #[test]
    fn test_plan_second_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Menu.uasset");
        fs::write(&source, b"").unwrap();

        let plan = PathPlan::new(
            Path::new("/edits/Menu.csv"),
            Path::new("/edits"),
            Some(&source),
            Path::new("out"),
        );
        assert_eq!(plan.second, source);
        assert_eq!(plan.out_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_input_extensions() {
        assert_eq!(Mode::Import.input_extension(TextFormat::Json), "json");
        assert_eq!(Mode::Dualsub.input_extension(TextFormat::Json), "uasset");
        assert!(Mode::Import.needs_second_path());
        assert!(!Mode::Test.needs_second_path());
    }

    #[test]
    fn test_resize_requires_widget() {
        let config = ToolConfig::default();
        let err = resize_asset(Path::new("Menu.uasset"), Path::new("out.uasset"), &config)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }
}
