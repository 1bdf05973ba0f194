//! Tool configuration (`ff7rtext.toml`)
//!
//! ```toml
//! format = "json"
//! outdir = "mod/Content"
//! num_workers = 4
//! ignore_empty = true
//! widget_width = 1170
//! widget_height = 260
//! ```
//!
//! Every key is optional. Command line flags take precedence.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ResultExt};
use crate::interchange::TextFormat;
use crate::widget::{DEFAULT_HEIGHT, DEFAULT_WIDTH, WidgetSize};

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "ff7rtext.toml";

fn default_outdir() -> PathBuf {
    PathBuf::from("out")
}

fn default_widget_width() -> f32 {
    DEFAULT_WIDTH
}

fn default_widget_height() -> f32 {
    DEFAULT_HEIGHT
}

/// Settings shared by every operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default)]
    pub format: TextFormat,
    #[serde(default = "default_outdir")]
    pub outdir: PathBuf,
    /// Worker threads; 0 uses one per CPU.
    #[serde(default)]
    pub num_workers: usize,
    /// Skip exporting assets without entries.
    #[serde(default)]
    pub ignore_empty: bool,
    #[serde(default = "default_widget_width")]
    pub widget_width: f32,
    #[serde(default = "default_widget_height")]
    pub widget_height: f32,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            format: TextFormat::default(),
            outdir: default_outdir(),
            num_workers: 0,
            ignore_empty: false,
            widget_width: DEFAULT_WIDTH,
            widget_height: DEFAULT_HEIGHT,
        }
    }
}

impl ToolConfig {
    /// Parse a config from TOML text.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] for malformed TOML or wrong types.
    ///
    /// [`Error::ConfigError`]: crate::Error::ConfigError
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load `path`, or `ff7rtext.toml` in the working directory when no path
    /// is given. A missing default file yields the defaults.
    ///
    /// # Errors
    /// Returns an error if an explicit file is missing or any file is
    /// malformed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(CONFIG_FILE_NAME);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };

        debug!("Loading config {}", path.display());
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    #[must_use]
    pub fn widget_size(&self) -> WidgetSize {
        WidgetSize {
            width: self.widget_width,
            height: self.widget_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let config = ToolConfig::from_toml("").unwrap();
        assert_eq!(config, ToolConfig::default());
        assert_eq!(config.outdir, PathBuf::from("out"));
        assert_eq!(config.widget_size(), WidgetSize::default());
    }

    #[test]
    fn test_partial() {
        let config = ToolConfig::from_toml("format = \"json\"\nnum_workers = 3\nwidget_width = 1170\n")
            .unwrap();
        assert_eq!(config.format, TextFormat::Json);
        assert_eq!(config.num_workers, 3);
        assert_eq!(config.widget_width, 1170.0);
        assert_eq!(config.widget_height, 210.0);
        assert!(!config.ignore_empty);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "ignore_empty = true\noutdir = \"build\"\n").unwrap();

        let config = ToolConfig::load(Some(&path)).unwrap();
        assert!(config.ignore_empty);
        assert_eq!(config.outdir, PathBuf::from("build"));
    }

    #[test]
    fn test_bad_value() {
        let err = ToolConfig::from_toml("format = \"xml\"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Interchange);
    }
}
