//! Editable text formats
//!
//! Payloads are exported to CSV or JSON for editing and the edits applied
//! back onto the decoded asset. Only texts change; ids are matched, never
//! created.

mod csv;
mod json;

pub use csv::{export_csv, import_csv};
pub use json::{export_json, import_json, parse_json};

use std::fmt;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::formats::text::Uexp;

/// Editable file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum TextFormat {
    #[default]
    Csv,
    Json,
}

impl TextFormat {
    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Format for a file extension, if it is one of ours.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Write `uexp` in this format.
    ///
    /// # Errors
    /// Returns an error if serialization or writing fails.
    pub fn export<W: Write>(self, uexp: &Uexp, writer: W) -> Result<()> {
        match self {
            Self::Csv => export_csv(uexp, writer),
            Self::Json => export_json(uexp, writer),
        }
    }

    /// Apply edits in this format onto `uexp`.
    ///
    /// # Errors
    /// Returns an error if the input is malformed or names unknown ids.
    pub fn import<R: Read>(self, uexp: &mut Uexp, reader: R) -> Result<()> {
        match self {
            Self::Csv => import_csv(uexp, reader),
            Self::Json => import_json(uexp, reader),
        }
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
