//! # FF7RText
//!
//! A pure-Rust library for the localized text assets of FINAL FANTASY VII
//! REMAKE and FINAL FANTASY VII REBIRTH.
//!
//! ## Supported Formats
//!
//! - **Legacy text assets** (FF7 Remake) - `.uasset` header plus `.uexp` payload
//! - **Zen text assets** (FF7 Rebirth) - header and payload in one `.uasset`
//! - **CSV/JSON** - Editable exports of a payload
//! - **Subtitle widget** - `Subtitle00.uasset` metrics
//!
//! Assets are re-encoded byte for byte; only the payload-size field of the
//! header changes when texts change.
//!
//! ## Quick Start
//!
//! ### Exporting and importing text
//!
//! ```no_run
//! use ff7rtext::prelude::*;
//!
//! let mut uasset = Uasset::read_from_file("Text/US/Menu.uasset")?;
//! let file = std::fs::File::create("Menu.csv")?;
//! export_csv(&uasset.uexp, file)?;
//!
//! // ... edit Menu.csv ...
//!
//! import_csv(&mut uasset.uexp, std::fs::File::open("Menu.csv")?)?;
//! uasset.write_to_file("out/Menu.uasset")?;
//! # Ok::<(), ff7rtext::Error>(())
//! ```
//!
//! ### Dual subtitles
//!
//! ```no_run
//! use ff7rtext::prelude::*;
//!
//! let mut english = Uasset::read_from_file("US/Subtitle.uasset")?;
//! let japanese = Uasset::read_from_file("JP/Subtitle.uasset")?;
//! let merged = merge(&mut english.uexp, &japanese.uexp)?;
//! if merged > 0 {
//!     english.write_to_file("out/Subtitle.uasset")?;
//! }
//! # Ok::<(), ff7rtext::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `ff7rtext` command-line binary

pub mod batch;
pub mod config;
pub mod dualsub;
pub mod error;
pub mod formats;
pub mod interchange;
pub mod operations;
pub mod widget;

// Re-exports for convenience
pub use error::{Error, ErrorKind, Result, ResultExt};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result, ResultExt};
    pub use crate::formats::{
        AssetHeader, Entry, FormatVersion, Language, NameTable, SubEntry, Uasset, Uexp,
        ZenPackageSummary, find_entry,
    };

    pub use crate::dualsub::{merge, reflow};
    pub use crate::interchange::{
        TextFormat, export_csv, export_json, import_csv, import_json, parse_json,
    };
    pub use crate::widget::{WidgetSize, resize_widget};

    pub use crate::batch::{BatchResult, find_files};
    pub use crate::config::ToolConfig;
    pub use crate::operations::{FileOutcome, Mode};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
