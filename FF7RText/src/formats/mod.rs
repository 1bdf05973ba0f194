//! File format handlers for FF7R text assets
//!
//! A text asset is a header file (`.uasset`) holding the name table and a
//! payload holding the localized entries. FF7 Remake stores the payload in
//! a companion `.uexp` file; FF7 Rebirth uses the zen package layout and
//! appends the payload to the header inside the same `.uasset`.

pub mod asset;
pub mod cursor;
pub mod text;

pub use asset::{AssetHeader, NameTable, Uasset, ZenPackageSummary};
pub use cursor::{ByteReader, ByteWriter, SizePatch};
pub use text::{Entry, Language, SubEntry, Uexp, find_entry};

/// On-disk layout of a text asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatVersion {
    /// FF7 Remake: classic package header, payload in a `.uexp` file.
    Legacy,
    /// FF7 Rebirth: zen package header, payload in the same file.
    Zen,
}

impl FormatVersion {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Zen => "zen",
        }
    }
}
