//! Localized text payload (`.uexp` data)
//!
//! A payload holds a language code and an id-sorted list of entries. Each
//! entry has a text and a few named sub-entries whose names live in the
//! header's name table.

mod entry;
mod language;
mod locator;
mod reader;
mod update;
mod writer;

pub use entry::{ACTOR_ID, Entry, LINE_BREAK, SUBTITLE_CATEGORIES, SubEntry};
pub use language::Language;
pub use locator::find_entry;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ResultExt};
use crate::formats::asset::NameTable;
use crate::formats::cursor::header_string_size;

/// Entry counts at or above this are treated as corruption.
pub const MAX_ENTRIES: u32 = 65536;

/// Sub-entry counts at or above this are treated as corruption. Shipped
/// assets have four at most.
pub const MAX_SUB_ENTRIES: u32 = 16;

/// Fixed payload preamble of FF7 Remake assets.
pub const LEGACY_HEAD_SIZE: usize = 2;

/// Fixed payload preamble of FF7 Rebirth assets.
pub const ZEN_HEAD_SIZE: usize = 25;

/// Size of the name-map reference to `None` that zen payloads carry.
pub const NONE_ID_SIZE: usize = 8;

/// A language payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uexp {
    /// Version specific preamble, re-emitted verbatim.
    #[serde(skip)]
    pub(crate) head: Vec<u8>,
    #[serde(rename = "language")]
    pub language: Language,
    /// Name-map reference to "None" (zen only), re-emitted verbatim.
    #[serde(skip)]
    pub(crate) none_id: Vec<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<Entry>,
}

impl Uexp {
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    /// Size on disk as recorded in the header's payload-size field.
    ///
    /// The trailing signature of legacy payloads is not counted.
    #[must_use]
    pub fn bin_size(&self) -> usize {
        8 + self.head.len()
            + self.none_id.len()
            + header_string_size(self.language.code())
            + self.entries.iter().map(Entry::bin_size).sum::<usize>()
    }

    /// Resolve every sub-entry id through the name table.
    ///
    /// # Errors
    /// Returns [`Error::UnknownNameId`] naming the failing entry.
    ///
    /// [`Error::UnknownNameId`]: crate::Error::UnknownNameId
    pub fn resolve_names(&mut self, names: &NameTable) -> Result<()> {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry
                .resolve_names(names)
                .with_context(|| format!("entry {i} ({})", entry.id))?;
        }
        Ok(())
    }

    /// Re-derive every sub-entry name id before encoding.
    ///
    /// # Errors
    /// Returns [`Error::NameNotFound`] or [`Error::DuplicateSubEntry`]
    /// naming the failing entry.
    ///
    /// [`Error::NameNotFound`]: crate::Error::NameNotFound
    /// [`Error::DuplicateSubEntry`]: crate::Error::DuplicateSubEntry
    pub fn update_name_ids(&mut self, names: &NameTable) -> Result<()> {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry
                .update_name_ids(names)
                .with_context(|| format!("entry {i} ({})", entry.id))?;
        }
        Ok(())
    }

    /// Find an entry by id, probing `hint` first.
    #[must_use]
    pub fn find_entry(&self, key: &str, hint: usize) -> Option<usize> {
        find_entry(&self.entries, key, hint)
    }

    /// Human readable summary, one line per entry and sub-entry when verbose.
    #[must_use]
    pub fn describe(&self, verbose: bool) -> String {
        let mut out = format!("lang: {}\nentry count: {}\n", self.language, self.entries.len());
        if !verbose || self.entries.is_empty() {
            return out;
        }
        out.push_str("entries:\n");
        for entry in &self.entries {
            out.push_str(&format!("  id: {}\n    text: {}\n", entry.id, entry.text));
            out.push_str(&format!("    sub entry count: {}\n", entry.sub_entries.len()));
            if !entry.sub_entries.is_empty() {
                out.push_str("    sub entries:\n");
            }
            for sub in &entry.sub_entries {
                out.push_str(&format!("      id: {}\n        text: {}\n", sub.id, sub.text));
            }
        }
        out
    }
}
