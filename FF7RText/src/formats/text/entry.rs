//! Entry and sub-entry model

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::formats::asset::NameTable;
use crate::formats::cursor::header_string_size;

/// Sub-entry id that marks a voiced subtitle line.
pub const ACTOR_ID: &str = "ACTOR";

/// Id categories of voice lines in payloads without an [`ACTOR_ID`] sub-entry.
pub const SUBTITLE_CATEGORIES: [&str; 5] = ["MAIN", "QST_", "NPC_", "MGV_", "CDV_"];

/// Byte offset of the category inside an entry id, e.g. `XXX_00_MAIN_...`.
const CATEGORY_OFFSET: usize = 7;
const CATEGORY_LEN: usize = 4;

/// Line separator inside entry texts.
pub const LINE_BREAK: &str = "\r\n";

/// A named variant of an entry (speaker name, gender variant, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubEntry {
    /// Index into the asset's name table.
    #[serde(skip)]
    pub name_id: u32,
    /// Resolved name table string.
    pub id: String,
    pub text: String,
}

impl SubEntry {
    /// Size on disk: name id, reserved field and text.
    #[must_use]
    pub fn bin_size(&self) -> usize {
        8 + header_string_size(&self.text)
    }

    /// Fill in `id` from `name_id`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownNameId`] if the id is outside the table.
    pub fn resolve_name(&mut self, names: &NameTable) -> Result<()> {
        self.id = names.resolve(self.name_id)?.to_string();
        Ok(())
    }

    /// Re-derive `name_id` from `id` by exact match.
    ///
    /// # Errors
    /// Returns [`Error::NameNotFound`] if the table has no such string.
    pub fn update_name_id(&mut self, names: &NameTable) -> Result<()> {
        self.name_id = names.id_of(&self.id)?;
        Ok(())
    }
}

/// One localizable text unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_entries: Vec<SubEntry>,
}

impl Entry {
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            sub_entries: Vec::new(),
        }
    }

    /// Size on disk: id, text, sub-entry count and sub-entries.
    #[must_use]
    pub fn bin_size(&self) -> usize {
        4 + header_string_size(&self.id)
            + header_string_size(&self.text)
            + self.sub_entries.iter().map(SubEntry::bin_size).sum::<usize>()
    }

    /// Resolve every sub-entry id through the name table.
    ///
    /// # Errors
    /// Returns [`Error::UnknownNameId`] for an out of range id.
    pub fn resolve_names(&mut self, names: &NameTable) -> Result<()> {
        for sub in &mut self.sub_entries {
            sub.resolve_name(names)?;
        }
        Ok(())
    }

    /// Re-derive every sub-entry name id from its current id string.
    ///
    /// # Errors
    /// Returns [`Error::NameNotFound`] for an id missing from the table and
    /// [`Error::DuplicateSubEntry`] when two sub-entries share an id.
    pub fn update_name_ids(&mut self, names: &NameTable) -> Result<()> {
        for sub in &mut self.sub_entries {
            sub.update_name_id(names)?;
        }
        self.check_duplicates()
    }

    /// Sub-entry ids must be pairwise distinct.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateSubEntry`] naming the first repeated id.
    pub fn check_duplicates(&self) -> Result<()> {
        for (i, sub) in self.sub_entries.iter().enumerate() {
            if self.sub_entries[i + 1..].iter().any(|other| other.id == sub.id) {
                return Err(Error::DuplicateSubEntry {
                    entry: self.id.clone(),
                    sub_id: sub.id.clone(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn sub_entry(&self, id: &str) -> Option<&SubEntry> {
        self.sub_entries.iter().find(|sub| sub.id == id)
    }

    pub fn sub_entry_mut(&mut self, id: &str) -> Option<&mut SubEntry> {
        self.sub_entries.iter_mut().find(|sub| sub.id == id)
    }

    /// Whether this entry is a voiced subtitle line.
    ///
    /// True when a sub-entry is named [`ACTOR_ID`]. Some FF7 Rebirth voice
    /// lines lack that sub-entry, so the id category at byte offset 7 is
    /// checked as a fallback.
    #[must_use]
    pub fn is_subtitle(&self) -> bool {
        if self.sub_entries.iter().any(|sub| sub.id == ACTOR_ID) {
            return true;
        }
        let Some(category) = self
            .id
            .get(CATEGORY_OFFSET..CATEGORY_OFFSET + CATEGORY_LEN)
        else {
            return false;
        };
        SUBTITLE_CATEGORIES.contains(&category) && !category.ends_with("_sys")
    }

    /// Number of `\n` in the text plus one.
    #[must_use]
    pub fn count_lines(&self) -> usize {
        self.text.matches('\n').count() + 1
    }

    /// Append another entry's text after `sep`.
    ///
    /// An empty own text is replaced; an empty other text changes nothing.
    pub fn append_text(&mut self, other: &Entry, sep: &str) {
        if self.text.is_empty() {
            self.text.clone_from(&other.text);
        } else if !other.text.is_empty() {
            self.text.push_str(sep);
            self.text.push_str(&other.text);
        }
    }
}
