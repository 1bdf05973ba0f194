//! Header name table

#![allow(clippy::cast_possible_truncation)]

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Interned strings of a package header, addressed by position.
///
/// Duplicates are allowed; lookups by string return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    names: Vec<String>,
    first_index: HashMap<String, u32>,
}

impl NameTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a name. Ids of existing names never change.
    pub fn push(&mut self, name: String) {
        let id = self.names.len() as u32;
        self.first_index.entry(name.clone()).or_insert(id);
        self.names.push(name);
    }

    /// Name at `id`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownNameId`] if `id` is out of range.
    pub fn resolve(&self, id: u32) -> Result<&str> {
        self.names
            .get(id as usize)
            .map(String::as_str)
            .ok_or(Error::UnknownNameId {
                id,
                len: self.names.len(),
            })
    }

    /// Id of the first name equal to `name`.
    ///
    /// # Errors
    /// Returns [`Error::NameNotFound`] if no name matches.
    pub fn id_of(&self, name: &str) -> Result<u32> {
        self.first_index
            .get(name)
            .copied()
            .ok_or_else(|| Error::NameNotFound(name.to_string()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl FromIterator<String> for NameTable {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut table = Self::new();
        for name in iter {
            table.push(name);
        }
        table
    }
}
