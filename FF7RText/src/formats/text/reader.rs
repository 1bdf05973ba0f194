//! Payload decoding

use std::io::{Read, Seek};

use tracing::debug;

use super::{
    Entry, LEGACY_HEAD_SIZE, MAX_ENTRIES, MAX_SUB_ENTRIES, NONE_ID_SIZE, SubEntry, Uexp,
    ZEN_HEAD_SIZE,
};
use crate::error::{Error, Result, ResultExt};
use crate::formats::FormatVersion;
use crate::formats::asset::PACKAGE_MAGIC;
use crate::formats::cursor::ByteReader;

impl SubEntry {
    /// Decode `{ name id, reserved zero, text }`. The id string is filled in
    /// later by [`Entry::resolve_names`].
    ///
    /// # Errors
    /// Returns an error on truncated data or a non-zero reserved field.
    pub fn read<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<Self> {
        let name_id = reader.read_u32()?;
        reader.read_null()?;
        let text = reader.read_string()?;
        Ok(Self {
            name_id,
            id: String::new(),
            text,
        })
    }
}

impl Entry {
    /// Decode id, text and sub-entries.
    ///
    /// # Errors
    /// Returns [`Error::CountOutOfBounds`] for 16 or more sub-entries.
    pub fn read<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<Self> {
        let id = reader.read_string()?;
        let text = reader.read_string()?;
        let count = reader.read_u32()?;
        if count >= MAX_SUB_ENTRIES {
            return Err(Error::CountOutOfBounds {
                what: "sub entry count",
                count: u64::from(count),
                max: u64::from(MAX_SUB_ENTRIES),
            });
        }

        let mut sub_entries = Vec::with_capacity(count as usize);
        for i in 0..count {
            sub_entries.push(SubEntry::read(reader).with_context(|| format!("sub entry {i}"))?);
        }
        Ok(Self {
            id,
            text,
            sub_entries,
        })
    }
}

impl Uexp {
    /// Decode a payload laid out for the reader's format version.
    ///
    /// Sub-entry ids are left empty; call [`Uexp::resolve_names`] with the
    /// header's name table afterwards.
    ///
    /// # Errors
    /// Returns an error on truncated data, an unknown language, an entry
    /// count of 65536 or more, or a bad trailing signature.
    pub fn read<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<Self> {
        let version = reader.version();
        let head = match version {
            FormatVersion::Legacy => reader.read_bytes(LEGACY_HEAD_SIZE)?,
            FormatVersion::Zen => reader.read_bytes(ZEN_HEAD_SIZE)?,
        };

        let language = reader.read_string()?.parse()?;

        let none_id = match version {
            FormatVersion::Legacy => Vec::new(),
            FormatVersion::Zen => reader.read_bytes(NONE_ID_SIZE)?,
        };
        reader.read_null()?;

        let count = reader.read_u32()?;
        if count >= MAX_ENTRIES {
            return Err(Error::CountOutOfBounds {
                what: "entry count",
                count: u64::from(count),
                max: u64::from(MAX_ENTRIES),
            });
        }
        debug!("Payload: language {language}, {count} entries");

        let mut entries = Vec::with_capacity(count as usize);
        for i in 0..count {
            entries.push(Entry::read(reader).with_context(|| format!("entry {i}"))?);
        }

        if version == FormatVersion::Legacy {
            let signature = reader.read_array::<4>()?;
            if signature != PACKAGE_MAGIC {
                return Err(Error::InvalidTrailingSignature(signature));
            }
        }

        Ok(Self {
            head,
            language,
            none_id,
            entries,
        })
    }
}
