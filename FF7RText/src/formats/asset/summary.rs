//! Zen package summary

#![allow(clippy::cast_sign_loss)]

use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::formats::cursor::ByteReader;

/// Size of the summary record at offset 0.
pub const SUMMARY_SIZE: u64 = 60;

/// Fixed-layout record at the start of a zen package header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZenPackageSummary {
    pub name_id: u32,
    pub name_number: u32,
    pub source_name_id: u32,
    pub source_name_number: u32,
    pub package_flags: u32,
    pub cooked_header_size: u32,
    pub name_map_offset: i32,
    pub name_map_size: i32,
    pub name_hashes_offset: i32,
    pub name_hashes_size: i32,
    pub import_offset: i32,
    pub export_offset: i32,
    pub export_bundle_entries_offset: i32,
    pub graph_data_offset: i32,
    pub graph_data_size: i32,
}

impl ZenPackageSummary {
    /// Read the 60 byte record at the current position.
    ///
    /// # Errors
    /// Returns an error if fewer than 60 bytes remain.
    pub fn read<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<Self> {
        Ok(Self {
            name_id: reader.read_u32()?,
            name_number: reader.read_u32()?,
            source_name_id: reader.read_u32()?,
            source_name_number: reader.read_u32()?,
            package_flags: reader.read_u32()?,
            cooked_header_size: reader.read_u32()?,
            name_map_offset: reader.read_i32()?,
            name_map_size: reader.read_i32()?,
            name_hashes_offset: reader.read_i32()?,
            name_hashes_size: reader.read_i32()?,
            import_offset: reader.read_i32()?,
            export_offset: reader.read_i32()?,
            export_bundle_entries_offset: reader.read_i32()?,
            graph_data_offset: reader.read_i32()?,
            graph_data_size: reader.read_i32()?,
        })
    }

    /// End of the name map region.
    #[must_use]
    pub fn name_map_end(&self) -> u64 {
        i64::from(self.name_map_offset).saturating_add(i64::from(self.name_map_size)) as u64
    }

    /// End of the header region, where the payload starts.
    #[must_use]
    pub fn header_end(&self) -> u64 {
        i64::from(self.graph_data_offset).saturating_add(i64::from(self.graph_data_size)) as u64
    }

    /// Offset of the export's serial-size field.
    #[must_use]
    pub fn size_field_offset(&self) -> u64 {
        self.export_offset as u64 + 8
    }

    /// Check that every region used by the codec lies inside a header file of
    /// `file_len` bytes.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSummary`] describing the first bad region.
    pub fn validate(&self, file_len: u64) -> Result<()> {
        let fields = [
            ("name map offset", self.name_map_offset),
            ("name map size", self.name_map_size),
            ("export offset", self.export_offset),
            ("graph data offset", self.graph_data_offset),
            ("graph data size", self.graph_data_size),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, value)| *value < 0) {
            return Err(invalid(format!("{name} is negative ({value})")));
        }

        if u64::from(self.name_map_offset as u32) < SUMMARY_SIZE {
            return Err(invalid(format!(
                "name map at {} overlaps the summary",
                self.name_map_offset
            )));
        }
        if self.name_map_end() > self.header_end() {
            return Err(invalid(format!(
                "name map ends at {} after the header end {}",
                self.name_map_end(),
                self.header_end()
            )));
        }
        if self.header_end() > file_len {
            return Err(invalid(format!(
                "header ends at {} but the file has {file_len} bytes",
                self.header_end()
            )));
        }
        if self.size_field_offset() + 4 > self.header_end() {
            return Err(invalid(format!(
                "export size field at {} is outside the header",
                self.size_field_offset()
            )));
        }
        Ok(())
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidSummary { message }
}
