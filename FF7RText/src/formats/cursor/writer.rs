//! Little-endian writer with deferred size patches

#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use std::io::{Seek, SeekFrom, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use super::strings::to_utf16_bytes;
use crate::error::{Error, Result};
use crate::formats::FormatVersion;

/// A 4-byte size field inside an already written region.
///
/// The header is written first, the payload after it, and only then is the
/// payload size known. The patch point is recorded while writing the header
/// and applied with [`ByteWriter::finalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePatch {
    /// Absolute offset of the field.
    pub offset: u64,
    /// Value to store.
    pub value: i32,
}

/// Positioned writer over a seekable byte sink.
pub struct ByteWriter<W> {
    inner: W,
    version: FormatVersion,
}

impl<W: Write + Seek> ByteWriter<W> {
    pub fn new(inner: W, version: FormatVersion) -> Self {
        Self { inner, version }
    }

    #[must_use]
    pub fn version(&self) -> FormatVersion {
        self.version
    }

    /// Current offset.
    ///
    /// # Errors
    /// Returns an error if the stream position cannot be queried.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Write raw bytes.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.inner.write_all(buf)?;
        Ok(())
    }

    /// Write a little-endian `i32`.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.inner.write_i32::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write a little-endian `u32`.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.inner.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write a zero reserved field.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn write_null(&mut self) -> Result<()> {
        self.write_i32(0)
    }

    /// Write a header-string (see [`ByteReader::read_string`]).
    ///
    /// [`ByteReader::read_string`]: super::ByteReader::read_string
    ///
    /// # Errors
    /// Returns an error if the write fails or the string is too long for
    /// the length prefix.
    pub fn write_string(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            return self.write_null();
        }
        if s.is_ascii() {
            self.write_i32(length_prefix(s.len() + 1)?)?;
            self.write_bytes(s.as_bytes())?;
            self.write_bytes(&[0])
        } else {
            let buf = to_utf16_bytes(s);
            self.write_i32(-length_prefix(buf.len() / 2 + 1)?)?;
            self.write_bytes(&buf)?;
            self.write_bytes(&[0, 0])
        }
    }

    /// Write a zen name-map string (see [`ByteReader::read_zen_string`]).
    ///
    /// [`ByteReader::read_zen_string`]: super::ByteReader::read_zen_string
    ///
    /// # Errors
    /// Returns an error if the write fails or the string has more than
    /// `0x7FFF` units.
    pub fn write_zen_string(&mut self, s: &str) -> Result<()> {
        let (payload, units, flag) = if s.is_ascii() {
            (s.as_bytes().to_vec(), s.len(), 0x00)
        } else {
            let buf = to_utf16_bytes(s);
            let units = buf.len() / 2;
            (buf, units, 0x80)
        };
        if units > 0x7FFF {
            return Err(Error::ValueTooLarge {
                what: "zen string length",
                value: units as u64,
            });
        }
        self.write_bytes(&[flag | (units >> 8) as u8, (units & 0xFF) as u8])?;
        self.write_bytes(&payload)
    }

    /// Apply a deferred size patch and return to the current end.
    ///
    /// # Errors
    /// Returns an error if seeking or writing fails.
    pub fn finalize(&mut self, patch: SizePatch) -> Result<()> {
        let pos = self.position()?;
        self.inner.seek(SeekFrom::Start(patch.offset))?;
        self.write_i32(patch.value)?;
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    /// Flush and give back the wrapped sink.
    ///
    /// # Errors
    /// Returns an error if flushing fails.
    pub fn into_inner(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

fn length_prefix(len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| Error::ValueTooLarge {
        what: "string length",
        value: len as u64,
    })
}
