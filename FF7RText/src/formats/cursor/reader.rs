//! Bounded little-endian reader

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

use super::strings::from_utf16_bytes;
use crate::error::{Error, Result};
use crate::formats::FormatVersion;

/// Positioned reader over a seekable byte stream.
///
/// The end of the stream is recorded once at construction. Every read is
/// checked against it and fails with [`Error::UnexpectedEof`] instead of
/// reading past it.
pub struct ByteReader<R> {
    inner: R,
    end: u64,
    version: FormatVersion,
}

impl<R: Read + Seek> ByteReader<R> {
    /// Wrap a stream. The current stream length becomes the read bound.
    ///
    /// # Errors
    /// Returns an error if the stream cannot be seeked.
    pub fn new(mut inner: R) -> Result<Self> {
        let pos = inner.stream_position()?;
        let end = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(pos))?;
        Ok(Self {
            inner,
            end,
            version: FormatVersion::Legacy,
        })
    }

    /// Wrap a stream that is known to use `version`.
    ///
    /// # Errors
    /// Returns an error if the stream cannot be seeked.
    pub fn with_version(inner: R, version: FormatVersion) -> Result<Self> {
        let mut reader = Self::new(inner)?;
        reader.version = version;
        Ok(reader)
    }

    #[must_use]
    pub fn version(&self) -> FormatVersion {
        self.version
    }

    pub fn set_version(&mut self, version: FormatVersion) {
        self.version = version;
    }

    /// Recorded end offset.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Current offset.
    ///
    /// # Errors
    /// Returns an error if the stream position cannot be queried.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Seek to an absolute offset.
    ///
    /// # Errors
    /// Returns an error if the seek fails.
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Skip `len` bytes, failing if that crosses the end.
    ///
    /// # Errors
    /// Returns [`Error::UnexpectedEof`] when fewer than `len` bytes remain.
    pub fn skip(&mut self, len: u64) -> Result<()> {
        let offset = self.check_remaining(len)?;
        self.inner.seek(SeekFrom::Start(offset + len))?;
        Ok(())
    }

    fn check_remaining(&mut self, len: u64) -> Result<u64> {
        let offset = self.position()?;
        if offset + len > self.end {
            return Err(Error::UnexpectedEof {
                offset,
                requested: len,
                end: self.end,
            });
        }
        Ok(offset)
    }

    /// Read exactly `len` bytes.
    ///
    /// # Errors
    /// Returns [`Error::UnexpectedEof`] when fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        self.check_remaining(len as u64)?;
        let mut buf = vec![0u8; len];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read a fixed-size array.
    ///
    /// # Errors
    /// Returns [`Error::UnexpectedEof`] when fewer than `N` bytes remain.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.check_remaining(N as u64)?;
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read everything from `start` to `end` without moving the cursor.
    ///
    /// # Errors
    /// Returns [`Error::UnexpectedEof`] when `end` is past the stream end.
    pub fn read_range(&mut self, start: u64, end: u64) -> Result<Vec<u8>> {
        let pos = self.position()?;
        self.seek_to(start)?;
        let buf = self.read_bytes(end.saturating_sub(start) as usize);
        self.seek_to(pos)?;
        buf
    }

    /// Read a little-endian `i32`.
    ///
    /// # Errors
    /// Returns [`Error::UnexpectedEof`] past the end of the stream.
    pub fn read_i32(&mut self) -> Result<i32> {
        self.check_remaining(4)?;
        Ok(self.inner.read_i32::<LittleEndian>()?)
    }

    /// Read a little-endian `u32`.
    ///
    /// # Errors
    /// Returns [`Error::UnexpectedEof`] past the end of the stream.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.check_remaining(4)?;
        Ok(self.inner.read_u32::<LittleEndian>()?)
    }

    /// Read a reserved 32-bit field that must be zero.
    ///
    /// # Errors
    /// Returns [`Error::NonZeroReserved`] when the field holds anything else.
    pub fn read_null(&mut self) -> Result<()> {
        let offset = self.position()?;
        let value = self.read_i32()?;
        if value != 0 {
            return Err(Error::NonZeroReserved { offset, value });
        }
        Ok(())
    }

    /// Read a header-string.
    ///
    /// The signed length prefix counts the terminator: zero is the empty
    /// string, `n > 0` is `n - 1` bytes plus a one byte terminator and
    /// `n < 0` is `-n - 1` UTF-16LE units plus a two byte terminator.
    ///
    /// # Errors
    /// Returns an error on truncated data or an invalid payload encoding.
    pub fn read_string(&mut self) -> Result<String> {
        let len = i64::from(self.read_i32()?);
        if len == 0 {
            return Ok(String::new());
        }
        let s = if len > 0 {
            self.read_utf8((len - 1) as usize)?
        } else {
            self.read_utf16((-len - 1) as usize)?
        };
        self.skip(if len > 0 { 1 } else { 2 })?;
        Ok(s)
    }

    /// Read a zen name-map string.
    ///
    /// Two header bytes: the high bit of the first is the UTF-16 flag, the
    /// remaining 15 bits (7 + 8) are the length in units. No terminator.
    ///
    /// # Errors
    /// Returns an error on truncated data or an invalid payload encoding.
    pub fn read_zen_string(&mut self) -> Result<String> {
        let [hi, lo] = self.read_array::<2>()?;
        let len = (usize::from(hi & 0x7F) << 8) | usize::from(lo);
        if hi & 0x80 != 0 {
            self.read_utf16(len)
        } else {
            self.read_utf8(len)
        }
    }

    fn read_utf8(&mut self, len: usize) -> Result<String> {
        let offset = self.position()?;
        let buf = self.read_bytes(len)?;
        String::from_utf8(buf).map_err(|_| Error::InvalidString {
            encoding: "UTF-8",
            offset,
        })
    }

    fn read_utf16(&mut self, units: usize) -> Result<String> {
        let offset = self.position()?;
        let buf = self.read_bytes(units * 2)?;
        from_utf16_bytes(&buf).ok_or(Error::InvalidString {
            encoding: "UTF-16",
            offset,
        })
    }

    /// Give back the wrapped stream.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(bytes: &[u8]) -> ByteReader<Cursor<&[u8]>> {
        ByteReader::new(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_read_ascii_string() {
        let mut r = reader(&[3, 0, 0, 0, b'U', b'S', 0, 0xAA]);
        assert_eq!(r.read_string().unwrap(), "US");
        assert_eq!(r.position().unwrap(), 7);
    }

    #[test]
    fn test_read_utf16_string() {
        // -3 => two units + terminator
        let mut r = reader(&[0xFD, 0xFF, 0xFF, 0xFF, 0xE5, 0x65, 0x2C, 0x67, 0, 0]);
        assert_eq!(r.read_string().unwrap(), "日本");
        assert_eq!(r.position().unwrap(), 10);
    }

    #[test]
    fn test_read_empty_string() {
        let mut r = reader(&[0, 0, 0, 0]);
        assert_eq!(r.read_string().unwrap(), "");
    }

    #[test]
    fn test_read_zen_string() {
        let mut r = reader(&[0x00, 0x05, b'A', b'C', b'T', b'O', b'R', 0x80, 0x01, 0x42, 0x30]);
        assert_eq!(r.read_zen_string().unwrap(), "ACTOR");
        assert_eq!(r.read_zen_string().unwrap(), "あ");
    }

    #[test]
    fn test_read_past_end() {
        let mut r = reader(&[1, 2, 3]);
        let err = r.read_u32().unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedEof {
                offset: 0,
                requested: 4,
                end: 3
            }
        ));
    }

    #[test]
    fn test_truncated_string_payload() {
        let mut r = reader(&[10, 0, 0, 0, b'a', b'b']);
        assert!(matches!(r.read_string(), Err(Error::UnexpectedEof { .. })));
    }

    #[test]
    fn test_read_null() {
        let mut r = reader(&[0, 0, 0, 0, 7, 0, 0, 0]);
        r.read_null().unwrap();
        assert!(matches!(
            r.read_null(),
            Err(Error::NonZeroReserved { offset: 4, value: 7 })
        ));
    }
}
