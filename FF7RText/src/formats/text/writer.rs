//! Payload encoding

use std::io::{Seek, Write};

use super::{Entry, SubEntry, Uexp};
use crate::error::{Error, Result, ResultExt};
use crate::formats::FormatVersion;
use crate::formats::asset::PACKAGE_MAGIC;
use crate::formats::cursor::ByteWriter;

impl SubEntry {
    /// Encode `{ name id, reserved zero, text }`.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write<W: Write + Seek>(&self, writer: &mut ByteWriter<W>) -> Result<()> {
        writer.write_u32(self.name_id)?;
        writer.write_null()?;
        writer.write_string(&self.text)
    }
}

impl Entry {
    /// Encode id, text and sub-entries.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write<W: Write + Seek>(&self, writer: &mut ByteWriter<W>) -> Result<()> {
        writer.write_string(&self.id)?;
        writer.write_string(&self.text)?;
        writer.write_u32(count_field("sub entry count", self.sub_entries.len())?)?;
        for sub in &self.sub_entries {
            sub.write(writer)?;
        }
        Ok(())
    }
}

impl Uexp {
    /// Encode the payload for the writer's format version.
    ///
    /// Name ids must be current; [`Uasset::update`] takes care of that.
    ///
    /// [`Uasset::update`]: crate::formats::Uasset::update
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write<W: Write + Seek>(&self, writer: &mut ByteWriter<W>) -> Result<()> {
        writer.write_bytes(&self.head)?;
        writer.write_string(self.language.code())?;
        if writer.version() == FormatVersion::Zen {
            writer.write_bytes(&self.none_id)?;
        }
        writer.write_null()?;
        writer.write_u32(count_field("entry count", self.entries.len())?)?;
        for (i, entry) in self.entries.iter().enumerate() {
            entry
                .write(writer)
                .with_context(|| format!("entry {i} ({})", entry.id))?;
        }

        if writer.version() == FormatVersion::Legacy {
            writer.write_bytes(&PACKAGE_MAGIC)?;
        }
        Ok(())
    }
}

fn count_field(what: &'static str, len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::ValueTooLarge {
        what,
        value: len as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::cursor::ByteReader;
    use crate::formats::text::{Language, MAX_ENTRIES};
    use std::io::Cursor;

    fn zen_payload() -> Uexp {
        let mut uexp = Uexp::new(Language::Jp);
        uexp.head = vec![7; super::super::ZEN_HEAD_SIZE];
        uexp.none_id = vec![1, 0, 0, 0, 0, 0, 0, 0];
        let mut entry = Entry::new("EV0_01_MAIN_0001", "こんにちは");
        entry.sub_entries.push(SubEntry {
            name_id: 3,
            id: String::new(),
            text: "クラウド".to_string(),
        });
        uexp.entries.push(entry);
        uexp.entries.push(Entry::new("EV0_01_MAIN_0002", ""));
        uexp
    }

    #[test]
    fn test_zen_payload_roundtrip() {
        let uexp = zen_payload();
        let mut writer = ByteWriter::new(Cursor::new(Vec::new()), FormatVersion::Zen);
        uexp.write(&mut writer).unwrap();
        let bytes = writer.into_inner().unwrap().into_inner();
        assert_eq!(bytes.len(), uexp.bin_size());

        let mut reader = ByteReader::with_version(Cursor::new(bytes), FormatVersion::Zen).unwrap();
        let decoded = Uexp::read(&mut reader).unwrap();
        assert_eq!(decoded, uexp);
    }

    #[test]
    fn test_legacy_size_excludes_signature() {
        let mut uexp = Uexp::new(Language::Us);
        uexp.head = vec![0, 3];
        uexp.entries.push(Entry::new("A", "B"));
        let mut writer = ByteWriter::new(Cursor::new(Vec::new()), FormatVersion::Legacy);
        uexp.write(&mut writer).unwrap();
        let bytes = writer.into_inner().unwrap().into_inner();
        assert_eq!(bytes.len(), uexp.bin_size() + 4);
        assert_eq!(&bytes[bytes.len() - 4..], &PACKAGE_MAGIC);
    }

    #[test]
    fn test_entry_count_bound() {
        let mut writer = ByteWriter::new(Cursor::new(Vec::new()), FormatVersion::Legacy);
        writer.write_bytes(&[0, 3]).unwrap();
        writer.write_string("US").unwrap();
        writer.write_null().unwrap();
        writer.write_u32(70000).unwrap();
        let bytes = writer.into_inner().unwrap().into_inner();

        let mut reader = ByteReader::new(Cursor::new(bytes)).unwrap();
        let err = Uexp::read(&mut reader).unwrap_err();
        assert!(matches!(
            err,
            Error::CountOutOfBounds { what: "entry count", count: 70000, max } if max == u64::from(MAX_ENTRIES)
        ));
    }

    #[test]
    fn test_sub_entry_count_bound() {
        let mut writer = ByteWriter::new(Cursor::new(Vec::new()), FormatVersion::Legacy);
        writer.write_string("ID").unwrap();
        writer.write_string("text").unwrap();
        writer.write_u32(16).unwrap();
        let bytes = writer.into_inner().unwrap().into_inner();

        let mut reader = ByteReader::new(Cursor::new(bytes)).unwrap();
        assert!(matches!(
            Entry::read(&mut reader),
            Err(Error::CountOutOfBounds { what: "sub entry count", count: 16, .. })
        ));
    }

    #[test]
    fn test_unknown_language() {
        let mut writer = ByteWriter::new(Cursor::new(Vec::new()), FormatVersion::Legacy);
        writer.write_bytes(&[0, 3]).unwrap();
        writer.write_string("EN").unwrap();
        let bytes = writer.into_inner().unwrap().into_inner();

        let mut reader = ByteReader::new(Cursor::new(bytes)).unwrap();
        assert!(matches!(Uexp::read(&mut reader), Err(Error::UnknownLanguage(code)) if code == "EN"));
    }

    #[test]
    fn test_reserved_field_must_be_zero() {
        let mut writer = ByteWriter::new(Cursor::new(Vec::new()), FormatVersion::Legacy);
        writer.write_u32(2).unwrap();
        writer.write_u32(1).unwrap();
        writer.write_string("x").unwrap();
        let bytes = writer.into_inner().unwrap().into_inner();

        let mut reader = ByteReader::new(Cursor::new(bytes)).unwrap();
        assert!(matches!(
            SubEntry::read(&mut reader),
            Err(Error::NonZeroReserved { offset: 4, value: 1 })
        ));
    }
}
