//! Header and asset decoding

use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{
    AssetHeader, LEGACY_NAME_COUNT_OFFSET, LEGACY_NAME_TABLE_OFFSET, MAX_NAMES, NameTable,
    PACKAGE_MAGIC, Uasset, ZEN_MARKER, ZenPackageSummary,
};
use crate::error::{Error, Result, ResultExt};
use crate::formats::FormatVersion;
use crate::formats::cursor::ByteReader;
use crate::formats::text::Uexp;

impl AssetHeader {
    /// Detect the format version and decode the name table.
    ///
    /// Leaves the reader at the end of the header region and switched to
    /// the detected version. For zen headers that is where the payload
    /// starts.
    ///
    /// # Errors
    /// Returns [`Error::UnknownSignature`] for anything but a legacy or zen
    /// header, and bounds or summary errors for corrupt ones.
    pub fn read<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<Self> {
        reader.seek_to(0)?;
        let signature = reader.read_array::<4>()?;
        match signature {
            PACKAGE_MAGIC => Self::read_legacy(reader),
            ZEN_MARKER => Self::read_zen(reader),
            other => Err(Error::UnknownSignature(other)),
        }
    }

    fn read_legacy<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<Self> {
        reader.set_version(FormatVersion::Legacy);

        reader.seek_to(LEGACY_NAME_COUNT_OFFSET)?;
        let count = reader.read_u32()?;
        if count >= MAX_NAMES {
            return Err(Error::CountOutOfBounds {
                what: "name count",
                count: u64::from(count),
                max: u64::from(MAX_NAMES),
            });
        }
        debug!("Legacy header: {count} names");

        reader.seek_to(LEGACY_NAME_TABLE_OFFSET)?;
        let mut names = NameTable::new();
        for i in 0..count {
            names.push(reader.read_string().with_context(|| format!("name {i}"))?);
            // per-name hash
            reader.skip(4)?;
        }

        let end = reader.end();
        let raw = reader.read_range(0, end)?;
        reader.seek_to(end)?;
        Ok(Self {
            version: FormatVersion::Legacy,
            names,
            raw,
            summary: None,
        })
    }

    fn read_zen<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<Self> {
        reader.set_version(FormatVersion::Zen);

        reader.seek_to(0)?;
        let summary = ZenPackageSummary::read(reader)?;
        summary.validate(reader.end())?;

        reader.seek_to(u64::from(summary.name_map_offset.unsigned_abs()))?;
        let names_end = summary.name_map_end();
        let mut names = NameTable::new();
        while reader.position()? < names_end {
            let i = names.len();
            names.push(reader.read_zen_string().with_context(|| format!("name {i}"))?);
        }
        debug!("Zen header: {} names", names.len());

        let end = summary.header_end();
        let raw = reader.read_range(0, end)?;
        reader.seek_to(end)?;
        Ok(Self {
            version: FormatVersion::Zen,
            names,
            raw,
            summary: Some(summary),
        })
    }
}

impl Uasset {
    /// Decode an asset from memory.
    ///
    /// `uexp` is the companion payload of a legacy header; zen headers carry
    /// their payload and ignore it.
    ///
    /// # Errors
    /// Returns [`Error::MissingPayload`] for a legacy header without `uexp`,
    /// or any decode error of the header or payload.
    pub fn from_bytes(uasset: &[u8], uexp: Option<&[u8]>) -> Result<Self> {
        let mut reader = ByteReader::new(Cursor::new(uasset))?;
        let header = AssetHeader::read(&mut reader).context("header")?;
        let payload = match header.version {
            FormatVersion::Legacy => {
                let bytes = uexp.ok_or(Error::MissingPayload)?;
                let mut payload_reader =
                    ByteReader::with_version(Cursor::new(bytes), FormatVersion::Legacy)?;
                Uexp::read(&mut payload_reader)
            }
            FormatVersion::Zen => Uexp::read(&mut reader),
        }
        .context("payload")?;
        Self::assemble(header, payload)
    }

    /// Read a `.uasset` file and its payload.
    ///
    /// For legacy assets the payload is the sibling `.uexp` file.
    ///
    /// # Errors
    /// Returns an error naming the file if either file cannot be read or
    /// decoded.
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading {}", path.display());
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;

        let mut reader = ByteReader::new(Cursor::new(data.as_slice()))?;
        let header = AssetHeader::read(&mut reader)
            .with_context(|| format!("reading {}", path.display()))?;

        let payload = match header.version {
            FormatVersion::Legacy => {
                let uexp_path = uexp_path(path);
                info!("Reading {}", uexp_path.display());
                read_legacy_payload(&uexp_path)
                    .with_context(|| format!("reading {}", uexp_path.display()))?
            }
            FormatVersion::Zen => {
                Uexp::read(&mut reader).with_context(|| format!("reading {}", path.display()))?
            }
        };

        Self::assemble(header, payload).with_context(|| format!("reading {}", path.display()))
    }

    fn assemble(header: AssetHeader, mut uexp: Uexp) -> Result<Self> {
        uexp.resolve_names(&header.names)?;
        Ok(Self { header, uexp })
    }
}

fn read_legacy_payload(path: &Path) -> Result<Uexp> {
    let data = fs::read(path)?;
    let mut reader = ByteReader::with_version(Cursor::new(data.as_slice()), FormatVersion::Legacy)?;
    Uexp::read(&mut reader)
}

/// Companion payload path of a legacy header.
#[must_use]
pub fn uexp_path(uasset: &Path) -> PathBuf {
    uasset.with_extension("uexp")
}
