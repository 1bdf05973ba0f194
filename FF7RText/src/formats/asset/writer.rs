//! Asset encoding
//!
//! Encoding is a two-pass write: the preserved header goes out first and the
//! offset of its payload-size field is recorded as a [`SizePatch`]; the
//! payload follows, and the patch is applied last with the payload's size.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use super::reader::uexp_path;
use super::{AssetHeader, LEGACY_SIZE_FIELD_FROM_END, Uasset};
use crate::error::{Error, Result, ResultExt};
use crate::formats::FormatVersion;
use crate::formats::cursor::{ByteWriter, SizePatch};
use crate::formats::text::Uexp;

/// Encoded output of one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAsset {
    /// The `.uasset` file. Holds the payload too for zen assets.
    pub uasset: Vec<u8>,
    /// The companion `.uexp` file of legacy assets.
    pub uexp: Option<Vec<u8>>,
}

impl AssetHeader {
    /// Locate the payload-size field for a payload of `uexp` size.
    ///
    /// # Errors
    /// Returns [`Error::HeaderTooShort`] if the field lies outside the
    /// preserved bytes and [`Error::ValueTooLarge`] if the size does not
    /// fit an `i32`.
    pub fn size_patch(&self, uexp: &Uexp) -> Result<SizePatch> {
        let offset = match (self.version, &self.summary) {
            (FormatVersion::Zen, Some(summary)) => summary.size_field_offset(),
            _ => self
                .raw
                .len()
                .checked_sub(LEGACY_SIZE_FIELD_FROM_END)
                .ok_or(Error::HeaderTooShort {
                    len: self.raw.len(),
                })? as u64,
        };
        if offset + 4 > self.raw.len() as u64 {
            return Err(Error::HeaderTooShort {
                len: self.raw.len(),
            });
        }

        let size = uexp.bin_size();
        let value = i32::try_from(size).map_err(|_| Error::ValueTooLarge {
            what: "payload size",
            value: size as u64,
        })?;
        Ok(SizePatch { offset, value })
    }
}

impl Uasset {
    /// Re-derive every sub-entry name id from the current id strings.
    ///
    /// # Errors
    /// Returns [`Error::NameNotFound`] if edited data names a sub-entry id
    /// the header does not contain.
    pub fn update(&mut self) -> Result<()> {
        self.uexp.update_name_ids(&self.header.names)
    }

    /// Encode the asset in memory.
    ///
    /// # Errors
    /// Returns an error if name ids cannot be re-derived or the size field
    /// cannot be patched.
    pub fn encode(&mut self) -> Result<EncodedAsset> {
        self.update()?;

        let version = self.header.version;
        let patch = self.header.size_patch(&self.uexp)?;

        let mut writer = ByteWriter::new(Cursor::new(Vec::new()), version);
        writer.write_bytes(&self.header.raw)?;

        let uexp = match version {
            FormatVersion::Legacy => {
                let mut payload = ByteWriter::new(Cursor::new(Vec::new()), version);
                self.uexp.write(&mut payload).context("payload")?;
                Some(payload.into_inner()?.into_inner())
            }
            FormatVersion::Zen => {
                self.uexp.write(&mut writer).context("payload")?;
                None
            }
        };
        writer.finalize(patch)?;

        Ok(EncodedAsset {
            uasset: writer.into_inner()?.into_inner(),
            uexp,
        })
    }

    /// Encode and write the asset to `path`, plus the sibling `.uexp` file
    /// for legacy assets.
    ///
    /// Every output is staged in a temporary file in the destination
    /// directory first. Nothing is moved into place until all of them are
    /// written, and the `.uasset` is moved last.
    ///
    /// # Errors
    /// Returns an error naming the file on any encode or I/O failure.
    pub fn write_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let encoded = self
            .encode()
            .with_context(|| format!("writing {}", path.display()))?;

        let uasset_file = stage(path, &encoded.uasset)?;
        let uexp_file = match &encoded.uexp {
            Some(uexp) => {
                let uexp_path = uexp_path(path);
                let file = stage(&uexp_path, uexp)?;
                Some((file, uexp_path))
            }
            None => None,
        };

        if let Some((file, uexp_path)) = uexp_file {
            info!("Writing {}", uexp_path.display());
            commit(file, &uexp_path)?;
        }
        info!("Writing {}", path.display());
        commit(uasset_file, path)
    }
}

/// Write `data` to `path` through a temporary file in the same directory.
///
/// # Errors
/// Returns [`Error::PersistFailed`] if the file cannot be moved into place.
pub fn persist(path: &Path, data: &[u8]) -> Result<()> {
    let file = stage(path, data)?;
    commit(file, path)
}

/// Write `data` to a temporary file next to `path`.
fn stage(path: &Path, data: &[u8]) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut file =
        NamedTempFile::new_in(dir).with_context(|| format!("writing {}", path.display()))?;
    file.write_all(data)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(file)
}

/// Move a staged file into place.
fn commit(file: NamedTempFile, path: &Path) -> Result<()> {
    file.persist(path).map_err(|e| Error::PersistFailed {
        path: path.to_path_buf(),
        message: e.error.to_string(),
    })?;
    Ok(())
}
