//! Package header (`.uasset`) container
//!
//! The header is kept as raw bytes and written back unchanged except for the
//! export's payload-size field. Only the name table is decoded, since
//! sub-entry ids of the payload refer to it.

mod name_table;
mod reader;
mod summary;
mod writer;

pub use name_table::NameTable;
pub use summary::{SUMMARY_SIZE, ZenPackageSummary};
pub use reader::uexp_path;
pub use writer::{EncodedAsset, persist};

use crate::formats::FormatVersion;
use crate::formats::text::Uexp;

/// Signature of legacy headers, repeated at the end of legacy payloads.
pub const PACKAGE_MAGIC: [u8; 4] = [0xC1, 0x83, 0x2A, 0x9E];

/// Zen headers start with a zero name id.
pub const ZEN_MARKER: [u8; 4] = [0; 4];

/// Name table counts at or above this are treated as corruption.
pub const MAX_NAMES: u32 = 2048;

/// Legacy header offset of the name count.
pub const LEGACY_NAME_COUNT_OFFSET: u64 = 41;

/// Legacy header offset of the first name.
pub const LEGACY_NAME_TABLE_OFFSET: u64 = 193;

/// Distance of the legacy payload-size field from the end of the header.
pub const LEGACY_SIZE_FIELD_FROM_END: usize = 92;

/// Decoded header of a text asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetHeader {
    pub version: FormatVersion,
    pub names: NameTable,
    /// Header bytes, re-emitted verbatim.
    pub(crate) raw: Vec<u8>,
    /// Present for zen headers only.
    pub summary: Option<ZenPackageSummary>,
}

impl AssetHeader {
    /// The preserved header bytes.
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }
}

/// A header together with its decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uasset {
    pub header: AssetHeader,
    pub uexp: Uexp,
}

impl Uasset {
    #[must_use]
    pub fn version(&self) -> FormatVersion {
        self.header.version
    }

    /// Human readable summary of the header and the payload.
    #[must_use]
    pub fn describe(&self, verbose: bool) -> String {
        let mut out = format!(
            "format: {}\nname count: {}\n",
            self.header.version.name(),
            self.header.names.len()
        );
        if verbose {
            for name in self.header.names.iter() {
                out.push_str(&format!("  {name}\n"));
            }
        }
        out.push_str(&self.uexp.describe(verbose));
        out
    }
}
