//! Subtitle widget metrics
//!
//! FF7 Rebirth draws subtitles in a widget described by `Subtitle00.uasset`.
//! Enlarging it leaves room for dual subtitles. The metrics are plain `f32`
//! values at fixed offsets of that one asset.

use std::fs;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use tracing::info;

use crate::error::{Error, Result, ResultExt};
use crate::formats::FormatVersion;
use crate::formats::asset::{PACKAGE_MAGIC, persist};

/// File name of the widget asset.
pub const WIDGET_FILE_NAME: &str = "Subtitle00.uasset";

/// Shipped widget size.
pub const DEFAULT_WIDTH: f32 = 930.0;
pub const DEFAULT_HEIGHT: f32 = 210.0;

const WIDTH_OFFSETS: [usize; 2] = [36459, 38688];
const HEIGHT_OFFSET: usize = 36488;

/// Widget size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetSize {
    pub width: f32,
    pub height: f32,
}

impl Default for WidgetSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Return a copy of the widget asset with the new size written in.
///
/// # Errors
/// Returns [`Error::UnsupportedVersion`] for FF7 Remake assets and
/// [`Error::UnexpectedEof`] if the data is too short.
pub fn resize_widget(data: &[u8], size: WidgetSize) -> Result<Vec<u8>> {
    if data.starts_with(&PACKAGE_MAGIC) {
        return Err(Error::UnsupportedVersion {
            operation: "widget resize",
            version: FormatVersion::Legacy.name(),
        });
    }

    let mut out = data.to_vec();
    for offset in WIDTH_OFFSETS {
        patch_f32(&mut out, offset, size.width)?;
    }
    patch_f32(&mut out, HEIGHT_OFFSET, size.height)?;
    Ok(out)
}

fn patch_f32(buf: &mut [u8], offset: usize, value: f32) -> Result<()> {
    let end = buf.len();
    let field = buf
        .get_mut(offset..offset + 4)
        .ok_or(Error::UnexpectedEof {
            offset: offset as u64,
            requested: 4,
            end: end as u64,
        })?;
    LittleEndian::write_f32(field, value);
    Ok(())
}

/// Read the widget asset at `input`, resize it and write it to `output`.
///
/// # Errors
/// Returns an error naming the input on any read, resize or write failure.
pub fn resize_widget_file(input: &Path, output: &Path, size: WidgetSize) -> Result<()> {
    info!("Reading {}", input.display());
    let data = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let resized =
        resize_widget(&data, size).with_context(|| format!("resizing {}", input.display()))?;
    info!("Writing {}", output.display());
    persist(output, &resized)
}
