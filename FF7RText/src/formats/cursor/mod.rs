//! Byte cursor codec
//!
//! Positioned little-endian reads and writes plus the two string encodings
//! used by the text assets: length-prefixed header-strings and the packed
//! zen name-map strings.

mod reader;
mod strings;
mod writer;

pub use reader::ByteReader;
pub use strings::{header_string_size, utf16_len, zen_string_size};
pub use writer::{ByteWriter, SizePatch};
