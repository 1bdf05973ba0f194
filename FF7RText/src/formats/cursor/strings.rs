//! String helpers shared by the cursor reader and writer

/// Size of a header-string on disk: length prefix, payload and terminator.
///
/// Empty strings are a bare zero length. ASCII strings are stored as bytes
/// with a one byte terminator; anything else as UTF-16LE with a two byte
/// terminator.
#[must_use]
pub fn header_string_size(s: &str) -> usize {
    let payload = if s.is_empty() {
        0
    } else if s.is_ascii() {
        s.len() + 1
    } else {
        (utf16_len(s) + 1) * 2
    };
    payload + 4
}

/// Size of a zen name-map string on disk: 2 byte packed header and payload.
#[must_use]
pub fn zen_string_size(s: &str) -> usize {
    if s.is_ascii() {
        2 + s.len()
    } else {
        2 + utf16_len(s) * 2
    }
}

/// Number of UTF-16 code units needed for `s`.
#[must_use]
pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Encode `s` as UTF-16LE bytes.
#[must_use]
pub fn to_utf16_bytes(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Decode UTF-16LE bytes. Returns `None` on unpaired surrogates.
#[must_use]
pub fn from_utf16_bytes(buf: &[u8]) -> Option<String> {
    let units: Vec<u16> = buf
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}
