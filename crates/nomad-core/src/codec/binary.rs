//! Byte passthrough for binary columns.
//!
//! Each byte maps to the char with the same code point (U+0000..=U+00FF),
//! so bytes below 0x80 appear verbatim and every byte string round-trips.

use crate::codec::CodecError;

pub(super) fn to_text(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

pub(super) fn from_text(text: &str) -> Result<Vec<u8>, CodecError> {
    text.chars()
        .map(|c| u8::try_from(c).map_err(|_| CodecError::InvalidBinary { code: u32::from(c) }))
        .collect()
}
