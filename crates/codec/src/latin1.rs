//! ISO-8859-1 transcoding.
//!
//! The server reads and writes Latin-1, so every code point maps to exactly
//! one byte and anything above U+00FF cannot be sent.

use crate::error::CodecError;

pub fn encode(text: &str) -> Result<Vec<u8>, CodecError> {
    text.chars()
        .map(|ch| u8::try_from(u32::from(ch)).map_err(|_| CodecError::Unencodable(ch)))
        .collect()
}

/// Every byte is a valid Latin-1 character, so decoding cannot fail.
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}
