//! # Hex Encoding/Decoding Utilities
//!
//! DSMR transmits equipment identifiers and text messages as hex-encoded
//! ASCII (`3030303030303030` is `00000000`). This module decodes those payloads
//! and provides compact hex formatting for frame dumps in logs.
//!
//! ## Usage
//!
//! ```rust
//! use p1_rs::util::hex::{decode_hex, hex_to_ascii, format_hex_compact};
//!
//! assert_eq!(decode_hex("3030").unwrap(), vec![0x30, 0x30]);
//! assert_eq!(hex_to_ascii("4531").unwrap(), "E1");
//! assert_eq!(format_hex_compact(b"/!"), "2f 21");
//! ```

use thiserror::Error;

/// Errors that can occur during hex operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HexError {
    #[error("Odd number of hex characters: {0}")]
    OddLength(usize),

    #[error("Empty hex string")]
    EmptyString,

    #[error("Hex decoding error: {0}")]
    DecodeError(String),

    #[error("Decoded bytes are not ASCII")]
    NotAscii,
}

/// Decode hex string to bytes
///
/// Accepts both uppercase and lowercase hex characters.
/// Whitespace is automatically stripped.
pub fn decode_hex(hex_str: &str) -> Result<Vec<u8>, HexError> {
    let cleaned: String = hex_str.chars().filter(|c| !c.is_whitespace()).collect();

    if cleaned.is_empty() {
        return Err(HexError::EmptyString);
    }

    if cleaned.len() % 2 != 0 {
        return Err(HexError::OddLength(cleaned.len()));
    }

    hex::decode(&cleaned).map_err(|e| HexError::DecodeError(e.to_string()))
}

/// Decode a hex-encoded ASCII payload into its text.
pub fn hex_to_ascii(hex_str: &str) -> Result<String, HexError> {
    let bytes = decode_hex(hex_str)?;
    if !bytes.is_ascii() {
        return Err(HexError::NotAscii);
    }
    // ASCII is always valid UTF-8
    String::from_utf8(bytes).map_err(|_| HexError::NotAscii)
}

/// Format hex data for compact display (useful for logs)
///
/// Formats data as "2f 49 53 4b" with spaces between bytes.
pub fn format_hex_compact(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
