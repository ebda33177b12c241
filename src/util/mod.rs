//! # Utility Modules
//!
//! Hex decoding of DSMR text payloads and rate-limited logging helpers.

pub mod hex;
pub mod logging;

pub use hex::{decode_hex, format_hex_compact, hex_to_ascii, HexError};
pub use logging::{log_frame_hex, log_frame_text, LogThrottle};
