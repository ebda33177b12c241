//! # P1 Error Handling
//!
//! This module defines the error types of the p1-rs crate. Errors are scoped
//! to what they spoil: a `FramingError` or a checksum mismatch loses one
//! telegram, and a `DecodeError` loses one line (it is reported in the
//! telegram's diagnostics). `P1Error` covers telegram-level failures together
//! with the I/O failures of the outer reader.

use std::time::Duration;
use thiserror::Error;

/// A malformed or missing checksum trailer. Fatal to the current telegram only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FramingError {
    /// No end marker `!` in the buffer handed to checksum verification.
    #[error("checksum-marker-not-found")]
    MarkerNotFound,

    /// The text after `!` is not a hexadecimal 16-bit value.
    #[error("invalid-checksum-encoding: {0:?}")]
    InvalidChecksumEncoding(String),
}

/// A malformed payload on a recognized line. Fatal to that line only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The numeric part of a value-with-unit payload does not parse.
    #[error("bad-numeric-value: {tag} ({raw})")]
    BadNumericValue { tag: String, raw: String },

    /// A hex-encoded text payload is not valid hex or not ASCII.
    #[error("bad-hex-value: {tag} ({raw})")]
    BadHexValue { tag: String, raw: String },

    /// A telegram line is not valid UTF-8.
    #[error("invalid line encoding at line {line}")]
    InvalidEncoding { line: usize },
}

/// Represents the different error types that can occur in the P1 crate.
#[derive(Debug, Error)]
pub enum P1Error {
    /// Indicates a malformed or missing checksum trailer.
    #[error("Framing error: {0}")]
    Framing(#[from] FramingError),

    /// Indicates a telegram whose computed and transmitted CRC disagree.
    #[error("Checksum mismatch: computed {computed:04X}, transmitted {transmitted:04X}")]
    ChecksumMismatch { computed: u16, transmitted: u16 },

    /// Indicates an error related to the serial port communication.
    #[error("Serial port error: {0}")]
    SerialPortError(String),

    /// No complete line arrived within the reader's timeout. The reader keeps
    /// any partial line and can be polled again.
    #[error("Read timeout: no data received within {0:?}")]
    ReadTimeout(Duration),

    /// Indicates an I/O failure of the underlying line source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A reading required for a submission payload is absent from the telegram.
    #[error("Missing reading: {0}")]
    MissingReading(&'static str),

    /// The telegram timestamp is not a valid `YYMMDDhhmmss` value.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A catch‑all error for uncategorized cases.
    #[error("Other error: {0}")]
    Other(String),
}

impl P1Error {
    /// True for errors that only spoil the current telegram; the reader loop
    /// should log them and keep going.
    pub fn is_telegram_local(&self) -> bool {
        matches!(
            self,
            P1Error::Framing(_) | P1Error::ChecksumMismatch { .. }
        )
    }
}
