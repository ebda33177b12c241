//! # p1-rs - A Rust Crate for Reading DSMR Smart Meter Telegrams
//!
//! The p1-rs crate reads the P1 port of a DSMR (Dutch Smart Meter
//! Requirements) or eMUCs (Belgian) smart meter. The meter pushes a text
//! "telegram" every second or so; this crate reassembles telegrams from the
//! line stream, checks their CRC-16 trailer and decodes the OBIS-coded lines
//! into typed readings.
//!
//! ## Features
//!
//! - Streaming telegram assembly from lines or arbitrary byte chunks
//! - CRC-16/ARC trailer verification
//! - Decoding of energy, power, voltage, current, equipment id and gas meter values
//! - Async reading from a serial port or a captured log file
//! - Submission payload construction for a metering backend
//! - Support for logging and error handling
//!
//! ## Usage
//!
//! ```rust
//! use p1_rs::{TelegramProcessor, ReadingValue};
//!
//! let lines = [
//!     "/ISK5\\2M550T-1012",
//!     "",
//!     "1-0:1.8.1(012345.678*kWh)",
//!     "0-0:96.1.1(3030303030303030)",
//!     "0-1:24.2.3(200101120000W)(00123.456*m3)",
//!     "9-9:99.9.9(foo)",
//!     "1-0:1.8.2()",
//!     "!C15B",
//! ];
//!
//! let processor = TelegramProcessor::default();
//! let telegrams = processor.process_chunks(lines);
//! let telegram = telegrams[0].as_ref().unwrap();
//! assert_eq!(telegram.readings.len(), 3);
//! assert_eq!(telegram.readings[0].value, ReadingValue::Numeric(12345.678));
//! assert_eq!(telegram.equipment_id(), Some("00000000"));
//! ```

pub mod constants;
pub mod error;
pub mod logging;
pub mod obis;
pub mod p1;
pub mod submission;
pub mod util;

pub use crate::error::{DecodeError, FramingError, P1Error};
pub use crate::logging::{init_logger, log_info};

// Core telegram types
pub use obis::{decode_line, ObisCatalog, ObisDecoder, Reading, ReadingValue, ValueShape};
pub use p1::{
    process, ChecksumResult, DecodedTelegram, P1FileReader, P1SerialReader, SerialConfig,
    TelegramAssembler, TelegramFrame, TelegramProcessor, TelegramReader,
};
pub use submission::{MeterDataPayload, SubmissionContext};

/// Open the P1 serial port.
///
/// # Arguments
/// * `port` - Serial port path (e.g., "/dev/ttyUSB0" on Linux, "COM3" on Windows)
///
/// # Returns
/// * `Ok(P1SerialReader)` - Reader yielding telegrams from the port
/// * `Err(P1Error)` - Opening the port failed
pub async fn connect(port: &str) -> Result<P1SerialReader, P1Error> {
    P1SerialReader::connect(port).await
}

/// Receive the next decoded telegram.
///
/// # Arguments
/// * `reader` - Reader to receive from
///
/// # Returns
/// * `Ok(Some(DecodedTelegram))` - Verified and decoded telegram
/// * `Ok(None)` - The source is exhausted
/// * `Err(P1Error)` - Reading failed, or the telegram was rejected
pub async fn recv_telegram<R>(reader: &mut TelegramReader<R>) -> Result<Option<DecodedTelegram>, P1Error>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    reader.next_telegram(&TelegramProcessor::default()).await
}
