//! The p1 module contains the telegram-level protocol: assembling telegrams
//! from the line stream, verifying their CRC trailer, processing them into
//! readings, and reading them from a serial port or file.

pub mod assembler;
pub mod checksum;
pub mod frame;
pub mod reader;
pub mod serial;
pub mod telegram;

pub use assembler::{AssemblerConfig, AssemblerState, AssemblerStats, TelegramAssembler};
pub use checksum::{crc16, verify, ChecksumResult};
pub use frame::TelegramFrame;
pub use reader::{P1FileReader, TelegramReader};
pub use serial::{P1SerialReader, SerialConfig};
pub use telegram::{process, DecodedTelegram, TelegramProcessor};
