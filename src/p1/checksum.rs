//! # Telegram Checksum
//!
//! DSMR 4+ telegrams end with `!XXXX`, where `XXXX` is the CRC-16/ARC
//! (polynomial 0x8005 reflected, initial value 0) of every byte from the
//! leading `/` up to and including the `!`, written as four hex digits.

use crate::constants::P1_END_MARKER;
use crate::error::FramingError;
use crc::{Crc, CRC_16_ARC};

/// CRC engine for telegram trailers.
pub static P1_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_ARC);

/// Outcome of comparing the computed CRC with the transmitted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumResult {
    pub computed: u16,
    pub transmitted: u16,
}

impl ChecksumResult {
    pub fn is_valid(&self) -> bool {
        self.computed == self.transmitted
    }
}

/// CRC-16/ARC of `data`.
pub fn crc16(data: &[u8]) -> u16 {
    P1_CRC.checksum(data)
}

/// Verifies the trailer of a complete telegram.
///
/// Returns `Ok` with both values whether or not they match; only a missing end
/// marker or an unparseable trailer is an error.
pub fn verify(frame: &[u8]) -> Result<ChecksumResult, FramingError> {
    let end = frame
        .iter()
        .position(|&b| b == P1_END_MARKER)
        .ok_or(FramingError::MarkerNotFound)?;

    let transmitted = parse_trailer(&frame[end + 1..])?;
    let computed = crc16(&frame[..=end]);

    Ok(ChecksumResult {
        computed,
        transmitted,
    })
}

fn parse_trailer(trailer: &[u8]) -> Result<u16, FramingError> {
    let invalid = || FramingError::InvalidChecksumEncoding(String::from_utf8_lossy(trailer).into_owned());

    let text = std::str::from_utf8(trailer).map_err(|_| invalid())?.trim();
    // from_str_radix would also accept a leading '+'
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    u16::from_str_radix(text, 16).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc16_arc_check_value() {
        assert_eq!(crc16(b"123456789"), 0xBB3D);
        assert_eq!(crc16(b"test"), 0xF82E);
        assert_eq!(crc16(b""), 0x0000);
    }

    #[test]
    fn test_trailer_whitespace_and_case() {
        assert_eq!(parse_trailer(b"bb3d\r\n"), Ok(0xBB3D));
        assert_eq!(parse_trailer(b"  BB3D "), Ok(0xBB3D));
    }

    #[test]
    fn test_trailer_rejects_garbage() {
        assert!(matches!(
            parse_trailer(b"XYZW\r\n"),
            Err(FramingError::InvalidChecksumEncoding(_))
        ));
        assert!(parse_trailer(b"\r\n").is_err());
        assert!(parse_trailer(b"+BB3").is_err());
        assert!(parse_trailer(b"1BB3D").is_err());
        assert!(parse_trailer(&[0xFF, 0x30]).is_err());
    }

    #[test]
    fn test_verify_uses_bytes_through_marker() {
        let body = b"/X\r\n!";
        let crc = crc16(body);
        let frame = format!("/X\r\n!{crc:04X}\r\n");
        let result = verify(frame.as_bytes()).unwrap();
        assert!(result.is_valid());
        assert_eq!(result.computed, crc);
    }

    #[test]
    fn test_verify_without_marker() {
        assert_eq!(verify(b"/X\r\n1-0:1.8.1(1*kWh)\r\n"), Err(FramingError::MarkerNotFound));
    }
}
