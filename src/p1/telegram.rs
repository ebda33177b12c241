//! # Telegram Processing
//!
//! Turns a complete [`TelegramFrame`] into its decoded readings: the checksum
//! gates the frame, then every line is decoded on its own. A bad line costs
//! only that line (it is recorded in `diagnostics`); a bad checksum costs the
//! whole telegram.

use crate::constants::{OBIS_EQUIPMENT_ID, OBIS_GAS_EQUIPMENT_ID, OBIS_TIMESTAMP};
use crate::error::{DecodeError, P1Error};
use crate::obis::{ObisDecoder, Reading};
use crate::p1::assembler::TelegramAssembler;
use crate::p1::checksum::{self, ChecksumResult};
use crate::p1::frame::TelegramFrame;
use crate::util::logging::log_frame_text;
use log::debug;

/// Readings of one checksummed telegram, in line order.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTelegram {
    /// Meter identification from the header line.
    pub identification: Option<String>,
    pub readings: Vec<Reading>,
    /// Lines of recognized tags that could not be decoded.
    pub diagnostics: Vec<DecodeError>,
    pub checksum: ChecksumResult,
}

impl DecodedTelegram {
    /// First reading for an OBIS code.
    pub fn get(&self, tag: &str) -> Option<&Reading> {
        self.readings.iter().find(|r| r.tag == tag)
    }

    pub fn numeric(&self, tag: &str) -> Option<f64> {
        self.get(tag).and_then(|r| r.value.as_f64())
    }

    pub fn text(&self, tag: &str) -> Option<&str> {
        self.get(tag).and_then(|r| r.value.as_str())
    }

    /// Electricity meter serial number.
    pub fn equipment_id(&self) -> Option<&str> {
        self.text(OBIS_EQUIPMENT_ID)
    }

    /// Gas meter serial number.
    pub fn gas_equipment_id(&self) -> Option<&str> {
        self.text(OBIS_GAS_EQUIPMENT_ID)
    }

    /// Telegram timestamp as `YYMMDDhhmmss`.
    pub fn timestamp(&self) -> Option<&str> {
        self.text(OBIS_TIMESTAMP)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn into_readings(self) -> Vec<Reading> {
        self.readings
    }
}

/// Checksum gate plus per-line decoding.
#[derive(Debug, Clone, Copy)]
pub struct TelegramProcessor<'c> {
    decoder: ObisDecoder<'c>,
}

impl Default for TelegramProcessor<'static> {
    fn default() -> Self {
        TelegramProcessor::new(ObisDecoder::default())
    }
}

impl<'c> TelegramProcessor<'c> {
    pub fn new(decoder: ObisDecoder<'c>) -> Self {
        TelegramProcessor { decoder }
    }

    pub fn decoder(&self) -> &ObisDecoder<'c> {
        &self.decoder
    }

    /// Verifies and decodes one telegram.
    pub fn process(&self, frame: &TelegramFrame) -> Result<DecodedTelegram, P1Error> {
        log_frame_text("Processing telegram", frame.as_bytes());

        let checksum = checksum::verify(frame.as_bytes())?;
        if !checksum.is_valid() {
            return Err(P1Error::ChecksumMismatch {
                computed: checksum.computed,
                transmitted: checksum.transmitted,
            });
        }

        let mut readings = Vec::new();
        let mut diagnostics = Vec::new();

        for (index, line) in frame.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let line_no = index + 1;
            let text = match std::str::from_utf8(line) {
                Ok(text) => text,
                Err(_) => {
                    let err = DecodeError::InvalidEncoding { line: line_no };
                    debug!("Skipping line {line_no}: {err}");
                    diagnostics.push(err);
                    continue;
                }
            };
            match self.decoder.decode(text) {
                Ok(Some(reading)) => readings.push(reading),
                Ok(None) => {}
                Err(err) => {
                    debug!("Skipping line {line_no}: {err}");
                    diagnostics.push(err);
                }
            }
        }

        debug!(
            "Decoded {} readings ({} skipped lines)",
            readings.len(),
            diagnostics.len()
        );

        Ok(DecodedTelegram {
            identification: frame.identification(),
            readings,
            diagnostics,
            checksum,
        })
    }

    /// Runs a line sequence (e.g. a captured P1 log) through a fresh
    /// assembler and processes every telegram found in it.
    pub fn process_chunks<I, C>(&self, chunks: I) -> Vec<Result<DecodedTelegram, P1Error>>
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        let mut assembler = TelegramAssembler::new();
        chunks
            .into_iter()
            .filter_map(|chunk| assembler.push(chunk.as_ref()))
            .map(|frame| self.process(&frame))
            .collect()
    }
}

/// Verifies and decodes one telegram with the DSMR catalog.
pub fn process(frame: &TelegramFrame) -> Result<DecodedTelegram, P1Error> {
    TelegramProcessor::default().process(frame)
}
