//! # OBIS Line Decoder
//!
//! Decodes one telegram line of the shape `<tag>(<value>)` or
//! `<tag>(<value1>)(<value2>)` into a [`Reading`], using `nom` to split the tag
//! from its parenthesized value groups.
//!
//! The result distinguishes three outcomes:
//! - `Ok(Some(reading))` for a recognized tag with a usable value,
//! - `Ok(None)` for lines that carry nothing to report (unknown tags, the
//!   header and trailer lines, empty payloads),
//! - `Err(DecodeError)` for a recognized tag whose payload is malformed.
//!
//! ```rust
//! use p1_rs::obis::{ObisDecoder, ReadingValue};
//!
//! let decoder = ObisDecoder::default();
//! let reading = decoder.decode("1-0:1.8.1(012345.678*kWh)").unwrap().unwrap();
//! assert_eq!(reading.value, ReadingValue::Numeric(12345.678));
//! assert_eq!(reading.unit, "kWh");
//! ```

use crate::constants::{P1_GROUP_CLOSE, P1_GROUP_OPEN, P1_UNIT_SEPARATOR};
use crate::error::DecodeError;
use crate::obis::catalog::{ObisCatalog, ObisCatalogEntry, ValueShape};
use crate::obis::reading::{Reading, ReadingValue};
use crate::util::hex::hex_to_ascii;
use nom::{
    bytes::complete::take_till, character::complete::char, multi::many0, sequence::delimited,
    IResult,
};

/// Everything before the first `(`.
fn obis_tag(input: &str) -> IResult<&str, &str> {
    take_till(|c| c == P1_GROUP_OPEN)(input)
}

/// One `(...)` group, returning its contents.
fn value_group(input: &str) -> IResult<&str, &str> {
    delimited(
        char(P1_GROUP_OPEN),
        take_till(|c| c == P1_GROUP_CLOSE),
        char(P1_GROUP_CLOSE),
    )(input)
}

/// Consecutive value groups following the tag.
fn value_groups(input: &str) -> IResult<&str, Vec<&str>> {
    many0(value_group)(input)
}

/// Drops the trailing DST flag (`S`/`W`) of a DSMR timestamp.
fn strip_dst_flag(value: &str) -> &str {
    let mut chars = value.chars();
    chars.next_back();
    chars.as_str()
}

/// Decodes telegram lines against a borrowed catalog.
#[derive(Debug, Clone, Copy)]
pub struct ObisDecoder<'c> {
    catalog: &'c ObisCatalog,
}

impl Default for ObisDecoder<'static> {
    fn default() -> Self {
        ObisDecoder::new(ObisCatalog::dsmr())
    }
}

impl<'c> ObisDecoder<'c> {
    pub fn new(catalog: &'c ObisCatalog) -> Self {
        ObisDecoder { catalog }
    }

    pub fn catalog(&self) -> &'c ObisCatalog {
        self.catalog
    }

    /// Decodes a single line. A trailing line terminator is ignored.
    pub fn decode(&self, line: &str) -> Result<Option<Reading>, DecodeError> {
        let line = line.trim_end_matches(['\r', '\n']);

        let (rest, tag) = match obis_tag(line) {
            Ok(parsed) => parsed,
            Err(_) => return Ok(None),
        };
        let entry = match self.catalog.lookup(tag) {
            Some(entry) => entry,
            None => return Ok(None),
        };
        let groups = match value_groups(rest) {
            Ok((_, groups)) => groups,
            Err(_) => return Ok(None),
        };

        let primary = match groups.first() {
            Some(primary) if !primary.is_empty() => *primary,
            _ => return Ok(None),
        };

        if groups.len() > 1 {
            let timestamp = strip_dst_flag(primary).to_string();
            let payload = groups[1];
            if payload.is_empty() {
                return Ok(None);
            }
            let (value, unit) = match entry.shape {
                ValueShape::HexString => (decode_hex_text(entry, payload)?, String::new()),
                _ => decode_numeric(entry, payload)?,
            };
            return Ok(Some(make_reading(entry, value, unit, Some(timestamp))));
        }

        let (value, unit) = match entry.shape {
            ValueShape::Timestamp => (
                ReadingValue::Text(strip_dst_flag(primary).to_string()),
                String::new(),
            ),
            ValueShape::HexString => (decode_hex_text(entry, primary)?, String::new()),
            ValueShape::Numeric | ValueShape::TimestampedNumeric => decode_numeric(entry, primary)?,
        };
        Ok(Some(make_reading(entry, value, unit, None)))
    }
}

fn make_reading(
    entry: &ObisCatalogEntry,
    value: ReadingValue,
    unit: String,
    timestamp: Option<String>,
) -> Reading {
    Reading {
        tag: entry.code,
        description: entry.description,
        value,
        unit,
        timestamp,
    }
}

fn decode_hex_text(entry: &ObisCatalogEntry, payload: &str) -> Result<ReadingValue, DecodeError> {
    hex_to_ascii(payload)
        .map(ReadingValue::Text)
        .map_err(|_| DecodeError::BadHexValue {
            tag: entry.code.to_string(),
            raw: payload.to_string(),
        })
}

fn decode_numeric(
    entry: &ObisCatalogEntry,
    payload: &str,
) -> Result<(ReadingValue, String), DecodeError> {
    let (number, unit) = payload
        .split_once(P1_UNIT_SEPARATOR)
        .unwrap_or((payload, ""));

    match number.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok((ReadingValue::Numeric(v), unit.to_string())),
        _ => Err(DecodeError::BadNumericValue {
            tag: entry.code.to_string(),
            raw: payload.to_string(),
        }),
    }
}

/// Decodes a line with the DSMR catalog.
pub fn decode_line(line: &str) -> Result<Option<Reading>, DecodeError> {
    ObisDecoder::default().decode(line)
}
