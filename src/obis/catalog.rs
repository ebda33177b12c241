//! # OBIS Code Catalog
//!
//! The fixed set of OBIS codes this crate decodes, each with a human-readable
//! description and the shape of value the meter sends for it. The catalog is
//! built once and shared read-only; decoders borrow it.

use crate::constants::{
    OBIS_ENERGY_DELIVERED_TARIFF1, OBIS_ENERGY_DELIVERED_TARIFF2, OBIS_EQUIPMENT_ID,
    OBIS_GAS_DELIVERED, OBIS_GAS_EQUIPMENT_ID, OBIS_POWER_DELIVERED, OBIS_TEXT_MESSAGE,
    OBIS_TIMESTAMP, OBIS_VERSION_INFO,
};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Expected payload layout of a catalogued code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueShape {
    /// `(<number>*<unit>)` or a bare number.
    Numeric,
    /// Hex-encoded ASCII text (equipment identifiers, text messages).
    HexString,
    /// `(YYMMDDhhmmssX)` where `X` is the DST flag.
    Timestamp,
    /// `(YYMMDDhhmmssX)(<number>*<unit>)`, used by M-Bus sub-meters.
    TimestampedNumeric,
}

/// One catalogued OBIS code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObisCatalogEntry {
    pub code: &'static str,
    pub description: &'static str,
    pub shape: ValueShape,
}

const fn entry(code: &'static str, description: &'static str, shape: ValueShape) -> ObisCatalogEntry {
    ObisCatalogEntry {
        code,
        description,
        shape,
    }
}

use ValueShape::{HexString, Numeric, Timestamp, TimestampedNumeric};

/// Codes transmitted by DSMR 5 / eMUCs (Fluvius) meters, in telegram order.
pub const DSMR_ENTRIES: &[ObisCatalogEntry] = &[
    entry(OBIS_VERSION_INFO, "ID", Numeric),
    entry(OBIS_EQUIPMENT_ID, "Serial number of electricity meter (in ASCII hex)", HexString),
    entry(OBIS_TIMESTAMP, "Timestamp of the telegram", Timestamp),
    entry(OBIS_ENERGY_DELIVERED_TARIFF1, "Rate 1 (day) - total consumption", Numeric),
    entry(OBIS_ENERGY_DELIVERED_TARIFF2, "Rate 2 (night) - total consumption", Numeric),
    entry("1-0:2.8.1", "Rate 1 (day) - total production", Numeric),
    entry("1-0:2.8.2", "Rate 2 (night) - total production", Numeric),
    entry("0-0:96.14.0", "Current rate (1=day,2=night)", Numeric),
    entry(OBIS_POWER_DELIVERED, "All phases consumption", Numeric),
    entry("1-0:2.7.0", "All phases production", Numeric),
    entry("1-0:21.7.0", "L1 consumption", Numeric),
    entry("1-0:41.7.0", "L2 consumption", Numeric),
    entry("1-0:61.7.0", "L3 consumption", Numeric),
    entry("1-0:22.7.0", "L1 production", Numeric),
    entry("1-0:42.7.0", "L2 production", Numeric),
    entry("1-0:62.7.0", "L3 production", Numeric),
    entry("1-0:32.7.0", "L1 voltage", Numeric),
    entry("1-0:52.7.0", "L2 voltage", Numeric),
    entry("1-0:72.7.0", "L3 voltage", Numeric),
    entry("1-0:31.7.0", "L1 current", Numeric),
    entry("1-0:51.7.0", "L2 current", Numeric),
    entry("1-0:71.7.0", "L3 current", Numeric),
    entry("0-0:96.3.10", "Switch position electricity", Numeric),
    entry("0-0:17.0.0", "Max. allowed power/phase", Numeric),
    entry("1-0:31.4.0", "Max. allowed current/phase", Numeric),
    entry(OBIS_TEXT_MESSAGE, "Message", HexString),
    entry("0-1:24.1.0", "Other devices on bus", Numeric),
    entry(OBIS_GAS_EQUIPMENT_ID, "Serial number of natural gas meter (in ASCII hex)", HexString),
    entry("0-1:24.4.0", "Switch position natural gas", Numeric),
    entry(OBIS_GAS_DELIVERED, "Reading from natural gas meter (timestamp) (value)", TimestampedNumeric),
];

static DSMR_CATALOG: Lazy<ObisCatalog> = Lazy::new(|| ObisCatalog::from_entries(DSMR_ENTRIES));

/// Immutable lookup table from OBIS code to catalog entry.
#[derive(Debug, Clone)]
pub struct ObisCatalog {
    entries: &'static [ObisCatalogEntry],
    index: HashMap<&'static str, usize>,
}

impl ObisCatalog {
    /// The process-wide DSMR catalog.
    pub fn dsmr() -> &'static ObisCatalog {
        &DSMR_CATALOG
    }

    /// Builds a catalog over a static entry table. A code listed twice resolves
    /// to its first entry.
    pub fn from_entries(entries: &'static [ObisCatalogEntry]) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, e) in entries.iter().enumerate() {
            index.entry(e.code).or_insert(i);
        }
        ObisCatalog { entries, index }
    }

    pub fn lookup(&self, code: &str) -> Option<&ObisCatalogEntry> {
        self.index.get(code).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// Description of a code, if catalogued.
    pub fn description(&self, code: &str) -> Option<&'static str> {
        self.lookup(code).map(|e| e.description)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &ObisCatalogEntry> {
        self.entries.iter()
    }
}
