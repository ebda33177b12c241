//! DSMR P1 Protocol Constants
//!
//! Markers, line terminators and OBIS codes used by the telegram framing and
//! decoding, based on the DSMR P1 companion standard.

/// First byte of every telegram (`/XXX5<identification>`).
pub const P1_START_MARKER: u8 = b'/';

/// Byte preceding the CRC trailer on the last telegram line.
pub const P1_END_MARKER: u8 = b'!';

/// Canonical line terminator; the CRC is computed over lines ending in it.
pub const P1_LINE_TERMINATOR: &[u8] = b"\r\n";

/// Opens a value group on a data line.
pub const P1_GROUP_OPEN: char = '(';

/// Closes a value group on a data line.
pub const P1_GROUP_CLOSE: char = ')';

/// Separates a numeric value from its unit inside a group.
pub const P1_UNIT_SEPARATOR: char = '*';

/// Default upper bound on an assembled telegram, in bytes.
pub const P1_MAX_FRAME_LEN: usize = 64 * 1024;

// ----------------------------------------------------------------------------
// Serial line defaults (DSMR 4+/ESMR 5)
// ----------------------------------------------------------------------------

pub const P1_DEFAULT_BAUDRATE: u32 = 115_200;
pub const P1_DEFAULT_TIMEOUT_SECS: u64 = 10;

// ----------------------------------------------------------------------------
// OBIS codes referenced outside the catalog
// ----------------------------------------------------------------------------

pub const OBIS_VERSION_INFO: &str = "0-0:96.1.4";
pub const OBIS_EQUIPMENT_ID: &str = "0-0:96.1.1";
pub const OBIS_TIMESTAMP: &str = "0-0:1.0.0";
pub const OBIS_ENERGY_DELIVERED_TARIFF1: &str = "1-0:1.8.1";
pub const OBIS_ENERGY_DELIVERED_TARIFF2: &str = "1-0:1.8.2";
pub const OBIS_POWER_DELIVERED: &str = "1-0:1.7.0";
pub const OBIS_TEXT_MESSAGE: &str = "0-0:96.13.0";
pub const OBIS_GAS_EQUIPMENT_ID: &str = "0-1:96.1.1";
pub const OBIS_GAS_DELIVERED: &str = "0-1:24.2.3";

