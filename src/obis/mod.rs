//! The obis module decodes the data lines of a telegram: the static catalog of
//! known OBIS codes, the line decoder and the typed readings it produces.

pub mod catalog;
pub mod decoder;
pub mod reading;

pub use catalog::{ObisCatalog, ObisCatalogEntry, ValueShape, DSMR_ENTRIES};
pub use decoder::{decode_line, ObisDecoder};
pub use reading::{Reading, ReadingValue};
