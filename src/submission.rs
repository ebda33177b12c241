//! # Submission Payload
//!
//! Builds the JSON document a metering backend receives for each telegram.
//! Sending it is left to the caller; this module only selects the required
//! readings and renders them. The device key and the backend's meter id are
//! supplied by the caller through [`SubmissionContext`].
//!
//! ```rust,ignore
//! let context = SubmissionContext::new("6f1c…", 42);
//! let payload = MeterDataPayload::from_telegram(&telegram, &context)?;
//! let body = payload.to_json()?;
//! ```

use crate::constants::{
    OBIS_ENERGY_DELIVERED_TARIFF1, OBIS_ENERGY_DELIVERED_TARIFF2, OBIS_GAS_DELIVERED,
    OBIS_POWER_DELIVERED, OBIS_TIMESTAMP,
};
use crate::error::P1Error;
use crate::p1::telegram::DecodedTelegram;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Format of the `0-0:1.0.0` value once the DST flag is stripped.
const TELEGRAM_TIME_FORMAT: &str = "%y%m%d%H%M%S";

/// Format the backend expects in `date`.
const PAYLOAD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Identity of the submitting device, resolved by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionContext {
    /// Stable key identifying this reader device.
    pub device_key: String,
    /// Backend id of the meter the telegrams come from.
    pub meter_id: i64,
}

impl SubmissionContext {
    pub fn new(device_key: impl Into<String>, meter_id: i64) -> Self {
        SubmissionContext {
            device_key: device_key.into(),
            meter_id,
        }
    }
}

/// One submission, serialized with camelCase keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterDataPayload {
    pub date: String,
    pub meter_id: i64,
    pub device_key: String,
    pub total_consumption_day: f64,
    pub total_consumption_night: f64,
    pub all_phase_consumption: f64,
    pub gas_consumption: f64,
}

impl MeterDataPayload {
    pub fn from_telegram(
        telegram: &DecodedTelegram,
        context: &SubmissionContext,
    ) -> Result<Self, P1Error> {
        let raw_time = telegram
            .timestamp()
            .ok_or(P1Error::MissingReading(OBIS_TIMESTAMP))?;

        Ok(MeterDataPayload {
            date: parse_telegram_time(raw_time)?
                .format(PAYLOAD_TIME_FORMAT)
                .to_string(),
            meter_id: context.meter_id,
            device_key: context.device_key.clone(),
            total_consumption_day: required(telegram, OBIS_ENERGY_DELIVERED_TARIFF1)?,
            total_consumption_night: required(telegram, OBIS_ENERGY_DELIVERED_TARIFF2)?,
            all_phase_consumption: required(telegram, OBIS_POWER_DELIVERED)?,
            gas_consumption: required(telegram, OBIS_GAS_DELIVERED)?,
        })
    }

    pub fn to_json(&self) -> Result<String, P1Error> {
        serde_json::to_string(self).map_err(|e| P1Error::Other(e.to_string()))
    }
}

fn required(telegram: &DecodedTelegram, tag: &'static str) -> Result<f64, P1Error> {
    telegram.numeric(tag).ok_or(P1Error::MissingReading(tag))
}

/// Parses a `YYMMDDhhmmss` telegram timestamp.
pub fn parse_telegram_time(raw: &str) -> Result<NaiveDateTime, P1Error> {
    NaiveDateTime::parse_from_str(raw, TELEGRAM_TIME_FORMAT)
        .map_err(|e| P1Error::InvalidTimestamp(format!("{raw}: {e}")))
}
