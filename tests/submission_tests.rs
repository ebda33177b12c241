//! Tests for the backend submission payload.


use p1_rs::{process, MeterDataPayload, P1Error, SubmissionContext};
use telegram_support::{telegram_frame, with_checksum, FLUVIUS_LINES, MIXED_LINES};

fn context() -> SubmissionContext {
    SubmissionContext::new("device-key-1", 42)
}

#[test]
fn test_payload_from_fluvius_telegram() {
    let telegram = process(&telegram_frame(FLUVIUS_LINES)).unwrap();
    let payload = MeterDataPayload::from_telegram(&telegram, &context()).unwrap();

    assert_eq!(
        payload,
        MeterDataPayload {
            date: "2020-05-12 13:54:09".to_string(),
            meter_id: 42,
            device_key: "device-key-1".to_string(),
            total_consumption_day: 0.034,
            total_consumption_night: 15.758,
            all_phase_consumption: 0.0,
            gas_consumption: 112.384,
        }
    );
}

#[test]
fn test_payload_json_uses_camel_case() {
    let telegram = process(&telegram_frame(FLUVIUS_LINES)).unwrap();
    let payload = MeterDataPayload::from_telegram(&telegram, &context()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();

    assert_eq!(json["date"], "2020-05-12 13:54:09");
    assert_eq!(json["meterId"], 42);
    assert_eq!(json["deviceKey"], "device-key-1");
    assert_eq!(json["totalConsumptionDay"], 0.034);
    assert_eq!(json["totalConsumptionNight"], 15.758);
    assert_eq!(json["allPhaseConsumption"], 0.0);
    assert_eq!(json["gasConsumption"], 112.384);
    assert_eq!(json.as_object().unwrap().len(), 7);
}

#[test]
fn test_missing_timestamp() {
    let telegram = process(&telegram_frame(MIXED_LINES)).unwrap();
    let err = MeterDataPayload::from_telegram(&telegram, &context()).unwrap_err();
    assert!(matches!(err, P1Error::MissingReading("0-0:1.0.0")));
}

#[test]
fn test_missing_gas_reading() {
    let lines = with_checksum(&[
        "/ISK5\\2M550T-1012",
        "",
        "0-0:1.0.0(200512135409S)",
        "1-0:1.8.1(000000.034*kWh)",
        "1-0:1.8.2(000015.758*kWh)",
        "1-0:1.7.0(00.120*kW)",
    ]);
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let telegram = process(&telegram_frame(&lines)).unwrap();

    let err = MeterDataPayload::from_telegram(&telegram, &context()).unwrap_err();
    assert!(matches!(err, P1Error::MissingReading("0-1:24.2.3")));
    assert_eq!(err.to_string(), "Missing reading: 0-1:24.2.3");
}

#[test]
fn test_invalid_timestamp() {
    let lines = with_checksum(&[
        "/ISK5\\2M550T-1012",
        "0-0:1.0.0(209912135409W)",
        "1-0:1.8.1(000000.034*kWh)",
        "1-0:1.8.2(000015.758*kWh)",
        "1-0:1.7.0(00.120*kW)",
        "0-1:24.2.3(200512134558S)(00112.384*m3)",
    ]);
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let telegram = process(&telegram_frame(&lines)).unwrap();

    let err = MeterDataPayload::from_telegram(&telegram, &context()).unwrap_err();
    assert!(matches!(err, P1Error::InvalidTimestamp(_)));
}
