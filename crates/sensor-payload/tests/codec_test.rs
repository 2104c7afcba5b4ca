//! End-to-end tests for the payload codec.
//!
//! These drive the public entry points the way a network server integration
//! does: raw bytes plus a port in, JSON-shaped envelopes out.

use sensor_payload::field::{lat_lng, raw_float, temperature};
use sensor_payload::*;

/// Build a port 1 payload from logical values.
fn telemetry_payload(
    flags: u8,
    temp_hundredths: i16,
    humidity: u8,
    supply: u16,
    battery: u16,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(TELEMETRY_PAYLOAD_SIZE);
    buf.push(flags);
    buf.extend_from_slice(&temp_hundredths.to_be_bytes());
    buf.push(humidity);
    buf.extend_from_slice(&supply.to_le_bytes());
    buf.extend_from_slice(&battery.to_le_bytes());
    buf
}

// ============================================================================
// Field library properties
// ============================================================================

#[test]
fn test_reference_values() {
    assert_eq!(temperature(&[0x00, 0x00]).unwrap(), "0.0");
    let minus_one = (-100i16).to_be_bytes();
    assert_eq!(temperature(&minus_one).unwrap(), "-1.0");
    assert_eq!(raw_float(&[0x00, 0x00, 0x80, 0x3F]).unwrap(), "1.0");

    let mut coords = Vec::new();
    coords.extend_from_slice(&52_000_000u32.to_le_bytes());
    coords.extend_from_slice(&8_000_000u32.to_le_bytes());
    assert_eq!(lat_lng(&coords).unwrap(), [52.0, 8.0]);
}

#[test]
fn test_temperature_covers_full_range() {
    for hundredths in (i16::MIN..=i16::MAX).step_by(97) {
        let decoded: f64 = temperature(&hundredths.to_be_bytes()).unwrap().parse().unwrap();
        let expected = hundredths as f64 / 100.0;
        assert!(
            (decoded - expected).abs() <= 0.05 + 1e-9,
            "{} decoded as {}",
            hundredths,
            decoded
        );
    }
}

// ============================================================================
// Uplink
// ============================================================================

#[test]
fn test_port1_round_trip() {
    let samples = [
        (0x07u8, 2150i16, 50u8, 3404u16, 3600u16),
        (0x00, -100, 0, 0, 0),
        (0xFF, i16::MIN, 255, u16::MAX, u16::MAX),
        (0x80, 1234, 99, 4200, 2900),
        (0x03, -2735, 12, 3300, 3000),
    ];

    for (flags, temp, hum, supply, battery) in samples {
        let bytes = telemetry_payload(flags, temp, hum, supply, battery);
        let record = NODE_TELEMETRY.decode(&bytes).unwrap();

        assert_eq!(record.get("humidity").and_then(|v| v.as_i64()), Some(hum as i64));
        assert_eq!(record.get("supply_v").and_then(|v| v.as_i64()), Some(supply as i64));
        assert_eq!(record.get("battery_v").and_then(|v| v.as_i64()), Some(battery as i64));

        let reencoded = NODE_TELEMETRY.encode(&record).unwrap();
        assert_eq!(reencoded[0], flags);
        assert_eq!(&reencoded[3..], &bytes[3..]);

        let temp_back = i16::from_be_bytes([reencoded[1], reencoded[2]]);
        assert!(
            (temp_back as i32 - temp as i32).abs() <= 10,
            "temperature {} came back as {}",
            temp,
            temp_back
        );
    }
}

#[test]
fn test_short_buffers_never_yield_records() {
    let full = telemetry_payload(0x07, 2150, 50, 3404, 3600);
    for len in 0..full.len() {
        for variant in [Variant::Telemetry, Variant::Formatter] {
            let out = decode_uplink(&UplinkInput::new(full[..len].to_vec(), 1), variant);
            assert!(out.data.is_none(), "len {} produced a record", len);
            assert_eq!(out.errors.len(), 1);
            assert!(out.errors[0].contains("needs 8 bytes"), "{}", out.errors[0]);
        }
    }
}

#[test]
fn test_formatter_datetime_response() {
    let input = UplinkInput::new(vec![0x64, 0xE3, 0x3F, 0x00, 0x02], PORT_DATETIME);
    let out = decode_uplink(&input, Variant::Formatter);
    let json = serde_json::to_string(&out).unwrap();
    assert_eq!(
        json,
        r#"{"data":{"unixtime":1692614400,"rtc_source":"LORA"},"warnings":[],"errors":[]}"#
    );
}

#[test]
fn test_telemetry_variant_json() {
    let bytes = telemetry_payload(0x01, -100, 45, 3300, 3100);
    let out = decode_uplink(&UplinkInput::new(bytes, 1), Variant::Telemetry);
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["data"]["air_temp_c"], "-1.0");
    assert_eq!(json["data"]["status"]["battery_ok"], true);
    assert_eq!(json["data"]["status"]["res4"], false);
    assert_eq!(json["data"]["humidity"], 45);
    assert!(json["data"]["status_node"].is_null());
}

#[test]
fn test_unknown_rtc_source_is_reported() {
    let input = UplinkInput::new(vec![0x00, 0x00, 0x00, 0x00, 0x07], PORT_DATETIME);
    let out = decode_uplink(&input, Variant::Formatter);
    assert!(out.data.is_none());
    assert_eq!(out.errors, vec!["unknown rtc_source value: 7"]);
}

// ============================================================================
// Downlink
// ============================================================================

#[test]
fn test_downlink_sleep_interval() {
    let out = encode_downlink(&DownlinkRequest::with_interval("CMD_SET_SLEEP_INTERVAL", 300));
    assert_eq!(out.bytes, vec![0xA8, 0x01, 0x2C]);
    assert_eq!(out.f_port, 1);
    assert!(out.errors.is_empty());
}

#[test]
fn test_downlink_payload_lengths() {
    let cases = [
        (DownlinkRequest::with_interval("CMD_SET_SLEEP_INTERVAL_LONG", 3600), 3),
        (DownlinkRequest::new("CMD_GET_DATETIME"), 1),
        (DownlinkRequest::with_epoch("CMD_SET_DATETIME", 1_692_614_400), 5),
        (DownlinkRequest::new("CMD_GET_CONFIG"), 1),
    ];
    for (req, len) in cases {
        let out = encode_downlink(&req);
        assert_eq!(out.bytes.len(), len, "{}", req.cmd);
        assert_eq!(out.f_port, 1);
    }
}

#[test]
fn test_downlink_unknown_command_never_panics() {
    for name in ["", "cmd_get_config", "CMD_GET_CONFIG ", "CMD_REBOOT"] {
        let out = encode_downlink(&DownlinkRequest::new(name));
        assert!(out.bytes.is_empty());
        assert!(!out.errors.is_empty());
    }
}

#[test]
fn test_downlink_missing_parameter() {
    let out = encode_downlink(&DownlinkRequest::new("CMD_SET_SLEEP_INTERVAL"));
    assert!(out.bytes.is_empty());
    assert_eq!(out.f_port, PORT_COMMAND);
    assert!(out.warnings.is_empty());
    assert_eq!(out.errors, vec!["CMD_SET_SLEEP_INTERVAL requires parameter 'interval'"]);
}

#[test]
fn test_downlink_out_of_range_interval_is_truncated() {
    let out = encode_downlink(&DownlinkRequest::with_interval("CMD_SET_SLEEP_INTERVAL", 70_000));
    // 70000 & 0xFFFF == 4464 == 0x1170
    assert_eq!(out.bytes, vec![0xA8, 0x11, 0x70]);
    assert!(out.errors.is_empty());
    assert_eq!(out.warnings, vec!["interval 70000 truncated to 16 bits"]);

    let out = encode_downlink(&DownlinkRequest::with_epoch("CMD_SET_DATETIME", -1));
    assert_eq!(out.bytes, vec![0x88, 0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn test_downlink_echo_round_trip() {
    for (name, _) in COMMAND_TABLE.iter() {
        let request = match name {
            "CMD_SET_DATETIME" => DownlinkRequest::with_epoch(name, 42),
            "CMD_GET_DATETIME" | "CMD_GET_CONFIG" => DownlinkRequest::new(name),
            _ => DownlinkRequest::with_interval(name, 60),
        };
        let encoded = encode_downlink(&request);
        let echoed = decode_downlink(&DownlinkInput::new(encoded.bytes, encoded.f_port));
        let data = echoed.data.unwrap();
        assert_eq!(data.get("cmd").and_then(|v| v.as_str()), Some(name));
    }
}

#[test]
fn test_config_response_layout() {
    // reserved, 300 s, 3600 s
    let bytes = vec![0x00, 0x01, 0x2C, 0x0E, 0x10];
    let out = decode_downlink(&DownlinkInput::new(bytes, PORT_CONFIG));
    let json = serde_json::to_string(&out.data.unwrap()).unwrap();
    assert_eq!(json, r#"{"reserved":0,"sleep_interval":300,"sleep_interval_long":3600}"#);
}
