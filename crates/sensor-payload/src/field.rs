//! Field decoders.
//!
//! Every decoder takes a slice of exactly its own width and fails with
//! [`CodecError::InvalidFieldLength`] otherwise; slices are never padded or
//! truncated. [`FieldKind`] ties each decoder to its width so schemas can be
//! declared as constant tables.
//!
//! ## Field Kinds
//!
//! | Kind          | Width | Result                                            |
//! |---------------|-------|---------------------------------------------------|
//! | `uint8`       | 1     | integer                                           |
//! | `uint16`      | 2     | integer, little-endian                            |
//! | `uint32`      | 4     | integer, little-endian                            |
//! | `uint16BE`    | 2     | integer, big-endian                               |
//! | `uint32BE`    | 4     | integer, big-endian                               |
//! | `uint16fp1`   | 2     | little-endian × 0.1, one decimal                  |
//! | `unixtime`    | 4     | little-endian epoch seconds                       |
//! | `unixtimeIso` | 4     | little-endian epoch as ISO-8601 UTC               |
//! | `temperature` | 2     | big-endian two's complement ÷ 100, one decimal    |
//! | `humidity`    | 2     | little-endian ÷ 100                               |
//! | `latLng`      | 8     | two little-endian i32 ÷ 1e6                       |
//! | `rawfloat`    | 4     | little-endian IEEE-754 single, one decimal        |
//! | `bitmap`      | 1     | eight named flags, MSB first                      |
//! | `rtc_source`  | 1     | RTC source name                                   |

use chrono::{DateTime, SecondsFormat, Utc};

use crate::constants::*;
use crate::error::{CodecError, CodecResult};
use crate::value::{FlagSet, Value};

// ============================================================================
// Byte helpers
// ============================================================================

fn check_width(field: &'static str, bytes: &[u8], width: usize) -> CodecResult<()> {
    if bytes.len() != width {
        return Err(CodecError::field_length(field, width, bytes.len()));
    }
    Ok(())
}

/// Little-endian: byte `i` contributes `byte[i] << 8i`.
fn le_uint(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .enumerate()
        .fold(0u32, |acc, (i, &b)| acc | ((b as u32) << (8 * i)))
}

/// Big-endian: byte `i` contributes `byte[i] << 8(n-1-i)`.
fn be_uint(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32)
}

/// Format with exactly one decimal digit.
///
/// Matches the reference payload formatter: the sign is emitted for any
/// negative input (so `-0.01` gives `"-0.0"`) and a value lying exactly
/// halfway between two tenths rounds to the larger magnitude.
pub fn format_fixed1(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let magnitude = value.abs();
    // Only x.25 and x.75 are exact binary ties at one decimal.
    let exact_tie = (magnitude * 4.0).fract() == 0.0 && (magnitude * 2.0).fract() != 0.0;
    let digits = if exact_tie {
        let tenths = (magnitude * 10.0).floor() as u64 + 1;
        format!("{}.{}", tenths / 10, tenths % 10)
    } else {
        format!("{:.1}", magnitude)
    };
    if value < 0.0 {
        format!("-{}", digits)
    } else {
        digits
    }
}

// ============================================================================
// Integer decoders
// ============================================================================

/// Unsigned 8-bit integer.
pub fn uint8(bytes: &[u8]) -> CodecResult<u8> {
    check_width("uint8", bytes, 1)?;
    Ok(bytes[0])
}

/// Unsigned 16-bit integer, little-endian.
pub fn uint16(bytes: &[u8]) -> CodecResult<u16> {
    check_width("uint16", bytes, 2)?;
    Ok(le_uint(bytes) as u16)
}

/// Unsigned 32-bit integer, little-endian.
pub fn uint32(bytes: &[u8]) -> CodecResult<u32> {
    check_width("uint32", bytes, 4)?;
    Ok(le_uint(bytes))
}

/// Unsigned 16-bit integer, big-endian.
pub fn uint16_be(bytes: &[u8]) -> CodecResult<u16> {
    check_width("uint16BE", bytes, 2)?;
    Ok(be_uint(bytes) as u16)
}

/// Unsigned 32-bit integer, big-endian.
pub fn uint32_be(bytes: &[u8]) -> CodecResult<u32> {
    check_width("uint32BE", bytes, 4)?;
    Ok(be_uint(bytes))
}

/// Little-endian uint16 scaled by 0.1.
pub fn uint16_fp1(bytes: &[u8]) -> CodecResult<String> {
    check_width("uint16fp1", bytes, 2)?;
    Ok(format_fixed1(le_uint(bytes) as f64 * 0.1))
}

// ============================================================================
// Time
// ============================================================================

/// Unix epoch seconds, little-endian.
pub fn unixtime(bytes: &[u8]) -> CodecResult<u32> {
    check_width("unixtime", bytes, 4)?;
    Ok(le_uint(bytes))
}

/// Unix epoch seconds, little-endian, as `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub fn unixtime_iso(bytes: &[u8]) -> CodecResult<String> {
    check_width("unixtimeIso", bytes, 4)?;
    let secs = le_uint(bytes);
    let time = DateTime::<Utc>::from_timestamp(secs as i64, 0)
        .ok_or_else(|| CodecError::invalid_value("unixtimeIso", "timestamp out of range"))?;
    Ok(time.to_rfc3339_opts(SecondsFormat::Millis, true))
}

// ============================================================================
// Sensor values
// ============================================================================

/// Temperature in °C: big-endian two's complement hundredths.
///
/// The sign is the MSB of the first byte. A negative reading is negated by
/// inverting all sixteen bits and adding one, so `0x8000` yields a
/// magnitude of 32768.
pub fn temperature(bytes: &[u8]) -> CodecResult<String> {
    check_width("temperature", bytes, 2)?;
    let raw = be_uint(bytes) as u16;
    let hundredths = if raw & 0x8000 != 0 {
        -((!raw).wrapping_add(1) as i32)
    } else {
        raw as i32
    };
    Ok(format_fixed1(hundredths as f64 / 100.0))
}

/// Relative humidity in percent: little-endian hundredths.
pub fn humidity(bytes: &[u8]) -> CodecResult<f64> {
    check_width("humidity", bytes, 2)?;
    Ok(le_uint(bytes) as f64 / 100.0)
}

/// Latitude and longitude in degrees: two little-endian signed microdegree words.
pub fn lat_lng(bytes: &[u8]) -> CodecResult<[f64; 2]> {
    check_width("latLng", bytes, 8)?;
    let lat = le_uint(&bytes[0..4]) as i32;
    let lng = le_uint(&bytes[4..8]) as i32;
    Ok([lat as f64 / 1e6, lng as f64 / 1e6])
}

/// IEEE-754 single precision from four little-endian bytes.
///
/// The value is rebuilt from its sign, exponent and mantissa fields as
/// `sign * mantissa * 2^(exponent - 150)`. Denormals (exponent 0) have no
/// implicit leading bit and their mantissa is shifted left by one.
pub fn raw_float_value(bytes: &[u8]) -> CodecResult<f64> {
    check_width("rawfloat", bytes, 4)?;
    let bits = le_uint(bytes);
    let sign = if bits >> 31 == 0 { 1.0 } else { -1.0 };
    let exponent = ((bits >> 23) & 0xFF) as i32;
    let mantissa = if exponent == 0 {
        (bits & 0x7F_FFFF) << 1
    } else {
        (bits & 0x7F_FFFF) | 0x80_0000
    };
    Ok(sign * mantissa as f64 * 2f64.powi(exponent - 150))
}

/// [`raw_float_value`] formatted with one decimal.
pub fn raw_float(bytes: &[u8]) -> CodecResult<String> {
    raw_float_value(bytes).map(format_fixed1)
}

// ============================================================================
// Bitmaps
// ============================================================================

/// Name orderings for bitmap bytes. The first name is bound to bit 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitmapLayout {
    /// Node status byte of the basic telemetry decoder.
    Status,
    /// Node status byte of the port-based uplink formatter.
    Node,
    /// Sensor presence byte.
    Sensors,
}

const STATUS_FLAGS: [&str; 8] = [
    "res4",
    "res3",
    "res2",
    "res1",
    "res0",
    "runtime_exp",
    "data_ok",
    "battery_ok",
];

const NODE_FLAGS: [&str; 8] = [
    "res7",
    "res6",
    "res5",
    "res4",
    "res3",
    "runtime_exp",
    "data_ok",
    "battery_ok",
];

const SENSOR_FLAGS: [&str; 8] = [
    "res0", "res1", "res2", "res3", "res4", "res5", "res6", "res7",
];

impl BitmapLayout {
    /// Flag names, most significant bit first.
    pub fn names(&self) -> &'static [&'static str; 8] {
        match self {
            BitmapLayout::Status => &STATUS_FLAGS,
            BitmapLayout::Node => &NODE_FLAGS,
            BitmapLayout::Sensors => &SENSOR_FLAGS,
        }
    }

    fn field_name(&self) -> &'static str {
        match self {
            BitmapLayout::Status => "bitmap",
            BitmapLayout::Node => "bitmap_node",
            BitmapLayout::Sensors => "bitmap_sensors",
        }
    }
}

/// Unpack one byte into the layout's named flags.
pub fn bitmap(bytes: &[u8], layout: BitmapLayout) -> CodecResult<FlagSet> {
    check_width(layout.field_name(), bytes, 1)?;
    Ok(FlagSet::unpack(bytes[0], layout.names()))
}

// ============================================================================
// RTC source
// ============================================================================

/// Where the node's real time clock was last set from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RtcSource {
    /// GPS receiver.
    Gps,
    /// Battery-backed RTC.
    Rtc,
    /// LoRaWAN network time.
    Lora,
    /// Never synchronized.
    Unsynched,
    /// Set by downlink, source unknown.
    Set,
}

impl RtcSource {
    const ALL: [RtcSource; 5] = [
        RtcSource::Gps,
        RtcSource::Rtc,
        RtcSource::Lora,
        RtcSource::Unsynched,
        RtcSource::Set,
    ];

    /// Decode a raw byte.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Look up by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Raw byte value.
    pub fn code(&self) -> u8 {
        match self {
            RtcSource::Gps => RTC_SOURCE_GPS,
            RtcSource::Rtc => RTC_SOURCE_RTC,
            RtcSource::Lora => RTC_SOURCE_LORA,
            RtcSource::Unsynched => RTC_SOURCE_UNSYNCHED,
            RtcSource::Set => RTC_SOURCE_SET,
        }
    }

    /// Display name used in decoded records.
    pub fn name(&self) -> &'static str {
        match self {
            RtcSource::Gps => "GPS",
            RtcSource::Rtc => "RTC",
            RtcSource::Lora => "LORA",
            RtcSource::Unsynched => "unsynched",
            RtcSource::Set => "set (source unknown)",
        }
    }
}

impl std::fmt::Display for RtcSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Decode the RTC source byte. Values outside the table are an error.
pub fn rtc_source(bytes: &[u8]) -> CodecResult<RtcSource> {
    check_width("rtc_source", bytes, 1)?;
    RtcSource::from_code(bytes[0]).ok_or(CodecError::UnknownEnumValue {
        field: "rtc_source",
        value: bytes[0],
    })
}

// ============================================================================
// Field Kind
// ============================================================================

/// A field decoder together with its fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// [`uint8`]
    Uint8,
    /// [`uint16`]
    Uint16,
    /// [`uint32`]
    Uint32,
    /// [`uint16_be`]
    Uint16Be,
    /// [`uint32_be`]
    Uint32Be,
    /// [`uint16_fp1`]
    Uint16Fp1,
    /// [`unixtime`]
    UnixTime,
    /// [`unixtime_iso`]
    UnixTimeIso,
    /// [`temperature`]
    Temperature,
    /// [`humidity`]
    Humidity,
    /// [`lat_lng`]
    LatLng,
    /// [`raw_float`]
    RawFloat,
    /// [`bitmap`]
    Bitmap(BitmapLayout),
    /// [`rtc_source`]
    RtcSource,
}

impl FieldKind {
    /// Width in bytes.
    pub const fn width(&self) -> usize {
        match self {
            FieldKind::Uint8 | FieldKind::Bitmap(_) | FieldKind::RtcSource => 1,
            FieldKind::Uint16
            | FieldKind::Uint16Be
            | FieldKind::Uint16Fp1
            | FieldKind::Temperature
            | FieldKind::Humidity => 2,
            FieldKind::Uint32
            | FieldKind::Uint32Be
            | FieldKind::UnixTime
            | FieldKind::UnixTimeIso
            | FieldKind::RawFloat => 4,
            FieldKind::LatLng => 8,
        }
    }

    /// Decoder name as used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Uint8 => "uint8",
            FieldKind::Uint16 => "uint16",
            FieldKind::Uint32 => "uint32",
            FieldKind::Uint16Be => "uint16BE",
            FieldKind::Uint32Be => "uint32BE",
            FieldKind::Uint16Fp1 => "uint16fp1",
            FieldKind::UnixTime => "unixtime",
            FieldKind::UnixTimeIso => "unixtimeIso",
            FieldKind::Temperature => "temperature",
            FieldKind::Humidity => "humidity",
            FieldKind::LatLng => "latLng",
            FieldKind::RawFloat => "rawfloat",
            FieldKind::Bitmap(layout) => layout.field_name(),
            FieldKind::RtcSource => "rtc_source",
        }
    }

    /// Decode a slice of exactly [`width`](Self::width) bytes.
    pub fn decode(&self, bytes: &[u8]) -> CodecResult<Value> {
        let value = match self {
            FieldKind::Uint8 => uint8(bytes)?.into(),
            FieldKind::Uint16 => uint16(bytes)?.into(),
            FieldKind::Uint32 => uint32(bytes)?.into(),
            FieldKind::Uint16Be => uint16_be(bytes)?.into(),
            FieldKind::Uint32Be => uint32_be(bytes)?.into(),
            FieldKind::Uint16Fp1 => Value::Fixed(uint16_fp1(bytes)?),
            FieldKind::UnixTime => unixtime(bytes)?.into(),
            FieldKind::UnixTimeIso => Value::Text(unixtime_iso(bytes)?),
            FieldKind::Temperature => Value::Fixed(temperature(bytes)?),
            FieldKind::Humidity => Value::Number(humidity(bytes)?),
            FieldKind::LatLng => Value::Coordinates(lat_lng(bytes)?),
            FieldKind::RawFloat => Value::Fixed(raw_float(bytes)?),
            FieldKind::Bitmap(layout) => Value::Flags(bitmap(bytes, *layout)?),
            FieldKind::RtcSource => Value::Text(rtc_source(bytes)?.name().to_string()),
        };
        Ok(value)
    }

    /// Pack a value back into the field's wire representation.
    ///
    /// `key` names the field in error messages. Fixed-point values are
    /// rounded to the field's resolution.
    pub fn encode(&self, key: &str, value: &Value) -> CodecResult<Vec<u8>> {
        let bytes = match self {
            FieldKind::Uint8 => vec![integer_in(key, value, u8::MAX as i64)? as u8],
            FieldKind::Uint16 => (integer_in(key, value, u16::MAX as i64)? as u16)
                .to_le_bytes()
                .to_vec(),
            FieldKind::Uint32 | FieldKind::UnixTime => {
                (integer_in(key, value, u32::MAX as i64)? as u32)
                    .to_le_bytes()
                    .to_vec()
            }
            FieldKind::Uint16Be => (integer_in(key, value, u16::MAX as i64)? as u16)
                .to_be_bytes()
                .to_vec(),
            FieldKind::Uint32Be => (integer_in(key, value, u32::MAX as i64)? as u32)
                .to_be_bytes()
                .to_vec(),
            FieldKind::Uint16Fp1 => scaled_u16(key, value, 10.0)?.to_le_bytes().to_vec(),
            FieldKind::UnixTimeIso => {
                let text = value
                    .as_str()
                    .ok_or_else(|| CodecError::invalid_value(key, "expected a timestamp string"))?;
                let secs = DateTime::parse_from_rfc3339(text)
                    .map_err(|e| CodecError::invalid_value(key, e.to_string()))?
                    .timestamp();
                u32::try_from(secs)
                    .map_err(|_| CodecError::invalid_value(key, "timestamp out of range"))?
                    .to_le_bytes()
                    .to_vec()
            }
            FieldKind::Temperature => {
                let hundredths = (number(key, value)? * 100.0).round();
                // One-decimal output of the extremes reads back up to 0.05 past the range.
                if !(i16::MIN as f64 - 10.0..=i16::MAX as f64 + 10.0).contains(&hundredths) {
                    return Err(CodecError::invalid_value(key, "temperature out of range"));
                }
                (hundredths.clamp(i16::MIN as f64, i16::MAX as f64) as i16)
                    .to_be_bytes()
                    .to_vec()
            }
            FieldKind::Humidity => scaled_u16(key, value, 100.0)?.to_le_bytes().to_vec(),
            FieldKind::LatLng => {
                let [lat, lng] = value
                    .as_coordinates()
                    .ok_or_else(|| CodecError::invalid_value(key, "expected [lat, lng]"))?;
                let mut buf = Vec::with_capacity(8);
                buf.extend_from_slice(&microdegrees(key, lat)?.to_le_bytes());
                buf.extend_from_slice(&microdegrees(key, lng)?.to_le_bytes());
                buf
            }
            FieldKind::RawFloat => (number(key, value)? as f32).to_le_bytes().to_vec(),
            FieldKind::Bitmap(layout) => {
                let flags = value
                    .as_flags()
                    .ok_or_else(|| CodecError::invalid_value(key, "expected flags"))?;
                vec![flags.pack(layout.names())]
            }
            FieldKind::RtcSource => {
                let source = value
                    .as_str()
                    .and_then(RtcSource::from_name)
                    .ok_or_else(|| CodecError::invalid_value(key, "unknown RTC source"))?;
                vec![source.code()]
            }
        };
        Ok(bytes)
    }
}

fn number(key: &str, value: &Value) -> CodecResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| CodecError::invalid_value(key, "expected a number"))
}

fn integer_in(key: &str, value: &Value, max: i64) -> CodecResult<i64> {
    let v = value
        .as_i64()
        .ok_or_else(|| CodecError::invalid_value(key, "expected an integer"))?;
    if !(0..=max).contains(&v) {
        return Err(CodecError::invalid_value(
            key,
            format!("{} outside 0..={}", v, max),
        ));
    }
    Ok(v)
}

fn scaled_u16(key: &str, value: &Value, scale: f64) -> CodecResult<u16> {
    let scaled = (number(key, value)? * scale).round();
    if !(0.0..=u16::MAX as f64).contains(&scaled) {
        return Err(CodecError::invalid_value(key, "value out of range"));
    }
    Ok(scaled as u16)
}

fn microdegrees(key: &str, degrees: f64) -> CodecResult<i32> {
    let micro = (degrees * 1e6).round();
    if !(i32::MIN as f64..=i32::MAX as f64).contains(&micro) {
        return Err(CodecError::invalid_value(key, "coordinate out of range"));
    }
    Ok(micro as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(uint8(&[0xFE]).unwrap(), 254);
        assert_eq!(uint16(&[0x34, 0x12]).unwrap(), 0x1234);
        assert_eq!(uint32(&[0x78, 0x56, 0x34, 0x12]).unwrap(), 0x1234_5678);
        assert_eq!(uint16_be(&[0x12, 0x34]).unwrap(), 0x1234);
        assert_eq!(uint32_be(&[0x12, 0x34, 0x56, 0x78]).unwrap(), 0x1234_5678);
        assert_eq!(uint32(&[0xFF, 0xFF, 0xFF, 0xFF]).unwrap(), u32::MAX);
    }

    #[test]
    fn test_width_is_checked() {
        assert_eq!(
            uint16(&[0x01]),
            Err(CodecError::InvalidFieldLength {
                field: "uint16",
                expected: 2,
                actual: 1
            })
        );
        assert!(uint8(&[]).is_err());
        assert!(uint8(&[1, 2]).is_err());
        assert!(temperature(&[0, 0, 0]).is_err());
        assert!(lat_lng(&[0; 7]).is_err());
        assert!(raw_float(&[0; 5]).is_err());
        assert!(bitmap(&[0, 0], BitmapLayout::Node).is_err());
    }

    #[test]
    fn test_temperature() {
        assert_eq!(temperature(&[0x00, 0x00]).unwrap(), "0.0");
        // 21.50 °C
        assert_eq!(temperature(&[0x08, 0x66]).unwrap(), "21.5");
        // Two's complement of 100 → -1.00 °C
        assert_eq!(temperature(&[0xFF, 0x9C]).unwrap(), "-1.0");
        assert_eq!(temperature(&[0xFF, 0xFF]).unwrap(), "-0.0");
        assert_eq!(temperature(&[0x7F, 0xFF]).unwrap(), "327.7");
        // Minimum representable value keeps its full magnitude.
        assert_eq!(temperature(&[0x80, 0x00]).unwrap(), "-327.7");
    }

    #[test]
    fn test_format_fixed1_ties_round_up() {
        assert_eq!(format_fixed1(1.25), "1.3");
        assert_eq!(format_fixed1(-1.25), "-1.3");
        assert_eq!(format_fixed1(0.75), "0.8");
        // 1.45 is stored just below the tie.
        assert_eq!(format_fixed1(1.45), "1.4");
        assert_eq!(format_fixed1(0.0), "0.0");
        assert_eq!(format_fixed1(-0.0), "0.0");
    }

    #[test]
    fn test_uint16_fp1() {
        assert_eq!(uint16_fp1(&[0xE8, 0x03]).unwrap(), "100.0");
        assert_eq!(uint16_fp1(&[0x07, 0x00]).unwrap(), "0.7");
    }

    #[test]
    fn test_humidity() {
        assert_eq!(humidity(&[0x10, 0x27]).unwrap(), 100.0);
        assert_eq!(humidity(&[0x32, 0x00]).unwrap(), 0.5);
    }

    #[test]
    fn test_lat_lng() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&52_000_000i32.to_le_bytes());
        bytes.extend_from_slice(&8_000_000i32.to_le_bytes());
        assert_eq!(lat_lng(&bytes).unwrap(), [52.0, 8.0]);

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(-33_868_800i32).to_le_bytes());
        bytes.extend_from_slice(&151_209_300i32.to_le_bytes());
        assert_eq!(lat_lng(&bytes).unwrap(), [-33.8688, 151.2093]);
    }

    #[test]
    fn test_raw_float() {
        assert_eq!(raw_float(&[0x00, 0x00, 0x80, 0x3F]).unwrap(), "1.0");
        assert_eq!(raw_float(&[0x00, 0x00, 0x00, 0x00]).unwrap(), "0.0");
        // -2.5
        assert_eq!(raw_float(&[0x00, 0x00, 0x20, 0xC0]).unwrap(), "-2.5");
        // 123.456
        assert_eq!(raw_float(&[0x79, 0xE9, 0xF6, 0x42]).unwrap(), "123.5");
    }

    #[test]
    fn test_raw_float_matches_ieee() {
        for v in [0.1f32, -7.25, 1013.25, 3.4e-39, f32::MIN_POSITIVE, 65504.0] {
            let decoded = raw_float_value(&v.to_le_bytes()).unwrap();
            assert_eq!(decoded, v as f64, "value {}", v);
        }
    }

    #[test]
    fn test_unixtime() {
        assert_eq!(unixtime(&[0x00, 0x00, 0x00, 0x00]).unwrap(), 0);
        assert_eq!(
            unixtime_iso(&1_692_614_400u32.to_le_bytes()).unwrap(),
            "2023-08-21T10:40:00.000Z"
        );
        assert_eq!(unixtime_iso(&[0; 4]).unwrap(), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_bitmap_layouts_differ() {
        let status = bitmap(&[0x01], BitmapLayout::Status).unwrap();
        let node = bitmap(&[0x01], BitmapLayout::Node).unwrap();
        let sensors = bitmap(&[0x01], BitmapLayout::Sensors).unwrap();

        assert_eq!(status.get("battery_ok"), Some(true));
        assert_eq!(node.get("battery_ok"), Some(true));
        assert_eq!(sensors.get("res7"), Some(true));
        assert_eq!(sensors.get("battery_ok"), None);
        assert_eq!(status.get("res7"), None);
        assert_eq!(node.get("res0"), None);
        assert_ne!(status.names(), node.names());
    }

    #[test]
    fn test_bitmap_is_stable() {
        for byte in [0x00u8, 0x5A, 0xA5, 0xFF] {
            let a = bitmap(&[byte], BitmapLayout::Node).unwrap();
            let b = bitmap(&[byte], BitmapLayout::Node).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.pack(BitmapLayout::Node.names()), byte);
        }
    }

    #[test]
    fn test_rtc_source() {
        assert_eq!(rtc_source(&[0x00]).unwrap(), RtcSource::Gps);
        assert_eq!(rtc_source(&[0x04]).unwrap().name(), "set (source unknown)");
        assert_eq!(
            rtc_source(&[0x05]),
            Err(CodecError::UnknownEnumValue {
                field: "rtc_source",
                value: 5
            })
        );
    }

    #[test]
    fn test_field_kind_encode_inverts_decode() {
        let cases: [(FieldKind, &[u8]); 8] = [
            (FieldKind::Uint8, &[0x2A]),
            (FieldKind::Uint16, &[0x4C, 0x0D]),
            (FieldKind::Uint32Be, &[0x64, 0xE3, 0x3F, 0x00]),
            (FieldKind::Temperature, &[0xFF, 0x9C]),
            (FieldKind::Humidity, &[0x1A, 0x16]),
            (FieldKind::RawFloat, &[0x00, 0x00, 0x80, 0x3F]),
            (FieldKind::Bitmap(BitmapLayout::Sensors), &[0x81]),
            (FieldKind::RtcSource, &[0x02]),
        ];
        for (kind, bytes) in cases {
            let value = kind.decode(bytes).unwrap();
            assert_eq!(kind.encode("f", &value).unwrap(), bytes, "{}", kind.name());
        }
    }

    #[test]
    fn test_field_kind_encode_rejects_out_of_range() {
        assert!(FieldKind::Uint8.encode("f", &Value::Integer(256)).is_err());
        assert!(FieldKind::Uint16.encode("f", &Value::Integer(-1)).is_err());
        assert!(FieldKind::Temperature
            .encode("f", &Value::Fixed("400.0".into()))
            .is_err());
        assert!(FieldKind::RtcSource
            .encode("f", &Value::Text("NTP".into()))
            .is_err());
    }
}
