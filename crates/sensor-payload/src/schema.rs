//! Message schemas.
//!
//! A [`Schema`] is an ordered list of [`Field`]s. Decoding slices the payload
//! left to right, one slice per field, and collects the results into a
//! [`Record`] keyed by field name (or index for unnamed fields).
//!
//! ## Layouts
//!
//! | Schema                | Bytes | Fields                                                                     |
//! |-----------------------|-------|----------------------------------------------------------------------------|
//! | `STATUS_TELEMETRY`    | 8     | status(1) air_temp_c(2 BE) humidity(1) supply_v(2 LE) battery_v(2 LE)      |
//! | `NODE_TELEMETRY`      | 8     | status_node(1) air_temp_c(2 BE) humidity(1) supply_v(2 LE) battery_v(2 LE) |
//! | `DATETIME_RESPONSE`   | 5     | unixtime(4 BE) rtc_source(1)                                               |
//! | `CONFIG_RESPONSE`     | 5     | reserved(1) sleep_interval(2 BE) sleep_interval_long(2 BE)                 |

use tracing::trace;

use crate::error::{CodecError, CodecResult};
use crate::field::{BitmapLayout, FieldKind};
use crate::value::Record;

/// One field of a schema: a decoder and the key its value is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Decoder and width.
    pub kind: FieldKind,
    /// Record key. Unnamed fields are keyed by their index.
    pub name: Option<&'static str>,
}

impl Field {
    /// A named field.
    pub const fn named(kind: FieldKind, name: &'static str) -> Self {
        Field {
            kind,
            name: Some(name),
        }
    }

    /// A field keyed by its position.
    pub const fn unnamed(kind: FieldKind) -> Self {
        Field { kind, name: None }
    }

    fn key(&self, index: usize) -> String {
        match self.name {
            Some(name) => name.to_string(),
            None => index.to_string(),
        }
    }
}

/// A fixed message layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Name used in errors and logs.
    pub name: &'static str,
    /// Fields in wire order.
    pub fields: &'static [Field],
}

impl Schema {
    /// Create a schema.
    pub const fn new(name: &'static str, fields: &'static [Field]) -> Self {
        Schema { name, fields }
    }

    /// Expected payload length: the sum of all field widths.
    pub const fn width(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.fields.len() {
            total += self.fields[i].kind.width();
            i += 1;
        }
        total
    }

    /// Decode a payload.
    ///
    /// Bytes past the schema width are ignored. A payload shorter than the
    /// schema, or any field failing to decode, fails the whole call.
    pub fn decode(&self, bytes: &[u8]) -> CodecResult<Record> {
        let expected = self.width();
        if bytes.len() < expected {
            return Err(CodecError::BufferTooShort {
                schema: self.name,
                expected,
                actual: bytes.len(),
            });
        }

        let mut record = Record::with_capacity(self.fields.len());
        let mut offset = 0;
        for (index, field) in self.fields.iter().enumerate() {
            let end = offset + field.kind.width();
            let value = field.kind.decode(&bytes[offset..end])?;
            trace!(schema = self.name, offset, field = field.kind.name(), %value, "decoded field");
            record.insert(field.key(index), value);
            offset = end;
        }

        if bytes.len() > expected {
            trace!(
                schema = self.name,
                ignored = bytes.len() - expected,
                "trailing bytes ignored"
            );
        }

        Ok(record)
    }

    /// Pack a record back into a payload of exactly [`width`](Self::width) bytes.
    pub fn encode(&self, record: &Record) -> CodecResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.width());
        for (index, field) in self.fields.iter().enumerate() {
            let key = field.key(index);
            let value = record
                .get(&key)
                .ok_or_else(|| CodecError::MissingField(key.clone()))?;
            buf.extend_from_slice(&field.kind.encode(&key, value)?);
        }
        Ok(buf)
    }
}

// ============================================================================
// Schemas
// ============================================================================

const STATUS_TELEMETRY_FIELDS: &[Field] = &[
    Field::named(FieldKind::Bitmap(BitmapLayout::Status), "status"),
    Field::named(FieldKind::Temperature, "air_temp_c"),
    Field::named(FieldKind::Uint8, "humidity"),
    Field::named(FieldKind::Uint16, "supply_v"),
    Field::named(FieldKind::Uint16, "battery_v"),
];

const NODE_TELEMETRY_FIELDS: &[Field] = &[
    Field::named(FieldKind::Bitmap(BitmapLayout::Node), "status_node"),
    Field::named(FieldKind::Temperature, "air_temp_c"),
    Field::named(FieldKind::Uint8, "humidity"),
    Field::named(FieldKind::Uint16, "supply_v"),
    Field::named(FieldKind::Uint16, "battery_v"),
];

const DATETIME_RESPONSE_FIELDS: &[Field] = &[
    Field::named(FieldKind::Uint32Be, "unixtime"),
    Field::named(FieldKind::RtcSource, "rtc_source"),
];

const CONFIG_RESPONSE_FIELDS: &[Field] = &[
    Field::named(FieldKind::Uint8, "reserved"),
    Field::named(FieldKind::Uint16Be, "sleep_interval"),
    Field::named(FieldKind::Uint16Be, "sleep_interval_long"),
];

/// Port 1 telemetry of the basic decoder.
pub const STATUS_TELEMETRY: Schema = Schema::new("status telemetry", STATUS_TELEMETRY_FIELDS);

/// Port 1 telemetry of the uplink formatter.
pub const NODE_TELEMETRY: Schema = Schema::new("node telemetry", NODE_TELEMETRY_FIELDS);

/// Port 2: answer to `CMD_GET_DATETIME`.
pub const DATETIME_RESPONSE: Schema = Schema::new("datetime response", DATETIME_RESPONSE_FIELDS);

/// Port 3: answer to `CMD_GET_CONFIG`.
pub const CONFIG_RESPONSE: Schema = Schema::new("config response", CONFIG_RESPONSE_FIELDS);
