//! Decoded value types.
//!
//! This module provides:
//! - [`Value`] - The dynamic value produced by a field decoder
//! - [`FlagSet`] - Named booleans unpacked from a bitmap byte
//! - [`Record`] - An ordered mapping from field key to value

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

// ============================================================================
// Value
// ============================================================================

/// A single decoded field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer value.
    Integer(i64),
    /// Plain number (e.g. humidity in percent).
    Number(f64),
    /// Fixed-point value already formatted with one decimal digit.
    Fixed(String),
    /// Text value (enum names, timestamps, command names).
    Text(String),
    /// `[latitude, longitude]` in degrees.
    Coordinates([f64; 2]),
    /// Named flags from a bitmap byte.
    Flags(FlagSet),
}

impl Value {
    /// Convert to i64 if possible.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert to f64 if possible.
    ///
    /// Fixed-point strings are parsed back into numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Number(v) => Some(*v),
            Value::Fixed(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Borrow as string if this is a fixed-point or text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Fixed(s) | Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the coordinate pair.
    pub fn as_coordinates(&self) -> Option<[f64; 2]> {
        match self {
            Value::Coordinates(c) => Some(*c),
            _ => None,
        }
    }

    /// Borrow the flag set.
    pub fn as_flags(&self) -> Option<&FlagSet> {
        match self {
            Value::Flags(f) => Some(f),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Number(v) => write!(f, "{}", v),
            Value::Fixed(v) | Value::Text(v) => write!(f, "{}", v),
            Value::Coordinates([lat, lng]) => write!(f, "[{}, {}]", lat, lng),
            Value::Flags(flags) => write!(f, "{}", flags),
        }
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<FlagSet> for Value {
    fn from(v: FlagSet) -> Self {
        Value::Flags(v)
    }
}

// ============================================================================
// Flag Set
// ============================================================================

/// Booleans unpacked from one byte, most significant bit first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlagSet {
    flags: Vec<(&'static str, bool)>,
}

impl FlagSet {
    /// Unpack `byte` against `names`; `names[0]` receives bit 7.
    pub fn unpack(byte: u8, names: &[&'static str; 8]) -> Self {
        let flags = names
            .iter()
            .enumerate()
            .map(|(i, name)| (*name, byte & (0x80 >> i) != 0))
            .collect();
        FlagSet { flags }
    }

    /// Pack back into a byte against `names`. Names absent from the set are 0.
    pub fn pack(&self, names: &[&'static str; 8]) -> u8 {
        names
            .iter()
            .enumerate()
            .filter(|(_, name)| self.get(name) == Some(true))
            .fold(0u8, |acc, (i, _)| acc | (0x80 >> i))
    }

    /// Look up a flag by name.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.flags.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    /// Iterate flags in bit order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.flags.iter().copied()
    }

    /// Flag names in bit order.
    pub fn names(&self) -> Vec<&'static str> {
        self.flags.iter().map(|(n, _)| *n).collect()
    }
}

impl std::fmt::Display for FlagSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let strs: Vec<String> = self
            .flags
            .iter()
            .map(|(name, set)| format!("{}:{}", name, set))
            .collect();
        write!(f, "{{{}}}", strs.join(", "))
    }
}

impl Serialize for FlagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.flags.len()))?;
        for (name, set) in &self.flags {
            map.serialize_entry(name, set)?;
        }
        map.end()
    }
}

// ============================================================================
// Record
// ============================================================================

/// A decoded message: field keys mapped to values, in field order.
///
/// Keys are field names, or the zero-based field index for unnamed fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Record::default()
    }

    /// Create an empty record with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Self {
        Record {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Set a field, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate over `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
