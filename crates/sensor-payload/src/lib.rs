//! Sensor Node Payload Codec
//!
//! This crate converts the compact binary payloads exchanged with the weather
//! sensor LoRaWAN node into structured records and back. Every message is a
//! handful of bytes plus a port number (FPort) that selects the layout.
//!
//! # Protocol Overview
//!
//! - **Uplink** (node → network): fixed-layout telemetry and command responses,
//!   decoded by a [`Schema`] chosen through a [`PortTable`].
//! - **Downlink** (network → node): one-byte opcodes followed by big-endian
//!   parameters, produced by [`Command::encode`].
//!
//! Field decoders live in [`field`]; they are pure functions over a byte slice
//! of a fixed width and are composed into schemas by [`FieldKind`].
//!
//! # Example
//!
//! ```rust,ignore
//! use sensor_payload::{decode_uplink, encode_downlink, DownlinkRequest, UplinkInput, Variant};
//!
//! let bytes = vec![0x07, 0x08, 0x66, 0x32, 0x4C, 0x0D, 0x10, 0x0E];
//! let out = decode_uplink(&UplinkInput::new(bytes, 1), Variant::Formatter);
//! assert!(out.errors.is_empty());
//!
//! let down = encode_downlink(&DownlinkRequest::with_interval("CMD_SET_SLEEP_INTERVAL", 300));
//! assert_eq!(down.bytes, vec![0xA8, 0x01, 0x2C]);
//! ```

mod command;
mod constants;
mod dispatch;
mod envelope;
mod error;
pub mod field;
mod schema;
mod value;

pub use command::*;
pub use constants::*;
pub use dispatch::*;
pub use envelope::*;
pub use error::*;
pub use field::{BitmapLayout, FieldKind, RtcSource};
pub use schema::*;
pub use value::*;
