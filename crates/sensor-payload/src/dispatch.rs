//! Port dispatch.
//!
//! Each payload formatter of the node firmware is a fixed [`PortTable`] that
//! maps the FPort of a message to the handler that decodes it. Tables are
//! constants and never change at runtime.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::command::COMMAND_TABLE;
use crate::constants::*;
use crate::error::{CodecError, CodecResult};
use crate::schema::*;
use crate::value::{Record, Value};

/// How a port's payload is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortHandler {
    /// Fixed-layout schema.
    Schema(Schema),
    /// Echo of a downlink command: the first byte is looked up in the command table.
    CommandEcho,
}

impl PortHandler {
    /// Decode a payload with this handler.
    pub fn decode(&self, bytes: &[u8]) -> CodecResult<Record> {
        match self {
            PortHandler::Schema(schema) => schema.decode(bytes),
            PortHandler::CommandEcho => decode_command_echo(bytes),
        }
    }
}

/// `{ "cmd": <name> }` for the opcode in the first byte.
fn decode_command_echo(bytes: &[u8]) -> CodecResult<Record> {
    let opcode = *bytes.first().ok_or(CodecError::BufferTooShort {
        schema: "command echo",
        expected: 1,
        actual: 0,
    })?;
    let name = COMMAND_TABLE
        .name(opcode)
        .ok_or(CodecError::UnknownOpcode(opcode))?;
    let mut record = Record::with_capacity(1);
    record.insert("cmd", Value::Text(name.to_string()));
    Ok(record)
}

/// Read-only mapping from port number to handler.
#[derive(Debug, Clone, Copy)]
pub struct PortTable {
    /// Name used in logs.
    pub name: &'static str,
    entries: &'static [(u8, PortHandler)],
}

impl PortTable {
    /// Create a table.
    pub const fn new(name: &'static str, entries: &'static [(u8, PortHandler)]) -> Self {
        PortTable { name, entries }
    }

    /// Find the handler for a port.
    pub fn lookup(&self, port: u8) -> CodecResult<&PortHandler> {
        self.entries
            .iter()
            .find(|(p, _)| *p == port)
            .map(|(_, handler)| handler)
            .ok_or(CodecError::UnknownPort(port))
    }

    /// Decode a payload received on `port`.
    pub fn decode(&self, bytes: &[u8], port: u8) -> CodecResult<Record> {
        let handler = self.lookup(port)?;
        debug!(table = self.name, port, len = bytes.len(), "dispatching payload");
        handler.decode(bytes)
    }

    /// Ports served by this table.
    pub fn ports(&self) -> impl Iterator<Item = u8> + '_ {
        self.entries.iter().map(|(p, _)| *p)
    }
}

const TELEMETRY_HANDLERS: &[(u8, PortHandler)] =
    &[(PORT_TELEMETRY, PortHandler::Schema(STATUS_TELEMETRY))];

const FORMATTER_HANDLERS: &[(u8, PortHandler)] = &[
    (PORT_TELEMETRY, PortHandler::Schema(NODE_TELEMETRY)),
    (PORT_DATETIME, PortHandler::Schema(DATETIME_RESPONSE)),
    (PORT_CONFIG, PortHandler::Schema(CONFIG_RESPONSE)),
];

const DOWNLINK_HANDLERS: &[(u8, PortHandler)] = &[
    (PORT_COMMAND, PortHandler::CommandEcho),
    (PORT_DATETIME, PortHandler::Schema(DATETIME_RESPONSE)),
    (PORT_CONFIG, PortHandler::Schema(CONFIG_RESPONSE)),
];

/// Basic decoder: telemetry on port 1 only.
pub const TELEMETRY_PORTS: PortTable = PortTable::new("telemetry", TELEMETRY_HANDLERS);

/// Uplink formatter: telemetry plus the two command responses.
pub const FORMATTER_PORTS: PortTable = PortTable::new("formatter", FORMATTER_HANDLERS);

/// Downlink formatter's decoder: command echo plus the two command responses.
pub const DOWNLINK_PORTS: PortTable = PortTable::new("downlink", DOWNLINK_HANDLERS);

/// Uplink payload formatter flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Single telemetry schema with the `status` flag byte.
    Telemetry,
    /// Port-based formatter with `status_node` flags and command responses.
    #[default]
    Formatter,
}

impl Variant {
    /// The port table for this variant.
    pub fn ports(&self) -> &'static PortTable {
        match self {
            Variant::Telemetry => &TELEMETRY_PORTS,
            Variant::Formatter => &FORMATTER_PORTS,
        }
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "telemetry" => Ok(Variant::Telemetry),
            "formatter" => Ok(Variant::Formatter),
            other => Err(format!("unknown variant '{}'", other)),
        }
    }
}
