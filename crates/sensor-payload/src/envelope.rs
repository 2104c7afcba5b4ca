//! Network-server facing entry points.
//!
//! These wrap the codec in the request/response envelopes a payload
//! formatter hook exchanges with its network server. They never fail:
//! codec errors are reported as strings in `errors` and the envelope is
//! always well formed.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::command::DownlinkRequest;
use crate::constants::PORT_COMMAND;
use crate::dispatch::{Variant, DOWNLINK_PORTS};
use crate::value::Record;

/// Raw payload plus the port it arrived on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UplinkInput {
    /// Payload bytes.
    pub bytes: Vec<u8>,
    /// LoRaWAN FPort.
    #[serde(rename = "fPort")]
    pub f_port: u8,
}

impl UplinkInput {
    /// Create an input envelope.
    pub fn new(bytes: Vec<u8>, f_port: u8) -> Self {
        UplinkInput { bytes, f_port }
    }
}

/// Downlink payloads are decoded from the same shape of input.
pub type DownlinkInput = UplinkInput;

/// Result of decoding an uplink or a downlink payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DecodedOutput {
    /// Decoded record, absent on error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Record>,
    /// Non-fatal remarks.
    pub warnings: Vec<String>,
    /// Fatal errors; `data` is `None` when this is non-empty.
    pub errors: Vec<String>,
}

/// Uplink decode result.
pub type UplinkOutput = DecodedOutput;

impl DecodedOutput {
    fn from_result(result: Result<Record, crate::CodecError>, what: &str, port: u8) -> Self {
        match result {
            Ok(record) => DecodedOutput {
                data: Some(record),
                ..Default::default()
            },
            Err(e) => {
                warn!(port, error = %e, "{} decode failed", what);
                DecodedOutput {
                    data: None,
                    warnings: Vec::new(),
                    errors: vec![e.to_string()],
                }
            }
        }
    }
}

/// Result of encoding a downlink command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownlinkOutput {
    /// Payload bytes; empty on error.
    pub bytes: Vec<u8>,
    /// Port to send on.
    #[serde(rename = "fPort")]
    pub f_port: u8,
    /// Non-fatal remarks (e.g. truncated parameters).
    pub warnings: Vec<String>,
    /// Fatal errors.
    pub errors: Vec<String>,
}

/// Decode an uplink with the port table of `variant`.
pub fn decode_uplink(input: &UplinkInput, variant: Variant) -> UplinkOutput {
    let result = variant.ports().decode(&input.bytes, input.f_port);
    DecodedOutput::from_result(result, "uplink", input.f_port)
}

/// Decode a downlink payload (command echo or command response).
pub fn decode_downlink(input: &DownlinkInput) -> DecodedOutput {
    let result = DOWNLINK_PORTS.decode(&input.bytes, input.f_port);
    DecodedOutput::from_result(result, "downlink", input.f_port)
}

/// Encode a downlink command.
///
/// Unknown commands and missing parameters produce empty `bytes` and an
/// error entry; the port is always the command port.
pub fn encode_downlink(request: &DownlinkRequest) -> DownlinkOutput {
    let mut warnings = Vec::new();
    match request.to_command(&mut warnings) {
        Ok(command) => DownlinkOutput {
            bytes: command.encode(),
            f_port: command.port(),
            warnings,
            errors: Vec::new(),
        },
        Err(e) => {
            warn!(cmd = %request.cmd, error = %e, "downlink encode failed");
            DownlinkOutput {
                bytes: Vec::new(),
                f_port: PORT_COMMAND,
                warnings,
                errors: vec![e.to_string()],
            }
        }
    }
}
