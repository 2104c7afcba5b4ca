//! Protocol constants
//!
//! Port numbers, downlink opcodes and the field widths shared by the uplink
//! schemas and the downlink encoder.

// ============================================================================
// Ports
// ============================================================================

/// Periodic sensor telemetry (uplink) and command downlinks.
pub const PORT_TELEMETRY: u8 = 1;
/// Response to `CMD_GET_DATETIME`.
pub const PORT_DATETIME: u8 = 2;
/// Response to `CMD_GET_CONFIG`.
pub const PORT_CONFIG: u8 = 3;
/// All downlink commands target this port.
pub const PORT_COMMAND: u8 = PORT_TELEMETRY;

// ============================================================================
// Command Codes (network → node)
// ============================================================================

/// Set the regular sleep interval in seconds.
pub const CMD_SET_SLEEP_INTERVAL: u8 = 0xA8;
/// Set the long sleep interval (used on low battery) in seconds.
pub const CMD_SET_SLEEP_INTERVAL_LONG: u8 = 0xA9;
/// Request the node's RTC time; answered on [`PORT_DATETIME`].
pub const CMD_GET_DATETIME: u8 = 0x86;
/// Set the node's RTC from a unix epoch.
pub const CMD_SET_DATETIME: u8 = 0x88;
/// Request the node configuration; answered on [`PORT_CONFIG`].
pub const CMD_GET_CONFIG: u8 = 0xB1;

// ============================================================================
// RTC sources
// ============================================================================

/// RTC set from GPS.
pub const RTC_SOURCE_GPS: u8 = 0x00;
/// RTC running from its own backup.
pub const RTC_SOURCE_RTC: u8 = 0x01;
/// RTC set via LoRaWAN network time.
pub const RTC_SOURCE_LORA: u8 = 0x02;
/// RTC never synchronized.
pub const RTC_SOURCE_UNSYNCHED: u8 = 0x03;
/// RTC set by downlink command.
pub const RTC_SOURCE_SET: u8 = 0x04;

// ============================================================================
// Sizes
// ============================================================================

/// Length of the port 1 telemetry payload.
pub const TELEMETRY_PAYLOAD_SIZE: usize = 8;
/// Length of the port 2 datetime response.
pub const DATETIME_PAYLOAD_SIZE: usize = 5;
/// Length of the port 3 config response.
pub const CONFIG_PAYLOAD_SIZE: usize = 5;
/// Longest downlink payload (`CMD_SET_DATETIME`).
pub const MAX_DOWNLINK_SIZE: usize = 5;
