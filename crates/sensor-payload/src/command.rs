//! Downlink commands that can be sent to the sensor node.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{CodecError, CodecResult};

// ============================================================================
// Command Table
// ============================================================================

/// Bidirectional command name ↔ opcode table.
#[derive(Debug, Clone, Copy)]
pub struct CommandTable {
    entries: &'static [(&'static str, u8)],
}

impl CommandTable {
    /// Create a table from `(name, opcode)` pairs.
    pub const fn new(entries: &'static [(&'static str, u8)]) -> Self {
        CommandTable { entries }
    }

    /// Table entry for a command name.
    pub fn lookup(&self, name: &str) -> Option<(&'static str, u8)> {
        self.entries.iter().copied().find(|(n, _)| *n == name)
    }

    /// Opcode for a command name.
    pub fn opcode(&self, name: &str) -> Option<u8> {
        self.lookup(name).map(|(_, code)| code)
    }

    /// Command name for an opcode.
    pub fn name(&self, opcode: u8) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, code)| *code == opcode)
            .map(|(n, _)| *n)
    }

    /// Iterate over `(name, opcode)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u8)> + '_ {
        self.entries.iter().copied()
    }
}

/// All downlink commands understood by the node.
pub const COMMAND_TABLE: CommandTable = CommandTable::new(COMMAND_ENTRIES);

const COMMAND_ENTRIES: &[(&str, u8)] = &[
    ("CMD_SET_SLEEP_INTERVAL", CMD_SET_SLEEP_INTERVAL),
    ("CMD_SET_SLEEP_INTERVAL_LONG", CMD_SET_SLEEP_INTERVAL_LONG),
    ("CMD_GET_DATETIME", CMD_GET_DATETIME),
    ("CMD_SET_DATETIME", CMD_SET_DATETIME),
    ("CMD_GET_CONFIG", CMD_GET_CONFIG),
];

// ============================================================================
// Command
// ============================================================================

/// Commands that can be sent to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Set the regular sleep interval.
    SetSleepInterval {
        /// Interval in seconds.
        interval: u16,
    },

    /// Set the long sleep interval.
    SetSleepIntervalLong {
        /// Interval in seconds.
        interval: u16,
    },

    /// Request the RTC time (answered on port 2).
    GetDatetime,

    /// Set the RTC time.
    SetDatetime {
        /// Unix timestamp in seconds.
        epoch: u32,
    },

    /// Request the configuration (answered on port 3).
    GetConfig,
}

impl Command {
    /// Get the opcode for this command.
    pub fn code(&self) -> u8 {
        match self {
            Command::SetSleepInterval { .. } => CMD_SET_SLEEP_INTERVAL,
            Command::SetSleepIntervalLong { .. } => CMD_SET_SLEEP_INTERVAL_LONG,
            Command::GetDatetime => CMD_GET_DATETIME,
            Command::SetDatetime { .. } => CMD_SET_DATETIME,
            Command::GetConfig => CMD_GET_CONFIG,
        }
    }

    /// Name of this command in [`COMMAND_TABLE`].
    pub fn name(&self) -> Option<&'static str> {
        COMMAND_TABLE.name(self.code())
    }

    /// Port the command is sent on.
    pub fn port(&self) -> u8 {
        PORT_COMMAND
    }

    /// Encode the command to bytes. Parameters are big-endian.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(MAX_DOWNLINK_SIZE);
        buf.push(self.code());

        match self {
            Command::SetSleepInterval { interval } | Command::SetSleepIntervalLong { interval } => {
                buf.push((interval >> 8) as u8);
                buf.push((interval & 0xFF) as u8);
            }

            Command::SetDatetime { epoch } => {
                buf.push((epoch >> 24) as u8);
                buf.push(((epoch >> 16) & 0xFF) as u8);
                buf.push(((epoch >> 8) & 0xFF) as u8);
                buf.push((epoch & 0xFF) as u8);
            }

            Command::GetDatetime | Command::GetConfig => {}
        }

        buf
    }
}

// ============================================================================
// Downlink Request
// ============================================================================

/// A downlink command as described by the network server integration:
/// `{"cmd": "CMD_SET_SLEEP_INTERVAL", "interval": 300}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DownlinkRequest {
    /// Command name from the command table.
    pub cmd: String,
    /// Interval in seconds, for the interval commands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    /// Unix epoch, for `CMD_SET_DATETIME`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch: Option<i64>,
}

impl DownlinkRequest {
    /// A request without parameters.
    pub fn new(cmd: impl Into<String>) -> Self {
        DownlinkRequest {
            cmd: cmd.into(),
            ..Default::default()
        }
    }

    /// A request with an interval parameter.
    pub fn with_interval(cmd: impl Into<String>, interval: i64) -> Self {
        DownlinkRequest {
            interval: Some(interval),
            ..DownlinkRequest::new(cmd)
        }
    }

    /// A request with an epoch parameter.
    pub fn with_epoch(cmd: impl Into<String>, epoch: i64) -> Self {
        DownlinkRequest {
            epoch: Some(epoch),
            ..DownlinkRequest::new(cmd)
        }
    }

    /// Resolve the request into a typed command.
    ///
    /// Parameters are not range-checked: values that do not fit the wire
    /// field are truncated to its low bits and a warning is pushed.
    pub fn to_command(&self, warnings: &mut Vec<String>) -> CodecResult<Command> {
        self.resolve(&COMMAND_TABLE, warnings)
    }

    /// Resolve the request against `table`.
    ///
    /// A name the table knows but no [`Command`] variant encodes is reported
    /// as [`CodecError::UnknownCommand`].
    pub fn resolve(
        &self,
        table: &CommandTable,
        warnings: &mut Vec<String>,
    ) -> CodecResult<Command> {
        let unknown = || CodecError::UnknownCommand(self.cmd.clone());
        let (name, opcode) = table.lookup(&self.cmd).ok_or_else(unknown)?;

        let command = match opcode {
            CMD_SET_SLEEP_INTERVAL => Command::SetSleepInterval {
                interval: self.interval_param(name, warnings)?,
            },
            CMD_SET_SLEEP_INTERVAL_LONG => Command::SetSleepIntervalLong {
                interval: self.interval_param(name, warnings)?,
            },
            CMD_GET_DATETIME => Command::GetDatetime,
            CMD_SET_DATETIME => {
                let raw = self.epoch.ok_or(CodecError::MissingParameter {
                    command: name,
                    parameter: "epoch",
                })?;
                if !(0..=u32::MAX as i64).contains(&raw) {
                    warnings.push(format!("epoch {} truncated to 32 bits", raw));
                }
                Command::SetDatetime { epoch: raw as u32 }
            }
            CMD_GET_CONFIG => Command::GetConfig,
            _ => return Err(unknown()),
        };

        Ok(command)
    }

    fn interval_param(
        &self,
        command: &'static str,
        warnings: &mut Vec<String>,
    ) -> CodecResult<u16> {
        let raw = self.interval.ok_or(CodecError::MissingParameter {
            command,
            parameter: "interval",
        })?;
        if !(0..=u16::MAX as i64).contains(&raw) {
            warnings.push(format!("interval {} truncated to 16 bits", raw));
        }
        Ok(raw as u16)
    }
}

impl From<Command> for DownlinkRequest {
    fn from(command: Command) -> Self {
        let name = command.name().unwrap_or_default();
        match command {
            Command::SetSleepInterval { interval } | Command::SetSleepIntervalLong { interval } => {
                DownlinkRequest::with_interval(name, interval as i64)
            }
            Command::SetDatetime { epoch } => DownlinkRequest::with_epoch(name, epoch as i64),
            Command::GetDatetime | Command::GetConfig => DownlinkRequest::new(name),
        }
    }
}
