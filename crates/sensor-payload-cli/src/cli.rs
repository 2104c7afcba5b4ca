//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sensor_payload::Variant;

/// Encode and decode weather sensor node payloads
#[derive(Parser, Debug)]
#[command(name = "sensor-payload")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug output on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(long)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Codec operations.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode an uplink payload
    DecodeUplink {
        /// FPort the payload arrived on
        #[arg(short, long)]
        port: u8,

        /// Payload formatter flavour (telemetry, formatter); overrides config
        #[arg(long)]
        variant: Option<Variant>,

        /// Payload as hex, e.g. "07 08 66 32 4C 0D 10 0E" (spaces and 0x prefix allowed)
        hex: String,
    },

    /// Decode a downlink payload (command echo or command response)
    DecodeDownlink {
        /// FPort of the payload
        #[arg(short, long)]
        port: u8,

        /// Payload as hex
        hex: String,
    },

    /// Encode a downlink command from JSON, e.g. '{"cmd":"CMD_GET_CONFIG"}'
    EncodeDownlink {
        /// Command description
        json: String,
    },

    /// List the downlink command table
    Commands,
}
