//! `sensor-payload` - command-line front end for the sensor payload codec.
//!
//! Reads a payload as hex (or a command as JSON), runs it through the codec
//! and prints the network-server envelope as JSON on stdout. Exit status is
//! 0 on success, 1 if the input could not be read, and 2 if the envelope
//! carries codec errors.

mod cli;
mod config;
mod error;

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, error};

use sensor_payload::{
    decode_downlink, decode_uplink, encode_downlink, DownlinkInput, DownlinkRequest, UplinkInput,
    COMMAND_TABLE,
};

use crate::cli::{Cli, Command};
use crate::config::CodecConfig;
use crate::error::CliResult;

/// Initialize tracing on stderr.
///
/// `RUST_LOG` wins over `--verbose`, which wins over the config's level.
fn init_tracing(verbose: bool, config_level: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { config_level })
    });

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(filter)
        .try_init();
}

/// Parse a hex payload. Whitespace and a leading `0x` are ignored.
fn parse_hex(text: &str) -> CliResult<Vec<u8>> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
        .unwrap_or(&cleaned);
    Ok(hex::decode(digits)?)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> CliResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Output of one CLI invocation.
struct Outcome {
    json: String,
    has_errors: bool,
}

fn run(command: &Command, config: &CodecConfig, pretty: bool) -> CliResult<Outcome> {
    match command {
        Command::DecodeUplink { port, variant, hex } => {
            let variant = (*variant).unwrap_or(config.variant);
            let input = UplinkInput::new(parse_hex(hex)?, *port);
            debug!(?variant, port, len = input.bytes.len(), "decoding uplink");
            let out = decode_uplink(&input, variant);
            Ok(Outcome {
                json: to_json(&out, pretty)?,
                has_errors: !out.errors.is_empty(),
            })
        }

        Command::DecodeDownlink { port, hex } => {
            let input = DownlinkInput::new(parse_hex(hex)?, *port);
            let out = decode_downlink(&input);
            Ok(Outcome {
                json: to_json(&out, pretty)?,
                has_errors: !out.errors.is_empty(),
            })
        }

        Command::EncodeDownlink { json } => {
            let request: DownlinkRequest = serde_json::from_str(json)?;
            let out = encode_downlink(&request);
            Ok(Outcome {
                json: to_json(&out, pretty)?,
                has_errors: !out.errors.is_empty(),
            })
        }

        Command::Commands => {
            let table: Vec<serde_json::Value> = COMMAND_TABLE
                .iter()
                .map(|(name, code)| serde_json::json!({ "cmd": name, "code": code }))
                .collect();
            Ok(Outcome {
                json: to_json(&table, pretty)?,
                has_errors: false,
            })
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config.as_deref().map(CodecConfig::load).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    init_tracing(cli.verbose, &config.log_level);

    let pretty = config.pretty && !cli.compact;
    match run(&cli.command, &config, pretty) {
        Ok(outcome) => {
            println!("{}", outcome.json);
            if outcome.has_errors {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("A8012C").unwrap(), vec![0xA8, 0x01, 0x2C]);
        assert_eq!(parse_hex("0xa8 01 2c").unwrap(), vec![0xA8, 0x01, 0x2C]);
        assert_eq!(parse_hex("").unwrap(), Vec::<u8>::new());
        assert!(parse_hex("A80").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn test_run_encode_downlink() {
        let command = Command::EncodeDownlink {
            json: r#"{"cmd":"CMD_SET_SLEEP_INTERVAL","interval":300}"#.to_string(),
        };
        let outcome = run(&command, &CodecConfig::default(), false).unwrap();
        assert_eq!(
            outcome.json,
            r#"{"bytes":[168,1,44],"fPort":1,"warnings":[],"errors":[]}"#
        );
        assert!(!outcome.has_errors);
    }

    #[test]
    fn test_run_decode_uplink_uses_config_variant() {
        let config = CodecConfig {
            variant: sensor_payload::Variant::Telemetry,
            ..CodecConfig::default()
        };
        let command = Command::DecodeUplink {
            port: 1,
            variant: None,
            hex: "01 00 00 00 00 00 00 00".to_string(),
        };
        let outcome = run(&command, &config, false).unwrap();
        assert!(outcome.json.contains(r#""status":{"#));
        assert!(!outcome.has_errors);
    }

    #[test]
    fn test_run_reports_codec_errors() {
        let command = Command::DecodeDownlink {
            port: 9,
            hex: "00".to_string(),
        };
        let outcome = run(&command, &CodecConfig::default(), false).unwrap();
        assert!(outcome.has_errors);
        assert!(outcome.json.contains("unknown FPort: 9"));
    }

    #[test]
    fn test_run_rejects_bad_json() {
        let command = Command::EncodeDownlink {
            json: "{cmd}".to_string(),
        };
        assert!(run(&command, &CodecConfig::default(), false).is_err());
    }
}
