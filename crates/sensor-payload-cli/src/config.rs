//! Configuration file support.
//!
//! ```yaml
//! variant: formatter   # or: telemetry
//! log_level: warn      # tracing filter directive
//! pretty: true         # multi-line JSON output
//! ```

use std::path::Path;

use sensor_payload::Variant;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Codec front-end settings. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Uplink payload formatter flavour.
    pub variant: Variant,
    /// Log filter used when `--verbose` and `RUST_LOG` are absent.
    pub log_level: String,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            variant: Variant::default(),
            log_level: "warn".to_string(),
            pretty: true,
        }
    }
}

impl CodecConfig {
    /// Load from a YAML file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Parse from YAML text. An empty document yields the defaults.
    pub fn from_yaml(text: &str) -> Result<Self, CliError> {
        if text.trim().is_empty() {
            return Ok(CodecConfig::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}
