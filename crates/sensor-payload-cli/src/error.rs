//! Error types for the command-line front end.

use thiserror::Error;

/// Errors that stop the CLI before a codec envelope can be produced.
#[derive(Debug, Error)]
pub enum CliError {
    /// Could not read a file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid YAML for [`crate::config::CodecConfig`].
    #[error("invalid config: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Payload argument is not valid hex.
    #[error("invalid hex payload: {0}")]
    Hex(#[from] hex::FromHexError),

    /// JSON input or output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
