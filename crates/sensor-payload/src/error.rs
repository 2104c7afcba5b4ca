//! Codec error types.

use thiserror::Error;

/// Errors that can occur while encoding or decoding payloads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A field decoder was handed a slice of the wrong width.
    #[error("{field} must have exactly {expected} byte(s), got {actual}")]
    InvalidFieldLength {
        /// Field decoder name.
        field: &'static str,
        /// Required width.
        expected: usize,
        /// Width of the slice provided.
        actual: usize,
    },

    /// The payload is shorter than the schema that was selected for it.
    #[error("{schema} payload needs {expected} bytes, got {actual}")]
    BufferTooShort {
        /// Schema name.
        schema: &'static str,
        /// Total schema width.
        expected: usize,
        /// Actual payload length.
        actual: usize,
    },

    /// No schema is registered for this port.
    #[error("unknown FPort: {0}")]
    UnknownPort(u8),

    /// Command name not present in the command table.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Opcode not present in the command table.
    #[error("unknown command code: 0x{0:02X}")]
    UnknownOpcode(u8),

    /// Enumerated field carried a value outside its table.
    #[error("unknown {field} value: {value}")]
    UnknownEnumValue {
        /// Field decoder name.
        field: &'static str,
        /// Raw byte value.
        value: u8,
    },

    /// A downlink command is missing a required parameter.
    #[error("{command} requires parameter '{parameter}'")]
    MissingParameter {
        /// Command name.
        command: &'static str,
        /// Parameter name.
        parameter: &'static str,
    },

    /// A record handed to the encoder lacks a schema field.
    #[error("record has no value for field '{0}'")]
    MissingField(String),

    /// A record value cannot be packed into its field.
    #[error("invalid value for field '{field}': {reason}")]
    InvalidValue {
        /// Field key.
        field: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl CodecError {
    /// Create a field width error.
    pub fn field_length(field: &'static str, expected: usize, actual: usize) -> Self {
        CodecError::InvalidFieldLength {
            field,
            expected,
            actual,
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CodecError::field_length("uint16", 2, 3);
        assert_eq!(err.to_string(), "uint16 must have exactly 2 byte(s), got 3");

        let err = CodecError::UnknownOpcode(0x42);
        assert!(err.to_string().contains("0x42"));

        let err = CodecError::UnknownEnumValue {
            field: "rtc_source",
            value: 9,
        };
        assert!(err.to_string().contains("rtc_source"));
    }
}
