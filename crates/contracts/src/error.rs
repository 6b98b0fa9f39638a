//! Layered error definitions
//!
//! Categorized by source: config / decode / sink / io
//!
//! Clean end-of-stream is NOT an error: sources signal it structurally as
//! `Ok(None)` from `pull()`. Only mid-stream corruption becomes `Decode`.

use thiserror::Error;

use crate::StreamLabel;

/// Unified error type
#[derive(Debug, Error)]
pub enum CoreError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Decode Errors =====
    /// A record was truncated or unparsable before a clean end-of-file.
    ///
    /// Fatal for the affected stream: the reader position is unspecified
    /// afterwards and resynchronization is never attempted.
    #[error("decode error in stream {stream} at frame {frame_index}: {message}")]
    Decode {
        stream: StreamLabel,
        frame_index: u64,
        message: String,
    },

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl CoreError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create decode error
    pub fn decode(stream: StreamLabel, frame_index: u64, message: impl Into<String>) -> Self {
        Self::Decode {
            stream,
            frame_index,
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}
