/// Core error types for Blackbox Player
use thiserror::Error;

use crate::types::TimeInSeconds;

/// Result type alias using `BlackboxError`
pub type Result<T> = std::result::Result<T, BlackboxError>;

/// Core error type for Blackbox Player
///
/// Returned by collaborator implementations (decoders, telemetry services).
#[derive(Error, Debug)]
pub enum BlackboxError {
    /// Decoder could not be opened or configured
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// Seek could not be completed
    #[error("Seek to {position:.3}s failed: {message}")]
    Seek {
        position: TimeInSeconds,
        message: String,
    },

    /// Frame decoding failed
    #[error("Decode error: {0}")]
    Decode(String),

    /// Channel was released or never initialized
    #[error("Channel unavailable: {0}")]
    ChannelUnavailable(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl BlackboxError {
    /// Create an initialization error
    pub fn initialization(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    /// Create a seek error
    pub fn seek(position: TimeInSeconds, msg: impl Into<String>) -> Self {
        Self::Seek {
            position,
            message: msg.into(),
        }
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
