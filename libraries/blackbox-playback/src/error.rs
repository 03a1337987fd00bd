//! Error types for synchronized playback

use thiserror::Error;

/// Playback errors
///
/// Only load-time and configuration failures surface here. Per-channel
/// failures during playback are logged and skipped.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Session resolved to zero usable channels
    #[error("No enabled channels in session")]
    NoEnabledChannels,

    /// Session duration is negative or not finite
    #[error("Invalid session duration: {0}")]
    InvalidDuration(f64),

    /// Playback speed is negative or not finite
    #[error("Invalid playback speed: {0}")]
    InvalidSpeed(f64),

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Background thread could not be started
    #[error("Scheduler error: {0}")]
    Scheduler(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
