//! Core types for synchronized playback

use blackbox_core::TimeInSeconds;
use serde::{Deserialize, Serialize};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// No session playing (initial state, and after `stop()`)
    #[default]
    Stopped,

    /// Session loaded, scheduler idle, decoders may keep buffering
    Paused,

    /// Scheduler ticking, master clock advancing
    Playing,
}

impl PlaybackState {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Paused => "paused",
            Self::Playing => "playing",
        }
    }

    /// Check if currently playing
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Observable engine state, read under a single lock
///
/// Polled alternative to subscribing to [`crate::SyncEvent`]s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub current_time: TimeInSeconds,
    /// `current_time / duration`, 0 when no duration is known
    pub position: f64,
    pub duration: TimeInSeconds,
    pub speed: f64,
    pub is_buffering: bool,
    pub channel_count: usize,
}
