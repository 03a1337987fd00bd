/// Decoder state and buffer health types
use serde::{Deserialize, Serialize};

/// Decoder lifecycle state
///
/// Owned and mutated by the decoder implementation. The engine only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelState {
    #[default]
    Idle,
    Ready,
    Decoding,
    Error,
    Completed,
}

impl ChannelState {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Ready => "ready",
            Self::Decoding => "decoding",
            Self::Error => "error",
            Self::Completed => "completed",
        }
    }

    /// Whether the channel can serve frames
    ///
    /// A decoding channel counts as ready: it was ready before decoding started.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready | Self::Decoding)
    }
}

impl std::fmt::Display for ChannelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decode buffer occupancy of one channel
///
/// Recomputed on every query, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferStatus {
    /// Frames currently buffered
    pub current: usize,

    /// Buffer capacity in frames
    pub capacity: usize,

    /// `current / capacity`, clamped to [0, 1]
    pub fill_ratio: f64,
}

impl BufferStatus {
    /// Build a status, deriving the fill ratio
    ///
    /// A zero-capacity buffer reports a fill ratio of 0.
    #[must_use]
    pub fn new(current: usize, capacity: usize) -> Self {
        let fill_ratio = if capacity == 0 {
            0.0
        } else {
            (current as f64 / capacity as f64).clamp(0.0, 1.0)
        };

        Self {
            current,
            capacity,
            fill_ratio,
        }
    }

    /// Empty buffer of the given capacity
    #[must_use]
    pub fn empty(capacity: usize) -> Self {
        Self::new(0, capacity)
    }

    /// Whether the fill ratio is strictly below `threshold`
    #[must_use]
    pub fn is_below(&self, threshold: f64) -> bool {
        self.fill_ratio < threshold
    }
}
