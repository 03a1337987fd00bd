/// Decoded video frame handle
use std::sync::Arc;

use super::TimeInSeconds;

/// One decoded frame
///
/// Pixel data is reference-counted so frames can be handed to the UI layer
/// without copying.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Presentation timestamp in channel media time
    pub timestamp: TimeInSeconds,

    /// Frame index within the channel
    pub frame_number: u64,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Raw pixel data (layout defined by the decoder)
    pub data: Arc<[u8]>,
}

impl VideoFrame {
    /// Frame without pixel data, for decoders that render elsewhere
    #[must_use]
    pub fn placeholder(timestamp: TimeInSeconds, frame_number: u64) -> Self {
        Self {
            timestamp,
            frame_number,
            width: 0,
            height: 0,
            data: Arc::from(Vec::new()),
        }
    }

    /// Absolute distance between this frame and `target`
    #[must_use]
    pub fn distance_to(&self, target: TimeInSeconds) -> TimeInSeconds {
        (self.timestamp - target).abs()
    }
}

impl PartialEq for VideoFrame {
    /// Frames are identified by channel-local index and timestamp
    fn eq(&self, other: &Self) -> bool {
        self.frame_number == other.frame_number && self.timestamp == other.timestamp
    }
}
