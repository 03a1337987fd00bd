/// Collaborator traits consumed by the playback engine
use crate::error::Result;
use crate::types::{
    AccelerationSample, BufferStatus, ChannelState, GpsPoint, TimeInSeconds, VideoFrame,
};

/// Per-camera video decoder
///
/// Implementers own a decode thread (or task) that keeps a frame buffer
/// filled once `start_decoding()` has been called, regardless of whether the
/// engine is playing or paused.
///
/// All methods take `&self`: a channel is shared between the control surface,
/// the sync tick and background re-seeks, so implementations synchronize
/// internally.
///
/// `seek()` may block on I/O. The engine never calls it while holding its own
/// locks and never from the sync tick itself.
pub trait VideoChannel: Send + Sync {
    /// Open the underlying media and prepare the decoder
    ///
    /// # Errors
    /// Returns an error if the media cannot be opened or probed
    fn initialize(&self) -> Result<()>;

    /// Start (or resume) the background decode loop
    fn start_decoding(&self);

    /// Stop decoding and release decoder resources
    fn stop(&self);

    /// Relocate the decoder so the buffer fills from `to`
    ///
    /// # Errors
    /// Returns an error if the position cannot be reached
    fn seek(&self, to: TimeInSeconds) -> Result<()>;

    /// Buffered frame nearest to `time`, or `None` if the buffer is empty
    fn frame_at(&self, time: TimeInSeconds) -> Option<VideoFrame>;

    /// Timestamp of the most recently decoded frame
    fn current_timestamp(&self) -> TimeInSeconds;

    /// Current decode buffer occupancy
    fn buffer_status(&self) -> BufferStatus;

    /// Decoder state (owned by the implementation, read-only to the engine)
    fn state(&self) -> ChannelState;
}

/// GPS track lookup for the current playback time
///
/// Called once per sync tick and on seek. Implementations typically cache the
/// returned point for display; the engine does not consume it further.
pub trait LocationService: Send + Sync {
    /// Location at `time`, if the session carries GPS data
    fn current_location(&self, time: TimeInSeconds) -> Option<GpsPoint>;

    /// Drop any cached state
    fn clear(&self);
}

/// G-sensor lookup for the current playback time
pub trait MotionService: Send + Sync {
    /// Acceleration at `time`, if the session carries G-sensor data
    fn current_acceleration(&self, time: TimeInSeconds) -> Option<AccelerationSample>;

    /// Drop any cached state
    fn clear(&self);
}
