mod camera;
mod channel;
mod frame;
mod session;
mod telemetry;

/// Media time in seconds
///
/// Signed so per-channel offsets can move a target before the session start.
pub type TimeInSeconds = f64;

pub use camera::CameraPosition;
pub use channel::{BufferStatus, ChannelState};
pub use frame::VideoFrame;
pub use session::{ChannelDescriptor, SessionDescriptor};
pub use telemetry::{AccelerationSample, GpsPoint};
