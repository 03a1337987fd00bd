//! Blackbox Player Core
//!
//! Platform-agnostic domain types, collaborator traits, and error handling
//! shared by the playback engine and the platform layers that feed it.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `CameraPosition`, `VideoFrame`, `BufferStatus`, `SessionDescriptor`
//! - **Core Traits**: `VideoChannel` (per-camera decoder), `LocationService`, `MotionService`
//! - **Error Handling**: Unified `BlackboxError` and `Result` types
//!
//! Decoding, file discovery and telemetry parsing live outside this crate;
//! they are plugged in through the traits.
//!
//! # Example
//!
//! ```rust
//! use blackbox_core::{BufferStatus, CameraPosition};
//!
//! let status = BufferStatus::new(6, 30);
//! assert!(status.is_below(0.25));
//! assert_eq!(CameraPosition::Front.to_string(), "front");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{BlackboxError, Result};
pub use traits::{LocationService, MotionService, VideoChannel};

pub use types::{
    AccelerationSample, BufferStatus, CameraPosition, ChannelDescriptor, ChannelState, GpsPoint,
    SessionDescriptor, TimeInSeconds, VideoFrame,
};
