//! Blackbox Player - Synchronized Playback
//!
//! Keeps any number of independently decoded camera channels presenting frames
//! against one virtual timeline.
//!
//! This crate provides:
//! - Channel registry (thread-safe, copy-out snapshots)
//! - Master clock (wall clock -> media time, variable speed)
//! - Drift correction (50 ms tolerance, background re-seek above 100 ms)
//! - Buffer monitoring (edge-triggered "is buffering" signal)
//! - Play / pause / stop / seek state machine
//! - 30 Hz sync scheduler
//!
//! # Architecture
//!
//! `blackbox-playback` never decodes video itself. Decoders, GPS and G-sensor
//! sources are plugged in through the traits in `blackbox-core`; the UI layer
//! polls [`SyncEngine::snapshot`] or subscribes to [`SyncEvent`]s.
//!
//! # Example
//!
//! ```rust,no_run
//! use blackbox_core::{ChannelDescriptor, SessionDescriptor, CameraPosition, VideoChannel};
//! use blackbox_playback::{SyncConfig, SyncEngine, SyncEvent};
//! use std::sync::Arc;
//!
//! # fn decoder(_: &str) -> Arc<dyn VideoChannel> { unimplemented!() }
//! let engine = SyncEngine::new(SyncConfig::default())?;
//! let events = engine.subscribe();
//!
//! let session = SessionDescriptor::new(60.0)
//!     .with_channel(ChannelDescriptor::new(CameraPosition::Front, decoder("front.mp4")))
//!     .with_channel(ChannelDescriptor::new(CameraPosition::Rear, decoder("rear.mp4")).with_offset(0.2));
//!
//! engine.load_session(&session)?;
//! engine.play()?;
//! engine.seek_to_time(30.0)?;
//!
//! for event in events.try_iter() {
//!     if let SyncEvent::BufferingChanged { is_buffering } = event {
//!         println!("buffering: {is_buffering}");
//!     }
//! }
//!
//! let frames = engine.get_synchronized_frames();
//! # Ok::<(), blackbox_playback::PlaybackError>(())
//! ```

mod buffer;
pub mod clock;
mod config;
pub mod drift;
mod engine;
mod error;
mod events;
mod generation;
mod registry;
mod reseek;
mod scheduler;
pub mod types;

#[cfg(test)]
mod testing;

// Public exports
pub use buffer::BufferMonitor;
pub use clock::{format_time, playback_position, ClockReference, SystemTimeSource, TimeSource};
pub use config::{SchedulerMode, SyncConfig};
pub use drift::{DriftAction, DriftCorrector, DriftStatistics, DriftThresholds};
pub use engine::{SyncEngine, SyncEngineBuilder};
pub use error::{PlaybackError, Result};
pub use events::{EventBus, SyncEvent};
pub use generation::SessionGeneration;
pub use registry::{ChannelRegistry, SyncChannel};
pub use scheduler::{SyncScheduler, TickHandler, TickOutcome};
pub use types::{PlaybackSnapshot, PlaybackState};
