//! Sync Events
//!
//! Observable state changes pushed to subscribers. Each subscriber gets its own
//! unbounded channel; dropped receivers are pruned on the next emit.
//! Events are emitted after engine locks are released.

use blackbox_core::{CameraPosition, TimeInSeconds};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::types::PlaybackState;

/// Events emitted by the sync engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncEvent {
    /// A session finished loading
    SessionLoaded {
        channel_count: usize,
        duration: TimeInSeconds,
    },

    /// Playback state changed
    StateChanged { state: PlaybackState },

    /// Current time moved (tick, pause or seek)
    TimeUpdated {
        current_time: TimeInSeconds,
        /// `current_time / duration`
        position: f64,
    },

    /// Buffering indicator flipped
    BufferingChanged { is_buffering: bool },

    /// A channel drifted past the resync threshold and a re-seek was dispatched
    DriftCorrection {
        position: CameraPosition,
        drift_ms: f64,
        target_time: TimeInSeconds,
    },

    /// A per-channel operation failed; playback of other channels continues
    ChannelError {
        position: CameraPosition,
        message: String,
    },

    /// Playback speed changed
    SpeedChanged { speed: f64 },

    /// Master clock reached the session duration
    EndOfStream,
}

/// Fan-out of [`SyncEvent`]s to subscribers
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<Sender<SyncEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber
    pub fn subscribe(&self) -> Receiver<SyncEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Deliver `event` to every live subscriber
    pub fn emit(&self, event: SyncEvent) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}
