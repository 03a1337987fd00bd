//! Channel registry
//!
//! Owns the set of active channels behind a single mutex. Every critical
//! section is pure collection work: callers get `Arc` copies out and invoke
//! decoder methods only after the lock is released, so a slow seek or decode
//! call can never stall the sync tick on the registry.

use blackbox_core::{CameraPosition, TimeInSeconds, VideoChannel, VideoFrame};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A loaded channel: decoder handle plus sync bookkeeping
pub struct SyncChannel {
    position: CameraPosition,
    decoder: Arc<dyn VideoChannel>,
    time_offset: TimeInSeconds,
    last_known_timestamp: Mutex<Option<TimeInSeconds>>,
    reseek_pending: AtomicBool,
}

impl SyncChannel {
    pub fn new(
        position: CameraPosition,
        decoder: Arc<dyn VideoChannel>,
        time_offset: TimeInSeconds,
    ) -> Self {
        Self {
            position,
            decoder,
            time_offset,
            last_known_timestamp: Mutex::new(None),
            reseek_pending: AtomicBool::new(false),
        }
    }

    pub fn position(&self) -> CameraPosition {
        self.position
    }

    pub fn decoder(&self) -> &Arc<dyn VideoChannel> {
        &self.decoder
    }

    pub fn time_offset(&self) -> TimeInSeconds {
        self.time_offset
    }

    /// Channel-local time corresponding to master time `media_time`
    #[inline]
    pub fn target_time(&self, media_time: TimeInSeconds) -> TimeInSeconds {
        media_time + self.time_offset
    }

    /// Fetch the frame nearest to the channel's target for `media_time`
    ///
    /// Records the frame timestamp as the last known timestamp.
    pub fn frame_for(&self, media_time: TimeInSeconds) -> Option<VideoFrame> {
        let frame = self.decoder.frame_at(self.target_time(media_time))?;
        self.record_timestamp(frame.timestamp);
        Some(frame)
    }

    /// Most recent frame timestamp seen by the engine
    pub fn last_known_timestamp(&self) -> Option<TimeInSeconds> {
        *self.last_known_timestamp.lock()
    }

    pub fn record_timestamp(&self, timestamp: TimeInSeconds) {
        *self.last_known_timestamp.lock() = Some(timestamp);
    }

    /// Claim the re-seek slot; false if a re-seek is already in flight
    pub fn begin_reseek(&self) -> bool {
        self.reseek_pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Release the re-seek slot
    pub fn finish_reseek(&self) {
        self.reseek_pending.store(false, Ordering::Release);
    }

    pub fn is_reseek_pending(&self) -> bool {
        self.reseek_pending.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for SyncChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncChannel")
            .field("position", &self.position)
            .field("time_offset", &self.time_offset)
            .field("last_known_timestamp", &self.last_known_timestamp())
            .field("reseek_pending", &self.is_reseek_pending())
            .finish_non_exhaustive()
    }
}

/// Thread-safe set of channels keyed by camera position
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: Mutex<BTreeMap<CameraPosition, Arc<SyncChannel>>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a channel, returning the one it replaced at the same position
    pub fn add(&self, channel: SyncChannel) -> Option<Arc<SyncChannel>> {
        self.channels
            .lock()
            .insert(channel.position(), Arc::new(channel))
    }

    /// Empty the registry, returning what was in it
    pub fn remove_all(&self) -> Vec<Arc<SyncChannel>> {
        std::mem::take(&mut *self.channels.lock())
            .into_values()
            .collect()
    }

    /// Copy of the current channel set, in position order
    pub fn snapshot(&self) -> Vec<Arc<SyncChannel>> {
        self.channels.lock().values().cloned().collect()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.lock().is_empty()
    }

    /// True when at least one channel is loaded and every channel is ready
    pub fn all_ready(&self) -> bool {
        let channels = self.snapshot();
        !channels.is_empty() && channels.iter().all(|c| c.decoder().state().is_ready())
    }
}
