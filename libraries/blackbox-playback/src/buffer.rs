//! Buffer monitor
//!
//! Collapses per-channel fill ratios into one "is buffering" flag. The flag is
//! edge-triggered: `update` reports a change only on the tick where it flips.

use blackbox_core::{BufferStatus, CameraPosition};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::registry::SyncChannel;

/// Aggregated buffering signal
#[derive(Debug)]
pub struct BufferMonitor {
    low_watermark: f64,
    is_buffering: AtomicBool,
}

impl BufferMonitor {
    pub fn new(low_watermark: f64) -> Self {
        Self {
            low_watermark,
            is_buffering: AtomicBool::new(false),
        }
    }

    pub fn is_buffering(&self) -> bool {
        self.is_buffering.load(Ordering::Acquire)
    }

    /// Fresh buffer status for every channel
    pub fn statuses(channels: &[Arc<SyncChannel>]) -> BTreeMap<CameraPosition, BufferStatus> {
        channels
            .iter()
            .map(|c| (c.position(), c.decoder().buffer_status()))
            .collect()
    }

    /// Query every channel and update the flag
    ///
    /// Returns `Some(new_value)` only when the flag changed.
    pub fn update(&self, channels: &[Arc<SyncChannel>]) -> Option<bool> {
        let low = channels
            .iter()
            .map(|c| (c.position(), c.decoder().buffer_status()))
            .find(|(_, status)| status.is_below(self.low_watermark));

        if let Some((position, status)) = low {
            let changed = self.set(true);
            if changed.is_some() {
                debug!(%position, fill_ratio = status.fill_ratio, "channel buffer low, buffering");
            }
            changed
        } else {
            let changed = self.set(false);
            if changed.is_some() {
                debug!("all channel buffers recovered");
            }
            changed
        }
    }

    /// Force the flag off (session teardown)
    pub fn reset(&self) -> Option<bool> {
        self.set(false)
    }

    fn set(&self, value: bool) -> Option<bool> {
        let previous = self.is_buffering.swap(value, Ordering::AcqRel);
        (previous != value).then_some(value)
    }
}

impl Default for BufferMonitor {
    fn default() -> Self {
        Self::new(0.2)
    }
}
