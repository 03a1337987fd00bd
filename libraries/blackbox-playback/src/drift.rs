//! Drift correction
//!
//! Each tick, every channel's nearest buffered frame is compared against the
//! channel's target time. Two-tier response:
//!
//! | drift                      | action                                  |
//! |----------------------------|-----------------------------------------|
//! | `<= tolerance` (50 ms)     | none                                    |
//! | `<= resync` (100 ms)       | log only, left to settle as buffers fill |
//! | `> resync`                 | background re-seek to the target time   |
//!
//! Re-seeks are handed to a [`ReseekDispatcher`] so the tick never blocks on
//! decoder I/O. A channel with a re-seek in flight is not dispatched again.

use blackbox_core::{CameraPosition, TimeInSeconds};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, trace};

use crate::registry::SyncChannel;

/// Response tier for a drift measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftAction {
    /// Within tolerance
    InSync,

    /// Noticeable but expected to self-correct
    Monitor,

    /// Large enough to re-seek the channel
    Resync,
}

/// Drift thresholds, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftThresholds {
    pub tolerance: TimeInSeconds,
    pub resync: TimeInSeconds,
}

impl DriftThresholds {
    pub fn from_millis(tolerance_ms: f64, resync_ms: f64) -> Self {
        Self {
            tolerance: tolerance_ms / 1000.0,
            resync: resync_ms / 1000.0,
        }
    }

    /// Map an absolute drift to its tier
    pub fn classify(&self, drift: TimeInSeconds) -> DriftAction {
        if drift <= self.tolerance {
            DriftAction::InSync
        } else if drift <= self.resync {
            DriftAction::Monitor
        } else {
            DriftAction::Resync
        }
    }
}

impl Default for DriftThresholds {
    fn default() -> Self {
        Self::from_millis(50.0, 100.0)
    }
}

/// One channel's drift on one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftMeasurement {
    pub position: CameraPosition,
    pub target_time: TimeInSeconds,
    pub frame_timestamp: TimeInSeconds,
    /// `|frame_timestamp - target_time|`
    pub drift: TimeInSeconds,
    pub action: DriftAction,
    /// A re-seek was handed off on this tick
    pub reseek_dispatched: bool,
}

impl DriftMeasurement {
    pub fn drift_ms(&self) -> f64 {
        self.drift * 1000.0
    }
}

/// Background re-seek of one channel
#[derive(Debug, Clone)]
pub struct ReseekRequest {
    pub channel: Arc<SyncChannel>,
    pub target_time: TimeInSeconds,
    /// Session generation the request was issued under
    pub generation: u64,
}

/// Executes re-seeks off the tick's thread
pub trait ReseekDispatcher: Send + Sync {
    /// Queue `request`. Must not block on the seek itself.
    ///
    /// Implementations call `request.channel.finish_reseek()` once the seek
    /// has completed, failed, or been discarded.
    fn dispatch(&self, request: ReseekRequest);
}

/// Bounded history of the largest inter-channel drift per tick
///
/// Oldest samples are evicted first.
#[derive(Debug, Clone)]
pub struct DriftHistory {
    samples: VecDeque<TimeInSeconds>,
    max_size: usize,
}

impl DriftHistory {
    pub fn new(max_size: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record a sample, discarding the oldest when full
    pub fn push(&mut self, drift: TimeInSeconds) {
        if self.max_size == 0 {
            return;
        }
        if self.samples.len() >= self.max_size {
            self.samples.pop_front();
        }
        self.samples.push_back(drift);
    }

    /// Samples oldest first
    pub fn samples(&self) -> Vec<TimeInSeconds> {
        self.samples.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn statistics(&self) -> DriftStatistics {
        let Some(&latest) = self.samples.back() else {
            return DriftStatistics::default();
        };

        let sum: f64 = self.samples.iter().sum();
        let max = self.samples.iter().copied().fold(0.0_f64, f64::max);

        DriftStatistics {
            samples: self.samples.len(),
            average_ms: sum / self.samples.len() as f64 * 1000.0,
            max_ms: max * 1000.0,
            latest_ms: Some(latest * 1000.0),
        }
    }
}

impl Default for DriftHistory {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Summary of recorded drift, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DriftStatistics {
    pub samples: usize,
    pub average_ms: f64,
    pub max_ms: f64,
    pub latest_ms: Option<f64>,
}

/// Per-tick drift check and correction policy
#[derive(Debug)]
pub struct DriftCorrector {
    thresholds: DriftThresholds,
    history: Mutex<DriftHistory>,
}

impl DriftCorrector {
    pub fn new(thresholds: DriftThresholds, history_size: usize) -> Self {
        Self {
            thresholds,
            history: Mutex::new(DriftHistory::new(history_size)),
        }
    }

    /// Measure one channel against master time `media_time`
    ///
    /// `None` when the channel has nothing buffered or its target lies before
    /// its recording starts; neither is an error.
    pub fn measure(&self, channel: &SyncChannel, media_time: TimeInSeconds) -> Option<DriftMeasurement> {
        let target_time = channel.target_time(media_time);
        if target_time < 0.0 {
            return None;
        }

        let frame = channel.frame_for(media_time)?;
        let drift = frame.distance_to(target_time);

        Some(DriftMeasurement {
            position: channel.position(),
            target_time,
            frame_timestamp: frame.timestamp,
            drift,
            action: self.thresholds.classify(drift),
            reseek_dispatched: false,
        })
    }

    /// Run the drift policy over `channels` for one tick
    ///
    /// Returns the measurements taken; channels without a buffered frame are
    /// absent. The largest drift is appended to the history.
    pub fn correct(
        &self,
        channels: &[Arc<SyncChannel>],
        media_time: TimeInSeconds,
        generation: u64,
        dispatcher: &dyn ReseekDispatcher,
    ) -> Vec<DriftMeasurement> {
        let mut measurements = Vec::with_capacity(channels.len());

        for channel in channels {
            let Some(mut measurement) = self.measure(channel, media_time) else {
                trace!(position = %channel.position(), "no frame buffered, skipping drift check");
                continue;
            };

            match measurement.action {
                DriftAction::InSync => {}
                DriftAction::Monitor => {
                    debug!(
                        position = %measurement.position,
                        drift_ms = measurement.drift_ms(),
                        "minor drift, waiting for buffer to settle"
                    );
                }
                DriftAction::Resync => {
                    if channel.begin_reseek() {
                        info!(
                            position = %measurement.position,
                            drift_ms = measurement.drift_ms(),
                            target_time = measurement.target_time,
                            "drift over resync threshold, re-seeking channel"
                        );
                        dispatcher.dispatch(ReseekRequest {
                            channel: Arc::clone(channel),
                            target_time: measurement.target_time,
                            generation,
                        });
                        measurement.reseek_dispatched = true;
                    } else {
                        trace!(position = %measurement.position, "re-seek already in flight");
                    }
                }
            }

            measurements.push(measurement);
        }

        if let Some(max_drift) = measurements.iter().map(|m| m.drift).reduce(f64::max) {
            self.history.lock().push(max_drift);
        }

        measurements
    }

    pub fn statistics(&self) -> DriftStatistics {
        self.history.lock().statistics()
    }

    pub fn history(&self) -> Vec<TimeInSeconds> {
        self.history.lock().samples()
    }

    pub fn clear_history(&self) {
        self.history.lock().clear();
    }
}

impl Default for DriftCorrector {
    fn default() -> Self {
        Self::new(DriftThresholds::default(), 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubChannel;

    /// Records requests instead of seeking
    #[derive(Default)]
    struct RecordingDispatcher {
        requests: Mutex<Vec<(CameraPosition, TimeInSeconds, u64)>>,
    }

    impl ReseekDispatcher for RecordingDispatcher {
        fn dispatch(&self, request: ReseekRequest) {
            self.requests.lock().push((
                request.channel.position(),
                request.target_time,
                request.generation,
            ));
        }
    }

    fn channel_with_offset(position: CameraPosition, frame_offset: Option<f64>) -> Arc<SyncChannel> {
        let stub = Arc::new(StubChannel::with_frame_offset(frame_offset));
        Arc::new(SyncChannel::new(position, stub, 0.0))
    }

    #[test]
    fn classify_tiers() {
        let thresholds = DriftThresholds::default();
        assert_eq!(thresholds.classify(0.0), DriftAction::InSync);
        assert_eq!(thresholds.classify(0.040), DriftAction::InSync);
        assert_eq!(thresholds.classify(0.070), DriftAction::Monitor);
        assert_eq!(thresholds.classify(0.120), DriftAction::Resync);
    }

    #[test]
    fn large_drift_dispatches_once_per_flight() {
        let corrector = DriftCorrector::default();
        let dispatcher = RecordingDispatcher::default();
        let channels = vec![channel_with_offset(CameraPosition::Front, Some(0.120))];

        let first = corrector.correct(&channels, 5.0, 7, &dispatcher);
        assert!(first[0].reseek_dispatched);

        // Still in flight: the next tick must not dispatch again
        let second = corrector.correct(&channels, 5.033, 7, &dispatcher);
        assert_eq!(second[0].action, DriftAction::Resync);
        assert!(!second[0].reseek_dispatched);

        let requests = dispatcher.requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0], (CameraPosition::Front, 5.0, 7));
    }

    #[test]
    fn minor_drift_does_not_dispatch() {
        let corrector = DriftCorrector::default();
        let dispatcher = RecordingDispatcher::default();
        let channels = vec![
            channel_with_offset(CameraPosition::Front, Some(0.040)),
            channel_with_offset(CameraPosition::Rear, Some(-0.070)),
        ];

        let measurements = corrector.correct(&channels, 1.0, 0, &dispatcher);

        assert_eq!(measurements[0].action, DriftAction::InSync);
        assert_eq!(measurements[1].action, DriftAction::Monitor);
        assert!(dispatcher.requests.lock().is_empty());
    }

    #[test]
    fn empty_buffer_skips_channel() {
        let corrector = DriftCorrector::default();
        let dispatcher = RecordingDispatcher::default();
        let channels = vec![
            channel_with_offset(CameraPosition::Front, None),
            channel_with_offset(CameraPosition::Rear, Some(0.010)),
        ];

        let measurements = corrector.correct(&channels, 1.0, 0, &dispatcher);

        assert_eq!(measurements.len(), 1);
        assert_eq!(measurements[0].position, CameraPosition::Rear);
    }

    #[test]
    fn history_records_max_drift_per_tick() {
        let corrector = DriftCorrector::default();
        let dispatcher = RecordingDispatcher::default();
        let channels = vec![
            channel_with_offset(CameraPosition::Front, Some(0.010)),
            channel_with_offset(CameraPosition::Rear, Some(0.030)),
        ];

        corrector.correct(&channels, 1.0, 0, &dispatcher);

        let history = corrector.history();
        assert_eq!(history.len(), 1);
        assert!((history[0] - 0.030).abs() < 1e-9);
    }

    #[test]
    fn no_measurements_no_history_sample() {
        let corrector = DriftCorrector::default();
        let dispatcher = RecordingDispatcher::default();
        corrector.correct(&[], 1.0, 0, &dispatcher);
        assert!(corrector.history().is_empty());
    }

    #[test]
    fn history_bounded() {
        let mut history = DriftHistory::new(3);
        for drift in [0.01, 0.02, 0.03, 0.04] {
            history.push(drift);
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.samples(), vec![0.02, 0.03, 0.04]);
    }

    #[test]
    fn statistics_in_millis() {
        let mut history = DriftHistory::new(10);
        assert_eq!(history.statistics(), DriftStatistics::default());

        history.push(0.010);
        history.push(0.030);
        history.push(0.020);

        let stats = history.statistics();
        assert_eq!(stats.samples, 3);
        assert!((stats.average_ms - 20.0).abs() < 1e-9);
        assert!((stats.max_ms - 30.0).abs() < 1e-9);
        assert!((stats.latest_ms.unwrap() - 20.0).abs() < 1e-9);
    }
}
