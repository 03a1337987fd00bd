//! Shared test doubles for the integration tests

#![allow(dead_code)]

use blackbox_core::{
    AccelerationSample, BlackboxError, BufferStatus, CameraPosition, ChannelDescriptor,
    ChannelState, GpsPoint, LocationService, MotionService, Result, SessionDescriptor,
    TimeInSeconds, VideoChannel, VideoFrame,
};
use blackbox_playback::{SchedulerMode, SyncConfig, SyncEngine, SyncEvent, TimeSource};
use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

// ===== Decoder =====

/// Scriptable decoder that records every call
pub struct MockChannel {
    /// Frames are returned this far from the requested time; `None` = empty buffer
    pub frame_offset: Mutex<Option<TimeInSeconds>>,
    pub buffer: Mutex<BufferStatus>,
    pub state: Mutex<ChannelState>,
    pub seeks: Mutex<Vec<TimeInSeconds>>,
    /// Seeks entered, including ones still blocked on the gate
    pub seeks_started: AtomicUsize,
    pub fail_seeks: AtomicBool,
    pub fail_init: AtomicBool,
    pub inits: AtomicUsize,
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    /// When set, `seek` blocks until the paired sender is dropped
    gate: Mutex<Option<Receiver<()>>>,
}

impl MockChannel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_frame_offset(offset: Option<TimeInSeconds>) -> Arc<Self> {
        let channel = Self::default();
        *channel.frame_offset.lock() = offset;
        Arc::new(channel)
    }

    pub fn failing_seeks() -> Arc<Self> {
        let channel = Self::default();
        channel.fail_seeks.store(true, Ordering::SeqCst);
        Arc::new(channel)
    }

    pub fn failing_init() -> Arc<Self> {
        let channel = Self::default();
        channel.fail_init.store(true, Ordering::SeqCst);
        Arc::new(channel)
    }

    /// Make subsequent seeks block; drop the returned sender to release them
    pub fn hold_seeks(&self) -> Sender<()> {
        let (tx, rx) = crossbeam_channel::bounded(0);
        *self.gate.lock() = Some(rx);
        tx
    }

    pub fn set_fill(&self, current: usize, capacity: usize) {
        *self.buffer.lock() = BufferStatus::new(current, capacity);
    }

    pub fn seek_count(&self) -> usize {
        self.seeks.lock().len()
    }

    pub fn seek_targets(&self) -> Vec<TimeInSeconds> {
        self.seeks.lock().clone()
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self {
            frame_offset: Mutex::new(Some(0.0)),
            buffer: Mutex::new(BufferStatus::new(30, 30)),
            state: Mutex::new(ChannelState::Idle),
            seeks: Mutex::new(Vec::new()),
            seeks_started: AtomicUsize::new(0),
            fail_seeks: AtomicBool::new(false),
            fail_init: AtomicBool::new(false),
            inits: AtomicUsize::new(0),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            gate: Mutex::new(None),
        }
    }
}

impl VideoChannel for MockChannel {
    fn initialize(&self) -> Result<()> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        if self.fail_init.load(Ordering::SeqCst) {
            *self.state.lock() = ChannelState::Error;
            return Err(BlackboxError::initialization("mock open failure"));
        }
        *self.state.lock() = ChannelState::Ready;
        Ok(())
    }

    fn start_decoding(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
        *self.state.lock() = ChannelState::Decoding;
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        *self.state.lock() = ChannelState::Idle;
    }

    fn seek(&self, to: TimeInSeconds) -> Result<()> {
        self.seeks_started.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            let _ = gate.recv();
        }

        self.seeks.lock().push(to);
        if self.fail_seeks.load(Ordering::SeqCst) {
            return Err(BlackboxError::seek(to, "mock seek failure"));
        }
        Ok(())
    }

    fn frame_at(&self, time: TimeInSeconds) -> Option<VideoFrame> {
        let offset = (*self.frame_offset.lock())?;
        let timestamp = time + offset;
        Some(VideoFrame::placeholder(timestamp, (timestamp * 30.0).max(0.0) as u64))
    }

    fn current_timestamp(&self) -> TimeInSeconds {
        self.seeks.lock().last().copied().unwrap_or(0.0)
    }

    fn buffer_status(&self) -> BufferStatus {
        *self.buffer.lock()
    }

    fn state(&self) -> ChannelState {
        *self.state.lock()
    }
}

// ===== Telemetry =====

/// Location and motion service that counts lookups
#[derive(Default)]
pub struct RecordingTelemetry {
    pub lookups: Mutex<Vec<TimeInSeconds>>,
    pub clears: AtomicUsize,
}

impl LocationService for RecordingTelemetry {
    fn current_location(&self, time: TimeInSeconds) -> Option<GpsPoint> {
        self.lookups.lock().push(time);
        Some(GpsPoint {
            latitude: 37.5665,
            longitude: 126.978,
            speed_kmh: Some(42.0),
            heading: None,
        })
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

impl MotionService for RecordingTelemetry {
    fn current_acceleration(&self, _time: TimeInSeconds) -> Option<AccelerationSample> {
        Some(AccelerationSample {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        })
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

// ===== Clock =====

/// Clock that only moves when told to
pub struct ManualClock {
    start: Instant,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            start: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
        })
    }

    pub fn advance(&self, seconds: f64) {
        *self.elapsed.lock() += Duration::from_secs_f64(seconds);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock()
    }
}

// ===== Engine =====

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("blackbox_playback=debug")
        .with_test_writer()
        .try_init();
}

/// Host-driven engine on a manual clock
pub fn manual_engine() -> (SyncEngine, Arc<ManualClock>) {
    init_tracing();
    let clock = ManualClock::new();
    let config = SyncConfig {
        scheduler: SchedulerMode::External,
        ..Default::default()
    };
    let engine = SyncEngine::builder(config)
        .time_source(clock.clone())
        .build()
        .unwrap();
    (engine, clock)
}

/// Session with one descriptor per `(position, channel)`
pub fn session_of(duration: f64, channels: &[(CameraPosition, Arc<MockChannel>)]) -> SessionDescriptor {
    channels
        .iter()
        .fold(SessionDescriptor::new(duration), |session, (position, channel)| {
            session.with_channel(ChannelDescriptor::new(*position, channel.clone()))
        })
}

/// Drain everything currently queued on `events`
pub fn drain(events: &Receiver<SyncEvent>) -> Vec<SyncEvent> {
    events.try_iter().collect()
}

pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(3);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}
