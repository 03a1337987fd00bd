//! Sync engine - playback state machine and tick orchestration
//!
//! Owns the session (registry, clock reference, published scalars) and drives
//! the per-tick pipeline:
//!
//! 1. master clock -> `current_time`
//! 2. telemetry lookups (location, motion)
//! 3. end-of-stream check
//! 4. drift correction
//! 5. buffer monitoring
//!
//! # Locking
//!
//! Control calls (`play`, `pause`, `seek_to_time`, ...) serialize on the
//! scheduler mutex, which is never taken by the tick. Lock order is
//! control -> session; the registry lock is a leaf and no decoder method is
//! called while any engine lock is held.

use blackbox_core::{
    BufferStatus, CameraPosition, LocationService, MotionService, SessionDescriptor,
    TimeInSeconds, VideoFrame,
};
use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

use crate::buffer::BufferMonitor;
use crate::clock::{format_time, playback_position, ClockReference, SystemTimeSource, TimeSource};
use crate::config::{SchedulerMode, SyncConfig};
use crate::drift::{DriftAction, DriftCorrector, DriftStatistics, DriftThresholds};
use crate::error::{PlaybackError, Result};
use crate::events::{EventBus, SyncEvent};
use crate::generation::SessionGeneration;
use crate::registry::{ChannelRegistry, SyncChannel};
use crate::reseek::ReseekWorker;
use crate::scheduler::{SyncScheduler, TickHandler, TickOutcome};
use crate::types::{PlaybackSnapshot, PlaybackState};

/// Mutable session scalars, guarded together so the clock reference and the
/// state it belongs to are never observed torn
#[derive(Debug, Clone, Copy)]
struct SessionState {
    state: PlaybackState,
    current_time: TimeInSeconds,
    duration: TimeInSeconds,
    speed: f64,
    /// Present exactly while playing
    clock_reference: Option<ClockReference>,
    /// Set by end-of-stream; position reads 1.0 until the next load or stop
    ended: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            state: PlaybackState::Stopped,
            current_time: 0.0,
            duration: 0.0,
            speed: 1.0,
            clock_reference: None,
            ended: false,
        }
    }
}

impl SessionState {
    fn position(&self) -> f64 {
        if self.ended {
            return 1.0;
        }
        playback_position(self.current_time, self.duration)
    }

    fn clamp(&self, time: TimeInSeconds) -> TimeInSeconds {
        time.clamp(0.0, self.duration)
    }
}

/// State shared between the control surface and the tick
struct EngineShared {
    config: SyncConfig,
    registry: ChannelRegistry,
    session: Mutex<SessionState>,
    drift: DriftCorrector,
    buffer: BufferMonitor,
    events: Arc<EventBus>,
    generation: SessionGeneration,
    reseeker: ReseekWorker,
    clock: Arc<dyn TimeSource>,
    location: Option<Arc<dyn LocationService>>,
    motion: Option<Arc<dyn MotionService>>,
    /// Serializes ticks when the host drives them
    tick_guard: Mutex<()>,
}

impl EngineShared {
    fn emit(&self, event: SyncEvent) {
        self.events.emit(event);
    }

    /// Fire-and-forget telemetry lookups for `time`
    fn refresh_telemetry(&self, time: TimeInSeconds) {
        if let Some(location) = &self.location {
            if let Some(point) = location.current_location(time) {
                trace!(time, lat = point.latitude, lon = point.longitude, "location");
            }
        }
        if let Some(motion) = &self.motion {
            if let Some(sample) = motion.current_acceleration(time) {
                trace!(time, g = sample.magnitude(), "acceleration");
            }
        }
    }

    /// Stop and drop every channel and clear per-session caches
    fn release_channels(&self) {
        let channels = self.registry.remove_all();
        for channel in &channels {
            channel.decoder().stop();
        }
        if !channels.is_empty() {
            debug!(count = channels.len(), "released channels");
        }

        if let Some(location) = &self.location {
            location.clear();
        }
        if let Some(motion) = &self.motion {
            motion.clear();
        }
        self.drift.clear_history();

        if let Some(is_buffering) = self.buffer.reset() {
            self.emit(SyncEvent::BufferingChanged { is_buffering });
        }
    }

    /// Implicit stop on reaching the end, pinned at `duration`
    fn finish_stream(&self, generation: u64) {
        let (duration, position) = {
            let mut session = self.session.lock();
            if !self.generation.is_current(generation) || !session.state.is_playing() {
                return;
            }
            self.generation.advance();
            session.state = PlaybackState::Stopped;
            session.current_time = session.duration;
            session.clock_reference = None;
            session.ended = true;
            (session.duration, session.position())
        };

        self.release_channels();

        info!(duration, "end of stream");
        self.emit(SyncEvent::TimeUpdated {
            current_time: duration,
            position,
        });
        self.emit(SyncEvent::EndOfStream);
        self.emit(SyncEvent::StateChanged {
            state: PlaybackState::Stopped,
        });
    }
}

impl TickHandler for EngineShared {
    fn on_tick(&self, generation: u64) -> TickOutcome {
        let _tick = self.tick_guard.lock();

        if !self.generation.is_current(generation) {
            return TickOutcome::Finished;
        }

        let now = self.clock.now();
        let (media_time, current_time, position, duration) = {
            let mut session = self.session.lock();
            if !session.state.is_playing() {
                return TickOutcome::Continue;
            }
            let Some(reference) = session.clock_reference else {
                return TickOutcome::Continue;
            };

            let media_time = reference.media_time_at(now, session.speed);
            session.current_time = session.clamp(media_time);
            (
                media_time,
                session.current_time,
                session.position(),
                session.duration,
            )
        };

        self.emit(SyncEvent::TimeUpdated {
            current_time,
            position,
        });
        self.refresh_telemetry(current_time);

        if media_time >= duration {
            self.finish_stream(generation);
            return TickOutcome::Finished;
        }

        let channels = self.registry.snapshot();

        let measurements = self
            .drift
            .correct(&channels, current_time, generation, &self.reseeker);
        for m in measurements
            .iter()
            .filter(|m| m.action == DriftAction::Resync && m.reseek_dispatched)
        {
            self.emit(SyncEvent::DriftCorrection {
                position: m.position,
                drift_ms: m.drift_ms(),
                target_time: m.target_time,
            });
        }

        if let Some(is_buffering) = self.buffer.update(&channels) {
            self.emit(SyncEvent::BufferingChanged { is_buffering });
        }

        TickOutcome::Continue
    }
}

/// Builder for [`SyncEngine`] with optional collaborators
pub struct SyncEngineBuilder {
    config: SyncConfig,
    clock: Arc<dyn TimeSource>,
    location: Option<Arc<dyn LocationService>>,
    motion: Option<Arc<dyn MotionService>>,
}

impl SyncEngineBuilder {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemTimeSource),
            location: None,
            motion: None,
        }
    }

    /// Replace the monotonic clock (tests, offline rendering)
    #[must_use]
    pub fn time_source(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn location_service(mut self, service: Arc<dyn LocationService>) -> Self {
        self.location = Some(service);
        self
    }

    #[must_use]
    pub fn motion_service(mut self, service: Arc<dyn MotionService>) -> Self {
        self.motion = Some(service);
        self
    }

    /// Validate the configuration and start the background re-seek worker
    pub fn build(self) -> Result<SyncEngine> {
        self.config.validate()?;

        let events = Arc::new(EventBus::new());
        let generation = SessionGeneration::new();
        let reseeker = ReseekWorker::spawn(generation.clone(), Arc::clone(&events))?;

        let thresholds =
            DriftThresholds::from_millis(self.config.drift_tolerance_ms, self.config.drift_resync_ms);
        let drift = DriftCorrector::new(thresholds, self.config.drift_history_capacity);
        let buffer = BufferMonitor::new(self.config.buffer_low_watermark);
        let scheduler = SyncScheduler::new(self.config.tick_interval());

        let shared = Arc::new(EngineShared {
            config: self.config,
            registry: ChannelRegistry::new(),
            session: Mutex::new(SessionState::default()),
            drift,
            buffer,
            events,
            generation,
            reseeker,
            clock: self.clock,
            location: self.location,
            motion: self.motion,
            tick_guard: Mutex::new(()),
        });

        Ok(SyncEngine {
            shared,
            control: Mutex::new(scheduler),
        })
    }
}

/// Multi-channel synchronized playback engine
///
/// All methods take `&self`; the engine can be shared across threads behind
/// an `Arc`.
pub struct SyncEngine {
    shared: Arc<EngineShared>,
    /// Control lock; also owns the scheduler
    control: Mutex<SyncScheduler>,
}

impl SyncEngine {
    /// Engine with the system clock and no telemetry services
    pub fn new(config: SyncConfig) -> Result<Self> {
        SyncEngineBuilder::new(config).build()
    }

    pub fn builder(config: SyncConfig) -> SyncEngineBuilder {
        SyncEngineBuilder::new(config)
    }

    // ===== Session =====

    /// Replace the current session
    ///
    /// Tears down the previous session, then initializes every enabled
    /// channel. Channels that fail to initialize are reported with
    /// [`SyncEvent::ChannelError`] and skipped. On success the engine is
    /// paused at time 0.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::NoEnabledChannels`] if no channel is enabled (the
    ///   previous session is left untouched) or none initialized (the engine
    ///   is left stopped)
    /// - [`PlaybackError::InvalidDuration`] for a negative or non-finite duration
    pub fn load_session(&self, session: &SessionDescriptor) -> Result<()> {
        let mut scheduler = self.control.lock();

        if session.enabled_channels().next().is_none() {
            warn!("session has no enabled channels, keeping current session");
            return Err(PlaybackError::NoEnabledChannels);
        }
        if !session.duration.is_finite() || session.duration < 0.0 {
            return Err(PlaybackError::InvalidDuration(session.duration));
        }

        self.stop_locked(&mut scheduler);

        for descriptor in session.enabled_channels() {
            let position = descriptor.position;

            if let Err(e) = descriptor.channel.initialize() {
                warn!(%position, error = %e, "channel failed to initialize, skipping");
                self.shared.emit(SyncEvent::ChannelError {
                    position,
                    message: e.to_string(),
                });
                continue;
            }

            let channel = SyncChannel::new(
                position,
                Arc::clone(&descriptor.channel),
                descriptor.time_offset,
            );
            if let Some(replaced) = self.shared.registry.add(channel) {
                warn!(%position, "duplicate camera position, replacing earlier channel");
                replaced.decoder().stop();
            }
        }

        let channel_count = self.shared.registry.channel_count();
        if channel_count == 0 {
            error!("no channel could be initialized");
            return Err(PlaybackError::NoEnabledChannels);
        }

        {
            let mut state = self.shared.session.lock();
            state.duration = session.duration;
            state.current_time = 0.0;
            state.clock_reference = None;
            state.ended = false;
            state.state = PlaybackState::Paused;
        }

        info!(
            channels = channel_count,
            duration = session.duration,
            "session loaded"
        );
        self.shared.emit(SyncEvent::SessionLoaded {
            channel_count,
            duration: session.duration,
        });
        self.shared.emit(SyncEvent::StateChanged {
            state: PlaybackState::Paused,
        });

        Ok(())
    }

    // ===== Playback Control =====

    /// Start or resume playback from `current_time`
    ///
    /// No-op when already playing, or (with a warning) when no channels are
    /// loaded.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::Scheduler`] if the tick thread cannot be started; the
    /// engine stays paused.
    pub fn play(&self) -> Result<()> {
        let mut scheduler = self.control.lock();
        self.play_locked(&mut scheduler)
    }

    /// Pause playback; decoders keep filling their buffers
    pub fn pause(&self) {
        let mut scheduler = self.control.lock();
        self.pause_locked(&mut scheduler);
    }

    pub fn toggle_play_pause(&self) -> Result<()> {
        let mut scheduler = self.control.lock();
        if self.playback_state().is_playing() {
            self.pause_locked(&mut scheduler);
            Ok(())
        } else {
            self.play_locked(&mut scheduler)
        }
    }

    /// Stop playback and release every channel
    pub fn stop(&self) {
        let mut scheduler = self.control.lock();
        self.stop_locked(&mut scheduler);
    }

    // ===== Seek =====

    /// Relocate every channel to `time`, clamped to `[0, duration]`
    ///
    /// `current_time` reflects the target once this returns, before any tick.
    /// Per-channel seek failures are reported with [`SyncEvent::ChannelError`]
    /// and do not stop the remaining channels from seeking.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::Scheduler`] if playback could not be resumed.
    pub fn seek_to_time(&self, time: TimeInSeconds) -> Result<()> {
        let mut scheduler = self.control.lock();
        self.seek_locked(&mut scheduler, time)
    }

    /// Seek relative to `current_time`
    pub fn seek_by_seconds(&self, delta: TimeInSeconds) -> Result<()> {
        let mut scheduler = self.control.lock();
        let target = self.current_time() + delta;
        self.seek_locked(&mut scheduler, target)
    }

    /// Seek forward by the configured step
    pub fn skip_forward(&self) -> Result<()> {
        self.seek_by_seconds(self.shared.config.seek_step_seconds)
    }

    /// Seek backward by the configured step
    pub fn skip_backward(&self) -> Result<()> {
        self.seek_by_seconds(-self.shared.config.seek_step_seconds)
    }

    // ===== Speed =====

    /// Set the playback speed multiplier
    ///
    /// Applies from now on; media time already reached is kept. `0.0`
    /// freezes the clock.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::InvalidSpeed`] for negative or non-finite values.
    pub fn set_speed(&self, speed: f64) -> Result<()> {
        if !speed.is_finite() || speed < 0.0 {
            return Err(PlaybackError::InvalidSpeed(speed));
        }

        let now = self.shared.clock.now();
        let changed = {
            let mut session = self.shared.session.lock();
            let changed = session.speed != speed;
            if let Some(reference) = session.clock_reference {
                // Re-anchor so the old speed still covers the time already elapsed
                session.clock_reference = Some(ClockReference::new(
                    now,
                    reference.media_time_at(now, session.speed),
                ));
            }
            session.speed = speed;
            changed
        };

        if changed {
            debug!(speed, "playback speed changed");
            self.shared.emit(SyncEvent::SpeedChanged { speed });
        }
        Ok(())
    }

    // ===== Tick =====

    /// Run one sync tick now
    ///
    /// This is how the host drives the engine in [`SchedulerMode::External`].
    /// Ticks never overlap, also with the internal scheduler.
    pub fn tick(&self) -> TickOutcome {
        let generation = self.shared.generation.current();
        self.shared.on_tick(generation)
    }

    // ===== Frames & Buffers =====

    /// Nearest buffered frame of every channel for `current_time`
    ///
    /// Channels with an empty buffer are absent.
    pub fn get_synchronized_frames(&self) -> BTreeMap<CameraPosition, VideoFrame> {
        let current_time = self.current_time();
        self.shared
            .registry
            .snapshot()
            .iter()
            .filter_map(|channel| {
                channel
                    .frame_for(current_time)
                    .map(|frame| (channel.position(), frame))
            })
            .collect()
    }

    /// Fresh buffer status of every channel
    pub fn get_buffer_status(&self) -> BTreeMap<CameraPosition, BufferStatus> {
        BufferMonitor::statuses(&self.shared.registry.snapshot())
    }

    /// Last frame timestamp seen per channel
    pub fn channel_timestamps(&self) -> BTreeMap<CameraPosition, Option<TimeInSeconds>> {
        self.shared
            .registry
            .snapshot()
            .iter()
            .map(|c| (c.position(), c.last_known_timestamp()))
            .collect()
    }

    pub fn channel_count(&self) -> usize {
        self.shared.registry.channel_count()
    }

    /// True when at least one channel is loaded and all are ready or decoding
    pub fn all_channels_ready(&self) -> bool {
        self.shared.registry.all_ready()
    }

    // ===== State =====

    pub fn playback_state(&self) -> PlaybackState {
        self.shared.session.lock().state
    }

    pub fn current_time(&self) -> TimeInSeconds {
        self.shared.session.lock().current_time
    }

    /// `current_time / duration`, in [0, 1]
    pub fn position(&self) -> f64 {
        self.shared.session.lock().position()
    }

    pub fn duration(&self) -> TimeInSeconds {
        self.shared.session.lock().duration
    }

    pub fn speed(&self) -> f64 {
        self.shared.session.lock().speed
    }

    pub fn is_buffering(&self) -> bool {
        self.shared.buffer.is_buffering()
    }

    /// Consistent view of all observable scalars
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let session = *self.shared.session.lock();
        PlaybackSnapshot {
            state: session.state,
            current_time: session.current_time,
            position: session.position(),
            duration: session.duration,
            speed: session.speed,
            is_buffering: self.is_buffering(),
            channel_count: self.channel_count(),
        }
    }

    pub fn drift_statistics(&self) -> DriftStatistics {
        self.shared.drift.statistics()
    }

    /// `current_time` as `MM:SS` / `H:MM:SS`
    pub fn current_time_string(&self) -> String {
        format_time(self.current_time())
    }

    pub fn duration_string(&self) -> String {
        format_time(self.duration())
    }

    /// Time left, as `-MM:SS`
    pub fn remaining_time_string(&self) -> String {
        let session = *self.shared.session.lock();
        format!(
            "-{}",
            format_time(session.duration - session.current_time)
        )
    }

    // ===== Events =====

    /// Subscribe to [`SyncEvent`]s
    pub fn subscribe(&self) -> Receiver<SyncEvent> {
        self.shared.events.subscribe()
    }

    pub fn config(&self) -> &SyncConfig {
        &self.shared.config
    }

    // ===== Internal (control lock held) =====

    fn play_locked(&self, scheduler: &mut SyncScheduler) -> Result<()> {
        if let Some(start_time) = self.start_clock(scheduler)? {
            info!(from = start_time, "playback started");
            self.shared.emit(SyncEvent::StateChanged {
                state: PlaybackState::Playing,
            });
        }
        Ok(())
    }

    fn pause_locked(&self, scheduler: &mut SyncScheduler) {
        let Some((current_time, position)) = self.halt_clock(scheduler) else {
            return;
        };

        debug!(at = current_time, "playback paused");
        self.shared.emit(SyncEvent::TimeUpdated {
            current_time,
            position,
        });
        self.shared.emit(SyncEvent::StateChanged {
            state: PlaybackState::Paused,
        });
    }

    /// Enter `Playing` from `current_time` without publishing anything
    ///
    /// Returns the start time, or `None` when already playing or empty.
    fn start_clock(&self, scheduler: &mut SyncScheduler) -> Result<Option<TimeInSeconds>> {
        if self.playback_state().is_playing() {
            return Ok(None);
        }

        let channels = self.shared.registry.snapshot();
        if channels.is_empty() {
            warn!("play() with no channels loaded, ignoring");
            return Ok(None);
        }

        for channel in &channels {
            channel.decoder().start_decoding();
        }

        let now = self.shared.clock.now();
        let generation = self.shared.generation.current();
        let start_time = {
            let mut session = self.shared.session.lock();
            session.clock_reference = Some(ClockReference::new(now, session.current_time));
            session.state = PlaybackState::Playing;
            session.current_time
        };

        if self.shared.config.scheduler == SchedulerMode::Internal {
            let handler: Arc<dyn TickHandler> = self.shared.clone();
            if let Err(e) = scheduler.start(handler, generation) {
                error!(error = %e, "failed to start sync scheduler");
                let mut session = self.shared.session.lock();
                session.state = PlaybackState::Paused;
                session.clock_reference = None;
                return Err(e);
            }
        }

        Ok(Some(start_time))
    }

    /// Freeze the clock and enter `Paused` without publishing anything
    ///
    /// Returns the frozen time and position if playback was running.
    fn halt_clock(&self, scheduler: &mut SyncScheduler) -> Option<(TimeInSeconds, f64)> {
        let now = self.shared.clock.now();

        let paused_at = {
            let mut session = self.shared.session.lock();
            if session.state.is_playing() {
                if let Some(reference) = session.clock_reference.take() {
                    session.current_time = session.clamp(reference.media_time_at(now, session.speed));
                }
                session.state = PlaybackState::Paused;
                Some((session.current_time, session.position()))
            } else {
                None
            }
        };

        // Also reaps a tick thread that is finishing the stream right now
        scheduler.stop();
        paused_at
    }

    fn stop_locked(&self, scheduler: &mut SyncScheduler) {
        scheduler.stop();
        self.shared.generation.advance();

        let previous = {
            let mut session = self.shared.session.lock();
            let previous = session.state;
            session.state = PlaybackState::Stopped;
            session.current_time = 0.0;
            session.duration = 0.0;
            session.clock_reference = None;
            session.ended = false;
            previous
        };

        self.shared.release_channels();

        if previous != PlaybackState::Stopped {
            info!("playback stopped");
            self.shared.emit(SyncEvent::TimeUpdated {
                current_time: 0.0,
                position: 0.0,
            });
            self.shared.emit(SyncEvent::StateChanged {
                state: PlaybackState::Stopped,
            });
        }
    }

    fn seek_locked(&self, scheduler: &mut SyncScheduler, time: TimeInSeconds) -> Result<()> {
        if !time.is_finite() {
            warn!(time, "ignoring seek to non-finite time");
            return Ok(());
        }
        if self.shared.registry.is_empty() {
            debug!(time, "seek with no session loaded, ignoring");
            return Ok(());
        }

        // Playing -> Paused -> Playing is internal; subscribers only see the net change
        let was_playing = self.halt_clock(scheduler).is_some();

        // Re-seeks still in flight target the old position
        let generation = self.shared.generation.advance();
        let target = self.shared.session.lock().clamp(time);

        for channel in &self.shared.registry.snapshot() {
            let position = channel.position();
            let channel_time = channel.target_time(target).max(0.0);

            match channel.decoder().seek(channel_time) {
                Ok(()) => channel.record_timestamp(channel_time),
                Err(e) => {
                    warn!(%position, target = channel_time, error = %e, "channel seek failed");
                    self.shared.emit(SyncEvent::ChannelError {
                        position,
                        message: e.to_string(),
                    });
                }
            }
        }

        let position = {
            let mut session = self.shared.session.lock();
            session.current_time = target;
            session.ended = false;
            session.position()
        };
        self.shared.refresh_telemetry(target);

        debug!(target, generation, "seek complete");
        self.shared.emit(SyncEvent::TimeUpdated {
            current_time: target,
            position,
        });

        if was_playing {
            if let Err(e) = self.start_clock(scheduler) {
                self.shared.emit(SyncEvent::StateChanged {
                    state: PlaybackState::Paused,
                });
                return Err(e);
            }
        }
        Ok(())
    }
}

impl Drop for SyncEngine {
    fn drop(&mut self) {
        self.control.get_mut().stop();
        self.shared.generation.advance();
        self.shared.release_channels();
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubChannel;
    use blackbox_core::ChannelDescriptor;

    fn external_engine() -> SyncEngine {
        let config = SyncConfig {
            scheduler: SchedulerMode::External,
            ..Default::default()
        };
        SyncEngine::new(config).unwrap()
    }

    fn session(duration: f64, positions: &[CameraPosition]) -> SessionDescriptor {
        positions.iter().fold(SessionDescriptor::new(duration), |s, p| {
            s.with_channel(ChannelDescriptor::new(*p, Arc::new(StubChannel::new())))
        })
    }

    #[test]
    fn new_engine_is_stopped_and_empty() {
        let engine = external_engine();
        let snapshot = engine.snapshot();

        assert_eq!(snapshot.state, PlaybackState::Stopped);
        assert_eq!(snapshot.current_time, 0.0);
        assert_eq!(snapshot.position, 0.0);
        assert_eq!(snapshot.speed, 1.0);
        assert_eq!(snapshot.channel_count, 0);
        assert!(!engine.all_channels_ready());
    }

    #[test]
    fn load_pauses_at_zero() {
        let engine = external_engine();
        engine
            .load_session(&session(60.0, &[CameraPosition::Front, CameraPosition::Rear]))
            .unwrap();

        assert_eq!(engine.playback_state(), PlaybackState::Paused);
        assert_eq!(engine.channel_count(), 2);
        assert_eq!(engine.duration(), 60.0);
        assert_eq!(engine.current_time(), 0.0);
    }

    #[test]
    fn load_rejects_invalid_duration() {
        let engine = external_engine();
        let result = engine.load_session(&session(f64::NAN, &[CameraPosition::Front]));
        assert!(matches!(result, Err(PlaybackError::InvalidDuration(_))));
    }

    #[test]
    fn set_speed_validates() {
        let engine = external_engine();
        assert!(engine.set_speed(2.0).is_ok());
        assert!(engine.set_speed(0.0).is_ok());
        assert!(matches!(
            engine.set_speed(-1.0),
            Err(PlaybackError::InvalidSpeed(_))
        ));
        assert!(engine.set_speed(f64::INFINITY).is_err());
        assert_eq!(engine.speed(), 0.0);
    }

    #[test]
    fn time_strings() {
        let engine = external_engine();
        engine
            .load_session(&session(125.0, &[CameraPosition::Front]))
            .unwrap();
        engine.seek_to_time(65.0).unwrap();

        assert_eq!(engine.current_time_string(), "01:05");
        assert_eq!(engine.duration_string(), "02:05");
        assert_eq!(engine.remaining_time_string(), "-01:00");
    }

    #[test]
    fn seek_without_session_is_ignored() {
        let engine = external_engine();
        engine.seek_to_time(5.0).unwrap();
        assert_eq!(engine.current_time(), 0.0);
    }

    #[test]
    fn non_finite_seek_is_ignored() {
        let engine = external_engine();
        engine
            .load_session(&session(60.0, &[CameraPosition::Front]))
            .unwrap();
        engine.seek_to_time(12.0).unwrap();
        engine.seek_to_time(f64::NAN).unwrap();
        assert_eq!(engine.current_time(), 12.0);
    }
}
