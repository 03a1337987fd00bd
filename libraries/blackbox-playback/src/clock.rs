//! Master clock
//!
//! Maps monotonic wall-clock readings to virtual media time:
//!
//! ```text
//! media_time = reference.media_time + (now - reference.wall_clock) * speed
//! ```
//!
//! The reference pair is captured at `play()` and `seek()`. A speed change
//! while playing re-anchors it at the media time already reached, so elapsed
//! time is never rescaled after the fact.

use blackbox_core::TimeInSeconds;
use std::time::Instant;

/// Source of monotonic "now" readings
///
/// Injected so hosts and tests can control time.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Instant;
}

/// `Instant::now()`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Reference instant paired with the media time it corresponds to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockReference {
    /// Monotonic reading captured at the last play/seek
    pub wall_clock: Instant,

    /// Media time at `wall_clock`
    pub media_time: TimeInSeconds,
}

impl ClockReference {
    pub fn new(wall_clock: Instant, media_time: TimeInSeconds) -> Self {
        Self {
            wall_clock,
            media_time,
        }
    }

    /// Media time at `now` for the given speed
    #[inline]
    pub fn media_time_at(&self, now: Instant, speed: f64) -> TimeInSeconds {
        media_time(self, now, speed)
    }
}

/// Evaluate the master clock
///
/// Readings earlier than the reference count as zero elapsed time, so the
/// result never runs backwards for `speed >= 0`.
#[inline]
pub fn media_time(reference: &ClockReference, now: Instant, speed: f64) -> TimeInSeconds {
    let elapsed = now
        .saturating_duration_since(reference.wall_clock)
        .as_secs_f64();
    reference.media_time + elapsed * speed
}

/// Fraction of the session played, in [0, 1]
///
/// The single place position is derived from time; 0 when duration is unknown.
#[inline]
pub fn playback_position(current_time: TimeInSeconds, duration: TimeInSeconds) -> f64 {
    if duration > 0.0 {
        (current_time / duration).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Format seconds as `MM:SS`, or `H:MM:SS` from one hour up
///
/// Negative and non-finite values format as `00:00`.
pub fn format_time(seconds: TimeInSeconds) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "00:00".to_string();
    }

    let total = seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
