//! Engine configuration
//!
//! Every field has a default, so a config file only needs the values it
//! overrides. Sources are layered: defaults, then an optional TOML file, then
//! `BLACKBOX_*` environment variables.

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Who drives the sync tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerMode {
    /// Dedicated scheduler thread at `tick_rate_hz`
    #[default]
    Internal,

    /// Host calls `SyncEngine::tick()` (e.g. from its render loop)
    External,
}

/// Configuration for the sync engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Scheduler frequency (default: 30 Hz)
    pub tick_rate_hz: f64,

    /// Drift at or below this is left alone (default: 50 ms)
    pub drift_tolerance_ms: f64,

    /// Drift above this triggers a background re-seek (default: 100 ms)
    pub drift_resync_ms: f64,

    /// Fill ratio below which a channel counts as buffering (default: 0.2)
    pub buffer_low_watermark: f64,

    /// Max drift samples kept for statistics (default: 100)
    pub drift_history_capacity: usize,

    /// Step used by `skip_forward` / `skip_backward` (default: 10 s)
    pub seek_step_seconds: f64,

    /// Tick driver (default: Internal)
    pub scheduler: SchedulerMode,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 30.0,
            drift_tolerance_ms: 50.0,
            drift_resync_ms: 100.0,
            buffer_low_watermark: 0.2,
            drift_history_capacity: 100,
            seek_step_seconds: 10.0,
            scheduler: SchedulerMode::Internal,
        }
    }
}

impl SyncConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            if path.exists() {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
        }

        // Override with environment variables (BLACKBOX_TICK_RATE_HZ, ...)
        settings = settings.add_source(
            config::Environment::with_prefix("BLACKBOX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings
            .build()
            .map_err(|e| PlaybackError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PlaybackError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.tick_rate_hz.is_finite() || self.tick_rate_hz <= 0.0 {
            return Err(PlaybackError::Config(format!(
                "tick_rate_hz must be positive, got {}",
                self.tick_rate_hz
            )));
        }

        if !self.drift_tolerance_ms.is_finite()
            || !self.drift_resync_ms.is_finite()
            || self.drift_tolerance_ms < 0.0
        {
            return Err(PlaybackError::Config(
                "drift thresholds must be finite and non-negative".to_string(),
            ));
        }

        if self.drift_resync_ms < self.drift_tolerance_ms {
            return Err(PlaybackError::Config(format!(
                "drift_resync_ms ({}) must not be below drift_tolerance_ms ({})",
                self.drift_resync_ms, self.drift_tolerance_ms
            )));
        }

        if !(0.0..=1.0).contains(&self.buffer_low_watermark) {
            return Err(PlaybackError::Config(format!(
                "buffer_low_watermark must be within [0, 1], got {}",
                self.buffer_low_watermark
            )));
        }

        if self.drift_history_capacity == 0 {
            return Err(PlaybackError::Config(
                "drift_history_capacity must be at least 1".to_string(),
            ));
        }

        if !self.seek_step_seconds.is_finite() || self.seek_step_seconds <= 0.0 {
            return Err(PlaybackError::Config(format!(
                "seek_step_seconds must be positive, got {}",
                self.seek_step_seconds
            )));
        }

        Ok(())
    }

    /// Scheduler period derived from `tick_rate_hz`
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz)
    }
}
