//! Session generation counter
//!
//! Bumped on every load, seek and stop. Ticks and background re-seeks capture the
//! value when they are scheduled and drop their effects if it has moved on.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared, monotonically increasing session epoch
#[derive(Debug, Clone, Default)]
pub struct SessionGeneration(Arc<AtomicU64>);

impl SessionGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current epoch
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Start a new epoch, invalidating everything scheduled under the old one
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Whether `generation` is still the live epoch
    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }
}
