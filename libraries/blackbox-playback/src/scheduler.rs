//! Sync scheduler
//!
//! Periodic driver for the sync tick. One dedicated thread fires the handler at
//! a fixed interval; ticks never overlap. Stopping sets a cancellation flag
//! checked at tick entry and joins the thread, so once `stop()` returns no
//! further tick can run. When stop is requested from inside a tick (end of
//! stream), the thread exits right after that tick instead of being joined.

use crossbeam_channel::{bounded, select, tick, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;
use tracing::{debug, trace};

use crate::error::{PlaybackError, Result};

/// What the scheduler should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep ticking
    Continue,

    /// Exit the loop (session ended or generation moved on)
    Finished,
}

/// Per-tick callback
pub trait TickHandler: Send + Sync + 'static {
    /// Run one tick for session `generation`
    fn on_tick(&self, generation: u64) -> TickOutcome;
}

struct RunningScheduler {
    cancelled: Arc<AtomicBool>,
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
    thread_id: ThreadId,
}

/// Fixed-rate tick driver
pub struct SyncScheduler {
    interval: Duration,
    running: Option<RunningScheduler>,
}

impl SyncScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            running: None,
        }
    }

    /// Whether the tick thread is alive and not cancelled
    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|r| !r.cancelled.load(Ordering::Acquire) && !r.handle.is_finished())
    }

    /// Start ticking `handler` for `generation`
    ///
    /// No-op if already running. A previous thread that ended on its own is
    /// reaped first.
    pub fn start(&mut self, handler: Arc<dyn TickHandler>, generation: u64) -> Result<()> {
        if self.is_running() {
            return Ok(());
        }
        self.stop();

        let cancelled = Arc::new(AtomicBool::new(false));
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let interval = self.interval;
        let thread_cancelled = Arc::clone(&cancelled);

        let handle = thread::Builder::new()
            .name("blackbox-sync".to_string())
            .spawn(move || {
                let ticker = tick(interval);
                debug!(generation, ?interval, "sync scheduler started");

                loop {
                    select! {
                        recv(stop_rx) -> _ => break,
                        recv(ticker) -> _ => {
                            if thread_cancelled.load(Ordering::Acquire) {
                                break;
                            }
                            if handler.on_tick(generation) == TickOutcome::Finished {
                                trace!(generation, "tick handler finished");
                                break;
                            }
                        }
                    }
                }

                debug!(generation, "sync scheduler stopped");
            })
            .map_err(|e| PlaybackError::Scheduler(format!("failed to spawn sync scheduler: {e}")))?;

        let thread_id = handle.thread().id();
        self.running = Some(RunningScheduler {
            cancelled,
            stop_tx,
            handle,
            thread_id,
        });

        Ok(())
    }

    /// Stop ticking. Idempotent.
    pub fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        running.cancelled.store(true, Ordering::Release);
        // Disconnecting wakes the loop even between ticks
        drop(running.stop_tx);

        if thread::current().id() != running.thread_id {
            let _ = running.handle.join();
        }
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
