//! Background re-seek worker
//!
//! Drift corrections are queued to a dedicated thread so channel seeks, which
//! may block on I/O, never run on the sync tick. Requests issued under an old
//! session generation are dropped; a seek that completes after the session
//! moved on leaves no trace.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

use crate::drift::{ReseekDispatcher, ReseekRequest};
use crate::error::{PlaybackError, Result};
use crate::events::{EventBus, SyncEvent};
use crate::generation::SessionGeneration;

/// Thread that executes drift re-seeks
pub struct ReseekWorker {
    tx: Option<Sender<ReseekRequest>>,
    handle: Option<JoinHandle<()>>,
}

impl ReseekWorker {
    /// Start the worker thread
    pub fn spawn(generation: SessionGeneration, events: Arc<EventBus>) -> Result<Self> {
        let (tx, rx) = unbounded();

        let handle = thread::Builder::new()
            .name("blackbox-reseek".to_string())
            .spawn(move || Self::run(&rx, &generation, &events))
            .map_err(|e| PlaybackError::Scheduler(format!("failed to spawn re-seek worker: {e}")))?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    fn run(rx: &Receiver<ReseekRequest>, generation: &SessionGeneration, events: &EventBus) {
        for request in rx {
            Self::execute(&request, generation, events);
            request.channel.finish_reseek();
        }
        debug!("re-seek worker exiting");
    }

    fn execute(request: &ReseekRequest, generation: &SessionGeneration, events: &EventBus) {
        let position = request.channel.position();

        if !generation.is_current(request.generation) {
            debug!(%position, "discarding re-seek from a previous session");
            return;
        }

        let target = request.target_time.max(0.0);
        match request.channel.decoder().seek(target) {
            Ok(()) => {
                if generation.is_current(request.generation) {
                    request.channel.record_timestamp(target);
                    debug!(%position, target, "re-seek complete");
                }
            }
            Err(e) => {
                // Best effort: the channel keeps playing from wherever it is
                if generation.is_current(request.generation) {
                    warn!(%position, target, error = %e, "re-seek failed");
                    events.emit(SyncEvent::ChannelError {
                        position,
                        message: e.to_string(),
                    });
                }
            }
        }
    }
}

impl ReseekDispatcher for ReseekWorker {
    fn dispatch(&self, request: ReseekRequest) {
        let Some(tx) = &self.tx else {
            request.channel.finish_reseek();
            return;
        };

        if let Err(err) = tx.send(request) {
            // Worker gone (engine shutting down)
            err.into_inner().channel.finish_reseek();
        }
    }
}

impl Drop for ReseekWorker {
    fn drop(&mut self) {
        // Closing the queue ends the worker loop after the in-flight seek
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
