//! In-crate test doubles

use blackbox_core::{
    BlackboxError, BufferStatus, ChannelState, Result, TimeInSeconds, VideoChannel, VideoFrame,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Decoder that answers every frame request `frame_offset` seconds off target
pub struct StubChannel {
    pub frame_offset: Mutex<Option<TimeInSeconds>>,
    pub buffer: Mutex<BufferStatus>,
    pub state: Mutex<ChannelState>,
    pub seeks: Mutex<Vec<TimeInSeconds>>,
    pub fail_seeks: bool,
    pub stops: AtomicUsize,
}

impl Default for StubChannel {
    fn default() -> Self {
        Self {
            frame_offset: Mutex::new(Some(0.0)),
            buffer: Mutex::new(BufferStatus::new(30, 30)),
            state: Mutex::new(ChannelState::Ready),
            seeks: Mutex::new(Vec::new()),
            fail_seeks: false,
            stops: AtomicUsize::new(0),
        }
    }
}

impl StubChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame_offset(offset: Option<TimeInSeconds>) -> Self {
        let channel = Self::new();
        *channel.frame_offset.lock() = offset;
        channel
    }

    pub fn seek_count(&self) -> usize {
        self.seeks.lock().len()
    }
}

impl VideoChannel for StubChannel {
    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn start_decoding(&self) {
        *self.state.lock() = ChannelState::Decoding;
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn seek(&self, to: TimeInSeconds) -> Result<()> {
        self.seeks.lock().push(to);
        if self.fail_seeks {
            return Err(BlackboxError::seek(to, "stub failure"));
        }
        Ok(())
    }

    fn frame_at(&self, time: TimeInSeconds) -> Option<VideoFrame> {
        let offset = (*self.frame_offset.lock())?;
        let timestamp = time + offset;
        Some(VideoFrame::placeholder(timestamp, (timestamp * 30.0) as u64))
    }

    fn current_timestamp(&self) -> TimeInSeconds {
        0.0
    }

    fn buffer_status(&self) -> BufferStatus {
        *self.buffer.lock()
    }

    fn state(&self) -> ChannelState {
        *self.state.lock()
    }
}
