/// Session descriptors produced by file discovery
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{CameraPosition, TimeInSeconds};
use crate::traits::VideoChannel;

/// One camera stream within a session
#[derive(Clone)]
pub struct ChannelDescriptor {
    /// Camera slot
    pub position: CameraPosition,

    /// Decoder handle
    pub channel: Arc<dyn VideoChannel>,

    /// Disabled channels are skipped at load time
    pub enabled: bool,

    /// Seconds added to the master time before querying this channel
    pub time_offset: TimeInSeconds,
}

impl ChannelDescriptor {
    /// Enabled channel with no offset
    pub fn new(position: CameraPosition, channel: Arc<dyn VideoChannel>) -> Self {
        Self {
            position,
            channel,
            enabled: true,
            time_offset: 0.0,
        }
    }

    /// Set the time offset
    #[must_use]
    pub fn with_offset(mut self, time_offset: TimeInSeconds) -> Self {
        self.time_offset = time_offset;
        self
    }

    /// Set the enabled flag
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl std::fmt::Debug for ChannelDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelDescriptor")
            .field("position", &self.position)
            .field("enabled", &self.enabled)
            .field("time_offset", &self.time_offset)
            .finish_non_exhaustive()
    }
}

/// A multi-camera recording ready to be loaded into the engine
#[derive(Debug, Clone, Default)]
pub struct SessionDescriptor {
    /// Camera streams, in discovery order
    pub channels: Vec<ChannelDescriptor>,

    /// Length of the longest channel
    pub duration: TimeInSeconds,

    /// Vendor-supplied metadata (model, firmware, source file names)
    pub metadata: BTreeMap<String, String>,
}

impl SessionDescriptor {
    /// Session with the given duration and no channels
    pub fn new(duration: TimeInSeconds) -> Self {
        Self {
            channels: Vec::new(),
            duration,
            metadata: BTreeMap::new(),
        }
    }

    /// Append a channel
    #[must_use]
    pub fn with_channel(mut self, descriptor: ChannelDescriptor) -> Self {
        self.channels.push(descriptor);
        self
    }

    /// Channels with `enabled == true`
    pub fn enabled_channels(&self) -> impl Iterator<Item = &ChannelDescriptor> {
        self.channels.iter().filter(|c| c.enabled)
    }
}
