use std::time::Duration;

use perilink_frame::FrameConfig;
use perilink_transport::config::millis;
use perilink_transport::SerialConfig;
use serde::{Deserialize, Serialize};

/// Settings for a [`Device`](crate::Device) session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Serial port settings.
    pub serial: SerialConfig,
    /// How long a request waits for its reply.
    #[serde(with = "millis")]
    pub reply_timeout: Duration,
    /// Receiver sleep when the link has nothing to read.
    #[serde(with = "millis")]
    pub poll_interval: Duration,
    /// Frames kept per category before the oldest is dropped. `0` means unbounded.
    pub queue_capacity: usize,
    /// Parser limits. Not part of the serialized form.
    #[serde(skip)]
    pub frame: FrameConfig,
}

impl DeviceConfig {
    pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_millis(2000);
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(20);
    pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

    /// Defaults for the controller at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            serial: SerialConfig::new(path),
            ..Self::default()
        }
    }

    pub fn with_serial(mut self, serial: SerialConfig) -> Self {
        self.serial = serial;
        self
    }

    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_frame_config(mut self, frame: FrameConfig) -> Self {
        self.frame = frame;
        self
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            reply_timeout: Self::DEFAULT_REPLY_TIMEOUT,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            queue_capacity: Self::DEFAULT_QUEUE_CAPACITY,
            frame: FrameConfig::default(),
        }
    }
}
