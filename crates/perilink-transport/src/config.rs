use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Serial port settings for the link to the peripheral controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyS1`.
    pub path: String,
    /// Line speed in baud.
    pub baud_rate: u32,
    /// Per-operation read/write timeout applied to the port.
    #[serde(with = "millis")]
    pub timeout: Duration,
}

impl SerialConfig {
    /// Secure-chip port on the reference terminal.
    pub const DEFAULT_PATH: &'static str = "/dev/ttyS1";
    pub const DEFAULT_BAUD_RATE: u32 = 460_800;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

    /// Settings for `path` with default speed and timeout.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            path: Self::DEFAULT_PATH.to_string(),
            baud_rate: Self::DEFAULT_BAUD_RATE,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

/// Serde adapter encoding a [`Duration`] as whole milliseconds.
pub mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_terminal() {
        let cfg = SerialConfig::default();
        assert_eq!(cfg.path, "/dev/ttyS1");
        assert_eq!(cfg.baud_rate, 460_800);
        assert_eq!(cfg.timeout, Duration::from_millis(500));
    }

    #[test]
    fn builders_override_fields() {
        let cfg = SerialConfig::new("/dev/ttyUSB0")
            .with_baud_rate(115_200)
            .with_timeout(Duration::from_millis(50));
        assert_eq!(cfg.path, "/dev/ttyUSB0");
        assert_eq!(cfg.baud_rate, 115_200);
        assert_eq!(cfg.timeout, Duration::from_millis(50));
    }
}
