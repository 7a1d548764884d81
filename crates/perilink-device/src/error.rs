use std::time::Duration;

use perilink_frame::FrameError;
use perilink_transport::TransportError;

use crate::router::Category;

/// Errors that can occur in device operations.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// Link-level error (including a device that could not be opened).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Frame-level error (including a short write while sending).
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// No matching frame arrived within the budget.
    #[error("no reply to command {command:#04x} within {after:?}")]
    Timeout { command: u8, after: Duration },

    /// No event arrived in a category queue within the budget.
    #[error("no {category} event within {after:?}")]
    EventTimeout { category: Category, after: Duration },

    /// The controller answered with a non-zero status code.
    #[error("command {command:#04x} failed with status {code}")]
    Status { command: u8, code: i32 },

    /// A reply body too short to carry a status code.
    #[error("reply to command {command:#04x} has a {len}-byte body (status needs 4)")]
    MalformedReply { command: u8, len: usize },

    /// The background receiver thread could not be started.
    #[error("failed to start receiver thread: {0}")]
    ReceiverSpawn(#[source] std::io::Error),

    /// The device has been closed.
    #[error("device is closed")]
    Closed,
}

impl DeviceError {
    /// Whether the wait for a reply ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            DeviceError::Timeout { .. } | DeviceError::EventTimeout { .. }
        )
    }

    /// Whether the serial device could not be opened.
    pub fn is_link_unavailable(&self) -> bool {
        matches!(self, DeviceError::Transport(err) if err.is_link_unavailable())
    }

    /// Whether the link accepted fewer bytes than the request needed.
    pub fn is_short_write(&self) -> bool {
        matches!(self, DeviceError::Frame(FrameError::ShortWrite { .. }))
    }

    /// Whether the operation failed because the link is closed.
    pub fn is_link_closed(&self) -> bool {
        matches!(
            self,
            DeviceError::Closed
                | DeviceError::Transport(TransportError::Closed)
                | DeviceError::Frame(FrameError::Transport(TransportError::Closed))
        )
    }

    /// The controller's status code, if this is a protocol status error.
    pub fn status_code(&self) -> Option<i32> {
        match self {
            DeviceError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeviceError>;
