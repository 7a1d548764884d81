/// Errors that can occur in serial link operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The serial device could not be opened.
    ///
    /// Fatal for the transport instance that attempted it; no retry is made.
    #[error("failed to open serial link {path}: {source}")]
    Open {
        path: String,
        source: serialport::Error,
    },

    /// The serial driver rejected an operation on an open port.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// An I/O error occurred on the link.
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link has been closed (or was never opened).
    #[error("link closed")]
    Closed,
}

impl TransportError {
    /// Whether this error means the device could not be acquired at all.
    pub fn is_link_unavailable(&self) -> bool {
        matches!(self, TransportError::Open { .. })
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
