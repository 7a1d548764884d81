use perilink_transport::TransportError;

/// Errors that can occur during frame encoding, decoding and link I/O.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The byte after the body was not `ETX`.
    #[error("expected ETX (0x03) after body, found {found:#04x}")]
    UnexpectedEtx { found: u8 },

    /// The trailing checksum does not match the XOR of the payload.
    #[error("checksum mismatch (expected {expected:#04x}, found {found:#04x})")]
    ChecksumMismatch { expected: u8, found: u8 },

    /// The declared body length exceeds the configured maximum.
    #[error("frame body too large ({size} bytes, max {max})")]
    BodyTooLarge { size: usize, max: usize },

    /// A started frame did not complete in time and was abandoned.
    #[error("incomplete frame abandoned after {received} bytes")]
    Incomplete { received: usize },

    /// Request parameters do not fit the 2-byte length field.
    #[error("request parameters too large ({size} bytes, max 65535)")]
    ParamsTooLarge { size: usize },

    /// The link accepted fewer bytes than the frame needed.
    #[error("short write ({written} of {expected} bytes accepted)")]
    ShortWrite { written: usize, expected: usize },

    /// A length-prefixed field claims more bytes than the buffer holds.
    #[error("truncated field (needed {needed} bytes, {available} available)")]
    TruncatedField { needed: usize, available: usize },

    /// A field is too long for its length prefix.
    #[error("field too long ({len} bytes, max {max})")]
    FieldTooLong { len: usize, max: usize },

    /// Link-level failure.
    #[error("link error: {0}")]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, FrameError>;
