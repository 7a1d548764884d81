use std::fmt;
use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Start-of-frame byte.
pub const STX: u8 = 0x02;

/// End-of-payload byte, followed by the checksum.
pub const ETX: u8 = 0x03;

/// Marker byte of a host request.
pub const REQUEST_MARKER: u8 = 0x2F;

/// Marker byte of a controller reply or event.
pub const REPLY_MARKER: u8 = 0x4F;

/// Payload header: command (1) + marker (1) + body length (2, big-endian).
pub const HEADER_SIZE: usize = 4;

/// Bytes added around a payload on the wire: STX, ETX and checksum.
pub const FRAME_OVERHEAD: usize = 3;

/// Size of the status code at the start of every reply body.
pub const STATUS_SIZE: usize = 4;

/// Largest body the 2-byte length field can describe.
pub const MAX_BODY_LEN: usize = u16::MAX as usize;

/// One verified unit exchanged over the link.
///
/// STX, ETX and the checksum are not kept; `body` holds exactly the number of
/// bytes the header declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Command code; identical in a request and its reply.
    pub command: u8,
    /// [`REQUEST_MARKER`] or [`REPLY_MARKER`].
    pub marker: u8,
    /// Request parameters, or status code followed by result data.
    pub body: Bytes,
}

impl Frame {
    /// Create a frame.
    pub fn new(command: u8, marker: u8, body: impl Into<Bytes>) -> Self {
        Self {
            command,
            marker,
            body: body.into(),
        }
    }

    /// Create a host request carrying `params`.
    pub fn request(command: u8, params: impl Into<Bytes>) -> Self {
        Self::new(command, REQUEST_MARKER, params)
    }

    /// Create a controller reply: big-endian `status` followed by `data`.
    pub fn reply(command: u8, status: i32, data: &[u8]) -> Self {
        let mut body = BytesMut::with_capacity(STATUS_SIZE + data.len());
        body.put_i32(status);
        body.put_slice(data);
        Self::new(command, REPLY_MARKER, body.freeze())
    }

    /// Whether this frame carries the reply marker.
    pub fn is_reply(&self) -> bool {
        self.marker == REPLY_MARKER
    }

    /// Status code at the head of a reply body, if the body is long enough.
    pub fn status(&self) -> Option<i32> {
        let head: [u8; STATUS_SIZE] = self.body.get(..STATUS_SIZE)?.try_into().ok()?;
        Some(i32::from_be_bytes(head))
    }

    /// Reply bytes following the status code (empty if there are none).
    pub fn result_data(&self) -> Bytes {
        if self.body.len() <= STATUS_SIZE {
            return Bytes::new();
        }
        self.body.slice(STATUS_SIZE..)
    }

    /// Append this frame's payload (header + body) to `dst`.
    pub fn encode_payload(&self, dst: &mut BytesMut) -> Result<()> {
        if self.body.len() > MAX_BODY_LEN {
            return Err(FrameError::BodyTooLarge {
                size: self.body.len(),
                max: MAX_BODY_LEN,
            });
        }
        dst.reserve(HEADER_SIZE + self.body.len());
        dst.put_u8(self.command);
        dst.put_u8(self.marker);
        dst.put_u16(self.body.len() as u16);
        dst.put_slice(&self.body);
        Ok(())
    }

    /// Append this frame in wire format to `dst`.
    pub fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        let mut payload = BytesMut::with_capacity(HEADER_SIZE + self.body.len());
        self.encode_payload(&mut payload)?;
        encode_frame(&payload, dst);
        Ok(())
    }

    /// The total wire size of this frame.
    pub fn wire_size(&self) -> usize {
        FRAME_OVERHEAD + HEADER_SIZE + self.body.len()
    }
}

/// XOR of every byte in `bytes`.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

/// Wrap a payload for the wire.
///
/// Wire format:
/// ```text
/// ┌───────┬──────────────────────────────┬───────┬──────────────┐
/// │ STX   │ Payload                      │ ETX   │ Checksum     │
/// │ 0x02  │ cmd | marker | len(2B BE) |  │ 0x03  │ XOR(payload) │
/// │       │ body                         │       │              │
/// └───────┴──────────────────────────────┴───────┴──────────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) {
    dst.reserve(FRAME_OVERHEAD + payload.len());
    dst.put_u8(STX);
    dst.put_slice(payload);
    dst.put_u8(ETX);
    dst.put_u8(checksum(payload));
}

/// Append a complete request frame for `command` with `params` to `dst`.
pub fn encode_request(command: u8, params: &[u8], dst: &mut BytesMut) -> Result<()> {
    if params.len() > MAX_BODY_LEN {
        return Err(FrameError::ParamsTooLarge { size: params.len() });
    }
    Frame::request(command, Bytes::copy_from_slice(params)).encode(dst)
}

/// Display adapter rendering bytes as space-separated upper-case hex.
pub struct HexDump<'a>(pub &'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Configuration for the frame reader and parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameConfig {
    /// Largest accepted body; frames declaring more are discarded. Default: 65535.
    pub max_body_len: usize,
    /// Bytes pulled from the link per read call. Default: 1024.
    pub read_chunk_size: usize,
    /// How long a started frame may stay incomplete before it is abandoned
    /// and its bytes rescanned. Default: 500 ms.
    pub frame_timeout: Duration,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_body_len: MAX_BODY_LEN,
            read_chunk_size: 1024,
            frame_timeout: Duration::from_millis(500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beep_request_wire_bytes() {
        let mut buf = BytesMut::new();
        encode_request(0x20, &[0x00], &mut buf).unwrap();
        assert_eq!(
            buf.as_ref(),
            &[0x02, 0x20, 0x2F, 0x00, 0x01, 0x00, 0x03, 0x0E]
        );
    }

    #[test]
    fn empty_request_checksum() {
        let mut buf = BytesMut::new();
        encode_request(0x12, &[], &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0x02, 0x12, 0x2F, 0x00, 0x00, 0x03, 0x12 ^ 0x2F]);
    }

    #[test]
    fn reply_status_and_data() {
        let frame = Frame::reply(0x20, 0, &[0xAA, 0xBB, 0xCC, 0xDD]);
        assert!(frame.is_reply());
        assert_eq!(frame.body.len(), 8);
        assert_eq!(frame.status(), Some(0));
        assert_eq!(frame.result_data().as_ref(), &[0xAA, 0xBB, 0xCC, 0xDD]);
    }

    #[test]
    fn negative_status_is_twos_complement() {
        let frame = Frame::reply(0x4D, -1203, &[]);
        assert_eq!(frame.body.as_ref(), &(-1203i32).to_be_bytes());
        assert_eq!(frame.status(), Some(-1203));
        assert!(frame.result_data().is_empty());
    }

    #[test]
    fn short_body_has_no_status() {
        let frame = Frame::new(0x20, REPLY_MARKER, vec![0x00, 0x01]);
        assert_eq!(frame.status(), None);
        assert!(frame.result_data().is_empty());
    }

    #[test]
    fn oversized_params_rejected() {
        let params = vec![0u8; MAX_BODY_LEN + 1];
        let mut buf = BytesMut::new();
        let err = encode_request(0x6C, &params, &mut buf).unwrap_err();
        assert!(matches!(err, FrameError::ParamsTooLarge { size } if size == MAX_BODY_LEN + 1));
        assert!(buf.is_empty());
    }

    #[test]
    fn wire_size_counts_overhead() {
        let frame = Frame::request(0x20, vec![0x00]);
        assert_eq!(frame.wire_size(), 8);
        let mut buf = BytesMut::new();
        frame.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), frame.wire_size());
    }

    #[test]
    fn hex_dump_formatting() {
        assert_eq!(HexDump(&[0x02, 0xAB, 0x0F]).to_string(), "02 AB 0F");
        assert_eq!(HexDump(&[]).to_string(), "");
    }
}
