use bytes::BytesMut;
use perilink_transport::{Link, TransportError};
use tracing::{debug, warn};

use crate::codec::{encode_frame, encode_request, Frame, HexDump};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Frames payloads and writes them to a link in a single write.
#[derive(Debug)]
pub struct FrameWriter {
    buf: BytesMut,
}

impl Default for FrameWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameWriter {
    /// Create a frame writer.
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Wrap `payload` as `STX | payload | ETX | xor(payload)` and write it.
    ///
    /// Fails with [`FrameError::ShortWrite`] if the link accepts fewer bytes
    /// than the framed length.
    pub fn send<L: Link + ?Sized>(&mut self, link: &mut L, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_frame(payload, &mut self.buf);
        self.flush_to(link)
    }

    /// Encode and write a request for `command` carrying `params`.
    pub fn send_request<L: Link + ?Sized>(
        &mut self,
        link: &mut L,
        command: u8,
        params: &[u8],
    ) -> Result<()> {
        self.buf.clear();
        encode_request(command, params, &mut self.buf)?;
        self.flush_to(link)
    }

    /// Encode and write a complete frame.
    pub fn write_frame<L: Link + ?Sized>(&mut self, link: &mut L, frame: &Frame) -> Result<()> {
        self.buf.clear();
        frame.encode(&mut self.buf)?;
        self.flush_to(link)
    }

    fn flush_to<L: Link + ?Sized>(&mut self, link: &mut L) -> Result<()> {
        if !link.is_open() {
            return Err(FrameError::Transport(TransportError::Closed));
        }

        let expected = self.buf.len();
        let written = link.write(&self.buf)?;
        if written != expected {
            warn!(
                link = link.name(),
                written,
                expected,
                bytes = %HexDump(&self.buf),
                "short write"
            );
            return Err(FrameError::ShortWrite { written, expected });
        }

        debug!(link = link.name(), bytes = %HexDump(&self.buf), "frame sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use perilink_transport::loopback;

    use super::*;
    use crate::codec::REQUEST_MARKER;
    use crate::parser::FrameParser;

    #[test]
    fn send_request_writes_wire_bytes() {
        let (mut link, peer) = loopback::pair();
        let mut writer = FrameWriter::new();
        writer.send_request(&mut link, 0x20, &[0x00]).unwrap();
        assert_eq!(
            peer.take_written(),
            vec![0x02, 0x20, 0x2F, 0x00, 0x01, 0x00, 0x03, 0x0E]
        );
    }

    #[test]
    fn send_raw_payload() {
        let (mut link, peer) = loopback::pair();
        let mut writer = FrameWriter::new();
        writer.send(&mut link, &[0x12, 0x2F, 0x00, 0x00]).unwrap();
        assert_eq!(
            peer.take_written(),
            vec![0x02, 0x12, 0x2F, 0x00, 0x00, 0x03, 0x12 ^ 0x2F]
        );
    }

    #[test]
    fn written_frames_parse_back() {
        let (mut link, peer) = loopback::pair();
        let mut writer = FrameWriter::new();
        writer.send_request(&mut link, 0x17, &[0x01]).unwrap();
        writer
            .write_frame(&mut link, &Frame::request(0x18, Bytes::new()))
            .unwrap();

        let mut parser = FrameParser::new();
        let frames: Vec<Frame> = parser
            .feed_bytes(&peer.take_written())
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(frames.len(), 2);
        assert_eq!((frames[0].command, frames[0].marker), (0x17, REQUEST_MARKER));
        assert_eq!(frames[0].body.as_ref(), &[0x01]);
        assert_eq!(frames[1].command, 0x18);
        assert!(frames[1].body.is_empty());
    }

    #[test]
    fn short_write_is_reported() {
        let (mut link, peer) = loopback::pair();
        peer.set_write_limit(Some(5));
        let mut writer = FrameWriter::new();
        let err = writer.send_request(&mut link, 0x20, &[0x00]).unwrap_err();
        assert!(matches!(
            err,
            FrameError::ShortWrite {
                written: 5,
                expected: 8
            }
        ));
    }

    #[test]
    fn closed_link_rejected_before_write() {
        let (mut link, peer) = loopback::pair();
        link.close().unwrap();
        let mut writer = FrameWriter::new();
        let err = writer.send_request(&mut link, 0x20, &[]).unwrap_err();
        assert!(matches!(err, FrameError::Transport(TransportError::Closed)));
        assert!(peer.take_written().is_empty());
    }
}
