use bytes::{Buf, BytesMut};

use crate::codec::{checksum, Frame, FrameConfig, ETX, HEADER_SIZE, STX};
use crate::error::{FrameError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Hunting for STX; anything else is skipped.
    WaitingForStart,
    /// Collecting command, marker and the two length bytes.
    Header,
    /// Collecting the declared number of body bytes.
    Body,
    /// Expecting ETX.
    Trailer,
    /// Expecting the checksum.
    Checksum,
}

/// Incremental frame parser.
///
/// State persists across calls, so a frame split over any number of reads is
/// reassembled. A malformed frame (bad ETX, bad checksum, oversized body) is
/// reported once, then every byte after its STX is scanned again, so a
/// corrupted header cannot swallow the frames that follow it.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    header: [u8; HEADER_SIZE],
    header_len: usize,
    body: BytesMut,
    body_len: usize,
    max_body_len: usize,
    /// Every byte consumed since the current frame's STX.
    raw: BytesMut,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a parser accepting bodies up to the protocol maximum.
    pub fn new() -> Self {
        Self::with_config(&FrameConfig::default())
    }

    /// Create a parser with an explicit body limit.
    pub fn with_config(config: &FrameConfig) -> Self {
        Self {
            state: ParseState::WaitingForStart,
            header: [0; HEADER_SIZE],
            header_len: 0,
            body: BytesMut::new(),
            body_len: 0,
            max_body_len: config.max_body_len,
            raw: BytesMut::new(),
        }
    }

    /// Drop any partially assembled frame without rescanning it.
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForStart;
        self.header_len = 0;
        self.body.clear();
        self.body_len = 0;
        self.raw.clear();
    }

    /// Whether no frame is currently being assembled.
    pub fn is_idle(&self) -> bool {
        self.state == ParseState::WaitingForStart
    }

    /// Feed a run of bytes, returning every outcome in arrival order.
    ///
    /// Each element is either a verified frame or the error that dropped a
    /// malformed one.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Vec<Result<Frame>> {
        let mut out = Vec::new();
        self.drive(BytesMut::new(), bytes, &mut out);
        out
    }

    /// Give up on the frame being assembled.
    ///
    /// Reports [`FrameError::Incomplete`] followed by whatever a rescan of the
    /// abandoned bytes yields. Does nothing when idle.
    pub fn abandon(&mut self) -> Vec<Result<Frame>> {
        let mut out = Vec::new();
        if self.is_idle() {
            return out;
        }
        out.push(Err(FrameError::Incomplete {
            received: self.raw.len() + 1,
        }));
        let replay = self.take_raw();
        self.drive(replay, &[], &mut out);
        out
    }

    /// Remove the bytes following the current STX and go back to hunting.
    fn take_raw(&mut self) -> BytesMut {
        let raw = self.raw.split();
        self.reset();
        raw
    }

    /// Step through `replay` first, then `input`. A rejected frame puts the
    /// bytes after its STX back in front of the replay queue.
    fn drive(&mut self, mut replay: BytesMut, mut input: &[u8], out: &mut Vec<Result<Frame>>) {
        loop {
            let byte = if replay.has_remaining() {
                replay.get_u8()
            } else if let Some((&byte, rest)) = input.split_first() {
                input = rest;
                byte
            } else {
                return;
            };

            match self.step(byte) {
                Ok(Some(frame)) => out.push(Ok(frame)),
                Ok(None) => {}
                Err(err) => {
                    out.push(Err(err));
                    let mut again = self.take_raw();
                    again.extend_from_slice(&replay);
                    replay = again;
                }
            }
        }
    }

    fn step(&mut self, byte: u8) -> Result<Option<Frame>> {
        if self.state == ParseState::WaitingForStart {
            if byte == STX {
                self.raw.clear();
                self.state = ParseState::Header;
            }
            return Ok(None);
        }

        self.raw.extend_from_slice(&[byte]);
        match self.state {
            ParseState::WaitingForStart => Ok(None),
            ParseState::Header => {
                self.header[self.header_len] = byte;
                self.header_len += 1;
                if self.header_len < HEADER_SIZE {
                    return Ok(None);
                }

                let len = u16::from_be_bytes([self.header[2], self.header[3]]) as usize;
                if len > self.max_body_len {
                    return Err(FrameError::BodyTooLarge {
                        size: len,
                        max: self.max_body_len,
                    });
                }
                self.body_len = len;
                self.body.clear();
                self.body.reserve(len);
                self.state = if len == 0 {
                    ParseState::Trailer
                } else {
                    ParseState::Body
                };
                Ok(None)
            }
            ParseState::Body => {
                self.body.extend_from_slice(&[byte]);
                if self.body.len() == self.body_len {
                    self.state = ParseState::Trailer;
                }
                Ok(None)
            }
            ParseState::Trailer => {
                if byte != ETX {
                    return Err(FrameError::UnexpectedEtx { found: byte });
                }
                self.state = ParseState::Checksum;
                Ok(None)
            }
            ParseState::Checksum => {
                let expected = checksum(&self.header) ^ checksum(&self.body);
                if byte != expected {
                    return Err(FrameError::ChecksumMismatch {
                        expected,
                        found: byte,
                    });
                }

                let frame = Frame {
                    command: self.header[0],
                    marker: self.header[1],
                    body: self.body.split().freeze(),
                };
                self.reset();
                Ok(Some(frame))
            }
        }
    }
}
