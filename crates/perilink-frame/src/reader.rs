use std::time::{Duration, Instant};

use perilink_transport::Link;
use tracing::{debug, warn};

use crate::codec::{Frame, FrameConfig, HexDump};
use crate::command::CommandName;
use crate::error::Result;
use crate::parser::FrameParser;

/// Pulls available bytes off a link and turns them into verified frames.
///
/// Never blocks waiting for data: each [`poll`](FrameReader::poll) reads only
/// what the link reports as available. Partial frames are kept in the parser
/// until the rest arrives, or until they have been open longer than
/// `frame_timeout`, at which point they are abandoned and rescanned.
/// Malformed frames are logged and dropped.
#[derive(Debug)]
pub struct FrameReader {
    parser: FrameParser,
    chunk: Vec<u8>,
    discarded: u64,
    frame_timeout: Duration,
    /// When the frame currently being assembled started.
    partial_since: Option<Instant>,
}

impl Default for FrameReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameReader {
    /// Create a frame reader with default configuration.
    pub fn new() -> Self {
        Self::with_config(FrameConfig::default())
    }

    /// Create a frame reader with explicit configuration.
    pub fn with_config(config: FrameConfig) -> Self {
        Self {
            parser: FrameParser::with_config(&config),
            chunk: vec![0u8; config.read_chunk_size.max(1)],
            discarded: 0,
            frame_timeout: config.frame_timeout,
            partial_since: None,
        }
    }

    /// Read whatever the link has buffered and return the frames it completed.
    ///
    /// Returns `Err` only for link failures; framing faults are absorbed.
    pub fn poll<L: Link + ?Sized>(&mut self, link: &mut L) -> Result<Vec<Frame>> {
        let mut available = link.bytes_available()?;

        let mut outcomes = Vec::new();
        if self
            .partial_since
            .is_some_and(|since| since.elapsed() >= self.frame_timeout)
        {
            outcomes.extend(self.parser.abandon());
        }

        while available > 0 {
            let want = available.min(self.chunk.len());
            let read = link.read(&mut self.chunk[..want])?;
            if read == 0 {
                break;
            }
            available -= read.min(available);
            outcomes.extend(self.parser.feed_bytes(&self.chunk[..read]));
        }

        // Any outcome means the frame now in progress (if any) began during
        // this poll.
        if self.parser.is_idle() {
            self.partial_since = None;
        } else if self.partial_since.is_none() || !outcomes.is_empty() {
            self.partial_since = Some(Instant::now());
        }

        let mut frames = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(frame) => {
                    debug!(
                        command = %CommandName(frame.command),
                        marker = frame.marker,
                        body = %HexDump(&frame.body),
                        "frame received"
                    );
                    frames.push(frame);
                }
                Err(err) => {
                    self.discarded += 1;
                    warn!(link = link.name(), error = %err, "discarding malformed frame");
                }
            }
        }

        Ok(frames)
    }

    /// Number of malformed frames dropped so far.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Whether a frame is partially assembled.
    pub fn has_partial_frame(&self) -> bool {
        !self.parser.is_idle()
    }
}
