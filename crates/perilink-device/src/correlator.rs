use std::time::{Duration, Instant};

use bytes::Bytes;
use perilink_frame::{CommandName, Frame};
use tracing::{debug, warn};

use crate::error::{DeviceError, Result};
use crate::router::{Category, ResponseRouter};
use crate::transport::FrameTransport;

/// A decoded controller reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub command: u8,
    /// `0` on success, otherwise a command-specific error code.
    pub status: i32,
    /// Result bytes after the status; empty when `status != 0`.
    pub data: Bytes,
}

impl Reply {
    /// Decode a reply frame's body.
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        let status = frame.status().ok_or(DeviceError::MalformedReply {
            command: frame.command,
            len: frame.body.len(),
        })?;
        let data = if status == 0 {
            frame.result_data()
        } else {
            Bytes::new()
        };
        Ok(Self {
            command: frame.command,
            status,
            data,
        })
    }

    pub fn is_ok(&self) -> bool {
        self.status == 0
    }

    /// The result data, or [`DeviceError::Status`] for a non-zero status.
    pub fn into_result(self) -> Result<Bytes> {
        if self.is_ok() {
            Ok(self.data)
        } else {
            Err(DeviceError::Status {
                command: self.command,
                code: self.status,
            })
        }
    }
}

/// Pairs one outbound request with its reply.
///
/// Only one request per category may be outstanding: while waiting, any
/// frame queued ahead of the reply in the same category is dropped.
/// Event categories can also be drained without a round trip through
/// [`take_latest`](Correlator::take_latest).
#[derive(Debug, Clone, Copy)]
pub struct Correlator<'a> {
    transport: &'a FrameTransport,
    router: &'a ResponseRouter,
}

impl<'a> Correlator<'a> {
    pub fn new(transport: &'a FrameTransport, router: &'a ResponseRouter) -> Self {
        Self { transport, router }
    }

    /// Send `command` with `params` and wait up to `budget` for its reply.
    ///
    /// A failed send is returned as is and never turns into a timeout.
    pub fn call(&self, command: u8, params: &[u8], budget: Duration) -> Result<Reply> {
        self.transport.send_request(command, params)?;
        self.wait_reply(command, budget)
    }

    /// Wait up to `budget` for the reply to an already sent `command`.
    pub fn wait_reply(&self, command: u8, budget: Duration) -> Result<Reply> {
        let category = Category::of(command);
        let started = Instant::now();

        let Some(frame) = self.router.queue(category).wait_for_reply(command, budget) else {
            warn!(
                command = %CommandName(command),
                category = %category,
                budget_ms = budget.as_millis() as u64,
                "reply timed out"
            );
            return Err(DeviceError::Timeout {
                command,
                after: budget,
            });
        };

        let reply = Reply::from_frame(&frame)?;
        debug!(
            command = %CommandName(command),
            status = reply.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "reply received"
        );
        Ok(reply)
    }

    /// Newest frame queued in `category`, discarding older ones. Never blocks.
    pub fn take_latest(&self, category: Category) -> Option<Frame> {
        self.router.queue(category).take_latest()
    }
}
