use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use perilink_frame::{FrameError, FrameReader};
use perilink_transport::TransportError;
use tracing::{debug, info, warn};

use crate::router::{lock, FrameSink};
use crate::transport::LinkState;

pub(crate) const THREAD_NAME: &str = "perilink-rx";

/// Everything the background receive loop owns or shares.
pub(crate) struct Receiver {
    pub(crate) name: String,
    pub(crate) state: Arc<Mutex<LinkState>>,
    pub(crate) sink: Arc<dyn FrameSink>,
    pub(crate) stop: Arc<AtomicBool>,
    pub(crate) reader: FrameReader,
    pub(crate) poll_interval: Duration,
}

pub(crate) fn spawn(receiver: Receiver) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(THREAD_NAME.to_string())
        .spawn(move || receiver.run())
}

impl Receiver {
    fn run(mut self) {
        info!(link = %self.name, "receiver started");

        while !self.stop.load(Ordering::Acquire) {
            // The link lock is released before frames are handed to the sink.
            let polled = {
                let mut state = lock(&self.state);
                self.reader.poll(state.link.as_mut())
            };

            match polled {
                Ok(frames) if frames.is_empty() => thread::sleep(self.poll_interval),
                Ok(frames) => {
                    for frame in frames {
                        self.sink.deliver(frame);
                    }
                }
                Err(FrameError::Transport(TransportError::Closed)) => {
                    debug!(link = %self.name, "link closed, receiver idle");
                    thread::sleep(self.poll_interval);
                }
                Err(err) => {
                    warn!(link = %self.name, error = %err, "receive failed");
                    thread::sleep(self.poll_interval);
                }
            }
        }

        info!(
            link = %self.name,
            discarded = self.reader.discarded(),
            "receiver stopped"
        );
    }
}
