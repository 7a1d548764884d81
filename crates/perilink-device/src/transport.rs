use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use perilink_frame::{FrameReader, FrameWriter};
use perilink_transport::{Link, SerialLink};
use tracing::{info, warn};

use crate::config::DeviceConfig;
use crate::error::{DeviceError, Result};
use crate::receiver::{self, Receiver};
use crate::router::{lock, FrameSink};

/// The link together with the writer that frames outbound payloads.
///
/// Guarded by a single mutex: sends and receive-loop iterations never
/// overlap.
pub(crate) struct LinkState {
    pub(crate) link: Box<dyn Link>,
    pub(crate) writer: FrameWriter,
}

/// Owns the link and the background receiver that feeds a [`FrameSink`].
///
/// Dropping the transport performs the same teardown as
/// [`shutdown`](FrameTransport::shutdown).
pub struct FrameTransport {
    name: String,
    state: Arc<Mutex<LinkState>>,
    stop: Arc<AtomicBool>,
    receiver: Mutex<Option<JoinHandle<()>>>,
}

impl FrameTransport {
    /// Open the serial port named in `config` and start receiving.
    ///
    /// Fails with a link-unavailable transport error if the port cannot be
    /// opened. No retry is attempted.
    pub fn open(config: &DeviceConfig, sink: Arc<dyn FrameSink>) -> Result<Self> {
        let link = SerialLink::open(&config.serial)?;
        Self::with_link(Box::new(link), sink, config)
    }

    /// Start receiving on an already open link.
    pub fn with_link(
        link: Box<dyn Link>,
        sink: Arc<dyn FrameSink>,
        config: &DeviceConfig,
    ) -> Result<Self> {
        let name = link.name().to_string();
        let state = Arc::new(Mutex::new(LinkState {
            link,
            writer: FrameWriter::new(),
        }));
        let stop = Arc::new(AtomicBool::new(false));

        let handle = receiver::spawn(Receiver {
            name: name.clone(),
            state: Arc::clone(&state),
            sink,
            stop: Arc::clone(&stop),
            reader: FrameReader::with_config(config.frame.clone()),
            poll_interval: config.poll_interval,
        })
        .map_err(DeviceError::ReceiverSpawn)?;

        info!(link = %name, "link opened");
        Ok(Self {
            name,
            state,
            stop,
            receiver: Mutex::new(Some(handle)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the transport is running and its link is open.
    pub fn is_open(&self) -> bool {
        !self.stop.load(Ordering::Acquire) && lock(&self.state).link.is_open()
    }

    /// Frame `payload` and write it in one piece.
    pub fn send(&self, payload: &[u8]) -> Result<()> {
        self.ensure_running()?;
        let mut state = lock(&self.state);
        let LinkState { link, writer } = &mut *state;
        writer.send(link.as_mut(), payload)?;
        Ok(())
    }

    /// Encode and write a request for `command` carrying `params`.
    pub fn send_request(&self, command: u8, params: &[u8]) -> Result<()> {
        self.ensure_running()?;
        let mut state = lock(&self.state);
        let LinkState { link, writer } = &mut *state;
        writer.send_request(link.as_mut(), command, params)?;
        Ok(())
    }

    /// Stop the receiver, wait for it to exit, then close the link.
    ///
    /// Safe to call more than once.
    pub fn shutdown(&self) -> Result<()> {
        self.stop.store(true, Ordering::Release);

        let handle = lock(&self.receiver).take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!(link = %self.name, "receiver thread panicked");
            }
        }

        let mut state = lock(&self.state);
        if state.link.is_open() {
            state.link.close()?;
            info!(link = %self.name, "link closed");
        }
        Ok(())
    }

    fn ensure_running(&self) -> Result<()> {
        if self.stop.load(Ordering::Acquire) {
            return Err(DeviceError::Closed);
        }
        Ok(())
    }
}

impl Drop for FrameTransport {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            warn!(link = %self.name, error = %err, "failed to close link");
        }
    }
}

impl std::fmt::Debug for FrameTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameTransport")
            .field("name", &self.name)
            .field("stopped", &self.stop.load(Ordering::Relaxed))
            .finish()
    }
}
