use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use perilink_frame::Frame;
use perilink_transport::Link;
use tracing::debug;

use crate::config::DeviceConfig;
use crate::correlator::{Correlator, Reply};
use crate::error::{DeviceError, Result};
use crate::router::{Category, FrameSink, ResponseRouter};
use crate::transport::FrameTransport;

/// An open session with the peripheral controller.
///
/// Construct one per link and share it by reference (or `Arc`) with every
/// thread issuing commands. Dropping it stops the receiver and closes the
/// link.
#[derive(Debug)]
pub struct Device {
    config: DeviceConfig,
    router: Arc<ResponseRouter>,
    transport: FrameTransport,
}

impl Device {
    /// Open the serial port described by `config`.
    pub fn open(config: DeviceConfig) -> Result<Self> {
        let router = Arc::new(ResponseRouter::new(config.queue_capacity));
        let sink = Arc::clone(&router) as Arc<dyn FrameSink>;
        let transport = FrameTransport::open(&config, sink)?;
        Ok(Self {
            config,
            router,
            transport,
        })
    }

    /// Run a session over an already open link.
    pub fn with_link(link: impl Link + 'static, config: DeviceConfig) -> Result<Self> {
        let router = Arc::new(ResponseRouter::new(config.queue_capacity));
        let sink = Arc::clone(&router) as Arc<dyn FrameSink>;
        let transport = FrameTransport::with_link(Box::new(link), sink, &config)?;
        Ok(Self {
            config,
            router,
            transport,
        })
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn router(&self) -> &ResponseRouter {
        &self.router
    }

    pub fn transport(&self) -> &FrameTransport {
        &self.transport
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_open()
    }

    fn correlator(&self) -> Correlator<'_> {
        Correlator::new(&self.transport, &self.router)
    }

    /// Send a request and return the reply with its status verbatim.
    pub fn request(&self, command: u8, params: &[u8]) -> Result<Reply> {
        self.request_with_timeout(command, params, self.config.reply_timeout)
    }

    pub fn request_with_timeout(
        &self,
        command: u8,
        params: &[u8],
        budget: Duration,
    ) -> Result<Reply> {
        self.correlator().call(command, params, budget)
    }

    /// Send a request and return its result data.
    ///
    /// A non-zero status becomes [`DeviceError::Status`].
    pub fn call(&self, command: u8, params: &[u8]) -> Result<Bytes> {
        self.request(command, params)?.into_result()
    }

    pub fn call_with_timeout(&self, command: u8, params: &[u8], budget: Duration) -> Result<Bytes> {
        self.request_with_timeout(command, params, budget)?
            .into_result()
    }

    /// Write a request without waiting for a reply.
    pub fn send_request(&self, command: u8, params: &[u8]) -> Result<()> {
        self.transport.send_request(command, params)
    }

    /// Remove and return the oldest queued frame in `category`.
    pub fn pop_oldest(&self, category: Category) -> Option<Frame> {
        self.router.queue(category).pop_oldest()
    }

    /// Return the newest queued frame in `category`, discarding older ones.
    pub fn take_latest(&self, category: Category) -> Option<Frame> {
        self.correlator().take_latest(category)
    }

    /// Block until `category` holds a frame, then return the newest.
    pub fn wait_latest(&self, category: Category, budget: Duration) -> Result<Frame> {
        self.router
            .queue(category)
            .wait_latest(budget)
            .ok_or(DeviceError::EventTimeout {
                category,
                after: budget,
            })
    }

    /// Drop stale frames so a fresh exchange only sees new ones.
    pub fn clear(&self, category: Category) {
        debug!(category = %category, "queue cleared");
        self.router.queue(category).clear();
    }

    pub fn queued(&self, category: Category) -> usize {
        self.router.queue(category).len()
    }

    /// Stop receiving and close the link.
    pub fn close(&self) -> Result<()> {
        self.transport.shutdown()
    }
}
