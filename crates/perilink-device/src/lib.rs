//! Concurrency core of the perilink driver.
//!
//! A [`Device`] owns the serial link and a background receiver thread. Every
//! verified inbound frame is routed by command code into one of five
//! [`Category`] queues; callers send a request and block on the matching
//! queue until the reply arrives or the budget runs out.
//!
//! ```no_run
//! use perilink_device::{Device, DeviceConfig};
//! use perilink_frame::command::BEEP;
//!
//! # fn main() -> perilink_device::Result<()> {
//! let device = Device::open(DeviceConfig::new("/dev/ttyS1"))?;
//! device.call(BEEP, &[0x00])?;
//! device.close()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod correlator;
pub mod device;
pub mod error;
mod receiver;
pub mod router;
pub mod status;
pub mod transport;

pub use config::DeviceConfig;
pub use correlator::{Correlator, Reply};
pub use device::Device;
pub use error::{DeviceError, Result};
pub use router::{Category, CategoryQueue, FrameSink, ResponseRouter};
pub use transport::FrameTransport;
