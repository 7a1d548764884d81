//! Serial link abstraction for the perilink driver.
//!
//! This is the lowest layer of perilink. It knows nothing about frames: it
//! moves opaque bytes over a point-to-point link to the peripheral
//! controller. Two implementations are provided:
//! - [`SerialLink`], a real serial port opened through `serialport`
//! - [`LoopbackLink`], an in-memory link paired with a [`LoopbackPeer`] that
//!   plays the controller side in tests and simulators
//!
//! Everything above this crate talks to the [`Link`] trait.

pub mod config;
pub mod error;
pub mod loopback;
pub mod serial;
pub mod traits;

pub use config::SerialConfig;
pub use error::{Result, TransportError};
pub use loopback::{LoopbackLink, LoopbackPeer};
pub use serial::SerialLink;
pub use traits::Link;
