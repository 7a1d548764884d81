//! Host-side driver core for serial peripheral controllers.
//!
//! perilink talks to a keypad / card reader / printer controller over a
//! point-to-point serial link using a framed command/response protocol.
//!
//! # Crate Structure
//!
//! - [`transport`] — Serial link abstraction (real port, in-memory loopback)
//! - [`frame`] — Wire format, command codes, incremental parser
//! - [`device`] — Receiver thread, category routing, request/reply correlation
//!   (behind `device` feature)
//! - [`logging`] — `tracing-subscriber` setup for binaries (behind `logging` feature)

/// Re-export transport types.
pub mod transport {
    pub use perilink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use perilink_frame::*;
}

/// Re-export device types (requires `device` feature).
#[cfg(feature = "device")]
pub mod device {
    pub use perilink_device::*;
}

#[cfg(feature = "logging")]
pub mod logging;
