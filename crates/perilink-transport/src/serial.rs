use std::io::{ErrorKind, Read, Write};

use serialport::SerialPort;
use tracing::{debug, info};

use crate::config::SerialConfig;
use crate::error::{Result, TransportError};
use crate::traits::Link;

/// A [`Link`] over a real serial port.
///
/// The port is acquired exclusively on [`open`](SerialLink::open) and
/// released on [`close`](Link::close) or drop.
pub struct SerialLink {
    port: Option<Box<dyn SerialPort>>,
    path: String,
}

impl SerialLink {
    /// Open the serial device described by `config`.
    ///
    /// Fails with [`TransportError::Open`] if the device cannot be acquired.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let port = serialport::new(config.path.as_str(), config.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(config.timeout)
            .open()
            .map_err(|source| TransportError::Open {
                path: config.path.clone(),
                source,
            })?;

        info!(path = %config.path, baud = config.baud_rate, "serial link opened");

        Ok(Self {
            port: Some(port),
            path: config.path.clone(),
        })
    }

    /// Device path this link was opened on.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>> {
        self.port.as_mut().ok_or(TransportError::Closed)
    }
}

impl Link for SerialLink {
    fn name(&self) -> &str {
        &self.path
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn bytes_available(&mut self) -> Result<usize> {
        let pending = self.port_mut()?.bytes_to_read()?;
        Ok(pending as usize)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let port = self.port_mut()?;
        loop {
            match port.read(buf) {
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::TimedOut => return Ok(0),
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let port = self.port.as_mut().ok_or(TransportError::Closed)?;
        let mut written = 0usize;
        while written < buf.len() {
            match port.write(&buf[written..]) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::TimedOut => break,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }

        match port.flush() {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::TimedOut => {
                debug!(path = %self.path, "flush timed out");
            }
            Err(err) => return Err(TransportError::Io(err)),
        }

        Ok(written)
    }

    fn close(&mut self) -> Result<()> {
        if self.port.take().is_some() {
            info!(path = %self.path, "serial link closed");
        }
        Ok(())
    }
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink")
            .field("path", &self.path)
            .field("open", &self.port.is_some())
            .finish()
    }
}
