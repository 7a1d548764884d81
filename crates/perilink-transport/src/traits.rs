use crate::error::Result;

/// A byte-oriented, point-to-point link to the peripheral controller.
///
/// This is the boundary with the serial driver. Implementations move opaque
/// bytes; framing and checksums live in `perilink-frame`. Callers serialize
/// access themselves (the device layer holds one lock around every link
/// operation), so implementations need not be internally synchronized.
pub trait Link: Send {
    /// Human-readable link name for diagnostics (device path, `loopback`).
    fn name(&self) -> &str;

    /// Whether the link is currently open.
    fn is_open(&self) -> bool;

    /// Number of received bytes that can be read without blocking.
    fn bytes_available(&mut self) -> Result<usize>;

    /// Read up to `buf.len()` bytes.
    ///
    /// Returns the number of bytes read, which may be fewer than requested
    /// (including zero) if the link's read timeout elapses first.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write `buf` to the link.
    ///
    /// Returns how many bytes the link accepted. A count lower than
    /// `buf.len()` is a short write; it is reported, not retried.
    fn write(&mut self, buf: &[u8]) -> Result<usize>;

    /// Release the link. Further operations fail with
    /// [`TransportError::Closed`](crate::TransportError::Closed).
    fn close(&mut self) -> Result<()>;
}

impl<L: Link + ?Sized> Link for Box<L> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn bytes_available(&mut self) -> Result<usize> {
        (**self).bytes_available()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        (**self).write(buf)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}
