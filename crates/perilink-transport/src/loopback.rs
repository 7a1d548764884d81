//! In-memory link pair.
//!
//! [`LoopbackLink`] is the host end and implements [`Link`]; the matching
//! [`LoopbackPeer`] plays the peripheral controller: it sees every byte the
//! host writes and injects the bytes the host will read. Used by tests and by
//! simulators that run without hardware.

use std::collections::VecDeque;
use std::io::ErrorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::Link;

#[derive(Default)]
struct Shared {
    /// Bytes written by the host, waiting for the peer.
    to_peer: Mutex<VecDeque<u8>>,
    written: Condvar,
    /// Bytes injected by the peer, waiting for the host.
    to_host: Mutex<VecDeque<u8>>,
    /// Maximum bytes accepted per host write (simulates short writes).
    write_limit: Mutex<Option<usize>>,
    /// One-shot I/O fault reported by the next host operation.
    fault: AtomicBool,
    closed: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Create a connected host/peer pair.
pub fn pair() -> (LoopbackLink, LoopbackPeer) {
    let shared = Arc::new(Shared::default());
    (
        LoopbackLink {
            shared: Arc::clone(&shared),
        },
        LoopbackPeer { shared },
    )
}

/// Host end of an in-memory link.
pub struct LoopbackLink {
    shared: Arc<Shared>,
}

impl LoopbackLink {
    /// Create a connected host/peer pair. Same as [`pair`].
    pub fn pair() -> (LoopbackLink, LoopbackPeer) {
        pair()
    }

    fn check(&self) -> Result<()> {
        if self.shared.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        if self.shared.fault.swap(false, Ordering::SeqCst) {
            return Err(TransportError::Io(std::io::Error::new(
                ErrorKind::BrokenPipe,
                "injected loopback fault",
            )));
        }
        Ok(())
    }
}

impl Link for LoopbackLink {
    fn name(&self) -> &str {
        "loopback"
    }

    fn is_open(&self) -> bool {
        !self.shared.closed.load(Ordering::SeqCst)
    }

    fn bytes_available(&mut self) -> Result<usize> {
        self.check()?;
        Ok(lock(&self.shared.to_host).len())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.check()?;
        let mut pending = lock(&self.shared.to_host);
        let n = buf.len().min(pending.len());
        for (slot, byte) in buf.iter_mut().zip(pending.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.check()?;
        let accepted = match *lock(&self.shared.write_limit) {
            Some(limit) => buf.len().min(limit),
            None => buf.len(),
        };
        lock(&self.shared.to_peer).extend(&buf[..accepted]);
        self.shared.written.notify_all();
        Ok(accepted)
    }

    fn close(&mut self) -> Result<()> {
        if !self.shared.closed.swap(true, Ordering::SeqCst) {
            debug!("loopback link closed");
        }
        self.shared.written.notify_all();
        Ok(())
    }
}

impl std::fmt::Debug for LoopbackLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopbackLink")
            .field("open", &self.is_open())
            .finish()
    }
}

/// Controller end of an in-memory link.
#[derive(Clone)]
pub struct LoopbackPeer {
    shared: Arc<Shared>,
}

impl LoopbackPeer {
    /// Queue bytes for the host to read.
    pub fn inject(&self, bytes: &[u8]) {
        lock(&self.shared.to_host).extend(bytes);
    }

    /// Take everything the host has written so far.
    pub fn take_written(&self) -> Vec<u8> {
        lock(&self.shared.to_peer).drain(..).collect()
    }

    /// Wait until the host has written at least `min_len` bytes, then take
    /// everything written. Returns whatever is there once `timeout` elapses.
    pub fn wait_written(&self, min_len: usize, timeout: Duration) -> Vec<u8> {
        let deadline = Instant::now() + timeout;
        let mut pending = lock(&self.shared.to_peer);
        while pending.len() < min_len && !self.shared.closed.load(Ordering::SeqCst) {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            pending = self
                .shared
                .written
                .wait_timeout(pending, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        pending.drain(..).collect()
    }

    /// Limit how many bytes each host write accepts. `None` removes the limit.
    pub fn set_write_limit(&self, limit: Option<usize>) {
        *lock(&self.shared.write_limit) = limit;
    }

    /// Make the next host link operation fail with an I/O error.
    pub fn inject_fault(&self) {
        self.shared.fault.store(true, Ordering::SeqCst);
    }

    /// Bytes injected but not yet read by the host.
    pub fn unread(&self) -> usize {
        lock(&self.shared.to_host).len()
    }

    /// Whether the host end is still open.
    pub fn is_link_open(&self) -> bool {
        !self.shared.closed.load(Ordering::SeqCst)
    }
}
