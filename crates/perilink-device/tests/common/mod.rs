#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use bytes::BytesMut;
use perilink_device::{Category, Device, DeviceConfig};
use perilink_frame::{Frame, FrameParser};
use perilink_transport::loopback::{self, LoopbackPeer};

pub fn wire(frame: &Frame) -> Vec<u8> {
    let mut buf = BytesMut::new();
    frame.encode(&mut buf).expect("frame should encode");
    buf.to_vec()
}

pub fn test_config() -> DeviceConfig {
    DeviceConfig::default()
        .with_poll_interval(Duration::from_millis(2))
        .with_reply_timeout(Duration::from_secs(2))
}

/// A device on a loopback link with nothing answering on the other end.
pub fn open_device() -> (Device, LoopbackPeer) {
    let (link, peer) = loopback::pair();
    let device = Device::with_link(link, test_config()).expect("device should start");
    (device, peer)
}

/// Plays the controller: parses every request the host writes and injects
/// whatever bytes the handler returns for it.
pub struct Controller {
    requests: Arc<Mutex<Vec<Frame>>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Controller {
    pub fn spawn<F>(peer: LoopbackPeer, handler: F) -> Self
    where
        F: Fn(&Frame) -> Vec<u8> + Send + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let stop = Arc::new(AtomicBool::new(false));
        let seen = Arc::clone(&requests);
        let stopped = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            let mut parser = FrameParser::new();
            while !stopped.load(Ordering::SeqCst) && peer.is_link_open() {
                let bytes = peer.wait_written(1, Duration::from_millis(10));
                for request in parser.feed_bytes(&bytes).into_iter().flatten() {
                    seen.lock().expect("request log lock").push(request.clone());
                    let answer = handler(&request);
                    if !answer.is_empty() {
                        peer.inject(&answer);
                    }
                }
            }
        });

        Self {
            requests,
            stop,
            handle: Some(handle),
        }
    }

    /// Answer every request with a success reply carrying `data`.
    pub fn answering(peer: LoopbackPeer, data: &'static [u8]) -> Self {
        Self::spawn(peer, move |request| {
            wire(&Frame::reply(request.command, 0, data))
        })
    }

    pub fn requests(&self) -> Vec<Frame> {
        self.requests.lock().expect("request log lock").clone()
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Spin until `category` holds at least `count` frames.
pub fn wait_queued(device: &Device, category: Category, count: usize) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while device.queued(category) < count {
        assert!(
            Instant::now() < deadline,
            "{category} queue should reach {count} frames"
        );
        thread::sleep(Duration::from_millis(1));
    }
}
