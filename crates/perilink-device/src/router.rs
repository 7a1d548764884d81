use std::collections::VecDeque;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use perilink_frame::command::{
    CHECK_IC_STATUS, GET_TOUCH_COORDINATE, READ_KEYBOARD_INPUT, SEARCH_CARD_START,
};
use perilink_frame::{CommandName, Frame};
use tracing::{debug, warn};

/// Routing bucket for inbound frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Key presses from the PIN pad.
    KeyboardInput,
    /// Card-detected notifications after a search was started.
    SearchCardStatus,
    /// Touch panel coordinates.
    TouchInput,
    /// IC card slot status.
    IcStatus,
    /// Everything else.
    Generic,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::KeyboardInput,
        Category::SearchCardStatus,
        Category::TouchInput,
        Category::IcStatus,
        Category::Generic,
    ];

    /// Classify a command code. Total over every `u8`.
    pub fn of(command: u8) -> Self {
        match command {
            READ_KEYBOARD_INPUT => Category::KeyboardInput,
            SEARCH_CARD_START => Category::SearchCardStatus,
            GET_TOUCH_COORDINATE => Category::TouchInput,
            CHECK_IC_STATUS => Category::IcStatus,
            _ => Category::Generic,
        }
    }

    /// Category an inbound frame is queued under.
    ///
    /// Only reply-marked frames reach the dedicated categories.
    pub fn for_frame(frame: &Frame) -> Self {
        if frame.is_reply() {
            Self::of(frame.command)
        } else {
            Category::Generic
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::KeyboardInput => "keyboard-input",
            Category::SearchCardStatus => "search-card-status",
            Category::TouchInput => "touch-input",
            Category::IcStatus => "ic-status",
            Category::Generic => "generic",
        }
    }

    fn index(self) -> usize {
        match self {
            Category::KeyboardInput => 0,
            Category::SearchCardStatus => 1,
            Category::TouchInput => 2,
            Category::IcStatus => 3,
            Category::Generic => 4,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lock a mutex, recovering the guard if another thread panicked while
/// holding it. Every value guarded here stays structurally valid.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// FIFO of frames for one category.
///
/// The receiver thread is the only producer; callers wait on the queue's
/// condition variable instead of polling.
#[derive(Debug)]
pub struct CategoryQueue {
    category: Category,
    frames: Mutex<VecDeque<Frame>>,
    arrived: Condvar,
    capacity: usize,
}

impl CategoryQueue {
    /// Create a queue holding at most `capacity` frames (`0` = unbounded).
    pub fn new(category: Category, capacity: usize) -> Self {
        Self {
            category,
            frames: Mutex::new(VecDeque::new()),
            arrived: Condvar::new(),
            capacity,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Append a frame, evicting the oldest one if the queue is full.
    pub fn push(&self, frame: Frame) {
        let mut frames = lock(&self.frames);
        if self.capacity > 0 && frames.len() >= self.capacity {
            if let Some(evicted) = frames.pop_front() {
                warn!(
                    category = %self.category,
                    command = %CommandName(evicted.command),
                    capacity = self.capacity,
                    "queue full, dropping oldest frame"
                );
            }
        }
        frames.push_back(frame);
        drop(frames);
        self.arrived.notify_all();
    }

    pub fn len(&self) -> usize {
        lock(&self.frames).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.frames).is_empty()
    }

    /// Drop every queued frame.
    pub fn clear(&self) {
        lock(&self.frames).clear();
    }

    /// Remove and return the oldest frame.
    pub fn pop_oldest(&self) -> Option<Frame> {
        lock(&self.frames).pop_front()
    }

    /// Return the newest frame and discard everything else.
    pub fn take_latest(&self) -> Option<Frame> {
        let mut frames = lock(&self.frames);
        let latest = frames.pop_back();
        frames.clear();
        latest
    }

    /// Wait for the reply to `command`.
    ///
    /// Frames are examined oldest first. Every frame that is not a reply to
    /// `command` is removed and dropped; the first one that is gets removed
    /// and returned. Returns `None` once `timeout` has fully elapsed without
    /// a match.
    pub fn wait_for_reply(&self, command: u8, timeout: Duration) -> Option<Frame> {
        let deadline = Instant::now() + timeout;
        let mut frames = lock(&self.frames);
        loop {
            while let Some(frame) = frames.pop_front() {
                if frame.command == command && frame.is_reply() {
                    return Some(frame);
                }
                debug!(
                    category = %self.category,
                    wanted = %CommandName(command),
                    dropped = %CommandName(frame.command),
                    marker = frame.marker,
                    "discarding frame ahead of reply"
                );
            }

            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            frames = self
                .arrived
                .wait_timeout(frames, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Wait until at least one frame is queued, then behave like
    /// [`take_latest`](Self::take_latest).
    pub fn wait_latest(&self, timeout: Duration) -> Option<Frame> {
        let deadline = Instant::now() + timeout;
        let mut frames = lock(&self.frames);
        loop {
            if let Some(latest) = frames.pop_back() {
                frames.clear();
                return Some(latest);
            }

            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            frames = self
                .arrived
                .wait_timeout(frames, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

/// Receives every verified inbound frame.
pub trait FrameSink: Send + Sync {
    fn deliver(&self, frame: Frame);
}

/// One queue per [`Category`]; each frame lands in exactly one of them.
#[derive(Debug)]
pub struct ResponseRouter {
    queues: [CategoryQueue; 5],
}

impl Default for ResponseRouter {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ResponseRouter {
    /// Create a router whose queues each hold at most `capacity` frames
    /// (`0` = unbounded).
    pub fn new(capacity: usize) -> Self {
        Self {
            queues: Category::ALL.map(|category| CategoryQueue::new(category, capacity)),
        }
    }

    pub fn queue(&self, category: Category) -> &CategoryQueue {
        &self.queues[category.index()]
    }

    /// Queue `frame` under its category.
    pub fn route(&self, frame: Frame) -> Category {
        let category = Category::for_frame(&frame);
        debug!(
            category = %category,
            command = %CommandName(frame.command),
            "frame routed"
        );
        self.queue(category).push(frame);
        category
    }
}

impl FrameSink for ResponseRouter {
    fn deliver(&self, frame: Frame) {
        self.route(frame);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use bytes::Bytes;
    use perilink_frame::command::{BEEP, GET_SYSTEM_VERSION};
    use perilink_frame::REQUEST_MARKER;

    use super::*;

    #[test]
    fn classification_is_total() {
        for code in 0..=u8::MAX {
            let category = Category::of(code);
            let expected = match code {
                0x32 => Category::KeyboardInput,
                0x46 => Category::SearchCardStatus,
                0x3E => Category::TouchInput,
                0x4C => Category::IcStatus,
                _ => Category::Generic,
            };
            assert_eq!(category, expected, "code {code:#04x}");
        }
    }

    #[test]
    fn request_marker_routes_to_generic() {
        let frame = Frame::new(READ_KEYBOARD_INPUT, REQUEST_MARKER, Bytes::new());
        assert_eq!(Category::for_frame(&frame), Category::Generic);
        let reply = Frame::reply(READ_KEYBOARD_INPUT, 0, &[0x31]);
        assert_eq!(Category::for_frame(&reply), Category::KeyboardInput);
    }

    #[test]
    fn each_frame_lands_in_one_queue() {
        let router = ResponseRouter::new(0);
        router.deliver(Frame::reply(BEEP, 0, &[]));
        router.deliver(Frame::reply(GET_TOUCH_COORDINATE, 0, &[0, 1, 0, 2]));
        router.deliver(Frame::reply(CHECK_IC_STATUS, 0, &[]));

        let counts: Vec<usize> = Category::ALL
            .iter()
            .map(|c| router.queue(*c).len())
            .collect();
        assert_eq!(counts, vec![0, 0, 1, 1, 1]);
    }

    #[test]
    fn scan_discards_frames_ahead_of_match() {
        let queue = CategoryQueue::new(Category::Generic, 0);
        queue.push(Frame::reply(GET_SYSTEM_VERSION, 0, &[]));
        queue.push(Frame::reply(BEEP, 0, &[]));

        let found = queue.wait_for_reply(BEEP, Duration::from_millis(10)).unwrap();
        assert_eq!(found.command, BEEP);
        assert!(queue.is_empty());
    }

    #[test]
    fn scan_stops_at_first_match() {
        let queue = CategoryQueue::new(Category::Generic, 0);
        queue.push(Frame::reply(BEEP, 0, &[0x01]));
        queue.push(Frame::reply(GET_SYSTEM_VERSION, 0, &[]));

        let found = queue.wait_for_reply(BEEP, Duration::ZERO).unwrap();
        assert_eq!(found.result_data().as_ref(), &[0x01]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn request_echo_never_matches() {
        let queue = CategoryQueue::new(Category::Generic, 0);
        queue.push(Frame::request(BEEP, vec![0x00]));
        assert!(queue.wait_for_reply(BEEP, Duration::from_millis(5)).is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn wait_times_out_no_earlier_than_budget() {
        let queue = CategoryQueue::new(Category::Generic, 0);
        let budget = Duration::from_millis(50);
        let started = Instant::now();
        assert!(queue.wait_for_reply(BEEP, budget).is_none());
        assert!(started.elapsed() >= budget);
    }

    #[test]
    fn waiter_wakes_on_push() {
        let queue = Arc::new(CategoryQueue::new(Category::Generic, 0));
        let producer = Arc::clone(&queue);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            producer.push(Frame::reply(BEEP, 0, &[]));
        });

        let started = Instant::now();
        let found = queue.wait_for_reply(BEEP, Duration::from_secs(5));
        handle.join().unwrap();
        assert!(found.is_some());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn take_latest_clears_older_frames() {
        let queue = CategoryQueue::new(Category::TouchInput, 0);
        assert!(queue.take_latest().is_none());
        for x in 1..=3u8 {
            queue.push(Frame::reply(GET_TOUCH_COORDINATE, 0, &[0, x, 0, x]));
        }
        let latest = queue.take_latest().unwrap();
        assert_eq!(latest.result_data().as_ref(), &[0, 3, 0, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn pop_oldest_is_fifo() {
        let queue = CategoryQueue::new(Category::KeyboardInput, 0);
        queue.push(Frame::reply(READ_KEYBOARD_INPUT, 0, b"1"));
        queue.push(Frame::reply(READ_KEYBOARD_INPUT, 0, b"2"));
        assert_eq!(queue.pop_oldest().unwrap().result_data().as_ref(), b"1");
        assert_eq!(queue.pop_oldest().unwrap().result_data().as_ref(), b"2");
        assert!(queue.pop_oldest().is_none());
    }

    #[test]
    fn wait_latest_returns_newest_after_arrival() {
        let queue = Arc::new(CategoryQueue::new(Category::IcStatus, 0));
        assert!(queue.wait_latest(Duration::from_millis(5)).is_none());

        let producer = Arc::clone(&queue);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            producer.push(Frame::reply(CHECK_IC_STATUS, 0, &[0x01]));
        });
        let frame = queue.wait_latest(Duration::from_secs(5)).unwrap();
        handle.join().unwrap();
        assert_eq!(frame.result_data().as_ref(), &[0x01]);
        assert!(queue.is_empty());
    }

    #[test]
    fn bounded_queue_evicts_oldest() {
        let queue = CategoryQueue::new(Category::KeyboardInput, 2);
        for key in [b'1', b'2', b'3'] {
            queue.push(Frame::reply(READ_KEYBOARD_INPUT, 0, &[key]));
        }
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop_oldest().unwrap().result_data().as_ref(), b"2");
    }
}
