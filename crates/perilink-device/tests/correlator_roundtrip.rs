mod common;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use perilink_device::{status, Category, Device, DeviceConfig, DeviceError};
use perilink_frame::command::{
    BEEP, GET_SYSTEM_VERSION, ICC_SEND_APDU_COMMAND, READ_KEYBOARD_INPUT,
};
use perilink_frame::{Frame, REPLY_MARKER};
use perilink_transport::loopback;

use common::{open_device, test_config, wire, wait_queued, Controller};

#[test]
fn beep_request_wire_bytes() {
    let (device, peer) = open_device();
    device.send_request(BEEP, &[0x00]).expect("send should succeed");
    assert_eq!(
        peer.wait_written(8, Duration::from_secs(1)),
        vec![0x02, 0x20, 0x2F, 0x00, 0x01, 0x00, 0x03, 0x0E]
    );
}

#[test]
fn status_only_reply_returns_empty_result() {
    let (device, peer) = open_device();
    let controller = Controller::spawn(peer, |request| {
        let mut payload = vec![request.command, REPLY_MARKER, 0x00, 0x04];
        payload.extend([0, 0, 0, 0]);
        let mut out = vec![0x02];
        out.extend(&payload);
        out.push(0x03);
        out.push(payload.iter().fold(0, |acc, b| acc ^ b));
        out
    });

    let data = device.call(BEEP, &[0x00]).expect("beep should succeed");
    assert!(data.is_empty());
    assert_eq!(controller.requests(), vec![Frame::request(BEEP, vec![0x00])]);
}

#[test]
fn reply_data_is_returned() {
    let (device, peer) = open_device();
    let _controller = Controller::answering(peer, &[0xAA, 0xBB, 0xCC, 0xDD]);

    let reply = device.request(BEEP, &[0x00]).expect("request should succeed");
    assert_eq!(reply.status, 0);
    assert_eq!(reply.data.as_ref(), &[0xAA, 0xBB, 0xCC, 0xDD]);
}

#[test]
fn non_zero_status_is_reported_verbatim() {
    let (device, peer) = open_device();
    let _controller = Controller::spawn(peer, |request| {
        wire(&Frame::reply(request.command, -1203, &[0x55]))
    });

    let reply = device
        .request(ICC_SEND_APDU_COMMAND, &[0x00, 0x84])
        .expect("request should complete");
    assert_eq!(reply.status, -1203);
    assert!(reply.data.is_empty());

    let err = device
        .call(ICC_SEND_APDU_COMMAND, &[0x00, 0x84])
        .expect_err("call should surface the status");
    assert_eq!(err.status_code(), Some(-1203));
    assert_eq!(status::legacy_code(&err), -1203);
}

#[test]
fn corrupted_reply_times_out() {
    let (device, peer) = open_device();
    let _controller = Controller::spawn(peer, |request| {
        let mut bytes = wire(&Frame::reply(request.command, 0, &[]));
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        bytes
    });

    let budget = Duration::from_millis(100);
    let started = Instant::now();
    let err = device
        .call_with_timeout(BEEP, &[0x00], budget)
        .expect_err("corrupted reply should never be delivered");
    assert!(err.is_timeout());
    assert!(started.elapsed() >= budget);
    assert_eq!(device.queued(Category::Generic), 0);
}

#[test]
fn timeout_respects_budget() {
    let (device, _peer) = open_device();
    let budget = Duration::from_millis(150);
    let started = Instant::now();
    let err = device
        .call_with_timeout(BEEP, &[], budget)
        .expect_err("nobody answers");
    let elapsed = started.elapsed();

    assert!(matches!(err, DeviceError::Timeout { command: BEEP, after } if after == budget));
    assert!(elapsed >= budget, "returned early after {elapsed:?}");
    assert!(elapsed < budget + Duration::from_millis(500), "took {elapsed:?}");
    assert_eq!(status::legacy_code(&err), status::TIMEOUT);
}

#[test]
fn frames_ahead_of_reply_are_discarded() {
    let (device, peer) = open_device();
    peer.inject(&wire(&Frame::reply(GET_SYSTEM_VERSION, 0, b"V1.02")));
    peer.inject(&wire(&Frame::reply(BEEP, 0, &[0x01])));
    wait_queued(&device, Category::Generic, 2);

    let data = device
        .call_with_timeout(BEEP, &[0x00], Duration::from_millis(200))
        .expect("queued reply should match");
    assert_eq!(data.as_ref(), &[0x01]);
    assert_eq!(device.queued(Category::Generic), 0);
}

#[test]
fn corrupted_length_does_not_stall_later_calls() {
    let (device, peer) = open_device();
    let mut bad = wire(&Frame::reply(GET_SYSTEM_VERSION, 0, &[]));
    bad[3] ^= 0x80;
    peer.inject(&bad);
    let _controller = Controller::answering(peer, &[0x42]);

    let data = device
        .call_with_timeout(BEEP, &[0x00], Duration::from_secs(2))
        .expect("reply swallowed by the bad frame should be recovered");
    assert_eq!(data.as_ref(), &[0x42]);

    let data = device
        .call_with_timeout(BEEP, &[0x00], Duration::from_secs(2))
        .expect("receiver should stay in sync");
    assert_eq!(data.as_ref(), &[0x42]);
}

#[test]
fn echoed_request_is_not_taken_as_reply() {
    let (device, peer) = open_device();
    let _controller = Controller::spawn(peer, |request| {
        let mut bytes = wire(request);
        bytes.extend(wire(&Frame::reply(request.command, 0, &[0x07])));
        bytes
    });

    let data = device.call(BEEP, &[0x00]).expect("reply should follow echo");
    assert_eq!(data.as_ref(), &[0x07]);
}

#[test]
fn reply_split_across_polls_is_reassembled() {
    let (device, peer) = open_device();
    let writer = peer.clone();
    let _controller = Controller::spawn(peer, move |request| {
        let bytes = wire(&Frame::reply(request.command, 0, b"0123456789"));
        let (head, tail) = bytes.split_at(5);
        writer.inject(head);
        thread::sleep(Duration::from_millis(30));
        tail.to_vec()
    });

    let data = device.call(GET_SYSTEM_VERSION, &[]).expect("split reply should arrive");
    assert_eq!(data.as_ref(), b"0123456789");
}

#[test]
fn short_write_fails_immediately() {
    let (device, peer) = open_device();
    peer.set_write_limit(Some(3));

    let started = Instant::now();
    let err = device.call(BEEP, &[0x00]).expect_err("write is truncated");
    assert!(err.is_short_write());
    assert!(!err.is_timeout());
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn callers_on_different_categories_run_concurrently() {
    let (device, peer) = open_device();
    let _controller = Controller::spawn(peer, |request| {
        let data: &[u8] = if request.command == READ_KEYBOARD_INPUT {
            b"5"
        } else {
            &[]
        };
        wire(&Frame::reply(request.command, 0, data))
    });
    let device = Arc::new(device);

    let keypad = {
        let device = Arc::clone(&device);
        thread::spawn(move || device.call(READ_KEYBOARD_INPUT, &[]))
    };
    let beeper = {
        let device = Arc::clone(&device);
        thread::spawn(move || device.call(BEEP, &[0x00]))
    };

    let key = keypad.join().expect("keypad thread").expect("key read");
    let beep = beeper.join().expect("beep thread").expect("beep");
    assert_eq!(key.as_ref(), b"5");
    assert!(beep.is_empty());
}

#[test]
fn receiver_survives_link_fault() {
    let (device, peer) = open_device();
    peer.inject_fault();
    thread::sleep(Duration::from_millis(50));

    let _controller = Controller::answering(peer, &[]);
    device.call(BEEP, &[0x00]).expect("receiver should keep polling");
}

#[test]
fn closed_device_rejects_requests() {
    let (device, peer) = open_device();
    assert!(device.is_open());
    device.close().expect("close should succeed");
    device.close().expect("close should be idempotent");

    assert!(!device.is_open());
    assert!(!peer.is_link_open());
    let err = device.call(BEEP, &[0x00]).expect_err("device is closed");
    assert!(err.is_link_closed());
    assert_eq!(status::legacy_code(&err), status::LINK_NOT_OPEN);
}

#[test]
fn missing_port_is_link_unavailable() {
    let config = DeviceConfig::new("/dev/perilink-does-not-exist");
    let err = Device::open(config).expect_err("port does not exist");
    assert!(err.is_link_unavailable());
}

#[test]
fn custom_link_accepts_explicit_config() {
    let (link, peer) = loopback::pair();
    let config = test_config().with_reply_timeout(Duration::from_millis(300));
    let device = Device::with_link(link, config).expect("device should start");
    assert_eq!(device.config().reply_timeout, Duration::from_millis(300));

    let _controller = Controller::answering(peer, b"ok");
    assert_eq!(device.call(BEEP, &[]).expect("reply").as_ref(), b"ok");
}
