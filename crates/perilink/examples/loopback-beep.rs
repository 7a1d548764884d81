//! Drive a simulated controller over an in-memory link.
//!
//! Run with:
//!   cargo run --example loopback-beep --features device,logging

use std::thread;
use std::time::Duration;

use bytes::BytesMut;
use perilink::device::{Category, Device, DeviceConfig};
use perilink::frame::command::{BEEP, GET_SYSTEM_VERSION, READ_KEYBOARD_INPUT};
use perilink::frame::{decode_short, encode_short, Frame, FrameParser};
use perilink::logging::{init_logging, LogFormat};
use perilink::transport::loopback::{self, LoopbackPeer};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

fn inject(peer: &LoopbackPeer, frame: &Frame) {
    let mut buf = BytesMut::with_capacity(frame.wire_size());
    if frame.encode(&mut buf).is_ok() {
        peer.inject(&buf);
    }
}

/// Answers beep and version requests until the host closes the link.
fn controller(peer: LoopbackPeer) {
    let mut parser = FrameParser::new();
    while peer.is_link_open() {
        let written = peer.wait_written(1, Duration::from_millis(50));
        for request in parser.feed_bytes(&written).into_iter().flatten() {
            let reply = match request.command {
                BEEP => Frame::reply(BEEP, 0, &[]),
                GET_SYSTEM_VERSION => match encode_short(b"SIM-1.0") {
                    Ok(version) => Frame::reply(GET_SYSTEM_VERSION, 0, &version),
                    Err(_) => Frame::reply(GET_SYSTEM_VERSION, -1, &[]),
                },
                other => Frame::reply(other, -2, &[]),
            };
            inject(&peer, &reply);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LogFormat::Text, LevelFilter::DEBUG);

    let (link, peer) = loopback::pair();
    let device = Device::with_link(link, DeviceConfig::default())?;

    let sim = {
        let peer = peer.clone();
        thread::spawn(move || controller(peer))
    };

    device.call(BEEP, &[0x00])?;
    info!("beep acknowledged");

    let data = device.call(GET_SYSTEM_VERSION, &[])?;
    let version = decode_short(&data)?;
    info!(version = %String::from_utf8_lossy(version), "controller version");

    // Key presses arrive unsolicited.
    for key in *b"42" {
        inject(&peer, &Frame::reply(READ_KEYBOARD_INPUT, 0, &[key]));
    }
    thread::sleep(Duration::from_millis(100));
    while let Some(frame) = device.pop_oldest(Category::KeyboardInput) {
        info!(key = %String::from_utf8_lossy(&frame.result_data()), "key pressed");
    }

    let err = device
        .call_with_timeout(0x7F, &[], Duration::from_millis(200))
        .err();
    info!(error = ?err, "unknown command");

    device.close()?;
    let _ = sim.join();
    Ok(())
}
