//! Wire protocol for the perilink peripheral controller.
//!
//! Every message on the link is framed as:
//! - `STX` (0x02)
//! - a payload: command code, marker (0x2F request / 0x4F reply), a 2-byte
//!   big-endian body length, then the body
//! - `ETX` (0x03)
//! - a 1-byte XOR checksum over the payload
//!
//! Reply bodies start with a 4-byte big-endian status code (0 = success).
//! The [`lvar`] module encodes the length-prefixed fields that appear inside
//! bodies.

pub mod codec;
pub mod command;
pub mod error;
pub mod lvar;
pub mod parser;
pub mod reader;
pub mod writer;

pub use codec::{
    checksum, encode_frame, encode_request, Frame, FrameConfig, HexDump, ETX, FRAME_OVERHEAD,
    HEADER_SIZE, MAX_BODY_LEN, REPLY_MARKER, REQUEST_MARKER, STATUS_SIZE, STX,
};
pub use command::{command_name, CommandName};
pub use error::{FrameError, Result};
pub use lvar::{decode_long, decode_short, encode_long, encode_short};
pub use parser::FrameParser;
pub use reader::FrameReader;
pub use writer::FrameWriter;
