//! Integer result codes for callers that keep the controller SDK's
//! return-code convention.
//!
//! Non-zero status codes from the controller pass through unchanged; local
//! failures map onto the SDK's generic codes.

use perilink_frame::FrameError;

use crate::error::DeviceError;

pub const OK: i32 = 0;
pub const ERROR: i32 = -1;
pub const PARAM_ERROR: i32 = -2;
/// Link not open when a command was sent.
pub const LINK_NOT_OPEN: i32 = -110;
pub const CANCELLED: i32 = -120;
pub const TIMEOUT: i32 = -121;

/// Map an error onto the SDK return-code space.
pub fn legacy_code(err: &DeviceError) -> i32 {
    match err {
        DeviceError::Status { code, .. } => *code,
        DeviceError::Timeout { .. }
        | DeviceError::EventTimeout { .. }
        | DeviceError::MalformedReply { .. } => TIMEOUT,
        DeviceError::Frame(
            FrameError::ParamsTooLarge { .. }
            | FrameError::FieldTooLong { .. }
            | FrameError::TruncatedField { .. },
        ) => PARAM_ERROR,
        err if err.is_link_closed() || err.is_link_unavailable() => LINK_NOT_OPEN,
        _ => ERROR,
    }
}

/// [`OK`] for success, otherwise [`legacy_code`] of the error.
pub fn code_of<T>(result: &Result<T, DeviceError>) -> i32 {
    match result {
        Ok(_) => OK,
        Err(err) => legacy_code(err),
    }
}
