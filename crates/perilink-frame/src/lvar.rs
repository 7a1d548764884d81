//! Length-prefixed fields used inside request parameters and reply data.
//!
//! - LVAR ("short"): 1-byte length, then up to 255 bytes.
//! - LLVAR ("long"): 2-byte big-endian length, then up to 65535 bytes.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Maximum length of a short (LVAR) field.
pub const MAX_SHORT_LEN: usize = u8::MAX as usize;

/// Maximum length of a long (LLVAR) field.
pub const MAX_LONG_LEN: usize = u16::MAX as usize;

/// Append a short field to `dst`.
pub fn put_short(dst: &mut BytesMut, bytes: &[u8]) -> Result<()> {
    if bytes.len() > MAX_SHORT_LEN {
        return Err(FrameError::FieldTooLong {
            len: bytes.len(),
            max: MAX_SHORT_LEN,
        });
    }
    dst.reserve(1 + bytes.len());
    dst.put_u8(bytes.len() as u8);
    dst.put_slice(bytes);
    Ok(())
}

/// Append a long field to `dst`.
pub fn put_long(dst: &mut BytesMut, bytes: &[u8]) -> Result<()> {
    if bytes.len() > MAX_LONG_LEN {
        return Err(FrameError::FieldTooLong {
            len: bytes.len(),
            max: MAX_LONG_LEN,
        });
    }
    dst.reserve(2 + bytes.len());
    dst.put_u16(bytes.len() as u16);
    dst.put_slice(bytes);
    Ok(())
}

/// Encode `bytes` as a short field.
pub fn encode_short(bytes: &[u8]) -> Result<Bytes> {
    let mut dst = BytesMut::new();
    put_short(&mut dst, bytes)?;
    Ok(dst.freeze())
}

/// Encode `bytes` as a long field.
pub fn encode_long(bytes: &[u8]) -> Result<Bytes> {
    let mut dst = BytesMut::new();
    put_long(&mut dst, bytes)?;
    Ok(dst.freeze())
}

/// Split a short field off the front of `buf`, returning `(field, rest)`.
pub fn split_short(buf: &[u8]) -> Result<(&[u8], &[u8])> {
    let Some((&len, rest)) = buf.split_first() else {
        return Err(FrameError::TruncatedField {
            needed: 1,
            available: 0,
        });
    };
    split_field(rest, len as usize, 1)
}

/// Split a long field off the front of `buf`, returning `(field, rest)`.
pub fn split_long(buf: &[u8]) -> Result<(&[u8], &[u8])> {
    if buf.len() < 2 {
        return Err(FrameError::TruncatedField {
            needed: 2,
            available: buf.len(),
        });
    }
    let len = u16::from_be_bytes([buf[0], buf[1]]) as usize;
    split_field(&buf[2..], len, 2)
}

/// Decode the short field at the front of `buf`. Trailing bytes are ignored.
pub fn decode_short(buf: &[u8]) -> Result<&[u8]> {
    split_short(buf).map(|(field, _)| field)
}

/// Decode the long field at the front of `buf`. Trailing bytes are ignored.
pub fn decode_long(buf: &[u8]) -> Result<&[u8]> {
    split_long(buf).map(|(field, _)| field)
}

fn split_field(rest: &[u8], len: usize, prefix: usize) -> Result<(&[u8], &[u8])> {
    if rest.len() < len {
        return Err(FrameError::TruncatedField {
            needed: prefix + len,
            available: prefix + rest.len(),
        });
    }
    Ok(rest.split_at(len))
}
