//! Message framing
//!
//! Every message on the connection is wrapped as:
//!
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Len (4)  │         Body                │
//! └──────────┴─────────────────────────────┘
//! ```
//!
//! The length is signed, big-endian, and does not count itself.

use std::io::{Read, Write};

use bytes::Bytes;

use crate::error::{Result, WireError};

/// Header size: 4 byte length
pub const HEADER_SIZE: usize = 4;

/// Default maximum body size (16 MB)
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Wrap `body` with its length header
pub fn encode_frame(body: &[u8]) -> Result<Vec<u8>> {
    let len = i32::try_from(body.len()).map_err(|_| WireError::ValueTooLarge {
        what: "Frame",
        len: body.len(),
        max: i32::MAX as usize,
    })?;

    let mut message = Vec::with_capacity(HEADER_SIZE + body.len());
    message.extend_from_slice(&len.to_be_bytes());
    message.extend_from_slice(body);
    Ok(message)
}

/// Write a frame to a stream and flush it
pub fn write_frame<W: Write>(writer: &mut W, body: &[u8]) -> Result<()> {
    let bytes = encode_frame(body)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete frame body from a stream
///
/// Blocks until the full body is received or an error occurs
pub fn read_frame<R: Read>(reader: &mut R, max_size: usize) -> Result<Bytes> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let len = i32::from_be_bytes(header);
    if len < 0 {
        return Err(WireError::Protocol(format!("Negative frame length: {}", len)));
    }

    let len = len as usize;
    if len > max_size {
        return Err(WireError::Protocol(format!(
            "Frame too large: {} bytes (max {})",
            len, max_size
        )));
    }

    let mut body = vec![0u8; len];
    if len > 0 {
        reader.read_exact(&mut body)?;
    }
    Ok(Bytes::from(body))
}
