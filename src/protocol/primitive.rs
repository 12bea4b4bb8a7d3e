//! Primitive codec
//!
//! Fixed-width and length-prefixed encodings shared by the value codec and
//! the login exchange. Everything is big-endian.
//!
//! ```text
//! byte / bool     1 byte
//! short           2 bytes
//! int             4 bytes
//! long, float     8 bytes
//! timestamp       8 bytes (microseconds since epoch)
//! string, binary  len (4, signed) + bytes, len -1 = null
//! ```
//!
//! Writers append to an in-memory [`BufMut`]; readers pull from any
//! blocking [`Read`].

use std::io::Read;

use bytes::BufMut;

use crate::error::{Result, WireError};

/// Length prefix reserved for "null of this type"
pub const NULL_LENGTH: i32 = -1;

/// Upper bound on a single length-prefixed field read from the wire (16 MB)
pub const MAX_FIELD_SIZE: usize = 16 * 1024 * 1024;

// =============================================================================
// Writers
// =============================================================================

pub fn write_byte<B: BufMut>(buf: &mut B, v: i8) {
    buf.put_i8(v);
}

pub fn write_boolean<B: BufMut>(buf: &mut B, v: bool) {
    buf.put_u8(if v { 0x01 } else { 0x00 });
}

pub fn write_short<B: BufMut>(buf: &mut B, v: i16) {
    buf.put_i16(v);
}

pub fn write_int<B: BufMut>(buf: &mut B, v: i32) {
    buf.put_i32(v);
}

pub fn write_long<B: BufMut>(buf: &mut B, v: i64) {
    buf.put_i64(v);
}

pub fn write_float<B: BufMut>(buf: &mut B, v: f64) {
    buf.put_f64(v);
}

/// Microseconds since the epoch
pub fn write_timestamp<B: BufMut>(buf: &mut B, micros: i64) {
    buf.put_i64(micros);
}

/// Length-prefixed UTF-8 string
pub fn write_string<B: BufMut>(buf: &mut B, s: &str) -> Result<()> {
    write_varbinary(buf, s.as_bytes())
}

/// Length-prefixed raw bytes
///
/// Fails when the length does not fit the signed 4-byte prefix.
pub fn write_varbinary<B: BufMut>(buf: &mut B, bytes: &[u8]) -> Result<()> {
    let len = i32::try_from(bytes.len()).map_err(|_| WireError::ValueTooLarge {
        what: "Length-prefixed field",
        len: bytes.len(),
        max: i32::MAX as usize,
    })?;
    buf.put_i32(len);
    buf.put_slice(bytes);
    Ok(())
}

// =============================================================================
// Readers
// =============================================================================

fn read_array<R: Read, const N: usize>(reader: &mut R) -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    reader.read_exact(&mut bytes)?;
    Ok(bytes)
}

pub fn read_byte<R: Read>(reader: &mut R) -> Result<i8> {
    Ok(i8::from_be_bytes(read_array(reader)?))
}

pub fn read_short<R: Read>(reader: &mut R) -> Result<i16> {
    Ok(i16::from_be_bytes(read_array(reader)?))
}

pub fn read_int<R: Read>(reader: &mut R) -> Result<i32> {
    Ok(i32::from_be_bytes(read_array(reader)?))
}

pub fn read_long<R: Read>(reader: &mut R) -> Result<i64> {
    Ok(i64::from_be_bytes(read_array(reader)?))
}

pub fn read_float<R: Read>(reader: &mut R) -> Result<f64> {
    Ok(f64::from_be_bytes(read_array(reader)?))
}

pub fn read_timestamp<R: Read>(reader: &mut R) -> Result<i64> {
    read_long(reader)
}

/// Read a length-prefixed field, `None` when the length is the null marker
pub fn read_nullable_varbinary<R: Read>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let len = read_int(reader)?;
    if len == NULL_LENGTH {
        return Ok(None);
    }
    if len < 0 {
        return Err(WireError::Protocol(format!("Invalid field length: {}", len)));
    }

    let len = len as usize;
    if len > MAX_FIELD_SIZE {
        return Err(WireError::Protocol(format!(
            "Field too large: {} bytes (max {})",
            len, MAX_FIELD_SIZE
        )));
    }

    let mut bytes = vec![0u8; len];
    reader.read_exact(&mut bytes)?;
    Ok(Some(bytes))
}

pub fn read_nullable_string<R: Read>(reader: &mut R) -> Result<Option<String>> {
    match read_nullable_varbinary(reader)? {
        Some(bytes) => String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| WireError::Protocol(format!("Invalid UTF-8 in string: {}", e))),
        None => Ok(None),
    }
}

/// Read a length-prefixed string; a null string reads as empty
pub fn read_string<R: Read>(reader: &mut R) -> Result<String> {
    Ok(read_nullable_string(reader)?.unwrap_or_default())
}

/// Read length-prefixed bytes; null reads as empty
pub fn read_varbinary<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    Ok(read_nullable_varbinary(reader)?.unwrap_or_default())
}
