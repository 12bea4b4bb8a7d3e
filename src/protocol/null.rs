//! Null sentinels
//!
//! The wire format has no null flag. A null is written as the declared
//! type's tag followed by a reserved payload:
//!
//! ```text
//! BOOL       i8::MIN
//! SHORT      i16::MIN
//! INT        i32::MIN
//! LONG       i64::MIN
//! FLOAT      -1.7E+308
//! STRING     len = -1, no bytes
//! VARBINARY  len = -1, no bytes
//! TIMESTAMP  0x80 00 00 00 00 00 00 00
//! ```
//!
//! ARRAY and NULL have no sentinel.

use std::io::Write;

use bytes::{BufMut, BytesMut};

use super::primitive::{write_byte, write_float, write_int, write_long, write_short, NULL_LENGTH};
use super::TypeTag;
use crate::error::{Result, WireError};

pub const NULL_BOOL: i8 = i8::MIN;
pub const NULL_SHORT: i16 = i16::MIN;
pub const NULL_INT: i32 = i32::MIN;
pub const NULL_LONG: i64 = i64::MIN;
pub const NULL_FLOAT: f64 = -1.7E+308;
pub const NULL_TIMESTAMP: [u8; 8] = [0x80, 0, 0, 0, 0, 0, 0, 0];

/// Whether a null of `tag` can be expressed on the wire
pub fn has_null_sentinel(tag: TypeTag) -> bool {
    !matches!(tag, TypeTag::Array | TypeTag::Null)
}

/// Write the null of `tag` to `writer`
///
/// Nothing is written when the tag has no sentinel.
pub fn marshal_null<W: Write>(writer: &mut W, tag: TypeTag) -> Result<()> {
    let mut buf = BytesMut::with_capacity(9);
    encode_null(&mut buf, tag)?;
    writer.write_all(&buf)?;
    Ok(())
}

pub(crate) fn encode_null<B: BufMut>(buf: &mut B, tag: TypeTag) -> Result<()> {
    match tag {
        TypeTag::Bool => {
            write_byte(buf, TypeTag::Bool.as_byte());
            write_byte(buf, NULL_BOOL);
        }
        TypeTag::Short => {
            write_byte(buf, TypeTag::Short.as_byte());
            write_short(buf, NULL_SHORT);
        }
        TypeTag::Int => {
            write_byte(buf, TypeTag::Int.as_byte());
            write_int(buf, NULL_INT);
        }
        TypeTag::Long => {
            write_byte(buf, TypeTag::Long.as_byte());
            write_long(buf, NULL_LONG);
        }
        TypeTag::Float => {
            write_byte(buf, TypeTag::Float.as_byte());
            write_float(buf, NULL_FLOAT);
        }
        TypeTag::String => {
            write_byte(buf, TypeTag::String.as_byte());
            write_int(buf, NULL_LENGTH);
        }
        TypeTag::Varbinary => {
            write_byte(buf, TypeTag::Varbinary.as_byte());
            write_int(buf, NULL_LENGTH);
        }
        TypeTag::Timestamp => {
            write_byte(buf, TypeTag::Timestamp.as_byte());
            buf.put_slice(&NULL_TIMESTAMP);
        }
        TypeTag::Array | TypeTag::Null => return Err(WireError::NoNullSentinel(tag)),
    }
    Ok(())
}
