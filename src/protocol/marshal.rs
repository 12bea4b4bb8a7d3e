//! Value marshalling
//!
//! Encodes parameters as `[tag (1)][payload]`:
//!
//! ```text
//! NULL       tag only
//! BOOL       1 byte (also carries i8 values)
//! SHORT      2 bytes
//! INT        4 bytes
//! LONG       8 bytes
//! FLOAT      8 bytes IEEE-754
//! STRING     len (4) + UTF-8
//! VARBINARY  len (4) + bytes
//! TIMESTAMP  8 bytes, microseconds
//! ARRAY      count (2) + count x [tag][payload], elements may be ARRAYs
//! ```
//!
//! Every call stages the full encoding in memory first, so a value that
//! cannot be encoded leaves the caller's writer untouched.

use std::io::Write;
use std::mem::{self, Discriminant};

use bytes::{Bytes, BytesMut};

use super::null::{encode_null, NULL_TIMESTAMP};
use super::primitive::{
    write_boolean, write_byte, write_float, write_int, write_long, write_short, write_string,
    write_timestamp, write_varbinary,
};
use super::{TypeTag, Value};
use crate::error::{Result, WireError};

/// Largest element or parameter count a 2-byte count can carry
pub const MAX_COUNT: usize = i16::MAX as usize;

// =============================================================================
// Public API
// =============================================================================

/// Marshal a single parameter to `writer`
pub fn marshal<W: Write>(writer: &mut W, value: &Value) -> Result<()> {
    let bytes = encode(value)?;
    tracing::trace!(tag = %value.type_tag(), len = bytes.len(), "marshalled parameter");
    writer.write_all(&bytes)?;
    Ok(())
}

/// Encode a single parameter to bytes
pub fn encode(value: &Value) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    encode_into(&mut buf, value)?;
    Ok(buf.freeze())
}

/// Marshal a parameter list: count (2) followed by each parameter
pub fn marshal_params<W: Write>(writer: &mut W, params: &[Value]) -> Result<()> {
    let bytes = encode_params(params)?;
    tracing::trace!(count = params.len(), len = bytes.len(), "marshalled parameter list");
    writer.write_all(&bytes)?;
    Ok(())
}

/// Encode a parameter list to bytes
pub fn encode_params(params: &[Value]) -> Result<Bytes> {
    let count = count_of("Parameter list", params.len())?;

    let mut buf = BytesMut::new();
    write_short(&mut buf, count);
    for param in params {
        encode_into(&mut buf, param)?;
    }
    Ok(buf.freeze())
}

// =============================================================================
// Encoding
// =============================================================================

pub(crate) fn encode_into(buf: &mut BytesMut, value: &Value) -> Result<()> {
    match value {
        Value::Null => write_byte(buf, TypeTag::Null.as_byte()),
        Value::Bool(v) => {
            write_byte(buf, TypeTag::Bool.as_byte());
            write_boolean(buf, *v);
        }
        Value::TinyInt(v) => {
            // The server reads i8 parameters under the BOOL tag.
            write_byte(buf, TypeTag::Bool.as_byte());
            write_byte(buf, *v);
        }
        Value::SmallInt(v) => {
            write_byte(buf, TypeTag::Short.as_byte());
            write_short(buf, *v);
        }
        Value::Int(v) => {
            write_byte(buf, TypeTag::Int.as_byte());
            write_int(buf, *v);
        }
        Value::BigInt(v) => {
            write_byte(buf, TypeTag::Long.as_byte());
            write_long(buf, *v);
        }
        Value::Float(v) => {
            write_byte(buf, TypeTag::Float.as_byte());
            write_float(buf, *v);
        }
        Value::String(s) => {
            write_byte(buf, TypeTag::String.as_byte());
            write_string(buf, s)?;
        }
        Value::Varbinary(bytes) => {
            write_byte(buf, TypeTag::Varbinary.as_byte());
            write_varbinary(buf, bytes)?;
        }
        Value::Timestamp(ts) => {
            if ts.as_micros().to_be_bytes() == NULL_TIMESTAMP {
                return Err(WireError::ReservedValue(TypeTag::Timestamp));
            }
            write_byte(buf, TypeTag::Timestamp.as_byte());
            write_timestamp(buf, ts.as_micros());
        }
        Value::Array(elements) => encode_array(buf, elements)?,
        Value::TypedNull(tag) => encode_null(buf, *tag)?,
    }
    Ok(())
}

fn encode_array(buf: &mut BytesMut, elements: &[Value]) -> Result<()> {
    let count = count_of("Array", elements.len())?;
    check_homogeneous(elements)?;

    write_byte(buf, TypeTag::Array.as_byte());
    write_short(buf, count);
    for element in elements {
        encode_into(buf, element)?;
    }
    Ok(())
}

/// Returns the shared element tag, `None` if there are no typed elements
///
/// Concrete elements must share a variant, so `Bool` and `TinyInt` never mix
/// even though both travel under the BOOL tag. A typed null matches any
/// element written under its tag. Nested arrays are checked when they are
/// encoded.
fn check_homogeneous(elements: &[Value]) -> Result<Option<TypeTag>> {
    let mut declared: Option<TypeTag> = None;
    let mut shape: Option<(Discriminant<Value>, &'static str)> = None;

    for element in elements {
        let tag = match element {
            Value::Null => continue,
            Value::TypedNull(tag) => *tag,
            other => {
                let this = (mem::discriminant(other), element_name(other));
                match shape {
                    None => shape = Some(this),
                    Some((expected, name)) if expected != this.0 => {
                        return Err(heterogeneous(this.1, name));
                    }
                    Some(_) => {}
                }
                other.type_tag()
            }
        };

        match declared {
            None => declared = Some(tag),
            Some(expected) if expected != tag => {
                return Err(heterogeneous(tag.name(), expected.name()));
            }
            Some(_) => {}
        }
    }

    Ok(declared)
}

fn element_name(value: &Value) -> &'static str {
    match value {
        Value::TinyInt(_) => "TINYINT",
        other => other.type_tag().name(),
    }
}

fn heterogeneous(found: &str, expected: &str) -> WireError {
    WireError::UnsupportedType(format!(
        "heterogeneous ARRAY: {} element in an ARRAY of {}",
        found, expected
    ))
}

fn count_of(what: &'static str, len: usize) -> Result<i16> {
    i16::try_from(len).map_err(|_| WireError::ValueTooLarge {
        what,
        len,
        max: MAX_COUNT,
    })
}
