//! Value unmarshalling
//!
//! Reads one `[tag][payload]` unit back into a [`Value`]. Sentinel payloads
//! come back as [`Value::TypedNull`].
//!
//! i8 values travel under the BOOL tag, so a BOOL payload of 0 or 1 reads
//! as a boolean and anything else other than the sentinel as an i8.
//!
//! Arrays may nest; decoding gives up past [`MAX_ARRAY_DEPTH`] levels.

use std::io::Read;

use super::null::{NULL_BOOL, NULL_FLOAT, NULL_INT, NULL_LONG, NULL_SHORT, NULL_TIMESTAMP};
use super::primitive::{
    read_byte, read_float, read_int, read_long, read_nullable_string, read_nullable_varbinary,
    read_short, read_timestamp,
};
use super::{Timestamp, TypeTag, Value};
use crate::error::{Result, WireError};

/// Deepest array nesting accepted from the wire
pub const MAX_ARRAY_DEPTH: usize = 32;

/// Read a single parameter from `reader`
pub fn unmarshal<R: Read>(reader: &mut R) -> Result<Value> {
    let tag = TypeTag::from_byte(read_byte(reader)?)?;
    unmarshal_payload(reader, tag, 0)
}

/// Read a parameter list written by `marshal_params`
pub fn unmarshal_params<R: Read>(reader: &mut R) -> Result<Vec<Value>> {
    let count = read_short(reader)?;
    if count < 0 {
        return Err(WireError::Protocol(format!("Invalid parameter count: {}", count)));
    }

    (0..count).map(|_| unmarshal(reader)).collect()
}

fn unmarshal_payload<R: Read>(reader: &mut R, tag: TypeTag, depth: usize) -> Result<Value> {
    let value = match tag {
        TypeTag::Null => Value::Null,
        TypeTag::Bool => match read_byte(reader)? {
            NULL_BOOL => Value::TypedNull(TypeTag::Bool),
            0 => Value::Bool(false),
            1 => Value::Bool(true),
            v => Value::TinyInt(v),
        },
        TypeTag::Short => match read_short(reader)? {
            NULL_SHORT => Value::TypedNull(TypeTag::Short),
            v => Value::SmallInt(v),
        },
        TypeTag::Int => match read_int(reader)? {
            NULL_INT => Value::TypedNull(TypeTag::Int),
            v => Value::Int(v),
        },
        TypeTag::Long => match read_long(reader)? {
            NULL_LONG => Value::TypedNull(TypeTag::Long),
            v => Value::BigInt(v),
        },
        TypeTag::Float => {
            let v = read_float(reader)?;
            if v == NULL_FLOAT {
                Value::TypedNull(TypeTag::Float)
            } else {
                Value::Float(v)
            }
        }
        TypeTag::String => match read_nullable_string(reader)? {
            Some(s) => Value::String(s),
            None => Value::TypedNull(TypeTag::String),
        },
        TypeTag::Varbinary => match read_nullable_varbinary(reader)? {
            Some(bytes) => Value::Varbinary(bytes),
            None => Value::TypedNull(TypeTag::Varbinary),
        },
        TypeTag::Timestamp => {
            let micros = read_timestamp(reader)?;
            if micros.to_be_bytes() == NULL_TIMESTAMP {
                Value::TypedNull(TypeTag::Timestamp)
            } else {
                Value::Timestamp(Timestamp::from_micros(micros))
            }
        }
        TypeTag::Array => {
            if depth >= MAX_ARRAY_DEPTH {
                return Err(WireError::Protocol(format!(
                    "ARRAY nested deeper than {} levels",
                    MAX_ARRAY_DEPTH
                )));
            }
            let count = read_short(reader)?;
            if count < 0 {
                return Err(WireError::Protocol(format!("Invalid array count: {}", count)));
            }

            let mut elements = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let element_tag = TypeTag::from_byte(read_byte(reader)?)?;
                elements.push(unmarshal_payload(reader, element_tag, depth + 1)?);
            }
            Value::Array(elements)
        }
    };
    Ok(value)
}
