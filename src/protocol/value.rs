//! Parameter values
//!
//! Everything a caller can bind as a procedure parameter, as a closed set
//! of shapes. Conversions from plain Rust types pick the matching shape;
//! `None` of a typed `Option` becomes a null of that type.

use chrono::{DateTime, Utc};

use super::TypeTag;

const MICROS_PER_SECOND: i64 = 1_000_000;

/// Point in time as signed microseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    pub const fn as_micros(&self) -> i64 {
        self.0
    }

    /// Round to the nearest microsecond
    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        let secs = dt.timestamp();
        let nanos = i64::from(dt.timestamp_subsec_nanos());
        Self(secs * MICROS_PER_SECOND + (nanos + 500) / 1000)
    }

    /// `None` when the instant is outside chrono's range
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let secs = self.0.div_euclid(MICROS_PER_SECOND);
        let nanos = (self.0.rem_euclid(MICROS_PER_SECOND) * 1000) as u32;
        DateTime::from_timestamp(secs, nanos)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(&dt)
    }
}

/// A single parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Untyped absence of a value
    Null,

    Bool(bool),

    /// Shares the BOOL tag on the wire
    TinyInt(i8),

    SmallInt(i16),

    Int(i32),

    BigInt(i64),

    Float(f64),

    String(String),

    /// Raw bytes, never encoded as an array of single bytes
    Varbinary(Vec<u8>),

    Timestamp(Timestamp),

    /// Homogeneous sequence; every element carries its own tag on the wire
    Array(Vec<Value>),

    /// "No value" for a column declared as the given type
    TypedNull(TypeTag),
}

impl Value {
    /// Tag this value is written under
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Null => TypeTag::Null,
            Value::Bool(_) | Value::TinyInt(_) => TypeTag::Bool,
            Value::SmallInt(_) => TypeTag::Short,
            Value::Int(_) => TypeTag::Int,
            Value::BigInt(_) => TypeTag::Long,
            Value::Float(_) => TypeTag::Float,
            Value::String(_) => TypeTag::String,
            Value::Varbinary(_) => TypeTag::Varbinary,
            Value::Timestamp(_) => TypeTag::Timestamp,
            Value::Array(_) => TypeTag::Array,
            Value::TypedNull(tag) => *tag,
        }
    }

    /// True for both untyped and typed nulls
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null | Value::TypedNull(_))
    }

    /// Typed null for `T`
    pub fn null_of<T: WireType>() -> Self {
        Value::TypedNull(T::TAG)
    }
}

/// A Rust type with a fixed wire type tag
pub trait WireType: Into<Value> {
    const TAG: TypeTag;
}

macro_rules! wire_type {
    ($ty:ty, $tag:expr, $variant:ident) => {
        impl WireType for $ty {
            const TAG: TypeTag = $tag;
        }

        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v.into())
            }
        }
    };
}

wire_type!(bool, TypeTag::Bool, Bool);
wire_type!(i8, TypeTag::Bool, TinyInt);
wire_type!(i16, TypeTag::Short, SmallInt);
wire_type!(i32, TypeTag::Int, Int);
wire_type!(i64, TypeTag::Long, BigInt);
wire_type!(f64, TypeTag::Float, Float);
wire_type!(String, TypeTag::String, String);
wire_type!(Vec<u8>, TypeTag::Varbinary, Varbinary);
wire_type!(Timestamp, TypeTag::Timestamp, Timestamp);
wire_type!(DateTime<Utc>, TypeTag::Timestamp, Timestamp);

impl<'a> WireType for &'a str {
    const TAG: TypeTag = TypeTag::String;
}

impl<'a> From<&'a str> for Value {
    fn from(v: &'a str) -> Self {
        Value::String(v.to_string())
    }
}

impl<'a> WireType for &'a [u8] {
    const TAG: TypeTag = TypeTag::Varbinary;
}

impl<'a> From<&'a [u8]> for Value {
    fn from(v: &'a [u8]) -> Self {
        Value::Varbinary(v.to_vec())
    }
}

impl<T: WireType> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::TypedNull(T::TAG),
        }
    }
}

impl<T: WireType> WireType for Option<T> {
    const TAG: TypeTag = T::TAG;
}

impl<T: WireType> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

/// `Vec<Vec<T>>` nests arrays. `Vec<u8>` stays VARBINARY.
impl<T: WireType> WireType for Vec<T> {
    const TAG: TypeTag = TypeTag::Array;
}
