//! Type tag registry
//!
//! One signed byte in front of every encoded value says how to read the
//! payload that follows.

use std::fmt;

use crate::error::{Result, WireError};

/// Wire type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum TypeTag {
    Array = -99,
    Null = 1,
    Bool = 3,
    Short = 4,
    Int = 5,
    Long = 6,
    Float = 8,
    String = 9,
    Timestamp = 11,
    Varbinary = 25,
}

impl TypeTag {
    /// Every tag known to the registry
    pub const ALL: [TypeTag; 10] = [
        TypeTag::Array,
        TypeTag::Null,
        TypeTag::Bool,
        TypeTag::Short,
        TypeTag::Int,
        TypeTag::Long,
        TypeTag::Float,
        TypeTag::String,
        TypeTag::Timestamp,
        TypeTag::Varbinary,
    ];

    /// The tag as written on the wire
    pub fn as_byte(self) -> i8 {
        self as i8
    }

    /// Look up a tag by its wire byte
    pub fn from_byte(byte: i8) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_byte() == byte)
            .ok_or_else(|| WireError::Protocol(format!("Unknown type tag: {}", byte)))
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Array => "ARRAY",
            TypeTag::Null => "NULL",
            TypeTag::Bool => "BOOL",
            TypeTag::Short => "SHORT",
            TypeTag::Int => "INT",
            TypeTag::Long => "LONG",
            TypeTag::Float => "FLOAT",
            TypeTag::String => "STRING",
            TypeTag::Timestamp => "TIMESTAMP",
            TypeTag::Varbinary => "VARBINARY",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i8> for TypeTag {
    type Error = WireError;

    fn try_from(byte: i8) -> Result<Self> {
        Self::from_byte(byte)
    }
}
