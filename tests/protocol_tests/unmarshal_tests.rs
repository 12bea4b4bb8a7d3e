//! Unmarshal Tests
//!
//! Decoding parameters written by the marshaller, including sentinels.

use std::io::Cursor;

use voltwire::protocol::{encode, encode_params, unmarshal, unmarshal_params, MAX_ARRAY_DEPTH};
use voltwire::{Timestamp, TypeTag, Value, WireError};

fn round_trip(value: Value) -> Value {
    let bytes = encode(&value).unwrap();
    let mut cursor = Cursor::new(bytes.to_vec());
    let decoded = unmarshal(&mut cursor).unwrap();
    assert_eq!(cursor.position() as usize, bytes.len(), "trailing bytes for {:?}", value);
    decoded
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_scalars_round_trip() {
    let values = vec![
        Value::Null,
        Value::Bool(true),
        Value::Bool(false),
        Value::TinyInt(-7),
        Value::TinyInt(i8::MAX),
        Value::SmallInt(i16::MAX),
        Value::SmallInt(-300),
        Value::Int(i32::MAX),
        Value::Int(-1),
        Value::BigInt(123_456_789_012),
        Value::Float(3.25),
        Value::Float(-0.5),
        Value::String("hello".to_string()),
        Value::String(String::new()),
        Value::Varbinary(vec![0x00, 0xFF]),
        Value::Varbinary(Vec::new()),
        Value::Timestamp(Timestamp::from_micros(1_700_000_000_000_000)),
    ];

    for value in values {
        assert_eq!(round_trip(value.clone()), value);
    }
}

#[test]
fn test_typed_nulls_round_trip() {
    for tag in [
        TypeTag::Bool,
        TypeTag::Short,
        TypeTag::Int,
        TypeTag::Long,
        TypeTag::Float,
        TypeTag::String,
        TypeTag::Varbinary,
        TypeTag::Timestamp,
    ] {
        assert_eq!(round_trip(Value::TypedNull(tag)), Value::TypedNull(tag));
    }
}

#[test]
fn test_arrays_round_trip() {
    let value = Value::from(vec!["a", "bc"]);
    assert_eq!(round_trip(value.clone()), value);

    let value = Value::Array(vec![Value::BigInt(1), Value::TypedNull(TypeTag::Long)]);
    assert_eq!(round_trip(value.clone()), value);
}

#[test]
fn test_nested_arrays_round_trip() {
    let bytes = vec![0x9Du8, 0, 1, 0x9D, 0, 1, 5, 0, 0, 0, 1];
    let decoded = unmarshal(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(decoded, Value::Array(vec![Value::Array(vec![Value::Int(1)])]));

    let value = Value::from(vec![vec!["a"], vec![], vec!["b", "c"]]);
    assert_eq!(round_trip(value.clone()), value);
}

#[test]
fn test_tiny_int_zero_reads_as_bool() {
    assert_eq!(round_trip(Value::TinyInt(0)), Value::Bool(false));
    assert_eq!(round_trip(Value::TinyInt(1)), Value::Bool(true));
}

#[test]
fn test_params_round_trip() {
    let params = vec![Value::Int(5), Value::Null, Value::from("x")];
    let bytes = encode_params(&params).unwrap();
    let decoded = unmarshal_params(&mut Cursor::new(bytes.to_vec())).unwrap();
    assert_eq!(decoded, params);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_unknown_tag() {
    let err = unmarshal(&mut Cursor::new(vec![0x7Fu8])).unwrap_err();
    assert!(matches!(err, WireError::Protocol(_)));
}

#[test]
fn test_truncated_payload() {
    let err = unmarshal(&mut Cursor::new(vec![5u8, 0, 0])).unwrap_err();
    assert!(matches!(err, WireError::Io(_)));
}

#[test]
fn test_negative_array_count() {
    let err = unmarshal(&mut Cursor::new(vec![0x9Du8, 0xFF, 0xFF])).unwrap_err();
    assert!(err.to_string().contains("Invalid array count"));
}

#[test]
fn test_array_nesting_limit() {
    let mut bytes = Vec::new();
    for _ in 0..=MAX_ARRAY_DEPTH {
        bytes.extend_from_slice(&[0x9Du8, 0, 1]);
    }
    bytes.push(1);

    let err = unmarshal(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, WireError::Protocol(_)));
    assert!(err.to_string().contains("nested deeper"));
}
