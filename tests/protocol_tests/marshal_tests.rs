//! Marshal Tests
//!
//! Wire layout of every parameter shape, array framing, and usage faults.

use std::io::{self, Write};

use voltwire::protocol::{encode, encode_params, marshal, marshal_params, MAX_COUNT};
use voltwire::{Timestamp, TypeTag, Value, WireError};

const ARRAY: u8 = 0x9D; // -99
const NULL: u8 = 1;
const BOOL: u8 = 3;
const SHORT: u8 = 4;
const INT: u8 = 5;
const LONG: u8 = 6;
const FLOAT: u8 = 8;
const STRING: u8 = 9;
const TIMESTAMP: u8 = 11;
const VARBINARY: u8 = 25;

fn encoded(value: impl Into<Value>) -> Vec<u8> {
    encode(&value.into()).unwrap().to_vec()
}

/// Writer that fails every write
struct BrokenWriter;

impl Write for BrokenWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// Scalar Layout Tests
// =============================================================================

#[test]
fn test_nil_is_single_tag_byte() {
    assert_eq!(encoded(Value::Null), vec![NULL]);
}

#[test]
fn test_bool() {
    assert_eq!(encoded(true), vec![BOOL, 0x01]);
    assert_eq!(encoded(false), vec![BOOL, 0x00]);
}

#[test]
fn test_tiny_int_uses_bool_tag() {
    assert_eq!(encoded(-2i8), vec![BOOL, 0xFE]);
    assert_eq!(encoded(127i8), vec![BOOL, 0x7F]);
}

#[test]
fn test_short() {
    assert_eq!(encoded(0x0102i16), vec![SHORT, 0x01, 0x02]);
    assert_eq!(encoded(-1i16), vec![SHORT, 0xFF, 0xFF]);
}

#[test]
fn test_int() {
    assert_eq!(encoded(1i32), vec![INT, 0, 0, 0, 1]);
    assert_eq!(encoded(-2i32), vec![INT, 0xFF, 0xFF, 0xFF, 0xFE]);
}

#[test]
fn test_long() {
    assert_eq!(
        encoded(0x0102030405060708i64),
        vec![LONG, 1, 2, 3, 4, 5, 6, 7, 8]
    );
}

#[test]
fn test_float() {
    let mut expected = vec![FLOAT];
    expected.extend_from_slice(&1.5f64.to_be_bytes());
    assert_eq!(encoded(1.5f64), expected);
    assert_eq!(&encoded(1.5f64)[1..], &[0x3F, 0xF8, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_string() {
    assert_eq!(encoded("hi"), vec![STRING, 0, 0, 0, 2, b'h', b'i']);
}

#[test]
fn test_empty_string_has_zero_length() {
    assert_eq!(encoded(""), vec![STRING, 0, 0, 0, 0]);
}

#[test]
fn test_utf8_string_length_counts_bytes() {
    let bytes = encoded("é");
    assert_eq!(&bytes[..5], &[STRING, 0, 0, 0, 2]);
    assert_eq!(&bytes[5..], "é".as_bytes());
}

#[test]
fn test_varbinary() {
    assert_eq!(encoded(vec![1u8, 2, 3]), vec![VARBINARY, 0, 0, 0, 3, 1, 2, 3]);
}

#[test]
fn test_empty_varbinary() {
    assert_eq!(encoded(Vec::<u8>::new()), vec![VARBINARY, 0, 0, 0, 0]);
}

#[test]
fn test_timestamp_micros() {
    let ts = Timestamp::from_micros(1_000_000);
    assert_eq!(encoded(ts), vec![TIMESTAMP, 0, 0, 0, 0, 0, 0x0F, 0x42, 0x40]);
}

#[test]
fn test_negative_timestamp() {
    let ts = Timestamp::from_micros(-1);
    assert_eq!(encoded(ts), vec![TIMESTAMP, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
}

#[test]
fn test_option_some_is_transparent() {
    assert_eq!(encoded(Some(1i32)), encoded(1i32));
    assert_eq!(encoded(Some("x")), encoded("x"));
}

#[test]
fn test_option_none_is_typed_null() {
    assert_eq!(encoded(None::<i32>), vec![INT, 0x80, 0, 0, 0]);
    assert_eq!(encoded(None::<String>), vec![STRING, 0xFF, 0xFF, 0xFF, 0xFF]);
}

// =============================================================================
// Array Tests
// =============================================================================

#[test]
fn test_int_array_tags_each_element() {
    assert_eq!(
        encoded(vec![1i32, 2]),
        vec![ARRAY, 0, 2, INT, 0, 0, 0, 1, INT, 0, 0, 0, 2]
    );
}

#[test]
fn test_string_array() {
    assert_eq!(
        encoded(vec!["a", ""]),
        vec![ARRAY, 0, 2, STRING, 0, 0, 0, 1, b'a', STRING, 0, 0, 0, 0]
    );
}

#[test]
fn test_empty_array() {
    assert_eq!(encoded(Vec::<i64>::new()), vec![ARRAY, 0, 0]);
}

#[test]
fn test_tiny_int_array_is_not_varbinary() {
    assert_eq!(encoded(vec![1i8, -1]), vec![ARRAY, 0, 2, BOOL, 0x01, BOOL, 0xFF]);
}

#[test]
fn test_array_of_varbinary() {
    assert_eq!(
        encoded(vec![vec![7u8], vec![]]),
        vec![ARRAY, 0, 2, VARBINARY, 0, 0, 0, 1, 7, VARBINARY, 0, 0, 0, 0]
    );
}

#[test]
fn test_array_with_nulls() {
    let value = Value::Array(vec![Value::Int(3), Value::TypedNull(TypeTag::Int), Value::Null]);
    assert_eq!(
        encoded(value),
        vec![ARRAY, 0, 3, INT, 0, 0, 0, 3, INT, 0x80, 0, 0, 0, NULL]
    );
}

#[test]
fn test_array_at_count_limit() {
    let value = Value::Array(vec![Value::Null; MAX_COUNT]);
    let bytes = encoded(value);
    assert_eq!(&bytes[..3], &[ARRAY, 0x7F, 0xFF]);
    assert_eq!(bytes.len(), 3 + MAX_COUNT);
}

#[test]
fn test_nested_int_array() {
    let value = Value::Array(vec![Value::Array(vec![Value::Int(1)])]);
    assert_eq!(
        encoded(value),
        vec![ARRAY, 0, 1, ARRAY, 0, 1, INT, 0, 0, 0, 1]
    );
}

#[test]
fn test_nested_arrays_of_different_lengths() {
    assert_eq!(
        encoded(vec![vec![1i16, 2], vec![]]),
        vec![ARRAY, 0, 2, ARRAY, 0, 2, SHORT, 0, 1, SHORT, 0, 2, ARRAY, 0, 0]
    );
}

#[test]
fn test_array_of_optional_ints() {
    assert_eq!(
        encoded(vec![Some(7i32), None]),
        vec![ARRAY, 0, 2, INT, 0, 0, 0, 7, INT, 0x80, 0, 0, 0]
    );
}

// =============================================================================
// Parameter List Tests
// =============================================================================

#[test]
fn test_params_prefixed_with_count() {
    let params = vec![Value::from(1i32), Value::from("a"), Value::Null];
    let bytes = encode_params(&params).unwrap();
    assert_eq!(
        &bytes[..],
        &[0, 3, INT, 0, 0, 0, 1, STRING, 0, 0, 0, 1, b'a', NULL]
    );
}

#[test]
fn test_empty_params() {
    assert_eq!(&encode_params(&[]).unwrap()[..], &[0, 0]);
}

#[test]
fn test_marshal_params_to_writer() {
    let mut out: Vec<u8> = Vec::new();
    marshal_params(&mut out, &[Value::Bool(true)]).unwrap();
    assert_eq!(out, vec![0, 1, BOOL, 1]);
}

#[test]
fn test_marshal_appends_in_order() {
    let mut out: Vec<u8> = Vec::new();
    marshal(&mut out, &Value::from(1i16)).unwrap();
    marshal(&mut out, &Value::Null).unwrap();
    assert_eq!(out, vec![SHORT, 0, 1, NULL]);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_heterogeneous_array_with_nested_array_is_usage_fault() {
    let value = Value::Array(vec![Value::Array(vec![Value::Int(1)]), Value::Int(2)]);
    let mut out: Vec<u8> = Vec::new();
    let err = marshal(&mut out, &value).unwrap_err();

    assert!(matches!(err, WireError::UnsupportedType(_)));
    assert!(err.is_usage_fault());
    assert!(!err.is_retryable());
    assert!(out.is_empty());
}

#[test]
fn test_bool_and_tiny_int_do_not_mix() {
    let value = Value::Array(vec![Value::Bool(true), Value::TinyInt(5)]);
    let err = encode(&value).unwrap_err();
    assert!(matches!(err, WireError::UnsupportedType(_)));
}

#[test]
fn test_inner_array_checked_on_its_own() {
    let value = Value::Array(vec![Value::Array(vec![Value::Int(1), Value::BigInt(2)])]);
    assert!(matches!(encode(&value), Err(WireError::UnsupportedType(_))));
}

#[test]
fn test_timestamp_equal_to_sentinel_is_usage_fault() {
    let value = Value::Timestamp(Timestamp::from_micros(i64::MIN));
    let mut out: Vec<u8> = Vec::new();
    let err = marshal(&mut out, &value).unwrap_err();

    assert!(matches!(err, WireError::ReservedValue(TypeTag::Timestamp)));
    assert!(err.is_usage_fault());
    assert!(out.is_empty());

    let nested = Value::from(vec![Timestamp::from_micros(0), Timestamp::from_micros(i64::MIN)]);
    assert!(matches!(encode(&nested), Err(WireError::ReservedValue(_))));
}

#[test]
fn test_timestamp_just_above_sentinel() {
    let ts = Timestamp::from_micros(i64::MIN + 1);
    assert_eq!(encoded(ts), vec![TIMESTAMP, 0x80, 0, 0, 0, 0, 0, 0, 1]);
}

#[test]
fn test_heterogeneous_array_is_usage_fault() {
    let value = Value::Array(vec![Value::Int(1), Value::String("x".to_string())]);
    let err = encode(&value).unwrap_err();
    assert!(matches!(err, WireError::UnsupportedType(_)));
    assert!(err.to_string().contains("heterogeneous"));
}

#[test]
fn test_mismatched_typed_null_in_array() {
    let value = Value::Array(vec![Value::Int(1), Value::TypedNull(TypeTag::Long)]);
    assert!(matches!(encode(&value), Err(WireError::UnsupportedType(_))));
}

#[test]
fn test_array_over_count_limit() {
    let value = Value::Array(vec![Value::Null; MAX_COUNT + 1]);
    let err = encode(&value).unwrap_err();
    assert!(matches!(err, WireError::ValueTooLarge { .. }));
    assert!(err.is_usage_fault());
}

#[test]
fn test_failed_param_list_writes_nothing() {
    let params = vec![
        Value::Int(1),
        Value::String("ok".to_string()),
        Value::TypedNull(TypeTag::Array),
    ];
    let mut out: Vec<u8> = Vec::new();
    let err = marshal_params(&mut out, &params).unwrap_err();

    assert!(matches!(err, WireError::NoNullSentinel(TypeTag::Array)));
    assert!(out.is_empty());
}

#[test]
fn test_writer_failure_is_io_error() {
    let err = marshal(&mut BrokenWriter, &Value::Int(1)).unwrap_err();
    assert!(matches!(err, WireError::Io(_)));
    assert!(err.is_retryable());
    assert!(!err.is_usage_fault());
}
