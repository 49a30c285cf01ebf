//! Tests for the value codec
//!
//! These tests verify:
//! - JSON encoding of values, including dates
//! - Date revival anywhere in the decoded tree
//! - Strings that merely mention a date stay strings
//! - Typed conversion through `Value`

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use pathkv::codec::{decode, encode, revive_date};
use pathkv::{KvError, Value};
use serde::{Deserialize, Serialize};

// =============================================================================
// Helper Functions
// =============================================================================

fn sample_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap() + chrono::Duration::milliseconds(123)
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_scalars() {
    assert_eq!(encode(&Value::from(3)).unwrap(), "3");
    assert_eq!(encode(&Value::from(true)).unwrap(), "true");
    assert_eq!(encode(&Value::from("hi")).unwrap(), "\"hi\"");
    assert_eq!(encode(&Value::Null).unwrap(), "null");
}

#[test]
fn test_encode_date_as_iso_string() {
    let encoded = encode(&Value::from(sample_date())).unwrap();
    assert_eq!(encoded, "\"2024-03-01T12:30:45.123Z\"");
}

#[test]
fn test_encode_object_sorted_fields() {
    let mut fields = BTreeMap::new();
    fields.insert("b".to_string(), Value::from(2));
    fields.insert("a".to_string(), Value::from(1));

    assert_eq!(encode(&Value::Object(fields)).unwrap(), r#"{"a":1,"b":2}"#);
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_decode_plain_json() {
    let value = decode(r#"{"name":"x","tags":["a","b"],"n":1.5}"#).unwrap();

    assert_eq!(value.get("name").and_then(Value::as_str), Some("x"));
    assert_eq!(value.get("tags").and_then(Value::as_array).map(|t| t.len()), Some(2));
    assert_eq!(value.get("n").and_then(Value::as_f64), Some(1.5));
}

#[test]
fn test_decode_revives_nested_dates() {
    let text = r#"{"meta":{"created":"2024-03-01T12:30:45.123Z"},"log":["2024-03-02T00:00:00.000+02:00"]}"#;
    let value = decode(text).unwrap();

    let created = value.get("meta").and_then(|m| m.get("created")).unwrap();
    assert_eq!(created.as_date().unwrap(), &sample_date());

    let logged = &value.get("log").and_then(Value::as_array).unwrap()[0];
    let expected: DateTime<FixedOffset> =
        DateTime::parse_from_rfc3339("2024-03-01T22:00:00.000Z").unwrap();
    assert_eq!(logged.as_date().unwrap(), &expected);
}

#[test]
fn test_decode_keeps_non_dates_as_strings() {
    let value = decode(r#"["2024-03-01", "2024-03-01T12:30:45Z", "due 2024-03-01T12:30:45.123Z"]"#)
        .unwrap();

    for item in value.as_array().unwrap() {
        assert!(item.as_str().is_some(), "{:?} should stay a string", item);
    }
}

#[test]
fn test_decode_invalid_json() {
    assert!(matches!(decode("{not json"), Err(KvError::Serialization(_))));
}

#[test]
fn test_revive_date_rejects_impossible_date() {
    // Matches the shape but is not a real instant
    assert!(revive_date("2024-02-31T12:30:45.123Z").is_none());
}

#[test]
fn test_date_roundtrip_keeps_sub_millisecond_precision() {
    let date = sample_date() + chrono::Duration::nanoseconds(456);
    let decoded = decode(&encode(&Value::from(date)).unwrap()).unwrap();

    assert_eq!(decoded.as_date().unwrap(), &date);
}

// =============================================================================
// Typed Conversion Tests
// =============================================================================

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Note {
    title: String,
    stars: u32,
    written: DateTime<Utc>,
}

#[test]
fn test_typed_roundtrip_through_codec() {
    let note = Note {
        title: "hello".to_string(),
        stars: 4,
        written: sample_date(),
    };

    let value = Value::from_serializable(&note).unwrap();
    let decoded = decode(&encode(&value).unwrap()).unwrap();

    // The timestamp field comes back as a date value...
    assert!(decoded.get("written").unwrap().as_date().is_some());
    // ...and still converts back into the typed struct
    assert_eq!(decoded.deserialize_into::<Note>().unwrap(), note);
}
