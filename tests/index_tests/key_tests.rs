//! Tests for physical key encoding
//!
//! These tests verify:
//! - `<name>__<version>` encoding
//! - Decoding splits on the first separator
//! - Malformed keys are rejected as corrupt

use pathkv::index::{decode_key, encode_key, Entry, SEPARATOR};
use pathkv::KvError;

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_key_format() {
    assert_eq!(encode_key("notes/today", 42), "notes/today__42");
    assert_eq!(SEPARATOR, "__");
}

#[test]
fn test_entry_physical_key() {
    let entry = Entry::new("a", 7);
    assert_eq!(entry.physical_key(), "a__7");
}

#[test]
fn test_decode_reverses_encode() {
    let entry = decode_key(&encode_key("reports/2024/q1", 1234)).unwrap();
    assert_eq!(entry, Entry::new("reports/2024/q1", 1234));
}

#[test]
fn test_names_with_single_underscores_survive() {
    let entry = decode_key(&encode_key("my_file_name", 3)).unwrap();
    assert_eq!(entry.name, "my_file_name");
    assert_eq!(entry.version, 3);
}

// =============================================================================
// Corrupt Key Tests
// =============================================================================

#[test]
fn test_decode_missing_separator() {
    assert!(matches!(decode_key("plainkey"), Err(KvError::CorruptKey(_))));
}

#[test]
fn test_decode_empty_name() {
    assert!(matches!(decode_key("__5"), Err(KvError::CorruptKey(_))));
}

#[test]
fn test_decode_non_numeric_version() {
    assert!(matches!(decode_key("a__b"), Err(KvError::CorruptKey(_))));
    assert!(matches!(decode_key("a__"), Err(KvError::CorruptKey(_))));
}

#[test]
fn test_decode_leading_zero_version() {
    assert!(matches!(decode_key("a__007"), Err(KvError::CorruptKey(_))));
}

#[test]
fn test_name_containing_separator_does_not_roundtrip() {
    // Splitting on the first separator leaves "b__3" as the version
    let key = encode_key("a__b", 3);
    assert!(matches!(decode_key(&key), Err(KvError::CorruptKey(_))));
}

#[test]
fn test_decode_version_overflow() {
    assert!(matches!(
        decode_key("a__99999999999999999999999"),
        Err(KvError::CorruptKey(_))
    ));
}
