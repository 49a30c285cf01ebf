//! Value codec
//!
//! JSON text on the way into the backend, JSON text plus date revival on
//! the way out. Revival is a post-parse walk over every string leaf.

use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;

use crate::error::Result;
use crate::value::Value;

/// ISO-8601 timestamp with mandatory fractional seconds and zone
const DATE_PATTERN: &str =
    r"\d{4}-[01]\d-[0-3]\dT[0-2]\d:[0-5]\d:[0-5]\d\.\d+([+-][0-2]\d:[0-5]\d|Z)";

static DATE_REGEX: OnceLock<Regex> = OnceLock::new();

fn date_regex() -> &'static Regex {
    // The pattern is a compile-time constant
    DATE_REGEX.get_or_init(|| Regex::new(DATE_PATTERN).expect("date pattern is valid"))
}

/// Encode a value as JSON text
pub fn encode(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Decode JSON text, reviving timestamp strings into dates
pub fn decode(text: &str) -> Result<Value> {
    let raw: serde_json::Value = serde_json::from_str(text)?;
    Ok(revive(raw))
}

/// Walk a parsed JSON tree and turn timestamp strings into `Value::Date`
pub fn revive(raw: serde_json::Value) -> Value {
    match raw {
        serde_json::Value::String(s) => match revive_date(&s) {
            Some(date) => Value::Date(date),
            None => Value::String(s),
        },
        serde_json::Value::Array(items) => Value::Array(items.into_iter().map(revive).collect()),
        serde_json::Value::Object(fields) => Value::Object(
            fields.into_iter().map(|(k, v)| (k, revive(v))).collect(),
        ),
        other => other.into(),
    }
}

/// Parse `s` as a date if it contains a timestamp and is nothing but one
///
/// "2024-03-01T12:00:00.000Z" → Some(..)
/// "due 2024-03-01T12:00:00.000Z" → None
pub fn revive_date(s: &str) -> Option<DateTime<FixedOffset>> {
    if !date_regex().is_match(s) {
        return None;
    }
    DateTime::parse_from_rfc3339(s).ok()
}
