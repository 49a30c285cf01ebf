//! Physical key encoding
//!
//! ## Key Format
//! ```text
//! ┌──────────────────┬──────┬──────────────────────────┐
//! │ name (any text)  │  __  │ version (decimal, no 0…) │
//! └──────────────────┴──────┴──────────────────────────┘
//! ```
//!
//! Decoding splits on the FIRST `__`. Names that contain the separator
//! therefore do not survive a round-trip through the backend's key listing.

use crate::error::{KvError, Result};

use super::Entry;

/// Separator between the logical name and the version
pub const SEPARATOR: &str = "__";

/// Build the physical key for a name/version pair
/// ("notes/today", 42) → "notes/today__42"
pub fn encode_key(name: &str, version: u64) -> String {
    format!("{}{}{}", name, SEPARATOR, version)
}

/// Parse a physical key back into an entry
/// "notes/today__42" → Entry { name: "notes/today", version: 42 }
pub fn decode_key(key: &str) -> Result<Entry> {
    let (name, version) = key
        .split_once(SEPARATOR)
        .ok_or_else(|| KvError::CorruptKey(format!("missing separator in {:?}", key)))?;

    if name.is_empty() {
        return Err(KvError::CorruptKey(format!("empty name in {:?}", key)));
    }

    Ok(Entry::new(name, parse_version(key, version)?))
}

/// Strict decimal parse: digits only, no sign, no leading zeros
fn parse_version(key: &str, digits: &str) -> Result<u64> {
    let well_formed = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'));

    if !well_formed {
        return Err(KvError::CorruptKey(format!(
            "invalid version {:?} in {:?}",
            digits, key
        )));
    }

    digits
        .parse()
        .map_err(|_| KvError::CorruptKey(format!("version out of range in {:?}", key)))
}
