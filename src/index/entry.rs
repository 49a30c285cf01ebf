//! Index entry definitions
//!
//! An entry records identity and version only. The value lives in the backend.

use super::key;

/// A single entry in the index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    /// Logical path supplied by the caller
    pub name: String,

    /// Version stamp - strictly increasing over the index lifetime
    pub version: u64,
}

impl Entry {
    /// Create a new entry
    pub fn new(name: impl Into<String>, version: u64) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// The backend key this entry's value is stored under
    pub fn physical_key(&self) -> String {
        key::encode_key(&self.name, self.version)
    }
}
