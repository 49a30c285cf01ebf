//! In-memory backend
//!
//! BTreeMap behind a shared RwLock. Clones share the same keyspace, which
//! lets tests open a second store over the same data.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::{KvError, Result};

use super::Backend;

/// A stored value and when it was written
#[derive(Debug, Clone)]
struct StoredRecord {
    value: String,
    created: DateTime<Utc>,
}

/// Backend holding everything in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    data: Arc<RwLock<BTreeMap<String, StoredRecord>>>,
}

impl MemoryBackend {
    /// Create a new, empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held (including any the index ignores)
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Check if no keys are held
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Check whether a raw key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    /// Store a value with an explicit creation time
    pub fn write_at(&self, key: &str, value: &str, created: DateTime<Utc>) {
        self.data.write().insert(
            key.to_string(),
            StoredRecord {
                value: value.to_string(),
                created,
            },
        );
    }
}

impl Backend for MemoryBackend {
    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.write_at(key, value, Utc::now());
        Ok(())
    }

    fn read(&self, key: &str) -> Result<String> {
        self.data
            .read()
            .get(key)
            .map(|record| record.value.clone())
            .ok_or_else(|| KvError::KeyNotFound(key.to_string()))
    }

    fn read_creation_time(&self, key: &str) -> Result<DateTime<Utc>> {
        self.data
            .read()
            .get(key)
            .map(|record| record.created)
            .ok_or_else(|| KvError::KeyNotFound(key.to_string()))
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.data.write().remove(key);
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.data.read().keys().cloned().collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
