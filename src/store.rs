//! Store Module
//!
//! The indexed key-value store that coordinates index and backend.
//!
//! ## Responsibilities
//! - Materialize the index from the backend on first use (once)
//! - Translate logical paths to physical keys
//! - Last-write-wins saves with fresh versions
//! - Windowed, pattern-filtered listing

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use regex::Regex;
use serde::Serialize;

use crate::backend::Backend;
use crate::codec;
use crate::config::Config;
use crate::error::Result;
use crate::index::{self, Entry, Index, RebuildStats};
use crate::value::Value;

/// One result row of `get_list`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageItem {
    /// When the backend recorded the current value
    pub created: DateTime<Utc>,

    /// Logical path
    pub path: String,

    /// Decoded value
    pub value: Value,
}

/// Index plus the stats of the build that produced it
#[derive(Debug)]
struct IndexState {
    index: Index,
    stats: RebuildStats,
}

/// Path-addressed store layered over a flat-key backend
///
/// ## Concurrency Model
///
/// Every public operation holds `index` for its whole duration, so
/// operations on one instance never interleave. Nothing protects the
/// backend from a second instance or from outside writers; the index is
/// built once and never refreshed, so outside changes go unnoticed.
///
/// ## Failure Model
///
/// - `save` / `get_list`: backend and encoding failures are returned
/// - `get`: any failure reads as `None`
/// - `remove`: any failure is logged and ignored
pub struct IndexedStore<B: Backend> {
    /// Store configuration
    config: Config,

    /// Byte-level persistence
    backend: B,

    /// Lazily built index (None until first use)
    index: Mutex<Option<IndexState>>,
}

impl<B: Backend> IndexedStore<B> {
    /// Create a store over `backend` listing at most `max_items` entries
    pub fn new(backend: B, max_items: usize) -> Self {
        Self::with_config(backend, Config::with_max_items(max_items))
    }

    /// Create a store with a full config
    ///
    /// Nothing is read from the backend until the first operation.
    pub fn with_config(backend: B, config: Config) -> Self {
        Self {
            config,
            backend,
            index: Mutex::new(None),
        }
    }

    /// Save `value` under `path`, replacing any previous value
    ///
    /// Steps:
    /// 1. Reject empty paths and falsy values (`Ok(false)`)
    /// 2. Reserve the next version (fails once versions are exhausted)
    /// 3. Drop the previous entry for `path`, delete its key, write the value
    /// 4. Append the new entry as the newest
    pub fn save(&self, path: &str, value: impl Into<Value>) -> Result<bool> {
        let value = value.into();
        if path.is_empty() || value.is_falsy() {
            tracing::debug!("Rejected save of {:?}", path);
            return Ok(false);
        }
        let text = codec::encode(&value)?;

        let mut slot = self.index.lock();
        let state = self.materialize(&mut slot)?;

        let entry = state.index.next_entry(path)?;

        // A failed delete leaves a stale key behind; the index forgets it anyway
        if let Some(prior) = state.index.remove(path) {
            let key = prior.physical_key();
            if let Err(e) = self.backend.delete(&key) {
                tracing::warn!("Failed to delete replaced key {}: {}", key, e);
            }
        }

        let key = entry.physical_key();
        self.backend.write(&key, &text)?;
        state.index.push(entry);

        tracing::debug!("Saved {}", key);
        Ok(true)
    }

    /// Get the current value for `path`
    ///
    /// Returns `None` when the path is absent AND when anything fails
    /// along the way (index build, backend read, decoding).
    pub fn get(&self, path: &str) -> Option<Value> {
        match self.lookup(path) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("Get {:?} failed: {}", path, e);
                None
            }
        }
    }

    /// List stored items in ascending version order
    ///
    /// 1. Keep entries whose name matches `pattern` (unanchored regex)
    /// 2. Keep the newest `max_items` of those
    /// 3. Keep the first `limit` of what remains
    pub fn get_list(&self, pattern: Option<&str>, limit: Option<usize>) -> Result<Vec<StorageItem>> {
        let regex = pattern.map(Regex::new).transpose()?;

        let mut slot = self.index.lock();
        let state = self.materialize(&mut slot)?;

        let matching: Vec<&Entry> = state
            .index
            .entries()
            .iter()
            .filter(|entry| regex.as_ref().map_or(true, |re| re.is_match(&entry.name)))
            .collect();

        index::window(matching, self.config.max_items, limit)
            .into_iter()
            .map(|entry| self.load_item(entry))
            .collect()
    }

    /// Remove `path` and its stored value
    ///
    /// Missing paths are a no-op. Failures are logged, never returned.
    pub fn remove(&self, path: &str) {
        let mut slot = self.index.lock();

        let result = self.materialize(&mut slot).and_then(|state| {
            let Some(entry) = state.index.find(path) else {
                return Ok(());
            };
            let key = entry.physical_key();
            self.backend.delete(&key)?;
            state.index.remove(path);
            tracing::debug!("Removed {}", key);
            Ok(())
        });

        if let Err(e) = result {
            tracing::warn!("Remove {:?} failed: {}", path, e);
        }
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Number of live paths
    pub fn len(&self) -> Result<usize> {
        let mut slot = self.index.lock();
        Ok(self.materialize(&mut slot)?.index.len())
    }

    /// Check if no paths are stored
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Check whether `path` currently has a value
    pub fn contains(&self, path: &str) -> Result<bool> {
        let mut slot = self.index.lock();
        Ok(self.materialize(&mut slot)?.index.find(path).is_some())
    }

    /// All live paths, oldest version first (ignores the listing window)
    pub fn paths(&self) -> Result<Vec<String>> {
        let mut slot = self.index.lock();
        let state = self.materialize(&mut slot)?;
        Ok(state
            .index
            .entries()
            .iter()
            .map(|entry| entry.name.clone())
            .collect())
    }

    /// Stats of the index build, `None` before the first operation
    pub fn rebuild_stats(&self) -> Option<RebuildStats> {
        self.index.lock().as_ref().map(|state| state.stats)
    }

    /// Last version handed out, `None` before the first operation
    pub fn current_version(&self) -> Option<u64> {
        self.index
            .lock()
            .as_ref()
            .map(|state| state.index.current_version())
    }

    /// Maximum number of listed entries
    pub fn max_items(&self) -> usize {
        self.config.max_items
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consume the store and return its backend
    pub fn into_backend(self) -> B {
        self.backend
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Build the index on first use and hand out the live state
    fn materialize<'a>(&self, slot: &'a mut Option<IndexState>) -> Result<&'a mut IndexState> {
        let state = match slot.take() {
            Some(state) => state,
            None => self.build_index()?,
        };
        Ok(slot.insert(state))
    }

    /// List the backend and rebuild the index from its keys
    fn build_index(&self) -> Result<IndexState> {
        let keys = self.backend.list_keys()?;
        let (index, stats) = Index::rebuild(keys, self.config.corrupt_keys)?;

        tracing::info!(
            "Index built from {} backend: {} entries, {} corrupt, {} shadowed, version={}",
            self.backend.name(),
            stats.entries_loaded,
            stats.corrupt_keys,
            stats.shadowed_keys,
            stats.max_version
        );

        Ok(IndexState { index, stats })
    }

    /// Get without swallowing errors
    fn lookup(&self, path: &str) -> Result<Option<Value>> {
        let mut slot = self.index.lock();
        let state = self.materialize(&mut slot)?;

        let Some(entry) = state.index.find(path) else {
            return Ok(None);
        };

        let text = self.backend.read(&entry.physical_key())?;
        Ok(Some(codec::decode(&text)?))
    }

    /// Resolve an entry into a listing row
    fn load_item(&self, entry: &Entry) -> Result<StorageItem> {
        let key = entry.physical_key();
        let created = self.backend.read_creation_time(&key)?;
        let text = self.backend.read(&key)?;

        Ok(StorageItem {
            created,
            path: entry.name.clone(),
            value: codec::decode(&text)?,
        })
    }
}
