//! Index Module
//!
//! In-memory bookkeeping of which logical paths exist and at which version.
//!
//! ## Responsibilities
//! - Keep entries ordered by ascending version (= insertion order)
//! - At most one entry per name
//! - Hand out strictly increasing version stamps
//! - Rebuild from the backend's raw key listing
//! - Two-stage listing window (tail by max items, then head by limit)

mod entry;
pub mod key;

use std::collections::HashSet;

use crate::config::CorruptKeyPolicy;
use crate::error::{KvError, Result};

pub use entry::Entry;
pub use key::{decode_key, encode_key, SEPARATOR};

/// Version-ordered entries plus the version counter
#[derive(Debug, Default)]
pub struct Index {
    /// Entries, ascending by version
    entries: Vec<Entry>,

    /// Last version handed out (or recovered from the backend)
    version: u64,
}

/// Result of rebuilding an index from backend keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildStats {
    /// Number of raw keys returned by the backend
    pub keys_listed: u64,

    /// Number of entries that made it into the index
    pub entries_loaded: u64,

    /// Number of keys that did not decode
    pub corrupt_keys: u64,

    /// Number of keys hidden by a newer key for the same name
    pub shadowed_keys: u64,

    /// Highest version observed (seeds the version counter)
    pub max_version: u64,
}

impl Index {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an index from a raw key listing
    ///
    /// This will:
    /// 1. Decode every key (skipping or failing on corrupt ones per `policy`)
    /// 2. Sort by version
    /// 3. Keep only the newest key per name
    /// 4. Seed the version counter with the highest version seen
    pub fn rebuild<I, S>(keys: I, policy: CorruptKeyPolicy) -> Result<(Self, RebuildStats)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stats = RebuildStats::default();
        let mut decoded = Vec::new();

        for raw in keys {
            let raw = raw.as_ref();
            stats.keys_listed += 1;

            match decode_key(raw) {
                Ok(entry) => decoded.push(entry),
                Err(e) => match policy {
                    CorruptKeyPolicy::Skip => {
                        tracing::warn!("Skipping backend key {:?}: {}", raw, e);
                        stats.corrupt_keys += 1;
                    }
                    CorruptKeyPolicy::Fail => return Err(e),
                },
            }
        }

        decoded.sort_by_key(|entry| entry.version);
        stats.max_version = decoded.last().map(|entry| entry.version).unwrap_or(0);

        // Walk newest → oldest so the first sighting of a name wins
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(decoded.len());
        for entry in decoded.into_iter().rev() {
            if seen.insert(entry.name.clone()) {
                entries.push(entry);
            } else {
                tracing::debug!("Ignoring shadowed key {}", entry.physical_key());
                stats.shadowed_keys += 1;
            }
        }
        entries.reverse();

        stats.entries_loaded = entries.len() as u64;

        Ok((
            Self {
                entries,
                version: stats.max_version,
            },
            stats,
        ))
    }

    /// Find the most recent entry for `name`
    pub fn find(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().rev().find(|entry| entry.name == name)
    }

    /// Remove and return the entry for `name`, if any
    pub fn remove(&mut self, name: &str) -> Option<Entry> {
        let pos = self.entries.iter().rposition(|entry| entry.name == name)?;
        Some(self.entries.remove(pos))
    }

    /// Reserve the next version and build an entry for `name` with it
    ///
    /// The entry is not inserted; call `push` once its value is stored.
    /// Fails with `KvError::VersionOverflow` once the counter is exhausted.
    pub fn next_entry(&mut self, name: &str) -> Result<Entry> {
        self.version = self
            .version
            .checked_add(1)
            .ok_or(KvError::VersionOverflow(self.version))?;
        Ok(Entry::new(name, self.version))
    }

    /// Append an entry as the newest one
    ///
    /// The caller removes any existing entry with the same name first.
    pub fn push(&mut self, entry: Entry) {
        debug_assert!(self.entries.last().map_or(true, |last| last.version < entry.version));
        debug_assert!(self.find(&entry.name).is_none());
        self.version = self.version.max(entry.version);
        self.entries.push(entry);
    }

    /// Entries in ascending version order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Last version handed out
    pub fn current_version(&self) -> u64 {
        self.version
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Apply the listing window to a version-ordered sequence
///
/// Stage 1 keeps the newest `max_items` (tail). Stage 2 keeps the first
/// `limit` of what is left (head). Neither stage reorders.
pub fn window<T>(mut items: Vec<T>, max_items: usize, limit: Option<usize>) -> Vec<T> {
    if items.len() > max_items {
        items.drain(..items.len() - max_items);
    }

    if let Some(limit) = limit {
        items.truncate(limit);
    }

    items
}
