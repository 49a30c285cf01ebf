//! Backend Module
//!
//! The flat-key persistence capability the store is layered on.
//!
//! ## Responsibilities
//! - Persist opaque text under opaque keys
//! - Report a creation time per key
//! - Enumerate every key in the store's keyspace
//!
//! Backends know nothing about paths, versions or the index. The store
//! depends only on this trait, never on a concrete backend.

mod file;
mod memory;

use chrono::{DateTime, Utc};

use crate::error::Result;

pub use file::FileBackend;
pub use memory::MemoryBackend;

/// A flat-key storage medium
///
/// All methods take `&self`; implementations use interior mutability.
pub trait Backend {
    /// Store `value` under `key`, replacing anything already there
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Read the value stored under `key`
    ///
    /// A missing key is an error (`KvError::KeyNotFound`), not `None`.
    fn read(&self, key: &str) -> Result<String>;

    /// When `key` was written
    fn read_creation_time(&self, key: &str) -> Result<DateTime<Utc>>;

    /// Remove `key`. Removing a missing key succeeds.
    fn delete(&self, key: &str) -> Result<()>;

    /// Every key currently held, in no particular order
    fn list_keys(&self) -> Result<Vec<String>>;

    /// A human-readable name for this backend, used in logging
    fn name(&self) -> &str;
}

impl<B: Backend + ?Sized> Backend for &B {
    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }

    fn read(&self, key: &str) -> Result<String> {
        (**self).read(key)
    }

    fn read_creation_time(&self, key: &str) -> Result<DateTime<Utc>> {
        (**self).read_creation_time(key)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        (**self).list_keys()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }

    fn read(&self, key: &str) -> Result<String> {
        (**self).read(key)
    }

    fn read_creation_time(&self, key: &str) -> Result<DateTime<Utc>> {
        (**self).read_creation_time(key)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        (**self).list_keys()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
