//! # pathkv
//!
//! A path-addressed key-value store layered over any flat-key backend:
//! - Last-write-wins saves with strictly increasing version stamps
//! - Index lazily rebuilt from the backend's key listing
//! - Listing with a regex filter and an oldest-evicted window
//! - Dates survive the round-trip through JSON
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       IndexedStore                           │
//! │            save / get / get_list / remove                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Index    │          │    Codec    │
//!   │  (Mutex)    │          │ JSON + date │
//!   └──────┬──────┘          └──────┬──────┘
//!          │  name__version         │  text
//!          └────────────┬───────────┘
//!                       ▼
//!               ┌───────────────┐
//!               │    Backend    │
//!               │ memory / file │
//!               └───────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pathkv::{IndexedStore, MemoryBackend};
//!
//! let store = IndexedStore::new(MemoryBackend::new(), 10);
//! assert!(store.save("greeting", "hello").unwrap());
//! assert_eq!(store.get("greeting").unwrap().as_str(), Some("hello"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod index;
pub mod value;
pub mod codec;
pub mod backend;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::{Config, CorruptKeyPolicy};
pub use backend::{Backend, FileBackend, MemoryBackend};
pub use index::{Entry, RebuildStats};
pub use store::{IndexedStore, StorageItem};
pub use value::Value;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of pathkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
