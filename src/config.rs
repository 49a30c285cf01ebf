//! Configuration for pathkv
//!
//! Centralized configuration with sensible defaults.

use crate::error::{KvError, Result};

/// Main configuration for an `IndexedStore` instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Listing Configuration
    // -------------------------------------------------------------------------
    /// Maximum number of entries returned by `get_list`.
    /// Older entries beyond this window are not listed (they stay readable by path).
    pub max_items: usize,

    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// What to do with backend keys that do not decode as `<name>__<version>`
    pub corrupt_keys: CorruptKeyPolicy,
}

/// Handling of undecodable physical keys during index construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorruptKeyPolicy {
    /// Log a warning and leave the key out of the index
    Skip,

    /// Abort index construction with `KvError::CorruptKey`
    Fail,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_items: 100,
            corrupt_keys: CorruptKeyPolicy::Skip,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Config with the given listing window and defaults for everything else
    pub fn with_max_items(max_items: usize) -> Self {
        Self {
            max_items,
            ..Self::default()
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the maximum number of listed entries
    pub fn max_items(mut self, count: usize) -> Self {
        self.config.max_items = count;
        self
    }

    /// Set the policy for undecodable backend keys
    pub fn corrupt_keys(mut self, policy: CorruptKeyPolicy) -> Self {
        self.config.corrupt_keys = policy;
        self
    }

    /// Validate and return the config
    pub fn build(self) -> Result<Config> {
        if self.config.max_items == 0 {
            return Err(KvError::Config("max_items must be at least 1".to_string()));
        }
        Ok(self.config)
    }
}
