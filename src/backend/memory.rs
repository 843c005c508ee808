//! In-process expiring store (the `"memory"` kind).
//!
//! Entries carry their requested TTL and moka's expiry policy enforces it.
//! Entries stored without a TTL never expire on their own; they only leave
//! the cache through `del` or capacity eviction.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::{Expiry, sync::Cache};
use serde_json::Value;

use super::{BackendResult, CacheBackend};

#[derive(Clone)]
struct StoredEntry {
    value: Value,
    ttl: Option<Duration>,
}

struct PerEntryTtl;

impl Expiry<String, StoredEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &StoredEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        entry.ttl
    }
}

/// In-memory cache with per-entry TTL (LRU-bounded).
pub struct MemoryBackend {
    entries: Cache<String, StoredEntry>,
}

impl MemoryBackend {
    const DEFAULT_CAPACITY: u64 = 10_000;

    /// Creates a backend with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a backend with a max entry capacity.
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.entry_count() == 0
    }

    /// Drops all entries.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Runs any pending maintenance tasks in the underlying cache.
    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> BackendResult<Option<Value>> {
        Ok(self.entries.get(key).map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> BackendResult<Value> {
        self.entries.insert(
            key.to_string(),
            StoredEntry {
                value: value.clone(),
                ttl,
            },
        );
        Ok(value)
    }

    async fn del(&self, key: &str) -> BackendResult<()> {
        self.entries.invalidate(key);
        Ok(())
    }
}
