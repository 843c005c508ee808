//! Recording backend for coordinator tests: counts calls per operation and
//! can be told to fail any of them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{BackendError, BackendResult, CacheBackend, TierHandle};

#[derive(Default)]
struct MockState {
    entries: RwLock<HashMap<String, Value>>,
    get_calls: AtomicUsize,
    set_calls: AtomicUsize,
    del_calls: AtomicUsize,
    fail_get: RwLock<Option<BackendError>>,
    fail_set: RwLock<Option<BackendError>>,
    fail_del: RwLock<Option<BackendError>>,
}

/// Test double for [`CacheBackend`]. TTLs are accepted and ignored.
///
/// Clones share state, so a test can keep one clone as a spy while a
/// [`TierHandle`] made from another goes into the coordinator.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<MockState>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tier handle backed by this mock.
    pub fn handle(&self) -> TierHandle {
        TierHandle::new("mock", Arc::new(self.clone()))
    }

    /// Number of `get` calls observed.
    pub fn get_calls(&self) -> usize {
        self.state.get_calls.load(Ordering::SeqCst)
    }

    /// Number of `set` calls observed.
    pub fn set_calls(&self) -> usize {
        self.state.set_calls.load(Ordering::SeqCst)
    }

    /// Number of `del` calls observed.
    pub fn del_calls(&self) -> usize {
        self.state.del_calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent `get` fail with `error`.
    pub fn fail_gets(&self, error: BackendError) {
        *self.state.fail_get.write().expect("lock poisoned") = Some(error);
    }

    /// Makes every subsequent `set` fail with `error`.
    pub fn fail_sets(&self, error: BackendError) {
        *self.state.fail_set.write().expect("lock poisoned") = Some(error);
    }

    /// Makes every subsequent `del` fail with `error`.
    pub fn fail_dels(&self, error: BackendError) {
        *self.state.fail_del.write().expect("lock poisoned") = Some(error);
    }

    /// Seeds an entry without touching the call counters.
    pub fn insert(&self, key: &str, value: Value) {
        self.state
            .entries
            .write()
            .expect("lock poisoned")
            .insert(key.to_string(), value);
    }

    /// Returns `true` if the key is stored, without counting a `get`.
    pub fn contains(&self, key: &str) -> bool {
        self.state
            .entries
            .read()
            .expect("lock poisoned")
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.state.entries.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.entries.read().expect("lock poisoned").is_empty()
    }
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBackend")
            .field("entries", &self.len())
            .field("get_calls", &self.get_calls())
            .field("set_calls", &self.set_calls())
            .field("del_calls", &self.del_calls())
            .finish()
    }
}

#[async_trait]
impl CacheBackend for MockBackend {
    async fn get(&self, key: &str) -> BackendResult<Option<Value>> {
        self.state.get_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.state.fail_get.read().expect("lock poisoned").clone() {
            return Err(error);
        }
        Ok(self
            .state
            .entries
            .read()
            .expect("lock poisoned")
            .get(key)
            .cloned())
    }

    async fn set(&self, key: &str, value: Value, _ttl: Option<Duration>) -> BackendResult<Value> {
        self.state.set_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.state.fail_set.read().expect("lock poisoned").clone() {
            return Err(error);
        }
        self.insert(key, value.clone());
        Ok(value)
    }

    async fn del(&self, key: &str) -> BackendResult<()> {
        self.state.del_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.state.fail_del.read().expect("lock poisoned").clone() {
            return Err(error);
        }
        self.state
            .entries
            .write()
            .expect("lock poisoned")
            .remove(key);
        Ok(())
    }
}
