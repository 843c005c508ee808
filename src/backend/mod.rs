//! Cache backend adapters and the per-tier handle type.

pub mod error;
pub mod memory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use error::{BackendError, BackendResult};
pub use memory::MemoryBackend;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockBackend;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

/// Backend kind instantiable by name.
pub const MEMORY_KIND: &str = "memory";

/// Capability contract implemented once per concrete cache technology.
///
/// `get` signals a miss with `Ok(None)`; returning `Ok(Some(Value::Null))`
/// is also treated as a miss by the coordinator. `set` returns the stored
/// value as its non-empty success result. Deleting an absent key is not an
/// error. Timeout policy, if any, belongs to the adapter; the coordinator
/// imposes none.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Reads one key. `Ok(None)` on a miss.
    async fn get(&self, key: &str) -> BackendResult<Option<Value>>;

    /// Writes one key, with an optional expiry. No TTL means the backend's
    /// default expiry.
    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> BackendResult<Value>;

    /// Deletes one key. Succeeds whether or not the key existed.
    async fn del(&self, key: &str) -> BackendResult<()>;
}

/// Named, cheaply cloneable handle to one tier.
///
/// Clones share the underlying backend, so a handle can be injected into
/// several coordinators at once.
#[derive(Clone)]
pub struct TierHandle {
    kind: Arc<str>,
    backend: Arc<dyn CacheBackend>,
}

impl TierHandle {
    /// Wraps an existing backend under a kind name.
    pub fn new(kind: &str, backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            kind: Arc::from(kind),
            backend,
        }
    }

    /// A fresh in-process memory tier.
    pub fn memory() -> Self {
        Self::new(MEMORY_KIND, Arc::new(MemoryBackend::new()))
    }

    /// The backend kind this handle was created with.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns `true` if both handles share one backend instance.
    pub fn shares_backend(&self, other: &TierHandle) -> bool {
        Arc::ptr_eq(&self.backend, &other.backend)
    }

    pub async fn get(&self, key: &str) -> BackendResult<Option<Value>> {
        self.backend.get(key).await
    }

    pub async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> BackendResult<Value> {
        self.backend.set(key, value, ttl).await
    }

    pub async fn del(&self, key: &str) -> BackendResult<()> {
        self.backend.del(key).await
    }
}

impl std::fmt::Debug for TierHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TierHandle")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// How a coordinator obtains one tier at construction time: instantiate a
/// registered kind by name, or use a pre-built handle as-is.
#[derive(Debug, Clone)]
pub enum TierSpec {
    /// Instantiate a backend of this registered kind.
    Named(String),
    /// Use this handle as-is (dependency injection).
    Handle(TierHandle),
}

impl TierSpec {
    pub(crate) fn into_handle(self) -> BackendResult<TierHandle> {
        match self {
            TierSpec::Named(kind) => create_backend(&kind),
            TierSpec::Handle(handle) => Ok(handle),
        }
    }
}

impl From<&str> for TierSpec {
    fn from(kind: &str) -> Self {
        TierSpec::Named(kind.to_string())
    }
}

impl From<String> for TierSpec {
    fn from(kind: String) -> Self {
        TierSpec::Named(kind)
    }
}

impl From<TierHandle> for TierSpec {
    fn from(handle: TierHandle) -> Self {
        TierSpec::Handle(handle)
    }
}

/// Instantiates a backend of a registered kind.
pub fn create_backend(kind: &str) -> BackendResult<TierHandle> {
    match kind {
        MEMORY_KIND => Ok(TierHandle::memory()),
        _ => Err(BackendError::UnknownKind {
            kind: kind.to_string(),
        }),
    }
}
