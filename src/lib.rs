//! Two-tier cache coordinator.
//!
//! `tandem` sits in front of a fast in-process "local" cache and a slower,
//! shared "remote" cache and presents a single key/value surface. Per
//! operation it decides which tier(s) to read from and write to: writes fan
//! out to every enabled tier concurrently, reads try local first and fall
//! back to remote on a miss (optionally backfilling local), and deletes fan
//! out like writes.
//!
//! # Public API Surface
//!
//! - [`TieredCache`] - the coordinator: `get`/`set`/`del` plus detached
//!   fire-and-forget variants
//! - [`CacheOptions`], [`TieredConfig`], [`EffectiveOptions`] - per-call
//!   options, instance defaults, and the resolved merge of the two
//! - [`CacheBackend`], [`TierHandle`], [`TierSpec`] - the backend adapter
//!   contract and the construction surface (named kind or injected handle)
//! - [`MemoryBackend`] - in-process expiring store (the `"memory"` kind)
//! - [`CacheError`], [`BackendError`] - the closed error model
//!
//! Values are [`serde_json::Value`]; arbitrarily nested structures round-trip
//! through both tiers without loss of shape. The typed helpers
//! ([`TieredCache::set`], [`TieredCache::get_as`]) convert through serde.
//!
//! The two tiers are not kept consistent with each other beyond best-effort
//! backfill: a dual write that fails in one tier reports the error but does
//! not undo the other tier's write.
//!
//! # Test/Mock Support
//! `MockBackend` (call counting, error injection) is available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod backend;
pub mod coordinator;
pub mod error;
pub mod options;

#[cfg(any(test, feature = "mock"))]
pub use backend::MockBackend;
pub use backend::{
    BackendError, BackendResult, CacheBackend, MEMORY_KIND, MemoryBackend, TierHandle, TierSpec,
    create_backend,
};
pub use coordinator::{Tier, TierOutcome, TieredCache};
pub use error::{CacheError, CacheResult};
pub use options::{CacheOptions, EffectiveOptions, TieredConfig};
