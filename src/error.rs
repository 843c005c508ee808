use thiserror::Error;

use crate::backend::BackendError;

#[derive(Debug, Error)]
/// Errors returned by the coordinator surface.
pub enum CacheError {
    /// The caller-specified option combination makes the operation
    /// impossible (no tier enabled for a `set` or `get`).
    #[error("{reason}")]
    Config {
        /// Error message.
        reason: String,
    },

    /// The requested key is absent from every consulted tier. Not a fatal
    /// condition; a disabled coordinator reports every `get` this way.
    #[error("key not found: {key}")]
    KeyNotFound {
        /// The key that was requested.
        key: String,
    },

    /// An underlying tier failed for a reason other than a miss. Propagated
    /// verbatim; the coordinator does not retry or fall back on it.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// A value could not be converted to or from the JSON data model.
    #[error("serialization failed: {reason}")]
    Serialization {
        /// Error message.
        reason: String,
    },
}

impl CacheError {
    /// Returns `true` for the miss variant, distinguishing it from a genuine
    /// tier malfunction.
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. })
    }
}

/// Convenience result type for coordinator operations.
pub type CacheResult<T> = Result<T, CacheError>;
