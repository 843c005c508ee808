//! Combines per-tier outcomes into the single caller-facing result.

use serde_json::Value;
use tracing::debug;

use crate::backend::BackendError;
use crate::error::{CacheError, CacheResult};

/// One of the two coordinated tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Local,
    Remote,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Local => f.write_str("local"),
            Tier::Remote => f.write_str("remote"),
        }
    }
}

/// One enabled tier's result for a single fan-out operation. Created per
/// tier call and consumed immediately by aggregation.
#[derive(Debug)]
pub struct TierOutcome<T> {
    pub tier: Tier,
    pub result: Result<T, BackendError>,
}

impl<T> TierOutcome<T> {
    pub fn new(tier: Tier, result: Result<T, BackendError>) -> Self {
        Self { tier, result }
    }
}

/// Reduces the outcomes of a fan-out write.
///
/// The first error in tier order (local, then remote) wins; an error from
/// one tier does not undo the other tier's completed write. When every
/// enabled tier succeeds, the result is the first non-empty tier result
/// (the tiers stored the same value, so there is nothing to merge).
pub fn aggregate_set(outcomes: Vec<TierOutcome<Value>>) -> CacheResult<Value> {
    let mut first_error: Option<BackendError> = None;
    let mut value = Value::Null;

    for outcome in outcomes {
        match outcome.result {
            Ok(stored) => {
                if value.is_null() {
                    value = stored;
                }
            }
            Err(error) => {
                if first_error.is_none() {
                    first_error = Some(error);
                } else {
                    debug!(tier = %outcome.tier, error = %error, "further tier error superseded by the first");
                }
            }
        }
    }

    match first_error {
        Some(error) => Err(CacheError::Backend(error)),
        None => Ok(value),
    }
}

/// Reduces the outcomes of a fan-out delete. First error in tier order
/// wins; success carries no payload. An empty outcome set (no tier enabled)
/// is a successful no-op.
pub fn aggregate_del(outcomes: Vec<TierOutcome<()>>) -> CacheResult<()> {
    let mut first_error: Option<BackendError> = None;

    for outcome in outcomes {
        if let Err(error) = outcome.result {
            if first_error.is_none() {
                first_error = Some(error);
            } else {
                debug!(tier = %outcome.tier, error = %error, "further tier error superseded by the first");
            }
        }
    }

    match first_error {
        Some(error) => Err(CacheError::Backend(error)),
        None => Ok(()),
    }
}
