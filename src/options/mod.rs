//! Per-call options, instance defaults, and the resolver that merges them.

#[cfg(test)]
mod tests;

use std::time::Duration;

/// Call-site overrides for a single operation. Every field is optional;
/// unset fields fall back to the instance [`TieredConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheOptions {
    /// Read/write the local tier.
    pub use_local: Option<bool>,
    /// Read/write the remote tier.
    pub use_remote: Option<bool>,
    /// On a remote `get` hit, backfill the local tier. Only meaningful for
    /// `get`; defaults to off.
    pub set_local: Option<bool>,
    /// Turn the whole operation into a no-op.
    pub disabled: Option<bool>,
    /// Expiry for `set`. Absent means the backend's default expiry; the
    /// coordinator imposes none of its own.
    pub ttl: Option<Duration>,
}

impl CacheOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options carrying only a TTL, for `set` calls that override nothing
    /// else.
    pub fn ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::default()
        }
    }

    /// Address the local tier only.
    pub fn local_only() -> Self {
        Self {
            use_local: Some(true),
            use_remote: Some(false),
            ..Self::default()
        }
    }

    /// Address the remote tier only.
    pub fn remote_only() -> Self {
        Self {
            use_local: Some(false),
            use_remote: Some(true),
            ..Self::default()
        }
    }

    /// Address no tier at all. A `set` or `get` with these options fails
    /// with a configuration error; a `del` is a safe no-op.
    pub fn neither() -> Self {
        Self {
            use_local: Some(false),
            use_remote: Some(false),
            ..Self::default()
        }
    }

    pub fn use_local(mut self, use_local: bool) -> Self {
        self.use_local = Some(use_local);
        self
    }

    pub fn use_remote(mut self, use_remote: bool) -> Self {
        self.use_remote = Some(use_remote);
        self
    }

    pub fn set_local(mut self, set_local: bool) -> Self {
        self.set_local = Some(set_local);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

/// Instance-level defaults, fixed at construction. Changing them means
/// constructing a new coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TieredConfig {
    /// Default for `use_local` when a call doesn't specify it.
    pub use_local_default: bool,
    /// Default for `use_remote` when a call doesn't specify it.
    pub use_remote_default: bool,
    /// Makes every operation a no-op; `get` always reports a miss.
    pub disabled: bool,
}

impl Default for TieredConfig {
    fn default() -> Self {
        Self {
            use_local_default: true,
            use_remote_default: true,
            disabled: false,
        }
    }
}

impl TieredConfig {
    /// Defaults reads and writes to the local tier only.
    pub fn local_only() -> Self {
        Self {
            use_local_default: true,
            use_remote_default: false,
            ..Self::default()
        }
    }

    /// Defaults reads and writes to the remote tier only.
    pub fn remote_only() -> Self {
        Self {
            use_local_default: false,
            use_remote_default: true,
            ..Self::default()
        }
    }

    /// Defaults to no tier at all; every call must opt a tier in explicitly.
    pub fn neither() -> Self {
        Self {
            use_local_default: false,
            use_remote_default: false,
            ..Self::default()
        }
    }

    /// A coordinator that no-ops every operation.
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }
}

/// Fully resolved options for one operation. Once resolved, these exactly
/// determine which tier(s) participate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveOptions {
    pub use_local: bool,
    pub use_remote: bool,
    pub set_local: bool,
    pub disabled: bool,
    pub ttl: Option<Duration>,
}

impl EffectiveOptions {
    /// Merges call-site overrides over instance defaults.
    ///
    /// `disabled` short-circuits from either side; the tier flags fall back
    /// to the instance defaults; `set_local` defaults to off. Whether "no
    /// tier enabled" is an error depends on the operation, so the resolver
    /// never rejects it.
    pub fn resolve(call: &CacheOptions, defaults: &TieredConfig) -> Self {
        Self {
            use_local: call.use_local.unwrap_or(defaults.use_local_default),
            use_remote: call.use_remote.unwrap_or(defaults.use_remote_default),
            set_local: call.set_local.unwrap_or(false),
            disabled: defaults.disabled || call.disabled.unwrap_or(false),
            ttl: call.ttl,
        }
    }

    /// Returns `true` when no tier participates.
    pub fn no_tier_enabled(&self) -> bool {
        !self.use_local && !self.use_remote
    }
}
