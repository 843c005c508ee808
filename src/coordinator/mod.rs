//! Tier coordinator: routes `get`/`set`/`del` across the two tiers.

pub mod aggregate;


pub use aggregate::{Tier, TierOutcome};

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::backend::{TierHandle, TierSpec};
use crate::error::{CacheError, CacheResult};
use crate::options::{CacheOptions, EffectiveOptions, TieredConfig};

use aggregate::{aggregate_del, aggregate_set};

const NO_TIER_FOR_SET: &str = "local or remote must be specified when setting to cache";
const NO_TIER_FOR_GET: &str = "local or remote must be specified when getting from cache";

/// Two-tier cache coordinator.
///
/// Owns one fast local tier and one shared remote tier and presents a
/// single key/value surface. Writes fan out to every enabled tier
/// concurrently and report the first error without rolling back the other
/// tier's write; reads try local first and fall back to remote only on a
/// miss, never on a tier error. A miss is [`CacheError::KeyNotFound`], kept
/// distinct from a tier malfunction.
///
/// Clones are cheap and share the same tier handles, so one coordinator can
/// be used from many tasks. Operations impose no locking across concurrent
/// calls; the backends handle their own internal concurrency.
#[derive(Clone)]
pub struct TieredCache {
    local: TierHandle,
    remote: TierHandle,
    config: TieredConfig,
}

impl std::fmt::Debug for TieredCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredCache")
            .field("local", &self.local)
            .field("remote", &self.remote)
            .field("config", &self.config)
            .finish()
    }
}

impl TieredCache {
    /// Creates a coordinator from two tier specs: a registered backend
    /// kind by name, or a pre-built [`TierHandle`] used as-is.
    ///
    /// Fails if a named kind is not registered.
    pub fn new(
        local: impl Into<TierSpec>,
        remote: impl Into<TierSpec>,
        config: TieredConfig,
    ) -> CacheResult<Self> {
        Ok(Self {
            local: local.into().into_handle()?,
            remote: remote.into().into_handle()?,
            config,
        })
    }

    /// Creates a coordinator with the default config: both tiers enabled,
    /// not disabled.
    pub fn with_defaults(
        local: impl Into<TierSpec>,
        remote: impl Into<TierSpec>,
    ) -> CacheResult<Self> {
        Self::new(local, remote, TieredConfig::default())
    }

    /// The local tier handle.
    pub fn local(&self) -> &TierHandle {
        &self.local
    }

    /// The remote tier handle.
    pub fn remote(&self) -> &TierHandle {
        &self.remote
    }

    /// The instance defaults this coordinator was built with.
    pub fn config(&self) -> &TieredConfig {
        &self.config
    }

    fn resolve(&self, options: &CacheOptions) -> EffectiveOptions {
        EffectiveOptions::resolve(options, &self.config)
    }

    /// Reads a key with the instance default options.
    pub async fn get(&self, key: &str) -> CacheResult<Value> {
        self.get_with(key, &CacheOptions::default()).await
    }

    /// Reads a key.
    ///
    /// With both tiers enabled, local is consulted first and remote only
    /// after a local miss; a local tier error propagates immediately
    /// instead of falling through. A remote hit with `set_local` on
    /// triggers a detached local backfill whose failure is logged and
    /// dropped. A disabled coordinator reports every key as not found.
    #[instrument(skip(self, options), fields(key = %key))]
    pub async fn get_with(&self, key: &str, options: &CacheOptions) -> CacheResult<Value> {
        let opts = self.resolve(options);
        if opts.disabled {
            debug!("coordinator disabled, reporting miss");
            return Err(CacheError::KeyNotFound {
                key: key.to_string(),
            });
        }
        if opts.no_tier_enabled() {
            return Err(CacheError::Config {
                reason: NO_TIER_FOR_GET.to_string(),
            });
        }

        if opts.use_local {
            debug!(tier = %Tier::Local, "checking tier");
            match self.local.get(key).await? {
                Some(value) if !value.is_null() => {
                    info!(tier = %Tier::Local, "hit");
                    return Ok(value);
                }
                _ => debug!(tier = %Tier::Local, "miss"),
            }
            if !opts.use_remote {
                return Err(CacheError::KeyNotFound {
                    key: key.to_string(),
                });
            }
        }

        debug!(tier = %Tier::Remote, "checking tier");
        match self.remote.get(key).await? {
            Some(value) if !value.is_null() => {
                info!(tier = %Tier::Remote, "hit");
                if opts.set_local {
                    self.spawn_backfill(key, value.clone(), opts.ttl);
                }
                Ok(value)
            }
            _ => {
                debug!(tier = %Tier::Remote, "miss");
                Err(CacheError::KeyNotFound {
                    key: key.to_string(),
                })
            }
        }
    }

    /// Reads a key and deserializes the value.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> CacheResult<T> {
        self.get_as_with(key, &CacheOptions::default()).await
    }

    /// Reads a key with options and deserializes the value.
    pub async fn get_as_with<T: DeserializeOwned>(
        &self,
        key: &str,
        options: &CacheOptions,
    ) -> CacheResult<T> {
        let value = self.get_with(key, options).await?;
        serde_json::from_value(value).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })
    }

    /// Writes a key to every enabled tier with the instance default
    /// options.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> CacheResult<Value> {
        self.set_with(key, value, &CacheOptions::default()).await
    }

    /// Writes a key to every enabled tier.
    ///
    /// Enabled tiers are written concurrently and all of them complete
    /// before the call returns. The first tier error (local before remote)
    /// is reported; a completed write in the other tier stays in place,
    /// since the dual write is best-effort, not transactional. On success the
    /// returned value is the stored value. A disabled coordinator returns
    /// `Ok(Value::Null)` without touching any tier.
    #[instrument(skip(self, value, options), fields(key = %key))]
    pub async fn set_with<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        options: &CacheOptions,
    ) -> CacheResult<Value> {
        let opts = self.resolve(options);
        if opts.disabled {
            debug!("coordinator disabled, skipping set");
            return Ok(Value::Null);
        }
        let value = to_value(value)?;
        self.fan_out_set(key, value, &opts).await
    }

    /// Fire-and-forget write.
    ///
    /// Option resolution and serialization stay synchronous, so an
    /// impossible tier selection or an unserializable value is reported to
    /// the caller; the tier writes themselves run on a detached task and
    /// their errors are logged and dropped. Must be called from within a
    /// Tokio runtime.
    pub fn set_detached<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        options: CacheOptions,
    ) -> CacheResult<()> {
        let opts = self.resolve(&options);
        if opts.disabled {
            debug!(key = %key, "coordinator disabled, skipping set");
            return Ok(());
        }
        if opts.no_tier_enabled() {
            return Err(CacheError::Config {
                reason: NO_TIER_FOR_SET.to_string(),
            });
        }
        let value = to_value(value)?;

        let cache = self.clone();
        let key = key.to_string();
        tokio::spawn(async move {
            if let Err(error) = cache.fan_out_set(&key, value, &opts).await {
                warn!(key = %key, error = %error, "detached set failed");
            }
        });
        Ok(())
    }

    /// Deletes a key from every enabled tier with the instance default
    /// options.
    pub async fn del(&self, key: &str) -> CacheResult<()> {
        self.del_with(key, &CacheOptions::default()).await
    }

    /// Deletes a key from every enabled tier.
    ///
    /// Enabled tiers are deleted from concurrently; the first tier error
    /// (local before remote) is reported. Deleting an absent key is not an
    /// error, and unlike `set`/`get` a delete with no tier enabled is a
    /// silent success, since deleting nothing is safe. Disabled
    /// coordinators no-op.
    #[instrument(skip(self, options), fields(key = %key))]
    pub async fn del_with(&self, key: &str, options: &CacheOptions) -> CacheResult<()> {
        let opts = self.resolve(options);
        if opts.disabled {
            debug!("coordinator disabled, skipping delete");
            return Ok(());
        }
        self.fan_out_del(key, &opts).await
    }

    /// Fire-and-forget delete. Never fails synchronously; tier errors are
    /// logged and dropped. Must be called from within a Tokio runtime.
    pub fn del_detached(&self, key: &str, options: CacheOptions) {
        let opts = self.resolve(&options);
        if opts.disabled {
            debug!(key = %key, "coordinator disabled, skipping delete");
            return;
        }

        let cache = self.clone();
        let key = key.to_string();
        tokio::spawn(async move {
            if let Err(error) = cache.fan_out_del(&key, &opts).await {
                warn!(key = %key, error = %error, "detached delete failed");
            }
        });
    }

    async fn fan_out_set(
        &self,
        key: &str,
        value: Value,
        opts: &EffectiveOptions,
    ) -> CacheResult<Value> {
        let outcomes = match (opts.use_local, opts.use_remote) {
            (true, true) => {
                debug!("writing to both tiers");
                let (local, remote) = tokio::join!(
                    self.local.set(key, value.clone(), opts.ttl),
                    self.remote.set(key, value, opts.ttl),
                );
                vec![
                    TierOutcome::new(Tier::Local, local),
                    TierOutcome::new(Tier::Remote, remote),
                ]
            }
            (true, false) => {
                debug!(tier = %Tier::Local, "writing to tier");
                vec![TierOutcome::new(
                    Tier::Local,
                    self.local.set(key, value, opts.ttl).await,
                )]
            }
            (false, true) => {
                debug!(tier = %Tier::Remote, "writing to tier");
                vec![TierOutcome::new(
                    Tier::Remote,
                    self.remote.set(key, value, opts.ttl).await,
                )]
            }
            (false, false) => {
                return Err(CacheError::Config {
                    reason: NO_TIER_FOR_SET.to_string(),
                });
            }
        };
        aggregate_set(outcomes)
    }

    async fn fan_out_del(&self, key: &str, opts: &EffectiveOptions) -> CacheResult<()> {
        let outcomes = match (opts.use_local, opts.use_remote) {
            (true, true) => {
                debug!("deleting from both tiers");
                let (local, remote) = tokio::join!(self.local.del(key), self.remote.del(key));
                vec![
                    TierOutcome::new(Tier::Local, local),
                    TierOutcome::new(Tier::Remote, remote),
                ]
            }
            (true, false) => {
                debug!(tier = %Tier::Local, "deleting from tier");
                vec![TierOutcome::new(Tier::Local, self.local.del(key).await)]
            }
            (false, true) => {
                debug!(tier = %Tier::Remote, "deleting from tier");
                vec![TierOutcome::new(Tier::Remote, self.remote.del(key).await)]
            }
            (false, false) => {
                debug!("no tier enabled, delete is a no-op");
                Vec::new()
            }
        };
        aggregate_del(outcomes)
    }

    /// Warms the local tier with a value just read from remote. Detached:
    /// the originating `get` has already returned by the time this write
    /// lands, and its failure is logged and dropped.
    fn spawn_backfill(&self, key: &str, value: Value, ttl: Option<Duration>) {
        let local = self.local.clone();
        let key = key.to_string();
        tokio::spawn(async move {
            debug!(key = %key, "backfilling local tier");
            if let Err(error) = local.set(&key, value, ttl).await {
                warn!(key = %key, error = %error, "local backfill failed");
            }
        });
    }
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> CacheResult<Value> {
    serde_json::to_value(value).map_err(|e| CacheError::Serialization {
        reason: e.to_string(),
    })
}
