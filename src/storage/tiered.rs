//! Two-tier cache-aside coordinator.
//!
//! ## Reads
//!
//! `check_and_get` consults the fast cache, then the durable store. A durable
//! hit is promoted into the fast cache before it is returned. A miss in both
//! tiers mutates nothing.
//!
//! ## Writes
//!
//! `store` runs under a per-key lock so the "is this a new entry" check and the
//! writes that follow cannot interleave with another `store` for the same key:
//!
//! - absent from both tiers: durable store first, then fast cache
//! - durable record equals the snapshot: fast cache only
//! - durable record differs (or is missing while the cache holds a value):
//!   nothing is written
//!
//! Every tier round trip is bounded by `timeout`; an elapsed timeout is a tier
//! failure like any other. Nothing is retried.

use super::locks::KeyLocks;
use super::{
    DurableStore, FastCache, Key, StandingsStorage, StorageError, StoreOutcome, Tier, TierError,
};
use crate::config::StorageMode;
use crate::snapshot::Standings;
use crate::utils::log_if_slow;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

pub struct TieredStorage {
    cache: Arc<dyn FastCache>,
    durable: Arc<dyn DurableStore>,
    locks: KeyLocks,
    timeout: Duration,
}

impl TieredStorage {
    pub fn new(cache: Arc<dyn FastCache>, durable: Arc<dyn DurableStore>, timeout: Duration) -> Self {
        Self {
            cache,
            durable,
            locks: KeyLocks::new(),
            timeout,
        }
    }

    /// Run one tier round trip under the configured timeout.
    async fn bounded<T, F>(&self, tier: Tier, op: &'static str, fut: F) -> Result<T, TierError>
    where
        F: Future<Output = Result<T, TierError>>,
    {
        let start = Instant::now();
        let result = match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_elapsed) => Err(TierError::TimedOut {
                tier,
                after: self.timeout,
            }),
        };
        log_if_slow(start, self.timeout / 2, op);
        result
    }

    async fn cache_get(&self, key: &Key) -> Result<Option<Standings>, TierError> {
        self.bounded(Tier::FastCache, "fast cache get", self.cache.get(key))
            .await
    }

    async fn cache_put(&self, key: &Key, standings: &Standings) -> Result<(), TierError> {
        self.bounded(Tier::FastCache, "fast cache put", self.cache.put(key, standings))
            .await
    }

    async fn durable_read(&self, key: &Key) -> Result<Option<Standings>, TierError> {
        self.bounded(Tier::DurableStore, "durable read", self.durable.read(key))
            .await
    }

    async fn durable_write(&self, key: &Key, standings: &Standings) -> Result<(), TierError> {
        self.bounded(
            Tier::DurableStore,
            "durable write",
            self.durable.write(key, standings),
        )
        .await
    }
}

fn write_error(key: &Key, tier: Tier) -> impl FnOnce(TierError) -> StorageError + '_ {
    move |source| StorageError::Write {
        key: key.storage_key(),
        tier,
        source,
    }
}

fn read_error(key: &Key) -> impl FnOnce(TierError) -> StorageError + '_ {
    move |source| StorageError::Read {
        key: key.storage_key(),
        source,
    }
}

#[async_trait]
impl StandingsStorage for TieredStorage {
    #[instrument(skip_all, fields(key = %key))]
    async fn store(&self, key: &Key, standings: &Standings) -> Result<StoreOutcome, StorageError> {
        let _guard = self.locks.lock(&key.storage_key()).await;

        let cached = self
            .cache_get(key)
            .await
            .map_err(write_error(key, Tier::FastCache))?;
        let durable = self
            .durable_read(key)
            .await
            .map_err(write_error(key, Tier::DurableStore))?;

        if cached.is_none() && durable.is_none() {
            self.durable_write(key, standings)
                .await
                .map_err(write_error(key, Tier::DurableStore))?;
            self.cache_put(key, standings)
                .await
                .map_err(write_error(key, Tier::FastCache))?;
            info!(rows = standings.len(), "stored new standings in all tiers");
            return Ok(StoreOutcome::Created);
        }

        match durable {
            Some(existing) if existing == *standings => {
                self.cache_put(key, standings)
                    .await
                    .map_err(write_error(key, Tier::FastCache))?;
                debug!("durable record matches, fast cache repaired");
                Ok(StoreOutcome::CacheRepaired)
            }
            Some(_) => {
                warn!("durable record differs from incoming standings, write suppressed");
                Ok(StoreOutcome::Conflict)
            }
            None => {
                warn!("fast cache holds standings missing from durable store, write suppressed");
                Ok(StoreOutcome::Conflict)
            }
        }
    }

    #[instrument(skip_all, fields(key = %key))]
    async fn check_and_get(&self, key: &Key) -> Result<Option<Standings>, StorageError> {
        if let Some(standings) = self.cache_get(key).await.map_err(read_error(key))? {
            debug!(tier = %Tier::FastCache, "standings found");
            return Ok(Some(standings));
        }

        let Some(standings) = self.durable_read(key).await.map_err(read_error(key))? else {
            debug!("standings not found in any tier");
            return Ok(None);
        };

        self.cache_put(key, &standings)
            .await
            .map_err(read_error(key))?;
        debug!(tier = %Tier::DurableStore, "standings found, promoted to fast cache");
        Ok(Some(standings))
    }

    fn mode(&self) -> StorageMode {
        StorageMode::RealDatabase
    }
}
