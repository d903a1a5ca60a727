//! Cache-aside storage for standings snapshots.
//!
//! Reads check the fast cache first, then the durable store (promoting hits
//! back into the cache). Writes go durable-first and are suppressed when the
//! durable store already holds a record for the key.

pub mod codec;
mod error;
mod key;
mod locks;
pub mod memory;
pub mod pg_store;
pub mod redis_cache;
pub mod tiered;

pub use error::{StorageError, Tier, TierError};
pub use key::Key;
pub use memory::InMemoryStorage;
pub use pg_store::PgDocumentStore;
pub use redis_cache::RedisCache;
pub use tiered::TieredStorage;

use crate::config::{Config, StorageMode};
use crate::snapshot::Standings;
use anyhow::Context;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Volatile, TTL-bound tier.
#[async_trait]
pub trait FastCache: Send + Sync {
    /// `Ok(None)` when the key is missing or expired.
    async fn get(&self, key: &Key) -> Result<Option<Standings>, TierError>;

    async fn put(&self, key: &Key, standings: &Standings) -> Result<(), TierError>;
}

/// System-of-record tier. Writes are not deduplicated by the store itself.
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn read(&self, key: &Key) -> Result<Option<Standings>, TierError>;

    async fn write(&self, key: &Key, standings: &Standings) -> Result<(), TierError>;
}

/// What a `store` call ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// Key was absent everywhere; written to every tier.
    Created,
    /// Durable record already matched; only the fast cache was written.
    CacheRepaired,
    /// Durable record differs from the snapshot; nothing was written.
    Conflict,
    /// Single-tier storage overwrote an existing value.
    Replaced,
}

impl StoreOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            StoreOutcome::Created => "created",
            StoreOutcome::CacheRepaired => "cache_repaired",
            StoreOutcome::Conflict => "conflict",
            StoreOutcome::Replaced => "replaced",
        }
    }
}

impl fmt::Display for StoreOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The storage capability request handlers depend on.
#[async_trait]
pub trait StandingsStorage: Send + Sync {
    async fn store(&self, key: &Key, standings: &Standings) -> Result<StoreOutcome, StorageError>;

    /// `Ok(None)` means no tier holds the key; the caller should fetch it.
    async fn check_and_get(&self, key: &Key) -> Result<Option<Standings>, StorageError>;

    fn mode(&self) -> StorageMode;
}

/// Build the storage selected by `config.storage_mode`.
pub async fn connect(config: &Config) -> anyhow::Result<Arc<dyn StandingsStorage>> {
    match config.storage_mode {
        StorageMode::InMemory => {
            info!("using in-memory standings storage");
            Ok(Arc::new(InMemoryStorage::new()))
        }
        StorageMode::RealDatabase => {
            let cache = RedisCache::connect(&config.redis_url(), config.cache_ttl)
                .await
                .context("Failed to connect to fast cache")?;
            let database_options = config
                .database_options()
                .context("Durable store credentials are not configured")?;
            let store = PgDocumentStore::connect(database_options)
                .await
                .context("Failed to connect to durable store")?;
            info!(
                redis_host = %config.redis_host,
                redis_port = config.redis_port,
                database_host = %config.database_host,
                database_port = config.database_port,
                cache_ttl = ?config.cache_ttl,
                "using two-tier standings storage"
            );
            Ok(Arc::new(TieredStorage::new(
                Arc::new(cache),
                Arc::new(store),
                config.storage_timeout,
            )))
        }
    }
}
