//! Single-tier, process-local storage.
//!
//! Nothing survives a restart and there is no duplicate suppression: `store`
//! always overwrites.

use super::{Key, StandingsStorage, StorageError, StoreOutcome};
use crate::config::StorageMode;
use crate::snapshot::Standings;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    entries: Arc<DashMap<Key, Standings>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl StandingsStorage for InMemoryStorage {
    async fn store(&self, key: &Key, standings: &Standings) -> Result<StoreOutcome, StorageError> {
        info!(key = %key, "storing standings in memory");
        let outcome = match self.entries.insert(key.clone(), standings.clone()) {
            Some(_) => StoreOutcome::Replaced,
            None => StoreOutcome::Created,
        };
        Ok(outcome)
    }

    async fn check_and_get(&self, key: &Key) -> Result<Option<Standings>, StorageError> {
        let found = self.entries.get(key).map(|entry| entry.value().clone());
        debug!(key = %key, exists = found.is_some(), "in-memory lookup");
        Ok(found)
    }

    fn mode(&self) -> StorageMode {
        StorageMode::InMemory
    }
}
