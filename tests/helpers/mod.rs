//! Tier doubles and snapshot builders shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use dashmap::DashMap;
use standings::snapshot::{Record, RecordScope, Records, Standing, Standings, Team};
use standings::storage::{DurableStore, FastCache, Key, TierError};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Build a standing whose `all` record has the given goals.
pub fn make_standing(rank: u32, team: &str, points: i32, goals_for: u32, goals_against: u32) -> Standing {
    let mut records = Records::new();
    records.insert(
        RecordScope::All,
        Record::new(36, 27, 7, 2, goals_for, goals_against),
    );
    Standing::new(
        rank,
        Team::new(i64::from(rank) + 500, team, format!("https://media.example/teams/{rank}.png")),
        points,
        "Serie A",
        "WWWWD",
        &records,
    )
    .expect("all record present")
}

pub fn serie_a_2020() -> Standings {
    [
        make_standing(1, "Inter", 91, 89, 35),
        make_standing(2, "AC Milan", 79, 74, 41),
        make_standing(3, "Atalanta", 78, 90, 47),
    ]
    .into_iter()
    .collect()
}

pub fn epl_2020() -> Standings {
    [
        make_standing(1, "Manchester City", 86, 83, 32),
        make_standing(2, "Manchester United", 74, 73, 44),
    ]
    .into_iter()
    .collect()
}

/// Map-backed fast cache that counts calls.
#[derive(Default)]
pub struct CountingCache {
    entries: DashMap<String, Standings>,
    pub gets: AtomicUsize,
    pub puts: AtomicUsize,
}

impl CountingCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed(&self, key: &Key, standings: Standings) {
        self.entries.insert(key.storage_key(), standings);
    }

    pub fn peek(&self, key: &Key) -> Option<Standings> {
        self.entries.get(&key.storage_key()).map(|e| e.value().clone())
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[async_trait]
impl FastCache for CountingCache {
    async fn get(&self, key: &Key) -> Result<Option<Standings>, TierError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Ok(self.peek(key))
    }

    async fn put(&self, key: &Key, standings: &Standings) -> Result<(), TierError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.entries.insert(key.storage_key(), standings.clone());
        Ok(())
    }
}

/// Append-only durable store that counts calls. Reads return the earliest
/// document for a key, like the real store.
#[derive(Default)]
pub struct CountingStore {
    documents: DashMap<String, Vec<Standings>>,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
    /// Delay applied to each read, to widen race windows.
    pub read_delay: Option<Duration>,
}

impl CountingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_read_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            read_delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn seed(&self, key: &Key, standings: Standings) {
        self.documents
            .entry(key.storage_key())
            .or_default()
            .push(standings);
    }

    pub fn documents(&self, key: &Key) -> usize {
        self.documents
            .get(&key.storage_key())
            .map_or(0, |docs| docs.len())
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DurableStore for CountingStore {
    async fn read(&self, key: &Key) -> Result<Option<Standings>, TierError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self
            .documents
            .get(&key.storage_key())
            .and_then(|docs| docs.first().cloned()))
    }

    async fn write(&self, key: &Key, standings: &Standings) -> Result<(), TierError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.seed(key, standings.clone());
        Ok(())
    }
}

/// Fast cache whose every call fails.
pub struct FailingCache;

#[async_trait]
impl FastCache for FailingCache {
    async fn get(&self, _key: &Key) -> Result<Option<Standings>, TierError> {
        Err(TierError::cache(anyhow::anyhow!("connection refused")))
    }

    async fn put(&self, _key: &Key, _standings: &Standings) -> Result<(), TierError> {
        Err(TierError::cache(anyhow::anyhow!("connection refused")))
    }
}

/// Durable store that reads fine but rejects writes.
#[derive(Default)]
pub struct ReadOnlyStore;

#[async_trait]
impl DurableStore for ReadOnlyStore {
    async fn read(&self, _key: &Key) -> Result<Option<Standings>, TierError> {
        Ok(None)
    }

    async fn write(&self, _key: &Key, _standings: &Standings) -> Result<(), TierError> {
        Err(TierError::durable(anyhow::anyhow!("permission denied for table")))
    }
}

/// Fast cache that never answers within any reasonable timeout.
pub struct HangingCache;

#[async_trait]
impl FastCache for HangingCache {
    async fn get(&self, _key: &Key) -> Result<Option<Standings>, TierError> {
        std::future::pending().await
    }

    async fn put(&self, _key: &Key, _standings: &Standings) -> Result<(), TierError> {
        std::future::pending().await
    }
}
