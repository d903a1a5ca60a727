//! PostgreSQL-backed durable document store.
//!
//! Each write inserts a `{key, standings}` row into `standings_documents`.
//! The key index is not unique: duplicate suppression belongs to the
//! coordinator, and reads return the earliest document for a key.

use super::codec;
use super::{DurableStore, Key, TierError};
use crate::snapshot::Standings;
use crate::utils::fmt_duration;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::time::Duration;
use tracing::{info, trace};

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Connect, then run pending migrations.
    pub async fn connect(options: PgConnectOptions) -> anyhow::Result<Self> {
        let connect_options = options
            .log_statements(tracing::log::LevelFilter::Debug)
            .log_slow_statements(tracing::log::LevelFilter::Warn, Duration::from_secs(1));

        let acquire_timeout = Duration::from_secs(4);
        let pool = PgPoolOptions::new()
            .min_connections(0)
            .max_connections(8)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(Duration::from_secs(60 * 2))
            .max_lifetime(Duration::from_secs(60 * 30))
            .connect_with(connect_options)
            .await?;

        info!(
            max_connections = 8,
            acquire_timeout = fmt_duration(acquire_timeout),
            "durable store pool established"
        );

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("durable store migrations completed");

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DurableStore for PgDocumentStore {
    async fn read(&self, key: &Key) -> Result<Option<Standings>, TierError> {
        let frame: Option<Vec<u8>> = sqlx::query_scalar(
            "SELECT standings FROM standings_documents WHERE key = $1 ORDER BY id ASC LIMIT 1",
        )
        .bind(key.storage_key())
        .fetch_optional(&self.pool)
        .await
        .map_err(TierError::durable)?;

        match frame {
            Some(frame) => {
                trace!(key = %key, bytes = frame.len(), "durable store hit");
                codec::decode(&frame).map(Some).map_err(TierError::durable)
            }
            None => {
                trace!(key = %key, "durable store miss");
                Ok(None)
            }
        }
    }

    async fn write(&self, key: &Key, standings: &Standings) -> Result<(), TierError> {
        let frame = codec::encode(standings).map_err(TierError::durable)?;
        sqlx::query("INSERT INTO standings_documents (key, standings) VALUES ($1, $2)")
            .bind(key.storage_key())
            .bind(frame)
            .execute(&self.pool)
            .await
            .map_err(TierError::durable)?;
        trace!(key = %key, "durable store write");
        Ok(())
    }
}
