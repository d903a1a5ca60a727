//! Redis-backed fast cache tier.

use super::codec;
use super::{FastCache, Key, TierError};
use crate::snapshot::Standings;
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tracing::{debug, trace};

/// Snapshot cache stored as encoded frames under `"{alias}_{season}"` with a TTL.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    ttl: Duration,
}

impl RedisCache {
    /// Open a managed (auto-reconnecting) connection to `url`.
    pub async fn connect(url: &str, ttl: Duration) -> Result<Self, TierError> {
        let client = redis::Client::open(url).map_err(TierError::cache)?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(TierError::cache)?;
        debug!(ttl = ?ttl, "fast cache connection established");
        Ok(Self { conn, ttl })
    }

    fn ttl_secs(&self) -> u64 {
        expiry_secs(self.ttl)
    }
}

/// Whole seconds for `SET EX`, which rejects a zero expiry.
fn expiry_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl FastCache for RedisCache {
    async fn get(&self, key: &Key) -> Result<Option<Standings>, TierError> {
        let mut conn = self.conn.clone();
        let frame: Option<Vec<u8>> = conn
            .get(key.storage_key())
            .await
            .map_err(TierError::cache)?;

        match frame {
            Some(frame) => {
                trace!(key = %key, bytes = frame.len(), "fast cache hit");
                codec::decode(&frame).map(Some).map_err(TierError::cache)
            }
            None => {
                trace!(key = %key, "fast cache miss");
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &Key, standings: &Standings) -> Result<(), TierError> {
        let frame = codec::encode(standings).map_err(TierError::cache)?;
        let bytes = frame.len();
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(key.storage_key(), frame, self.ttl_secs())
            .await
            .map_err(TierError::cache)?;
        trace!(key = %key, bytes, ttl_secs = self.ttl_secs(), "fast cache put");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_never_zero() {
        assert_eq!(expiry_secs(Duration::ZERO), 1);
        assert_eq!(expiry_secs(Duration::from_millis(999)), 1);
        assert_eq!(expiry_secs(Duration::from_millis(1500)), 1);
        assert_eq!(expiry_secs(Duration::from_secs(86_400)), 86_400);
    }
}
