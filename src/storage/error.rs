//! Error types for the storage tiers and the coordinator above them.

use std::fmt;
use std::time::Duration;

/// The two tiers of the cache-aside layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    FastCache,
    DurableStore,
}

impl Tier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Tier::FastCache => "fast_cache",
            Tier::DurableStore => "durable_store",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tier round trip failed.
#[derive(Debug, thiserror::Error)]
pub enum TierError {
    #[error("fast cache unavailable")]
    CacheUnavailable(#[source] anyhow::Error),
    #[error("durable store unavailable")]
    DurableStoreUnavailable(#[source] anyhow::Error),
    #[error("{tier} round trip timed out after {after:?}")]
    TimedOut { tier: Tier, after: Duration },
}

impl TierError {
    pub fn cache(source: impl Into<anyhow::Error>) -> Self {
        TierError::CacheUnavailable(source.into())
    }

    pub fn durable(source: impl Into<anyhow::Error>) -> Self {
        TierError::DurableStoreUnavailable(source.into())
    }
}

/// Failure surfaced by a [`StandingsStorage`](super::StandingsStorage).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage read failed for key '{key}'")]
    Read {
        key: String,
        #[source]
        source: TierError,
    },
    #[error("storage write failed for key '{key}' in {tier}")]
    Write {
        key: String,
        tier: Tier,
        #[source]
        source: TierError,
    },
}

impl StorageError {
    pub fn key(&self) -> &str {
        match self {
            StorageError::Read { key, .. } | StorageError::Write { key, .. } => key,
        }
    }

    /// The tier that failed, when the failure happened during a write sequence.
    pub fn tier(&self) -> Option<Tier> {
        match self {
            StorageError::Read { .. } => None,
            StorageError::Write { tier, .. } => Some(*tier),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            StorageError::Read {
                source: TierError::TimedOut { .. },
                ..
            } | StorageError::Write {
                source: TierError::TimedOut { .. },
                ..
            }
        )
    }
}
