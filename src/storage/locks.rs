//! Per-key async mutexes for serializing read-modify-write sequences.
//!
//! Contenders for the same key wait on a shared `tokio::sync::Mutex`; slots
//! are created on demand and pruned once the last holder lets go.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::trace;

#[derive(Clone, Default)]
pub(crate) struct KeyLocks {
    /// storage key → lock slot
    slots: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

/// Holds the lock for one key. Dropping it releases the lock and prunes the
/// slot when nobody else is waiting on it.
pub(crate) struct KeyGuard {
    key: String,
    slots: Arc<DashMap<String, Arc<Mutex<()>>>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl KeyLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn lock(&self, key: &str) -> KeyGuard {
        let slot = self
            .slots
            .entry(key.to_owned())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = slot.lock_owned().await;
        KeyGuard {
            key: key.to_owned(),
            slots: self.slots.clone(),
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // The map holds one reference; any other holder is a waiter.
        self.slots
            .remove_if(&self.key, |_, slot| Arc::strong_count(slot) == 1);
        trace!(key = %self.key, "storage key lock released");
    }
}
