//! Per-user serialization for the scan-then-create sequence.
//!
//! Two concurrent requests from the same user with near-identical
//! screenshots could each scan history before the other's submission is
//! persisted and both get accepted. Holding a per-user async mutex across
//! the scan-then-create tail closes that window within a single process.

use crate::model::UserId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A map of lazily-created per-user async mutexes
pub struct UserLocks {
    inner: Mutex<HashMap<UserId, Arc<tokio::sync::Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Get the lock for `user`, creating it on first use.
    ///
    /// Locks nobody holds anymore (the map owns the only `Arc`) are
    /// evicted on the way, so the registry stays bounded by the number
    /// of users with an intake in flight rather than every user id
    /// ever seen.
    ///
    /// The registry mutex is held only for the map maintenance, never
    /// across an await.
    pub fn for_user(&self, user: UserId) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(|poisoned| {
            // A panic while holding the registry lock cannot leave the
            // map in a bad state; recover the guard and continue.
            poisoned.into_inner()
        });
        map.retain(|_, lock| Arc::strong_count(lock) > 1);
        map.entry(user).or_default().clone()
    }

    /// Number of user locks currently tracked (test helper)
    pub fn tracked_users(&self) -> usize {
        self.inner
            .lock()
            .map(|map| map.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }
}

impl Default for UserLocks {
    fn default() -> Self {
        Self::new()
    }
}
