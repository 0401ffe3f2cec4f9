use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use crate::lock::{DistributedLock, LockManager};

/// Ownership record for one lock name.
#[derive(Debug, Clone, Copy)]
struct LockRecord {
    owner_id: Uuid,
    expires_at: Instant,
}

impl LockRecord {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

/// In-memory lock manager, the single authority for its lock records.
///
/// Acquire and release run under one mutex per manager so the
/// check-then-write in `acquire` cannot lose an update to a concurrent
/// caller.
#[derive(Clone, Default)]
pub struct InMemoryLockManager {
    records: Arc<Mutex<HashMap<String, LockRecord>>>,
}

impl InMemoryLockManager {
    /// Creates a manager with no locks held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of lock records currently stored.
    ///
    /// Expired records are counted until the next acquire for their name;
    /// expiry is lazy by design.
    pub async fn record_count(&self) -> usize {
        self.records.lock().await.len()
    }

    async fn acquire(&self, name: &str, owner_id: Uuid, ttl: Duration) -> bool {
        let mut records = self.records.lock().await;
        let now = Instant::now();

        if let Some(record) = records.get(name) {
            if !record.is_expired(now) {
                // Still held; contention is a normal outcome, not an error.
                return false;
            }
            tracing::debug!(name, "lock TTL elapsed, granting to new owner");
        }

        records.insert(
            name.to_string(),
            LockRecord {
                owner_id,
                expires_at: now + ttl,
            },
        );
        true
    }

    async fn release(&self, name: &str, owner_id: Uuid) {
        let mut records = self.records.lock().await;
        if let Some(record) = records.get(name)
            && record.owner_id == owner_id
        {
            records.remove(name);
        }
    }
}

impl LockManager for InMemoryLockManager {
    type Lock = InMemoryLock;

    fn get_lock(&self, name: &str, ttl: Duration) -> InMemoryLock {
        InMemoryLock {
            name: name.to_string(),
            ttl,
            owner_id: Uuid::new_v4(),
            manager: self.clone(),
        }
    }
}

/// Handle to a single named lock, backed by an [`InMemoryLockManager`].
pub struct InMemoryLock {
    name: String,
    ttl: Duration,
    owner_id: Uuid,
    manager: InMemoryLockManager,
}

#[async_trait]
impl DistributedLock for InMemoryLock {
    async fn acquire(&self) -> bool {
        self.manager.acquire(&self.name, self.owner_id, self.ttl).await
    }

    async fn release(&self) {
        self.manager.release(&self.name, self.owner_id).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock::DistributedLockExt;

    #[tokio::test]
    async fn handles_for_same_name_have_distinct_owners() {
        let manager = InMemoryLockManager::new();
        let lock1 = manager.get_lock("resource", Duration::from_secs(10));
        let lock2 = manager.get_lock("resource", Duration::from_secs(10));
        assert_ne!(lock1.owner_id, lock2.owner_id);
    }

    #[tokio::test]
    async fn get_lock_does_not_touch_the_store() {
        let manager = InMemoryLockManager::new();
        let _lock = manager.get_lock("resource", Duration::from_secs(10));
        assert_eq!(manager.record_count().await, 0);
    }

    #[tokio::test]
    async fn release_by_non_owner_is_a_no_op() {
        let manager = InMemoryLockManager::new();
        let holder = manager.get_lock("resource", Duration::from_secs(10));
        let stranger = manager.get_lock("resource", Duration::from_secs(10));

        assert!(holder.acquire().await);
        stranger.release().await;

        // Still held by the original owner.
        assert!(!stranger.acquire().await);
        assert_eq!(manager.record_count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_handle_cannot_release_after_takeover() {
        let manager = InMemoryLockManager::new();
        let first = manager.get_lock("resource", Duration::from_secs(1));
        let second = manager.get_lock("resource", Duration::from_secs(30));

        assert!(first.acquire().await);
        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert!(second.acquire().await);

        // The expired handle's release must not free the new owner's lock.
        first.release().await;
        let third = manager.get_lock("resource", Duration::from_secs(10));
        assert!(!third.acquire().await);
    }

    #[tokio::test]
    async fn with_lock_releases_on_exit() {
        let manager = InMemoryLockManager::new();
        let lock = manager.get_lock("resource", Duration::from_secs(10));

        let acquired = lock.with_lock(|acquired| async move { acquired }).await;
        assert!(acquired);
        assert_eq!(manager.record_count().await, 0);
    }

    #[tokio::test]
    async fn locks_on_different_names_are_independent() {
        let manager = InMemoryLockManager::new();
        let lock_a = manager.get_lock("resource-a", Duration::from_secs(10));
        let lock_b = manager.get_lock("resource-b", Duration::from_secs(10));

        assert!(lock_a.acquire().await);
        assert!(lock_b.acquire().await);
        assert_eq!(manager.record_count().await, 2);
    }
}
