use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

/// Core trait for lock manager providers.
///
/// A manager is the single authority for the locks it hands out. Creating a
/// handle has no side effect on the lock store; ownership only changes
/// through [`DistributedLock::acquire`] and [`DistributedLock::release`].
pub trait LockManager: Send + Sync {
    /// The lock handle type this manager produces.
    type Lock: DistributedLock;

    /// Creates a handle for the named lock with the given time-to-live.
    ///
    /// Every handle carries a fresh owner identity, even for the same name,
    /// so two handles for one name always contend with each other.
    fn get_lock(&self, name: &str, ttl: Duration) -> Self::Lock;
}

/// A handle to a single named lock.
///
/// All implementations must be thread-safe (Send + Sync). Mutual exclusion is
/// per name: at most one unexpired, unreleased owner exists at any instant.
#[async_trait]
pub trait DistributedLock: Send + Sync {
    /// Attempts to acquire the lock without blocking.
    ///
    /// Returns true when the lock was free, expired, or already deleted;
    /// false when another owner still holds it. Expiry is re-checked on
    /// every call, so a handle whose TTL has elapsed can be taken over
    /// without an intervening release.
    async fn acquire(&self) -> bool;

    /// Releases the lock if this handle still owns it.
    ///
    /// Idempotent: releasing an expired, re-acquired, or already-released
    /// lock is a no-op. A handle can never release another owner's lock.
    async fn release(&self);
}

/// Extension trait providing scoped acquisition for lock handles.
#[async_trait]
pub trait DistributedLockExt: DistributedLock {
    /// Acquires the lock, runs `body` with the acquisition result, and
    /// releases on the way out.
    ///
    /// The closure receives `false` when the lock was contended; it still
    /// runs, mirroring the non-blocking acquire, and the trailing release is
    /// a safe no-op in that case.
    async fn with_lock<F, Fut, T>(&self, body: F) -> T
    where
        F: FnOnce(bool) -> Fut + Send,
        Fut: Future<Output = T> + Send,
        T: Send,
    {
        let acquired = self.acquire().await;
        let result = body(acquired).await;
        self.release().await;
        result
    }
}

// Blanket implementation for all DistributedLock implementations
impl<L: DistributedLock + ?Sized> DistributedLockExt for L {}
