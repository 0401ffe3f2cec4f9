//! Compliance suite for distributed lock providers.
//!
//! Each check is generic over an async factory producing a fresh, isolated
//! lock manager. Lock names are suffixed with a UUID so checks can also run
//! against a shared backing store without colliding.
//!
//! TTL checks wait with `tokio::time::sleep`, so in-process providers can be
//! verified under a paused clock (`#[tokio::test(start_paused = true)]`).

use std::future::Future;
use std::time::Duration;

use uuid::Uuid;

use crate::{DistributedLock, DistributedLockExt, LockManager};

fn unique_lock_name(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// A lock can be acquired, released, and re-acquired.
pub async fn acquire_and_release<M, F, Fut>(factory: F)
where
    M: LockManager,
    F: Fn() -> Fut,
    Fut: Future<Output = M>,
{
    let manager = factory().await;
    let name = unique_lock_name("tck-lock");

    let lock = manager.get_lock(&name, Duration::from_secs(10));

    assert!(lock.acquire().await, "a new lock must be acquirable");
    lock.release().await;
    assert!(
        lock.acquire().await,
        "a released lock must be acquirable again"
    );
    lock.release().await;
}

/// A held lock cannot be acquired through a second handle until released.
pub async fn mutual_exclusion<M, F, Fut>(factory: F)
where
    M: LockManager,
    F: Fn() -> Fut,
    Fut: Future<Output = M>,
{
    let manager = factory().await;
    let name = unique_lock_name("tck-lock");

    let lock1 = manager.get_lock(&name, Duration::from_secs(10));
    let lock2 = manager.get_lock(&name, Duration::from_secs(10));

    assert!(lock1.acquire().await);
    assert!(
        !lock2.acquire().await,
        "a second handle must not acquire a held lock"
    );

    lock1.release().await;
    assert!(
        lock2.acquire().await,
        "the lock must be acquirable once the holder releases"
    );
    lock2.release().await;
}

/// A lock whose TTL elapsed is acquirable by a new owner without a release.
pub async fn expires_after_ttl<M, F, Fut>(factory: F)
where
    M: LockManager,
    F: Fn() -> Fut,
    Fut: Future<Output = M>,
{
    let manager = factory().await;
    let name = unique_lock_name("tck-lock");
    let ttl = Duration::from_secs(1);

    let lock1 = manager.get_lock(&name, ttl);
    let lock2 = manager.get_lock(&name, ttl);

    assert!(lock1.acquire().await);

    // Holder never releases; expiry alone must free the name.
    tokio::time::sleep(ttl + Duration::from_millis(200)).await;

    assert!(
        lock2.acquire().await,
        "an expired lock must be acquirable by a new owner"
    );
    lock2.release().await;
}

/// The scoped form acquires on entry and releases on exit.
pub async fn scoped_acquisition_releases_on_exit<M, F, Fut>(factory: F)
where
    M: LockManager,
    F: Fn() -> Fut,
    Fut: Future<Output = M>,
{
    let manager = factory().await;
    let name = unique_lock_name("tck-lock");

    let lock = manager.get_lock(&name, Duration::from_secs(10));
    let contender = manager.get_lock(&name, Duration::from_secs(10));

    lock.with_lock(|acquired| {
        let contender = &contender;
        async move {
            assert!(acquired, "the scoped form must acquire on entry");
            assert!(
                !contender.acquire().await,
                "the lock must be held inside the scope"
            );
        }
    })
    .await;

    assert!(
        contender.acquire().await,
        "the lock must be released once the scope exits"
    );
    contender.release().await;
}

/// Releasing an already-released lock is a safe no-op.
pub async fn release_is_idempotent<M, F, Fut>(factory: F)
where
    M: LockManager,
    F: Fn() -> Fut,
    Fut: Future<Output = M>,
{
    let manager = factory().await;
    let name = unique_lock_name("tck-lock");

    let lock = manager.get_lock(&name, Duration::from_secs(10));

    assert!(lock.acquire().await);
    lock.release().await;
    lock.release().await;

    assert!(
        lock.acquire().await,
        "the lock must still be usable after a double release"
    );
    lock.release().await;
}
