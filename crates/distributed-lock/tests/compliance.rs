//! Runs the distributed lock compliance suite against the in-memory provider.

use distributed_lock::{InMemoryLockManager, contract};

async fn factory() -> InMemoryLockManager {
    InMemoryLockManager::new()
}

#[tokio::test]
async fn acquire_and_release() {
    contract::acquire_and_release(factory).await;
}

#[tokio::test]
async fn mutual_exclusion() {
    contract::mutual_exclusion(factory).await;
}

#[tokio::test(start_paused = true)]
async fn expires_after_ttl() {
    contract::expires_after_ttl(factory).await;
}

#[tokio::test]
async fn scoped_acquisition_releases_on_exit() {
    contract::scoped_acquisition_releases_on_exit(factory).await;
}

#[tokio::test]
async fn release_is_idempotent() {
    contract::release_is_idempotent(factory).await;
}
