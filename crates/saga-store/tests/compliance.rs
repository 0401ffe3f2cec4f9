//! Runs the saga state store compliance suite against the in-memory provider.

use saga_store::{InMemorySagaStore, contract};

async fn factory() -> InMemorySagaStore {
    InMemorySagaStore::new()
}

#[tokio::test]
async fn create_and_get_state() {
    contract::create_and_get_state(factory).await;
}

#[tokio::test]
async fn get_missing_state_returns_none() {
    contract::get_missing_state_returns_none(factory).await;
}

#[tokio::test]
async fn update_increments_version() {
    contract::update_increments_version(factory).await;
}

#[tokio::test]
async fn stale_update_is_rejected() {
    contract::stale_update_is_rejected(factory).await;
}

#[tokio::test]
async fn duplicate_create_is_a_no_op() {
    contract::duplicate_create_is_a_no_op(factory).await;
}
