//! Runs the outbox compliance suite against the in-memory provider.

use outbox::{InMemoryOutboxStore, contract};

async fn factory() -> InMemoryOutboxStore {
    InMemoryOutboxStore::new()
}

#[tokio::test]
async fn save_and_retrieve_unordered_event() {
    contract::save_and_retrieve_unordered_event(factory).await;
}

#[tokio::test]
async fn mark_as_processed_removes_from_pending() {
    contract::mark_as_processed_removes_from_pending(factory).await;
}

#[tokio::test]
async fn sequential_ids_for_ordered_events() {
    contract::sequential_ids_for_ordered_events(factory).await;
}

#[tokio::test]
async fn sequences_are_independent_per_aggregate() {
    contract::sequences_are_independent_per_aggregate(factory).await;
}

#[tokio::test]
async fn discovers_pending_aggregate_keys() {
    contract::discovers_pending_aggregate_keys(factory).await;
}

#[tokio::test]
async fn mark_as_processed_is_idempotent() {
    contract::mark_as_processed_is_idempotent(factory).await;
}
