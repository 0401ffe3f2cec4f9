//! Compliance suite for outbox storage providers.
//!
//! Each check is generic over an async factory producing a fresh, clean
//! store. Aggregate keys are suffixed with a UUID so checks can also run
//! against a shared backing store without colliding.

use std::future::Future;

use uuid::Uuid;

use crate::{NewOutboxEvent, OutboxStore};

fn unique_key(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// An unordered event can be saved and retrieved for processing.
pub async fn save_and_retrieve_unordered_event<S, F, Fut>(factory: F)
where
    S: OutboxStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let event = NewOutboxEvent::new("topic-a", b"data".to_vec());

    store.save_event(event.clone()).await.unwrap();

    let pending = store.get_pending_unordered_events(10).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].payload, event.payload);
    assert_eq!(pending[0].destination_topic, event.destination_topic);
    assert!(pending[0].sequence_id.is_none());
}

/// A processed event is no longer retrieved as pending.
pub async fn mark_as_processed_removes_from_pending<S, F, Fut>(factory: F)
where
    S: OutboxStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    store
        .save_event(NewOutboxEvent::new("topic-b", b"data".to_vec()))
        .await
        .unwrap();

    let pending = store.get_pending_unordered_events(10).await.unwrap();
    assert_eq!(pending.len(), 1);

    store.mark_as_processed(pending[0].event_id).await.unwrap();

    let remaining = store.get_pending_unordered_events(10).await.unwrap();
    assert!(remaining.is_empty());
}

/// Events for one aggregate receive sequence numbers exactly 1..=N in save
/// order.
pub async fn sequential_ids_for_ordered_events<S, F, Fut>(factory: F)
where
    S: OutboxStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let key = unique_key("order");

    for payload in [b"c".to_vec(), b"d".to_vec(), b"e".to_vec()] {
        store
            .save_event(NewOutboxEvent::new("t", payload).with_aggregate_key(&key))
            .await
            .unwrap();
    }

    let ordered = store.get_pending_events_for_aggregate(&key).await.unwrap();
    assert_eq!(ordered.len(), 3);

    let sequences: Vec<_> = ordered.iter().map(|e| e.sequence_id).collect();
    assert_eq!(sequences, vec![Some(1), Some(2), Some(3)]);

    let payloads: Vec<_> = ordered.iter().map(|e| e.payload.clone()).collect();
    assert_eq!(payloads, vec![b"c".to_vec(), b"d".to_vec(), b"e".to_vec()]);
}

/// Sequence numbering for one aggregate never perturbs another's.
pub async fn sequences_are_independent_per_aggregate<S, F, Fut>(factory: F)
where
    S: OutboxStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let key_a = unique_key("customer");
    let key_b = unique_key("product");

    // Interleave saves across the two streams.
    store
        .save_event(NewOutboxEvent::new("t", b"a1".to_vec()).with_aggregate_key(&key_a))
        .await
        .unwrap();
    store
        .save_event(NewOutboxEvent::new("t", b"b1".to_vec()).with_aggregate_key(&key_b))
        .await
        .unwrap();
    store
        .save_event(NewOutboxEvent::new("t", b"a2".to_vec()).with_aggregate_key(&key_a))
        .await
        .unwrap();

    let events_a = store.get_pending_events_for_aggregate(&key_a).await.unwrap();
    assert_eq!(events_a.len(), 2);
    let sequences_a: Vec<_> = events_a.iter().map(|e| e.sequence_id).collect();
    assert_eq!(sequences_a, vec![Some(1), Some(2)]);

    let events_b = store.get_pending_events_for_aggregate(&key_b).await.unwrap();
    assert_eq!(events_b.len(), 1);
    assert_eq!(events_b[0].sequence_id, Some(1));
}

/// Pending-key discovery reports exactly the keys with pending events.
pub async fn discovers_pending_aggregate_keys<S, F, Fut>(factory: F)
where
    S: OutboxStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let key_a = unique_key("agg");
    let key_b = unique_key("agg");

    store
        .save_event(NewOutboxEvent::new("t", b"a1".to_vec()).with_aggregate_key(&key_a))
        .await
        .unwrap();
    store
        .save_event(NewOutboxEvent::new("t", b"b1".to_vec()).with_aggregate_key(&key_b))
        .await
        .unwrap();
    store
        .save_event(NewOutboxEvent::new("unordered", b"u1".to_vec()))
        .await
        .unwrap();

    let keys = store.get_pending_aggregate_keys().await.unwrap();
    assert_eq!(keys.len(), 2);
    assert!(keys.contains(&key_a));
    assert!(keys.contains(&key_b));
}

/// Marking an event processed twice leaves it processed and does not fail.
pub async fn mark_as_processed_is_idempotent<S, F, Fut>(factory: F)
where
    S: OutboxStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    store
        .save_event(NewOutboxEvent::new("topic-c", b"data".to_vec()))
        .await
        .unwrap();

    let pending = store.get_pending_unordered_events(1).await.unwrap();
    assert_eq!(pending.len(), 1);
    let event_id = pending[0].event_id;

    store.mark_as_processed(event_id).await.unwrap();
    store
        .mark_as_processed(event_id)
        .await
        .expect("repeated mark_as_processed must not fail");

    let remaining = store.get_pending_unordered_events(10).await.unwrap();
    assert!(remaining.is_empty());
}
