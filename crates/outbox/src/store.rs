use std::collections::BTreeSet;

use async_trait::async_trait;

use common::EventId;

use crate::{NewOutboxEvent, OutboxEvent, Result};

/// Core trait for outbox storage providers.
///
/// All implementations must be thread-safe (Send + Sync). The sequencing
/// invariant: for a fixed aggregate key, the sequence numbers assigned are
/// exactly `1..=N` in save order, independent of every other key.
#[async_trait]
pub trait OutboxStore: Send + Sync {
    /// Stages an event as pending.
    ///
    /// For an event carrying aggregate key `K`, the store atomically
    /// increments `K`'s counter and stamps the new value as the event's
    /// sequence number; two concurrent saves for one key can never receive
    /// the same or an out-of-order number. Events without an aggregate key
    /// receive no sequence number.
    async fn save_event(&self, event: NewOutboxEvent) -> Result<()>;

    /// Returns up to `limit` pending events that carry no aggregate key.
    ///
    /// No ordering is guaranteed; these events are outside any stream.
    async fn get_pending_unordered_events(&self, limit: usize) -> Result<Vec<OutboxEvent>>;

    /// Returns the aggregate keys with at least one pending event.
    async fn get_pending_aggregate_keys(&self) -> Result<BTreeSet<String>>;

    /// Returns the pending events for `aggregate_key`, sorted ascending by
    /// sequence number.
    ///
    /// This is the FIFO guarantee the outbox pattern exists to provide: a
    /// publisher draining one aggregate's stream sees strict save order.
    async fn get_pending_events_for_aggregate(
        &self,
        aggregate_key: &str,
    ) -> Result<Vec<OutboxEvent>>;

    /// Transitions an event from pending to processed.
    ///
    /// Idempotent: marking an already-processed or unknown event is a no-op,
    /// since an at-least-once publisher may deliver and confirm more than
    /// once.
    async fn mark_as_processed(&self, event_id: EventId) -> Result<()>;
}
