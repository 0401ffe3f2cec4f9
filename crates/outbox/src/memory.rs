use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use common::EventId;

use crate::{
    EventStatus, NewOutboxEvent, OutboxEvent, Result,
    store::OutboxStore,
};

#[derive(Default)]
struct OutboxInner {
    events: Vec<OutboxEvent>,
    // Last sequence number handed out per aggregate key; first event gets 1.
    sequences: HashMap<String, u64>,
}

/// In-memory outbox store for validating the contract suite.
///
/// One write lock covers both the event log and the sequence counters, so
/// increment-and-stamp is atomic with respect to concurrent saves.
#[derive(Clone, Default)]
pub struct InMemoryOutboxStore {
    inner: Arc<RwLock<OutboxInner>>,
}

impl InMemoryOutboxStore {
    /// Creates a new empty outbox store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of events stored, pending or processed.
    pub async fn event_count(&self) -> usize {
        self.inner.read().await.events.len()
    }
}

#[async_trait]
impl OutboxStore for InMemoryOutboxStore {
    async fn save_event(&self, event: NewOutboxEvent) -> Result<()> {
        let mut inner = self.inner.write().await;

        let sequence_id = event.aggregate_key.as_deref().map(|key| {
            let counter = inner.sequences.entry(key.to_string()).or_insert(0);
            *counter += 1;
            *counter
        });

        let stored = OutboxEvent {
            event_id: EventId::new(),
            aggregate_key: event.aggregate_key,
            destination_topic: event.destination_topic,
            payload: event.payload,
            message_key: event.message_key,
            status: EventStatus::Pending,
            sequence_id,
            created_at: Utc::now(),
        };
        tracing::debug!(
            event_id = %stored.event_id,
            topic = %stored.destination_topic,
            sequence = ?stored.sequence_id,
            "outbox event staged"
        );
        inner.events.push(stored);
        Ok(())
    }

    async fn get_pending_unordered_events(&self, limit: usize) -> Result<Vec<OutboxEvent>> {
        let inner = self.inner.read().await;
        let events = inner
            .events
            .iter()
            .filter(|e| e.is_pending() && e.aggregate_key.is_none())
            .take(limit)
            .cloned()
            .collect();
        Ok(events)
    }

    async fn get_pending_aggregate_keys(&self) -> Result<BTreeSet<String>> {
        let inner = self.inner.read().await;
        let keys = inner
            .events
            .iter()
            .filter(|e| e.is_pending())
            .filter_map(|e| e.aggregate_key.clone())
            .collect();
        Ok(keys)
    }

    async fn get_pending_events_for_aggregate(
        &self,
        aggregate_key: &str,
    ) -> Result<Vec<OutboxEvent>> {
        let inner = self.inner.read().await;
        let mut events: Vec<_> = inner
            .events
            .iter()
            .filter(|e| e.is_pending() && e.aggregate_key.as_deref() == Some(aggregate_key))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.sequence_id);
        Ok(events)
    }

    async fn mark_as_processed(&self, event_id: EventId) -> Result<()> {
        let mut inner = self.inner.write().await;
        // Unknown or already-processed ids fall through: at-least-once
        // publishers may confirm the same event more than once.
        if let Some(event) = inner.events.iter_mut().find(|e| e.event_id == event_id) {
            event.status = EventStatus::Processed;
        }
        Ok(())
    }
}
