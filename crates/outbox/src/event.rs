use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::EventId;

/// Processing status of a stored outbox event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EventStatus {
    /// Staged and awaiting publication.
    #[default]
    Pending,

    /// Published downstream; terminal.
    Processed,
}

impl EventStatus {
    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "Pending",
            EventStatus::Processed => "Processed",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An event handed to [`OutboxStore::save_event`](crate::OutboxStore::save_event).
///
/// The store assigns identity, status, and (for keyed events) the sequence
/// number at save time; callers only describe the message itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOutboxEvent {
    /// Topic the event should eventually be published to.
    pub destination_topic: String,

    /// Opaque message body.
    pub payload: Vec<u8>,

    /// Optional broker partitioning key, passed through unchanged.
    pub message_key: Option<String>,

    /// Optional ordering key. Events sharing an aggregate key form one
    /// strictly ordered stream; events without one are unordered.
    pub aggregate_key: Option<String>,
}

impl NewOutboxEvent {
    /// Creates an unordered event for the given topic.
    pub fn new(destination_topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            destination_topic: destination_topic.into(),
            payload: payload.into(),
            message_key: None,
            aggregate_key: None,
        }
    }

    /// Sets the broker message key.
    pub fn with_message_key(mut self, key: impl Into<String>) -> Self {
        self.message_key = Some(key.into());
        self
    }

    /// Puts the event on the ordered stream for `key`.
    pub fn with_aggregate_key(mut self, key: impl Into<String>) -> Self {
        self.aggregate_key = Some(key.into());
        self
    }
}

/// A stored outbox event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxEvent {
    /// Unique identifier, generated at save time.
    pub event_id: EventId,

    /// Ordering key, if the event belongs to an ordered stream.
    pub aggregate_key: Option<String>,

    /// Topic the event should eventually be published to.
    pub destination_topic: String,

    /// Opaque message body.
    pub payload: Vec<u8>,

    /// Optional broker partitioning key.
    pub message_key: Option<String>,

    /// Pending until a publisher marks the event processed.
    pub status: EventStatus,

    /// Position within the aggregate's stream, starting at 1 with no gaps.
    /// Absent for unordered events.
    pub sequence_id: Option<u64>,

    /// When the event was saved.
    pub created_at: DateTime<Utc>,
}

impl OutboxEvent {
    /// Returns true if the event still awaits publication.
    pub fn is_pending(&self) -> bool {
        self.status == EventStatus::Pending
    }
}
