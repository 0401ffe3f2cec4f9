//! Transactional outbox contract for the resilience TCK.
//!
//! An outbox store stages outbound events with atomic enqueue and strict
//! per-aggregate-key ordering, decoupled from downstream publication. Events
//! carrying an aggregate key receive a gapless, monotonically increasing
//! sequence number scoped to that key; a downstream publisher draining one
//! aggregate's stream observes strict FIFO order.

pub mod contract;
pub mod error;
pub mod event;
pub mod memory;
pub mod store;

pub use common::EventId;
pub use error::{OutboxError, Result};
pub use event::{EventStatus, NewOutboxEvent, OutboxEvent};
pub use memory::InMemoryOutboxStore;
pub use store::OutboxStore;
