use thiserror::Error;

use common::SagaId;

/// Errors that can occur when interacting with a saga state store.
#[derive(Debug, Error)]
pub enum SagaStoreError {
    /// An update carried a stale version token. The stored state is
    /// guaranteed unchanged.
    #[error("stale saga state for {saga_id}: expected version {expected}, got {actual}")]
    Conflict {
        saga_id: SagaId,
        /// Version currently stored.
        expected: u64,
        /// Version the rejected update carried.
        actual: u64,
    },

    /// The backing storage failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// A serialization/deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SagaStoreError {
    /// Returns true if this is an optimistic concurrency conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, SagaStoreError::Conflict { .. })
    }
}

/// Result type for saga store operations.
pub type Result<T> = std::result::Result<T, SagaStoreError>;
