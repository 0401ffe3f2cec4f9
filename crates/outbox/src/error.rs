use thiserror::Error;

/// Errors that can occur when interacting with an outbox store.
///
/// Contention-free conditions (no pending events, an already-processed
/// event) are not errors; providers report them through return values.
#[derive(Debug, Error)]
pub enum OutboxError {
    /// The backing storage failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// A serialization/deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for outbox store operations.
pub type Result<T> = std::result::Result<T, OutboxError>;
