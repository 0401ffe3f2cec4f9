use async_trait::async_trait;

use common::SagaId;

use crate::{Result, SagaState};

/// Core trait for saga state store providers.
///
/// All implementations must be thread-safe (Send + Sync). The version field
/// on [`SagaState`] is the compare-and-swap token: a provider backed by a
/// real distributed store should map the version check onto the substrate's
/// native conditional write rather than re-deriving it in application code.
#[async_trait]
pub trait SagaStateStore: Send + Sync {
    /// Persists the initial state for a new saga.
    ///
    /// The caller-supplied version is ignored; the stored state has version 1.
    /// Creating a saga that already exists is a no-op, not an error.
    async fn create_state(&self, state: SagaState) -> Result<()>;

    /// Returns the stored state for `saga_id`, or `None` if absent.
    async fn get_state(&self, saga_id: SagaId) -> Result<Option<SagaState>>;

    /// Replaces the stored state if the candidate's version matches.
    ///
    /// On success the stored version becomes `candidate.version + 1`. A stale
    /// version is rejected with [`SagaStoreError::Conflict`] and the stored
    /// state is left untouched: of two writers racing from the same read,
    /// exactly one wins.
    ///
    /// [`SagaStoreError::Conflict`]: crate::SagaStoreError::Conflict
    async fn update_state(&self, state: SagaState) -> Result<()>;
}
