use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use common::SagaId;

use crate::{Result, SagaState, SagaStoreError, store::SagaStateStore};

/// In-memory saga state store for validating the contract suite.
///
/// The version check and the write happen under one write lock, which is the
/// in-process stand-in for a conditional write on a real store.
#[derive(Clone, Default)]
pub struct InMemorySagaStore {
    sagas: Arc<RwLock<HashMap<SagaId, SagaState>>>,
}

impl InMemorySagaStore {
    /// Creates a new empty saga store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of sagas stored.
    pub async fn saga_count(&self) -> usize {
        self.sagas.read().await.len()
    }
}

#[async_trait]
impl SagaStateStore for InMemorySagaStore {
    async fn create_state(&self, state: SagaState) -> Result<()> {
        let mut sagas = self.sagas.write().await;
        if sagas.contains_key(&state.saga_id) {
            // Duplicate creation is a no-op; the existing state wins.
            return Ok(());
        }

        let mut state = state;
        state.version = 1;
        tracing::debug!(saga_id = %state.saga_id, "saga state created");
        sagas.insert(state.saga_id, state);
        Ok(())
    }

    async fn get_state(&self, saga_id: SagaId) -> Result<Option<SagaState>> {
        let sagas = self.sagas.read().await;
        Ok(sagas.get(&saga_id).cloned())
    }

    async fn update_state(&self, state: SagaState) -> Result<()> {
        let mut sagas = self.sagas.write().await;
        let Some(current) = sagas.get(&state.saga_id) else {
            // Updating an unknown saga is a no-op, matching creation-first
            // workflows where the caller already checked existence.
            return Ok(());
        };

        if current.version != state.version {
            metrics::counter!("saga_state_conflicts_total").increment(1);
            tracing::warn!(
                saga_id = %state.saga_id,
                stored = current.version,
                supplied = state.version,
                "rejected stale saga state update"
            );
            return Err(SagaStoreError::Conflict {
                saga_id: state.saga_id,
                expected: current.version,
                actual: state.version,
            });
        }

        let mut updated = state;
        updated.version += 1;
        sagas.insert(updated.saga_id, updated);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SagaStatus, SagaStepRecord, StepStatus};

    fn initial_state(saga_id: SagaId) -> SagaState {
        SagaState::new(saga_id, serde_json::json!({"initial": true}))
    }

    #[tokio::test]
    async fn duplicate_create_preserves_original_state() {
        let store = InMemorySagaStore::new();
        let saga_id = SagaId::new();

        store.create_state(initial_state(saga_id)).await.unwrap();

        let mut second = SagaState::new(saga_id, serde_json::json!({"initial": false}));
        second.status = SagaStatus::Failed;
        store.create_state(second).await.unwrap();

        let stored = store.get_state(saga_id).await.unwrap().unwrap();
        assert_eq!(stored.status, SagaStatus::Running);
        assert_eq!(stored.payload, serde_json::json!({"initial": true}));
        assert_eq!(store.saga_count().await, 1);
    }

    #[tokio::test]
    async fn update_of_unknown_saga_is_a_no_op() {
        let store = InMemorySagaStore::new();
        let state = initial_state(SagaId::new());

        store.update_state(state).await.unwrap();
        assert_eq!(store.saga_count().await, 0);
    }

    #[tokio::test]
    async fn version_grows_by_one_per_update() {
        let store = InMemorySagaStore::new();
        let saga_id = SagaId::new();
        store.create_state(initial_state(saga_id)).await.unwrap();

        for expected in 2..=5u64 {
            let current = store.get_state(saga_id).await.unwrap().unwrap();
            store.update_state(current).await.unwrap();
            let stored = store.get_state(saga_id).await.unwrap().unwrap();
            assert_eq!(stored.version, expected);
        }
    }

    #[tokio::test]
    async fn racing_writers_from_one_read_produce_one_winner() {
        let store = InMemorySagaStore::new();
        let saga_id = SagaId::new();
        store.create_state(initial_state(saga_id)).await.unwrap();

        let base = store.get_state(saga_id).await.unwrap().unwrap();

        let mut handles = Vec::new();
        for step in ["reserve-inventory", "process-payment"] {
            let store = store.clone();
            let candidate = base
                .clone()
                .with_step_completed(SagaStepRecord::new(step, StepStatus::Succeeded));
            handles.push(tokio::spawn(
                async move { store.update_state(candidate).await },
            ));
        }

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => successes += 1,
                Err(err) => {
                    assert!(err.is_conflict());
                    conflicts += 1;
                }
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 1);

        let stored = store.get_state(saga_id).await.unwrap().unwrap();
        assert_eq!(stored.version, 2);
        assert_eq!(stored.history.len(), 1);
    }
}
