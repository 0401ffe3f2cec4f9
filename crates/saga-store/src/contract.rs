//! Compliance suite for saga state store providers.
//!
//! Each check is generic over an async factory producing a fresh, clean
//! store. The optimistic concurrency checks drive two sequential writers
//! from one read; real interleaving is the provider's own concern and is
//! covered by the atomicity the contract demands of `update_state`.

use std::future::Future;

use common::SagaId;

use crate::{SagaState, SagaStateStore, SagaStatus, SagaStepRecord, StepStatus};

fn initial_state(saga_id: SagaId) -> SagaState {
    SagaState::new(saga_id, serde_json::json!({"initial": true}))
}

/// A created saga can be retrieved, and its version is 1 regardless of the
/// version the caller supplied.
pub async fn create_and_get_state<S, F, Fut>(factory: F)
where
    S: SagaStateStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let saga_id = SagaId::new();

    let mut state = initial_state(saga_id);
    state.version = 42; // Must be ignored by the store.
    store.create_state(state).await.unwrap();

    let retrieved = store
        .get_state(saga_id)
        .await
        .unwrap()
        .expect("created saga must be retrievable");

    assert_eq!(retrieved.saga_id, saga_id);
    assert_eq!(retrieved.status, SagaStatus::Running);
    assert_eq!(retrieved.payload, serde_json::json!({"initial": true}));
    assert_eq!(retrieved.version, 1);
}

/// Getting a saga that was never created yields `None`.
pub async fn get_missing_state_returns_none<S, F, Fut>(factory: F)
where
    S: SagaStateStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let retrieved = store.get_state(SagaId::new()).await.unwrap();
    assert!(retrieved.is_none());
}

/// A successful update replaces the state and increments the version.
pub async fn update_increments_version<S, F, Fut>(factory: F)
where
    S: SagaStateStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let saga_id = SagaId::new();
    store.create_state(initial_state(saga_id)).await.unwrap();

    let v1 = store.get_state(saga_id).await.unwrap().unwrap();
    assert_eq!(v1.version, 1);

    let candidate =
        v1.with_step_completed(SagaStepRecord::new("step1", StepStatus::Succeeded));
    store.update_state(candidate).await.unwrap();

    let v2 = store.get_state(saga_id).await.unwrap().unwrap();
    assert_eq!(v2.version, 2);
    assert_eq!(v2.current_step, 1);
    assert_eq!(v2.history.len(), 1);
}

/// Two writers updating from the same read produce exactly one success; the
/// stale writer is rejected and its changes never land.
pub async fn stale_update_is_rejected<S, F, Fut>(factory: F)
where
    S: SagaStateStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let saga_id = SagaId::new();
    store.create_state(initial_state(saga_id)).await.unwrap();

    // Both writers load version 1.
    let writer_a = store.get_state(saga_id).await.unwrap().unwrap();
    let writer_b = store.get_state(saga_id).await.unwrap().unwrap();

    // Writer A lands first; the store moves to version 2.
    let update_a =
        writer_a.with_step_completed(SagaStepRecord::new("step1", StepStatus::Succeeded));
    store.update_state(update_a).await.unwrap();

    // Writer B still carries version 1 and must be rejected.
    let update_b = writer_b.with_status(SagaStatus::Failed);
    let err = store
        .update_state(update_b)
        .await
        .expect_err("stale version must conflict");
    assert!(err.is_conflict());

    // The stored state is writer A's, untouched by the rejected update.
    let stored = store.get_state(saga_id).await.unwrap().unwrap();
    assert_eq!(stored.version, 2);
    assert_eq!(stored.status, SagaStatus::Running);
    assert_eq!(stored.current_step, 1);
}

/// Creating an already-existing saga is a no-op that preserves the stored
/// state.
pub async fn duplicate_create_is_a_no_op<S, F, Fut>(factory: F)
where
    S: SagaStateStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let saga_id = SagaId::new();
    store.create_state(initial_state(saga_id)).await.unwrap();

    let advanced = store
        .get_state(saga_id)
        .await
        .unwrap()
        .unwrap()
        .with_step_completed(SagaStepRecord::new("step1", StepStatus::Succeeded));
    store.update_state(advanced).await.unwrap();

    // A late duplicate create must not reset the saga.
    store
        .create_state(SagaState::new(saga_id, serde_json::json!({"late": true})))
        .await
        .expect("duplicate create must not fail");

    let stored = store.get_state(saga_id).await.unwrap().unwrap();
    assert_eq!(stored.version, 2);
    assert_eq!(stored.payload, serde_json::json!({"initial": true}));
}
