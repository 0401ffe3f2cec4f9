//! Saga state store contract for the resilience TCK.
//!
//! A saga store persists long-running-workflow state under optimistic
//! concurrency control: every successful update increments a version token,
//! and an update carrying a stale token is rejected instead of silently
//! overwriting a concurrent writer's work.

pub mod contract;
pub mod error;
pub mod memory;
pub mod state;
pub mod store;

pub use common::SagaId;
pub use error::{Result, SagaStoreError};
pub use memory::InMemorySagaStore;
pub use state::{SagaState, SagaStatus, SagaStepRecord, StepStatus};
pub use store::SagaStateStore;
