//! Saga state model.

use serde::{Deserialize, Serialize};

use common::SagaId;

/// Lifecycle status of a saga instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SagaStatus {
    /// Saga steps are being executed.
    #[default]
    Running,

    /// A step failed and compensating transactions are in progress.
    Compensating,

    /// All steps completed successfully (terminal state).
    Completed,

    /// Compensation finished after a failure (terminal state).
    Failed,
}

impl SagaStatus {
    /// Returns true if this is a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SagaStatus::Completed | SagaStatus::Failed)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SagaStatus::Running => "Running",
            SagaStatus::Compensating => "Compensating",
            SagaStatus::Completed => "Completed",
            SagaStatus::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for SagaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a single executed saga step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepStatus {
    /// The step's forward action succeeded.
    Succeeded,

    /// The step's forward action failed.
    Failed,

    /// The step's compensating action was applied.
    Compensated,
}

/// One entry in a saga's step history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SagaStepRecord {
    /// Name of the executed step.
    pub step_name: String,

    /// How the step finished.
    pub status: StepStatus,
}

impl SagaStepRecord {
    /// Creates a history entry for a finished step.
    pub fn new(step_name: impl Into<String>, status: StepStatus) -> Self {
        Self {
            step_name: step_name.into(),
            status,
        }
    }
}

/// The persisted state of a running saga instance.
///
/// `version` is the optimistic concurrency token: the store sets it to 1 on
/// creation (whatever the caller supplied) and increments it by exactly one
/// on every successful update. An update is accepted only when its version
/// equals the stored one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SagaState {
    /// Identity of the saga instance.
    pub saga_id: SagaId,

    /// Current lifecycle status.
    pub status: SagaStatus,

    /// Index of the step the saga is currently on.
    pub current_step: u32,

    /// Outcomes of the steps executed so far.
    pub history: Vec<SagaStepRecord>,

    /// Workflow-specific state.
    pub payload: serde_json::Value,

    /// Optimistic concurrency token.
    pub version: u64,
}

impl SagaState {
    /// Creates the initial state for a new saga.
    ///
    /// The version is left at 0; the store overwrites it on creation.
    pub fn new(saga_id: SagaId, payload: serde_json::Value) -> Self {
        Self {
            saga_id,
            status: SagaStatus::Running,
            current_step: 0,
            history: Vec::new(),
            payload,
            version: 0,
        }
    }

    /// Returns a copy advanced to the next step with `record` appended.
    pub fn with_step_completed(mut self, record: SagaStepRecord) -> Self {
        self.current_step += 1;
        self.history.push(record);
        self
    }

    /// Returns a copy with the status replaced.
    pub fn with_status(mut self, status: SagaStatus) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_is_running() {
        assert_eq!(SagaStatus::default(), SagaStatus::Running);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!SagaStatus::Running.is_terminal());
        assert!(!SagaStatus::Compensating.is_terminal());
        assert!(SagaStatus::Completed.is_terminal());
        assert!(SagaStatus::Failed.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(SagaStatus::Running.to_string(), "Running");
        assert_eq!(SagaStatus::Compensating.to_string(), "Compensating");
        assert_eq!(SagaStatus::Completed.to_string(), "Completed");
        assert_eq!(SagaStatus::Failed.to_string(), "Failed");
    }

    #[test]
    fn test_with_step_completed_advances_and_records() {
        let state = SagaState::new(SagaId::new(), serde_json::json!({}));
        let advanced = state
            .with_step_completed(SagaStepRecord::new("reserve-inventory", StepStatus::Succeeded));

        assert_eq!(advanced.current_step, 1);
        assert_eq!(advanced.history.len(), 1);
        assert_eq!(advanced.history[0].step_name, "reserve-inventory");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let state = SagaState::new(SagaId::new(), serde_json::json!({"order": 7}))
            .with_status(SagaStatus::Compensating);
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: SagaState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
