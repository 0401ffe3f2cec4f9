//! Circuit breaker state machine states.

use serde::{Deserialize, Serialize};

/// The state of a circuit breaker.
///
/// State transitions:
/// ```text
/// Closed ──(threshold failures)──► Open ──(reset timeout)──► HalfOpen
///    ▲                               ▲                           │
///    └──────(trial success)──────────┼──────(trial failure)──────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CircuitState {
    /// Operations execute normally; consecutive failures are counted.
    #[default]
    Closed,

    /// Calls are rejected without invoking the wrapped operation.
    Open,

    /// The reset timeout has elapsed; a trial call is allowed through.
    HalfOpen,
}

impl CircuitState {
    /// Returns true if calls may reach the wrapped operation.
    pub fn allows_execution(&self) -> bool {
        matches!(self, CircuitState::Closed | CircuitState::HalfOpen)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "Closed",
            CircuitState::Open => "Open",
            CircuitState::HalfOpen => "HalfOpen",
        }
    }
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
