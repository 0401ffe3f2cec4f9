//! Compliance suite for circuit breaker providers.
//!
//! Each check is generic over an async factory producing a fresh breaker
//! configured with `(failure_threshold, reset_timeout)`. A provider passes
//! the TCK when every check runs to completion against it; see
//! `tests/compliance.rs` for the reference run against
//! [`InMemoryCircuitBreaker`](crate::InMemoryCircuitBreaker).
//!
//! Timing checks wait with `tokio::time::sleep`, so in-process providers can
//! be verified under a paused clock (`#[tokio::test(start_paused = true)]`).

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use thiserror::Error;

use crate::{BreakerError, CircuitBreaker, CircuitState};

/// Error produced by [`FlakyOperation`] for its configured failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation failed as configured")]
pub struct TrialError;

/// Call-counting operation that fails a configured number of times before
/// succeeding. Providers' own test suites may reuse it.
#[derive(Debug, Default)]
pub struct FlakyOperation {
    calls: AtomicU32,
    fail_first: u32,
}

impl FlakyOperation {
    /// An operation that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// An operation that fails its first `times` invocations.
    pub fn failing(times: u32) -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail_first: times,
        }
    }

    /// Invokes the operation, returning `Err(TrialError)` while within the
    /// configured failure window.
    pub fn invoke(&self) -> Result<&'static str, TrialError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.fail_first {
            Err(TrialError)
        } else {
            Ok("success")
        }
    }

    /// Number of times the operation has been invoked.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

/// A new breaker starts in the Closed state.
pub async fn initial_state_is_closed<B, F, Fut>(factory: F)
where
    B: CircuitBreaker,
    F: Fn(u32, Duration) -> Fut,
    Fut: Future<Output = B>,
{
    let breaker = factory(3, Duration::from_secs(5)).await;
    assert_eq!(breaker.state().await, CircuitState::Closed);
}

/// A successful call executes normally in the Closed state.
pub async fn executes_successfully_while_closed<B, F, Fut>(factory: F)
where
    B: CircuitBreaker,
    F: Fn(u32, Duration) -> Fut,
    Fut: Future<Output = B>,
{
    let breaker = factory(3, Duration::from_secs(5)).await;
    let op = FlakyOperation::new();

    let result = breaker.execute(|| async { op.invoke() }).await;

    assert_eq!(result.expect("closed breaker must admit the call"), "success");
    assert_eq!(op.call_count(), 1);
    assert_eq!(breaker.state().await, CircuitState::Closed);
}

/// The breaker opens at the Nth consecutive failure, and while Open rejects
/// calls without invoking the wrapped operation.
pub async fn opens_after_consecutive_failures<B, F, Fut>(factory: F)
where
    B: CircuitBreaker,
    F: Fn(u32, Duration) -> Fut,
    Fut: Future<Output = B>,
{
    let breaker = factory(2, Duration::from_secs(5)).await;
    let op = FlakyOperation::failing(2);

    // First failure leaves the breaker closed.
    let first = breaker.execute(|| async { op.invoke() }).await;
    assert!(matches!(first, Err(BreakerError::Operation(TrialError))));
    assert_eq!(breaker.state().await, CircuitState::Closed);

    // Second failure reaches the threshold and trips the breaker.
    let second = breaker.execute(|| async { op.invoke() }).await;
    assert!(matches!(second, Err(BreakerError::Operation(TrialError))));
    assert_eq!(breaker.state().await, CircuitState::Open);

    // While open the call is rejected fast and the operation never runs.
    let rejected = breaker.execute(|| async { op.invoke() }).await;
    assert!(matches!(rejected, Err(BreakerError::CircuitOpen)));
    assert_eq!(
        op.call_count(),
        2,
        "the operation must not be invoked while the circuit is open"
    );
}

/// The breaker stays Open until the reset timeout elapses, then reads as
/// HalfOpen.
pub async fn transitions_to_half_open_after_timeout<B, F, Fut>(factory: F)
where
    B: CircuitBreaker,
    F: Fn(u32, Duration) -> Fut,
    Fut: Future<Output = B>,
{
    let breaker = factory(1, Duration::from_secs(1)).await;
    let op = FlakyOperation::failing(1);

    let tripped = breaker.execute(|| async { op.invoke() }).await;
    assert!(tripped.is_err());
    assert_eq!(breaker.state().await, CircuitState::Open);

    // Still within the timeout window.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(breaker.state().await, CircuitState::Open);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(breaker.state().await, CircuitState::HalfOpen);
}

/// A successful trial call closes the breaker.
pub async fn half_open_closes_on_success<B, F, Fut>(factory: F)
where
    B: CircuitBreaker,
    F: Fn(u32, Duration) -> Fut,
    Fut: Future<Output = B>,
{
    let breaker = factory(1, Duration::from_secs(1)).await;
    let op = FlakyOperation::failing(1);

    let tripped = breaker.execute(|| async { op.invoke() }).await;
    assert!(tripped.is_err());

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(breaker.state().await, CircuitState::HalfOpen);

    let trial = breaker.execute(|| async { op.invoke() }).await;
    assert_eq!(trial.expect("trial call must be admitted"), "success");
    assert_eq!(breaker.state().await, CircuitState::Closed);
}

/// A failed trial call reopens the breaker, regardless of the threshold.
pub async fn half_open_reopens_on_failure<B, F, Fut>(factory: F)
where
    B: CircuitBreaker,
    F: Fn(u32, Duration) -> Fut,
    Fut: Future<Output = B>,
{
    let breaker = factory(1, Duration::from_secs(1)).await;
    let op = FlakyOperation::failing(2);

    let tripped = breaker.execute(|| async { op.invoke() }).await;
    assert!(tripped.is_err());

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(breaker.state().await, CircuitState::HalfOpen);

    let trial = breaker.execute(|| async { op.invoke() }).await;
    assert!(matches!(trial, Err(BreakerError::Operation(TrialError))));
    assert_eq!(breaker.state().await, CircuitState::Open);
}

/// Full trip-and-recover cycle: consecutive failures open the breaker, the
/// open window rejects without invoking, the timeout admits a trial, and the
/// trial's success closes the circuit again.
pub async fn recovers_after_full_cycle<B, F, Fut>(factory: F)
where
    B: CircuitBreaker,
    F: Fn(u32, Duration) -> Fut,
    Fut: Future<Output = B>,
{
    let breaker = factory(2, Duration::from_secs(1)).await;
    let op = FlakyOperation::failing(2);

    for _ in 0..2 {
        let failed = breaker.execute(|| async { op.invoke() }).await;
        assert!(matches!(failed, Err(BreakerError::Operation(TrialError))));
    }
    assert_eq!(breaker.state().await, CircuitState::Open);

    let rejected = breaker.execute(|| async { op.invoke() }).await;
    assert!(matches!(rejected, Err(BreakerError::CircuitOpen)));
    assert_eq!(op.call_count(), 2);

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(breaker.state().await, CircuitState::HalfOpen);

    let trial = breaker.execute(|| async { op.invoke() }).await;
    assert_eq!(trial.expect("recovered downstream must close the breaker"), "success");
    assert_eq!(breaker.state().await, CircuitState::Closed);
}

/// The wrapped operation's error is re-raised unchanged, never swallowed or
/// converted into the fail-fast signal.
pub async fn operation_errors_propagate_unchanged<B, F, Fut>(factory: F)
where
    B: CircuitBreaker,
    F: Fn(u32, Duration) -> Fut,
    Fut: Future<Output = B>,
{
    let breaker = factory(3, Duration::from_secs(5)).await;
    let op = FlakyOperation::failing(1);

    let err = breaker
        .execute(|| async { op.invoke() })
        .await
        .expect_err("configured failure must surface");

    assert!(!err.is_circuit_open());
    assert_eq!(err.into_operation_error(), Some(TrialError));
}
