use std::future::Future;

use async_trait::async_trait;

use crate::{BreakerError, CircuitState};

/// Core trait for circuit breaker providers.
///
/// A breaker gates a fallible operation behind a Closed/Open/HalfOpen state
/// machine. All implementations must be thread-safe (Send + Sync) and must
/// serialize state reads and outcome recording per breaker instance, so that
/// the transition out of HalfOpen is deterministic under concurrent trials.
#[async_trait]
pub trait CircuitBreaker: Send + Sync {
    /// Returns the current state of the breaker.
    ///
    /// Reading the state re-evaluates the reset timeout: an Open breaker
    /// whose timeout has elapsed becomes HalfOpen as a side effect of the
    /// read. In wall-clock terms this is not a pure read.
    async fn state(&self) -> CircuitState;

    /// Runs `operation` through the breaker.
    ///
    /// While Open, returns [`BreakerError::CircuitOpen`] without invoking the
    /// operation. Otherwise the operation runs; its failure is recorded and
    /// re-raised unchanged as [`BreakerError::Operation`], and its success
    /// resets the breaker to Closed.
    async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = std::result::Result<T, E>> + Send,
        T: Send,
        E: Send;
}
