use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::{BreakerError, CircuitBreaker, CircuitState};

/// In-memory circuit breaker for validating the contract suite.
///
/// State reads and outcome recording run under one mutex per breaker; the
/// wrapped operation itself runs outside the critical section. Concurrent
/// trial calls in HalfOpen may therefore both execute, but the resulting
/// transition is serialized and reflects the last completing trial.
#[derive(Clone)]
pub struct InMemoryCircuitBreaker {
    failure_threshold: u32,
    reset_timeout: Duration,
    inner: Arc<Mutex<BreakerInner>>,
}

struct BreakerInner {
    state: CircuitState,
    failure_count: u32,
    opened_at: Option<Instant>,
}

impl InMemoryCircuitBreaker {
    /// Creates a breaker that trips after `failure_threshold` consecutive
    /// failures and probes for recovery after `reset_timeout`.
    ///
    /// `failure_threshold` must be at least 1 and `reset_timeout` non-zero.
    pub fn new(failure_threshold: u32, reset_timeout: Duration) -> Self {
        Self {
            failure_threshold,
            reset_timeout,
            inner: Arc::new(Mutex::new(BreakerInner {
                state: CircuitState::Closed,
                failure_count: 0,
                opened_at: None,
            })),
        }
    }

    /// Returns the number of consecutive failures recorded since the breaker
    /// last entered Closed.
    pub async fn failure_count(&self) -> u32 {
        self.inner.lock().await.failure_count
    }
}

impl BreakerInner {
    /// Applies the lazy Open -> HalfOpen transition and returns the state.
    fn current_state(&mut self, reset_timeout: Duration) -> CircuitState {
        if self.state == CircuitState::Open
            && let Some(opened_at) = self.opened_at
            && Instant::now() >= opened_at + reset_timeout
        {
            self.state = CircuitState::HalfOpen;
            tracing::debug!("reset timeout elapsed, breaker is half-open");
        }
        self.state
    }

    fn record_success(&mut self) {
        // Any success closes the breaker; the failure count resets only here.
        self.state = CircuitState::Closed;
        self.failure_count = 0;
    }

    fn record_failure(&mut self, failure_threshold: u32) {
        self.failure_count += 1;

        let should_open = match self.state {
            // A single failed trial always reopens, regardless of threshold.
            CircuitState::HalfOpen => true,
            CircuitState::Closed => self.failure_count >= failure_threshold,
            CircuitState::Open => false,
        };

        if should_open {
            self.open_circuit();
        }
    }

    fn open_circuit(&mut self) {
        self.state = CircuitState::Open;
        self.opened_at = Some(Instant::now());
        metrics::counter!("circuit_breaker_opened_total").increment(1);
        tracing::warn!(
            failures = self.failure_count,
            "circuit opened, rejecting calls"
        );
    }
}

#[async_trait]
impl CircuitBreaker for InMemoryCircuitBreaker {
    async fn state(&self) -> CircuitState {
        self.inner.lock().await.current_state(self.reset_timeout)
    }

    async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = std::result::Result<T, E>> + Send,
        T: Send,
        E: Send,
    {
        {
            let mut inner = self.inner.lock().await;
            if inner.current_state(self.reset_timeout) == CircuitState::Open {
                metrics::counter!("circuit_breaker_rejected_total").increment(1);
                return Err(BreakerError::CircuitOpen);
            }
        }

        // The operation runs outside the mutex: a trial must not hold the
        // breaker's critical section while awaiting the downstream.
        match operation().await {
            Ok(value) => {
                self.inner.lock().await.record_success();
                Ok(value)
            }
            Err(err) => {
                self.inner
                    .lock()
                    .await
                    .record_failure(self.failure_threshold);
                Err(BreakerError::Operation(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{FlakyOperation, TrialError};

    #[tokio::test]
    async fn success_resets_failure_count() {
        let breaker = InMemoryCircuitBreaker::new(3, Duration::from_secs(5));
        let op = FlakyOperation::failing(1);

        let first = breaker.execute(|| async { op.invoke() }).await;
        assert!(matches!(first, Err(BreakerError::Operation(TrialError))));
        assert_eq!(breaker.failure_count().await, 1);

        let second = breaker.execute(|| async { op.invoke() }).await;
        assert!(second.is_ok());
        assert_eq!(breaker.failure_count().await, 0);
        assert_eq!(breaker.state().await, CircuitState::Closed);
    }

    #[tokio::test]
    async fn failure_count_is_not_reset_on_open() {
        let breaker = InMemoryCircuitBreaker::new(2, Duration::from_secs(5));
        let op = FlakyOperation::failing(2);

        for _ in 0..2 {
            let _ = breaker.execute(|| async { op.invoke() }).await;
        }

        assert_eq!(breaker.state().await, CircuitState::Open);
        assert_eq!(breaker.failure_count().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn reading_state_performs_lazy_transition() {
        let breaker = InMemoryCircuitBreaker::new(1, Duration::from_secs(1));
        let op = FlakyOperation::failing(1);

        let _ = breaker.execute(|| async { op.invoke() }).await;
        assert_eq!(breaker.state().await, CircuitState::Open);

        // No execute in between: the read alone must observe the transition.
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(breaker.state().await, CircuitState::HalfOpen);
    }

    #[tokio::test]
    async fn open_breaker_rejects_without_invoking() {
        let breaker = InMemoryCircuitBreaker::new(1, Duration::from_secs(60));
        let op = FlakyOperation::failing(1);

        let _ = breaker.execute(|| async { op.invoke() }).await;
        assert_eq!(breaker.state().await, CircuitState::Open);

        let rejected = breaker.execute(|| async { op.invoke() }).await;
        assert!(matches!(rejected, Err(BreakerError::CircuitOpen)));
        assert_eq!(op.call_count(), 1);
    }

    #[tokio::test]
    async fn breaker_is_shareable_across_tasks() {
        let breaker = InMemoryCircuitBreaker::new(5, Duration::from_secs(5));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let breaker = breaker.clone();
            handles.push(tokio::spawn(async move {
                breaker
                    .execute(|| async { Ok::<_, TrialError>("ok") })
                    .await
                    .unwrap()
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), "ok");
        }
        assert_eq!(breaker.state().await, CircuitState::Closed);
    }
}
