use thiserror::Error;

/// Errors returned by [`CircuitBreaker::execute`](crate::CircuitBreaker::execute).
///
/// The wrapped operation's own failure is carried in [`Operation`] and never
/// reported as [`CircuitOpen`]; the two are distinct by contract.
///
/// [`Operation`]: BreakerError::Operation
/// [`CircuitOpen`]: BreakerError::CircuitOpen
#[derive(Debug, Error)]
pub enum BreakerError<E> {
    /// The breaker is open; the call was rejected without invoking the
    /// wrapped operation.
    #[error("circuit is open, execution blocked")]
    CircuitOpen,

    /// The wrapped operation was invoked and failed; its error is re-raised
    /// unchanged as the source.
    #[error("wrapped operation failed")]
    Operation(#[source] E),
}

impl<E> BreakerError<E> {
    /// Returns true if the call was rejected because the breaker is open.
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, BreakerError::CircuitOpen)
    }

    /// Returns the wrapped operation's error, if this is an operation failure.
    pub fn into_operation_error(self) -> Option<E> {
        match self {
            BreakerError::CircuitOpen => None,
            BreakerError::Operation(e) => Some(e),
        }
    }
}

/// Result type for circuit breaker executions.
pub type Result<T, E> = std::result::Result<T, BreakerError<E>>;
