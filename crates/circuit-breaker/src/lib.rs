//! Circuit breaker contract for the resilience TCK.
//!
//! A circuit breaker gates execution of a fallible operation: it fails fast
//! while the downstream is known-bad and probes for recovery after a timeout.
//! This crate defines the behavioral contract ([`CircuitBreaker`]), the
//! compliance suite any provider must pass ([`contract`]), and an in-memory
//! reference implementation used to validate the contract itself.

pub mod breaker;
pub mod contract;
pub mod error;
pub mod memory;
pub mod state;

pub use breaker::CircuitBreaker;
pub use error::{BreakerError, Result};
pub use memory::InMemoryCircuitBreaker;
pub use state::CircuitState;
