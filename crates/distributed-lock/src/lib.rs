//! Distributed lock contract for the resilience TCK.
//!
//! A lock manager grants exclusive, time-bounded ownership of a named
//! resource to one caller at a time. Acquisition is non-blocking: contention
//! is reported as `false`, never as an error, and expiry is evaluated lazily
//! on the next acquire rather than by a background sweep.

pub mod contract;
pub mod lock;
pub mod memory;

pub use lock::{DistributedLock, DistributedLockExt, LockManager};
pub use memory::{InMemoryLock, InMemoryLockManager};
