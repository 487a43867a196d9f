//! Failure-aware call supervisor (circuit breaker) library.

pub mod config;
pub mod observability;
pub mod resilience;

pub use config::SupervisorConfig;
pub use resilience::{AsyncCircuitBreaker, BreakerOpen, CallError, CircuitBreaker, CircuitState};
