//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to a dependency:
//!     → circuit_breaker.rs / async_breaker.rs (admit, probe or reject)
//!     → timeouts.rs (optional deadline on the operation itself)
//!     → operation result recorded in state.rs
//! ```
//!
//! # Design Decisions
//! - One breaker supervises one operation; composition belongs to the caller
//! - Rejections are a distinct error type from operation failures
//! - Time comes from an injectable clock; no background timers

pub mod async_breaker;
pub mod circuit_breaker;
pub mod clock;
pub mod state;
pub mod timeouts;

pub use async_breaker::AsyncCircuitBreaker;
pub use circuit_breaker::{BreakerConfigError, BreakerOpen, CallError, CircuitBreaker};
pub use clock::{Clock, MockClock, SystemClock};
pub use state::CircuitState;
pub use timeouts::{with_timeout, TimeoutError};
