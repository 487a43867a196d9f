//! Circuit breaker for async operations.
//!
//! Same state machine as [`CircuitBreaker`](super::CircuitBreaker), guarded by
//! a `tokio::sync::Mutex` held across the operation's `.await`. Callers queue
//! on the lock instead of blocking a worker thread.

use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::config::BreakerConfig;
use super::circuit_breaker::{BreakerConfigError, CallError, Snapshot};
use super::clock::{Clock, SystemClock};
use super::state::{BreakerCore, CircuitState, Policy};
use super::timeouts::{with_timeout, TimeoutError};

/// Async circuit breaker.
#[derive(Debug)]
pub struct AsyncCircuitBreaker<C: Clock = SystemClock> {
    policy: Policy,
    clock: C,
    core: Mutex<BreakerCore>,
    snapshot: Snapshot,
}

impl AsyncCircuitBreaker {
    /// Create a breaker on the system clock.
    pub fn new(
        name: impl Into<String>,
        failure_threshold: u32,
        open_timeout: Duration,
    ) -> Result<Self, BreakerConfigError> {
        Self::with_clock(name, failure_threshold, open_timeout, SystemClock)
    }

    /// Create a breaker from the `[breaker]` configuration section.
    pub fn from_config(
        name: impl Into<String>,
        config: &BreakerConfig,
    ) -> Result<Self, BreakerConfigError> {
        Self::new(name, config.failure_threshold, config.open_timeout())
    }
}

impl<C: Clock> AsyncCircuitBreaker<C> {
    /// Create a breaker reading time from `clock`.
    pub fn with_clock(
        name: impl Into<String>,
        failure_threshold: u32,
        open_timeout: Duration,
        clock: C,
    ) -> Result<Self, BreakerConfigError> {
        let policy = Policy::new(failure_threshold, open_timeout)?;
        Ok(Self {
            policy,
            clock,
            core: Mutex::new(BreakerCore::new()),
            snapshot: Snapshot::new(name.into()),
        })
    }

    pub fn name(&self) -> &str {
        self.snapshot.name()
    }

    /// Current state. Never waits for an in-flight call.
    pub fn state(&self) -> CircuitState {
        self.snapshot.state()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.snapshot.failures()
    }

    pub fn failure_threshold(&self) -> u32 {
        self.policy.failure_threshold
    }

    pub fn open_timeout(&self) -> Duration {
        self.policy.open_timeout
    }

    /// Run the future produced by `operation` under supervision.
    ///
    /// If the returned future is dropped mid-call, the outcome is not
    /// recorded and the lock is released.
    pub async fn call<T, E, F, Fut>(&self, operation: F) -> Result<T, CallError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut core = self.core.lock().await;

        let before = core.state();
        let admitted = core.admit(&self.policy, self.clock.now());
        self.snapshot.publish(&core, before);

        let prior = match admitted {
            Ok(prior) => prior,
            Err(retry_after) => return Err(self.snapshot.reject(retry_after).into()),
        };

        let result = operation().await;

        match &result {
            Ok(_) => core.record_success(prior),
            Err(_) => core.record_failure(&self.policy, prior, self.clock.now()),
        }
        self.snapshot.record_outcome(result.is_ok());
        self.snapshot.publish(&core, prior);

        result.map_err(CallError::Operation)
    }

    /// Like [`call`](Self::call), with a deadline on the operation.
    ///
    /// An elapsed deadline is recorded as a failure.
    pub async fn call_with_timeout<T, E, F, Fut>(
        &self,
        deadline: Duration,
        operation: F,
    ) -> Result<T, CallError<TimeoutError<E>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.call(|| with_timeout(deadline, operation())).await
    }
}
