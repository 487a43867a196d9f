//! Circuit breaker for protecting a single downstream operation.
//!
//! # Responsibilities
//! - Run the operation while Closed, counting consecutive failures
//! - Fail fast while Open, without touching the operation
//! - Admit exactly one probe once the open timeout has elapsed
//!
//! # Design Decisions
//! - One breaker per protected operation (no registry, no global state)
//! - A single mutex is held for the whole call, so calls through one
//!   breaker are serialized and only the transitioning caller runs the probe
//! - `state()` reads an atomic snapshot and never waits for the lock
//! - Operation errors are returned untouched inside `CallError::Operation`

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;

use crate::config::BreakerConfig;
use crate::observability::metrics;
use super::clock::{Clock, SystemClock};
use super::state::{BreakerCore, CircuitState, Policy};

/// Invalid breaker construction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BreakerConfigError {
    #[error("failure threshold must be at least 1")]
    ZeroThreshold,
}

/// A call was rejected because the breaker is open.
///
/// The protected operation was not invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("circuit breaker '{name}' is open (retry after {retry_after:?})")]
pub struct BreakerOpen {
    /// Name of the rejecting breaker.
    pub name: String,
    /// Time left until a probe will be admitted.
    pub retry_after: Duration,
}

/// Outcome of a supervised call that did not succeed.
#[derive(Debug, Error)]
pub enum CallError<E> {
    /// Rejected by policy; the operation never ran.
    #[error(transparent)]
    Open(#[from] BreakerOpen),

    /// The operation ran and returned this error.
    #[error(transparent)]
    Operation(E),
}

impl<E> CallError<E> {
    /// True if the call was rejected without running the operation.
    pub fn is_rejected(&self) -> bool {
        matches!(self, CallError::Open(_))
    }

    /// The rejection, if this is one.
    pub fn rejection(&self) -> Option<&BreakerOpen> {
        match self {
            CallError::Open(open) => Some(open),
            CallError::Operation(_) => None,
        }
    }

    /// The operation's own error, if it ran.
    pub fn into_operation_error(self) -> Option<E> {
        match self {
            CallError::Open(_) => None,
            CallError::Operation(e) => Some(e),
        }
    }
}

/// Lock-free view of a breaker, republished after every locked update.
#[derive(Debug)]
pub(crate) struct Snapshot {
    name: String,
    state: AtomicU8,
    failures: AtomicU32,
}

impl Snapshot {
    pub(crate) fn new(name: String) -> Self {
        metrics::record_state(&name, CircuitState::Closed);
        Self {
            name,
            state: AtomicU8::new(CircuitState::Closed as u8),
            failures: AtomicU32::new(0),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn state(&self) -> CircuitState {
        CircuitState::from(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn failures(&self) -> u32 {
        self.failures.load(Ordering::Acquire)
    }

    /// Publish the core after an update that started in state `before`.
    pub(crate) fn publish(&self, core: &BreakerCore, before: CircuitState) {
        let after = core.state();
        self.failures.store(core.consecutive_failures(), Ordering::Release);
        self.state.store(after as u8, Ordering::Release);

        if after == before {
            return;
        }

        match after {
            CircuitState::Open => tracing::warn!(
                breaker = %self.name,
                from = %before,
                failures = core.consecutive_failures(),
                "Circuit breaker opened"
            ),
            CircuitState::HalfOpen => tracing::info!(
                breaker = %self.name,
                "Circuit breaker half-open, admitting probe"
            ),
            CircuitState::Closed => tracing::info!(
                breaker = %self.name,
                "Circuit breaker closed, dependency recovered"
            ),
        }
        metrics::record_transition(&self.name, before, after);
    }

    /// Build the rejection for a call arriving while open.
    pub(crate) fn reject(&self, retry_after: Duration) -> BreakerOpen {
        tracing::debug!(
            breaker = %self.name,
            retry_after_ms = retry_after.as_millis() as u64,
            "Call rejected, circuit open"
        );
        metrics::record_rejection(&self.name);
        BreakerOpen {
            name: self.name.clone(),
            retry_after,
        }
    }

    pub(crate) fn record_outcome(&self, success: bool) {
        metrics::record_call(&self.name, if success { "success" } else { "failure" });
    }
}

/// Blocking circuit breaker.
///
/// ```
/// use std::time::Duration;
/// use call_supervisor::resilience::{CallError, CircuitBreaker, CircuitState};
///
/// let breaker = CircuitBreaker::new("inventory", 1, Duration::from_secs(30)).unwrap();
///
/// let failed: Result<(), CallError<&str>> = breaker.call(|| Err("connection refused"));
/// assert!(matches!(failed, Err(CallError::Operation("connection refused"))));
/// assert_eq!(breaker.state(), CircuitState::Open);
///
/// let rejected = breaker.call(|| Ok::<_, &str>(()));
/// assert!(rejected.unwrap_err().is_rejected());
/// ```
#[derive(Debug)]
pub struct CircuitBreaker<C: Clock = SystemClock> {
    policy: Policy,
    clock: C,
    core: Mutex<BreakerCore>,
    snapshot: Snapshot,
}

impl CircuitBreaker {
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

impl<C: Clock> CircuitBreaker<C> {
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

    /// Current state. Never blocks, even while a call is in progress.
    pub fn state(&self) -> CircuitState {
        self.snapshot.state()
    }

    /// Consecutive failures counted so far.
    pub fn consecutive_failures(&self) -> u32 {
        self.snapshot.failures()
    }

    pub fn failure_threshold(&self) -> u32 {
        self.policy.failure_threshold
    }

    pub fn open_timeout(&self) -> Duration {
        self.policy.open_timeout
    }

    /// Run `operation` under the breaker's supervision.
    ///
    /// The operation runs on the calling thread with the breaker lock held.
    /// A hung operation blocks every other caller of this breaker; wrap it in
    /// its own deadline if that matters.
    pub fn call<T, E, F>(&self, operation: F) -> Result<T, CallError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        // A panicking operation leaves the core as admitted; its outcome is simply not recorded.
        let mut core = self.core.lock().unwrap_or_else(PoisonError::into_inner);

        let before = core.state();
        let admitted = core.admit(&self.policy, self.clock.now());
        self.snapshot.publish(&core, before);

        let prior = match admitted {
            Ok(prior) => prior,
            Err(retry_after) => return Err(self.snapshot.reject(retry_after).into()),
        };

        let result = operation();

        match &result {
            Ok(_) => core.record_success(prior),
            Err(_) => core.record_failure(&self.policy, prior, self.clock.now()),
        }
        self.snapshot.record_outcome(result.is_ok());
        self.snapshot.publish(&core, prior);

        result.map_err(CallError::Operation)
    }
}
