//! Circuit breaker state machine.
//!
//! # States
//! - Closed: calls pass through, consecutive failures are counted
//! - Open: calls are rejected without running the operation
//! - Half-Open: one probe call is running to test recovery
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive failures >= failure_threshold
//! Open → Half-Open: first call after open_timeout has elapsed since the last failure
//! Half-Open → Closed: probe succeeds
//! Half-Open → Open: probe fails (a fresh open_timeout window starts)
//! ```
//!
//! # Design Decisions
//! - The core is a plain struct; callers own the locking
//! - Timeout is evaluated lazily against the stored failure instant
//! - Failed probes re-arm a fixed window, no backoff

use std::fmt;
use std::time::{Duration, Instant};
use serde::Serialize;

use super::circuit_breaker::BreakerConfigError;

/// Circuit state.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed = 0,
    Open = 1,
    HalfOpen = 2,
}

impl CircuitState {
    /// Stable lowercase name, used as a log field and metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half_open",
        }
    }
}

impl From<u8> for CircuitState {
    fn from(val: u8) -> Self {
        match val {
            1 => CircuitState::Open,
            2 => CircuitState::HalfOpen,
            _ => CircuitState::Closed,
        }
    }
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable tripping policy of one breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Policy {
    /// Consecutive failures in Closed that trip the breaker.
    pub(crate) failure_threshold: u32,
    /// Minimum time spent Open before a probe is admitted.
    pub(crate) open_timeout: Duration,
}

impl Policy {
    pub(crate) fn new(
        failure_threshold: u32,
        open_timeout: Duration,
    ) -> Result<Self, BreakerConfigError> {
        if failure_threshold == 0 {
            return Err(BreakerConfigError::ZeroThreshold);
        }
        Ok(Self {
            failure_threshold,
            open_timeout,
        })
    }
}

/// Mutable breaker state. Every method must be called under the owner's lock.
#[derive(Debug)]
pub(crate) struct BreakerCore {
    state: CircuitState,
    consecutive_failures: u32,
    last_failure: Option<Instant>,
}

impl BreakerCore {
    pub(crate) fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
            last_failure: None,
        }
    }

    pub(crate) fn state(&self) -> CircuitState {
        self.state
    }

    pub(crate) fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Decide whether a call may run.
    ///
    /// Returns the state the call runs under, or the remaining open window
    /// when the call must be rejected. An expired Open window moves the
    /// breaker to Half-Open and makes this call the probe.
    pub(crate) fn admit(
        &mut self,
        policy: &Policy,
        now: Instant,
    ) -> Result<CircuitState, Duration> {
        if self.state == CircuitState::Open {
            let elapsed = self
                .last_failure
                .map(|at| now.saturating_duration_since(at))
                .unwrap_or(Duration::MAX);

            if elapsed > policy.open_timeout {
                self.state = CircuitState::HalfOpen;
                self.consecutive_failures = 0;
            } else {
                return Err(policy.open_timeout - elapsed);
            }
        }
        Ok(self.state)
    }

    /// Record a successful call admitted under `prior`.
    pub(crate) fn record_success(&mut self, prior: CircuitState) {
        if prior == CircuitState::HalfOpen {
            self.state = CircuitState::Closed;
        }
        self.consecutive_failures = 0;
    }

    /// Record a failed call admitted under `prior`.
    pub(crate) fn record_failure(&mut self, policy: &Policy, prior: CircuitState, now: Instant) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_failure = Some(now);

        match prior {
            CircuitState::HalfOpen => self.state = CircuitState::Open,
            _ => {
                if self.consecutive_failures >= policy.failure_threshold {
                    self.state = CircuitState::Open;
                }
            }
        }
    }
}
