//! Metrics collection.
//!
//! # Responsibilities
//! - Define breaker metrics (calls, rejections, transitions, state)
//! - Record through the `metrics` facade; the embedding application
//!   installs whichever recorder/exporter it uses
//!
//! # Metrics
//! - `circuit_breaker_calls_total` (counter): executed calls by breaker, outcome
//! - `circuit_breaker_rejections_total` (counter): calls rejected while open
//! - `circuit_breaker_transitions_total` (counter): state changes by from, to
//! - `circuit_breaker_state` (gauge): 0=closed, 1=open, 2=half_open
//!
//! # Design Decisions
//! - Low-overhead metric updates; a no-op without an installed recorder
//! - Labelled by breaker name

use std::sync::atomic::{AtomicBool, Ordering};
use metrics::{counter, describe_counter, describe_gauge, gauge};

use crate::resilience::CircuitState;

static ENABLED: AtomicBool = AtomicBool::new(true);

/// Turn metric recording on or off for the whole process.
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Register descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(
        "circuit_breaker_calls_total",
        "Calls executed through a circuit breaker, by outcome"
    );
    describe_counter!(
        "circuit_breaker_rejections_total",
        "Calls rejected without execution because the breaker was open"
    );
    describe_counter!(
        "circuit_breaker_transitions_total",
        "Circuit breaker state transitions"
    );
    describe_gauge!(
        "circuit_breaker_state",
        "Current breaker state (0=closed, 1=open, 2=half_open)"
    );
}

pub fn record_call(breaker: &str, outcome: &'static str) {
    if !is_enabled() {
        return;
    }
    counter!(
        "circuit_breaker_calls_total",
        "breaker" => breaker.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_rejection(breaker: &str) {
    if !is_enabled() {
        return;
    }
    counter!("circuit_breaker_rejections_total", "breaker" => breaker.to_string()).increment(1);
}

pub fn record_state(breaker: &str, state: CircuitState) {
    if !is_enabled() {
        return;
    }
    gauge!("circuit_breaker_state", "breaker" => breaker.to_string()).set(state as u8 as f64);
}

pub fn record_transition(breaker: &str, from: CircuitState, to: CircuitState) {
    if !is_enabled() {
        return;
    }
    counter!(
        "circuit_breaker_transitions_total",
        "breaker" => breaker.to_string(),
        "from" => from.as_str(),
        "to" => to.as_str()
    )
    .increment(1);
    record_state(breaker, to);
}
