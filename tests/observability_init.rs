//! Process-wide observability setup.
//!
//! Kept in its own test binary: these tests install the global tracing
//! subscriber, which would otherwise leak output into unrelated tests.

use call_supervisor::config::ObservabilityConfig;
use call_supervisor::observability::{self, logging, metrics};

fn install_existing_subscriber() {
    use tracing_subscriber::util::SubscriberInitExt;
    let _ = tracing_subscriber::registry().try_init();
}

#[test]
fn test_second_logging_init_fails() {
    install_existing_subscriber();
    assert!(logging::init_logging(&ObservabilityConfig::default()).is_err());
}

#[test]
fn test_metrics_switch_applied_when_logging_init_fails() {
    install_existing_subscriber();

    let mut config = ObservabilityConfig::default();
    config.metrics_enabled = false;
    assert!(observability::init(&config).is_err());
    assert!(!metrics::is_enabled());

    config.metrics_enabled = true;
    assert!(observability::init(&config).is_err());
    assert!(metrics::is_enabled());
}
