//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Breakers produce:
//!     → logging.rs (structured log events on transitions and rejections)
//!     → metrics.rs (counters, state gauge)
//!
//! Consumers:
//!     → Log aggregation (stderr, pretty or JSON)
//!     → Whatever metrics recorder the application installs
//! ```

pub mod logging;
pub mod metrics;

use crate::config::ObservabilityConfig;

pub use logging::LoggingError;

/// Apply the `[observability]` section: toggle metrics, install logging.
///
/// The metrics switch is applied even when logging fails to install.
pub fn init(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    metrics::set_enabled(config.metrics_enabled);
    if config.metrics_enabled {
        metrics::describe_metrics();
    }
    logging::init_logging(config)
}
