//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SupervisorConfig (validated, immutable)
//!     → BreakerConfig handed to CircuitBreaker::from_config
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a breaker's policy never changes
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::BreakerConfig;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::SupervisorConfig;
pub use schema::TimeoutConfig;
pub use validation::ValidationError;
