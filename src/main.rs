//! Call supervisor management CLI.
//!
//! ```text
//! call-supervisor check supervisor.toml   # validate, print effective config as JSON
//! call-supervisor defaults                # print the default config as TOML
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use call_supervisor::config::{load_config, SupervisorConfig};
use call_supervisor::observability;

#[derive(Parser)]
#[command(name = "call-supervisor")]
#[command(about = "Inspect circuit breaker configuration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a configuration file
    Check {
        /// Path to the TOML configuration
        path: PathBuf,
    },
    /// Print the default configuration
    Defaults,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { path } => {
            let config = match load_config(&path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: {}: {}", path.display(), e);
                    return Ok(ExitCode::FAILURE);
                }
            };

            observability::init(&config.observability)?;
            tracing::info!(
                path = %path.display(),
                failure_threshold = config.breaker.failure_threshold,
                open_timeout_ms = config.breaker.open_timeout_ms,
                call_timeout_ms = ?config.timeouts.call_ms,
                "Configuration loaded"
            );

            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Defaults => {
            print!("{}", toml::to_string_pretty(&SupervisorConfig::default())?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
