//! # Contact Distributor CLI
//!
//! Command-line entry point.
//!
//! - Configuration loading and validation
//! - Contact file upload and distribution
//! - Assignment and worker listings

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_lists, run_upload, run_validate, run_workers};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Contact Distributor CLI starting"
    );

    let result = match &cli.command {
        Commands::Upload(args) => run_upload(&cli.config, args).await,
        Commands::Lists(args) => run_lists(&cli.config, args).await,
        Commands::Workers(args) => run_workers(&cli.config, args).await,
        Commands::Validate(args) => run_validate(&cli.config, args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options (`RUST_LOG` takes precedence)
fn init_logging(cli: &Cli) -> Result<()> {
    let default_log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: None,
        default_log_level: default_log_level.to_string(),
    })
}
