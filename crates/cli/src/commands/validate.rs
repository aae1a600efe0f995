//! `validate` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::{ServiceConfig, StorageBackend};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    max_upload_bytes: u64,
    storage_backend: String,
    storage_path: String,
    worker_source: String,
    worker_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(config_path: &Path, args: &ValidateArgs) -> Result<()> {
    info!(config = %config_path.display(), "Validating configuration");

    let result = validate_config(config_path);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(path: &Path) -> ValidationResult {
    let config_path = path.display().to_string();

    if !path.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", path.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(path) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(summarize(&config)),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

fn summarize(config: &ServiceConfig) -> ConfigSummary {
    let (worker_source, worker_count) = match &config.registry {
        Some(registry) => (format!("file {}", registry.path.display()), 0),
        None => ("inline".to_string(), config.workers.len()),
    };

    ConfigSummary {
        version: format!("{:?}", config.version),
        max_upload_bytes: config.ingestion.max_upload_bytes,
        storage_backend: format!("{:?}", config.storage.backend),
        storage_path: config.storage.path.display().to_string(),
        worker_source,
        worker_count,
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &ServiceConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.registry.is_none() && config.workers.is_empty() {
        warnings.push("No workers configured - every upload will be rejected".to_string());
    }

    if config.registry.is_some() && !config.workers.is_empty() {
        warnings.push("[registry] is set - inline [[workers]] are ignored".to_string());
    }

    if config.storage.backend == StorageBackend::Memory {
        warnings.push("Memory storage - assignments are lost when the process exits".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Max upload: {} bytes", summary.max_upload_bytes);
            println!(
                "  Storage: {} ({})",
                summary.storage_backend, summary.storage_path
            );
            println!("  Workers: {}", summary.worker_source);
            if summary.worker_count > 0 {
                println!("  Worker count: {}", summary.worker_count);
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
