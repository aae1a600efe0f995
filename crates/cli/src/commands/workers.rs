//! `workers` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::WorkerRegistry;
use storage::ConfiguredRegistry;

use super::load_config;
use crate::cli::WorkersArgs;

/// Execute the `workers` command
pub async fn run_workers(config_path: &Path, args: &WorkersArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let registry = ConfiguredRegistry::from_config(&config);

    let workers = registry
        .list_workers()
        .await
        .with_context(|| format!("Failed to read workers from '{}'", registry.name()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&workers).context("Failed to serialize workers")?;
        println!("{}", json);
        return Ok(());
    }

    if workers.is_empty() {
        println!("No workers registered - uploads will be rejected");
        return Ok(());
    }

    println!("Workers ({}), in distribution order:", workers.len());
    for (slot, worker) in workers.iter().enumerate() {
        let contact = [worker.email.as_str(), worker.mobile.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {}. {} ({}) {}", slot + 1, worker.name, worker.id, contact);
    }
    Ok(())
}
