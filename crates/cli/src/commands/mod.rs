//! Command implementations.

mod lists;
mod upload;
mod validate;
mod workers;

pub use lists::run_lists;
pub use upload::run_upload;
pub use validate::run_validate;
pub use workers::run_workers;

use std::path::Path;

use anyhow::{Context, Result};
use contracts::ServiceConfig;
use distribution::UploadPipeline;
use ingestion::NormalizerConfig;
use storage::{ConfiguredRegistry, ConfiguredStore};
use tracing::info;

/// Pipeline wired to the configured collaborators
pub(crate) type ConfiguredPipeline = UploadPipeline<ConfiguredRegistry, ConfiguredStore>;

/// Load and validate the service configuration
pub(crate) fn load_config(path: &Path) -> Result<ServiceConfig> {
    if !path.exists() {
        anyhow::bail!("Configuration file not found: {}", path.display());
    }

    let config = config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    info!(
        config = %path.display(),
        workers = config.workers.len(),
        registry = ?config.registry.as_ref().map(|r| r.path.display().to_string()),
        backend = ?config.storage.backend,
        "Configuration loaded"
    );
    Ok(config)
}

/// Build the upload pipeline from configuration
pub(crate) fn build_pipeline(config: &ServiceConfig) -> Result<ConfiguredPipeline> {
    let store = ConfiguredStore::from_config(config).context("Failed to open assignment store")?;
    let registry = ConfiguredRegistry::from_config(config);

    Ok(UploadPipeline::new(
        registry,
        store,
        NormalizerConfig::from(&config.ingestion),
    ))
}
