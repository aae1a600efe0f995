//! Worker registries

use std::collections::HashSet;
use std::path::PathBuf;

use contracts::{ContractError, Worker, WorkerConfig, WorkerRegistry};
use tracing::{debug, instrument};

/// Registry holding a fixed worker list
#[derive(Debug, Clone)]
pub struct StaticWorkerRegistry {
    name: String,
    workers: Vec<Worker>,
}

impl StaticWorkerRegistry {
    pub fn new(name: impl Into<String>, workers: Vec<Worker>) -> Self {
        Self {
            name: name.into(),
            workers,
        }
    }

    /// Build from `[[workers]]` config entries, keeping their order
    pub fn from_config(workers: &[WorkerConfig]) -> Self {
        Self::new("static", workers.iter().map(Worker::from).collect())
    }
}

impl WorkerRegistry for StaticWorkerRegistry {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_workers(&self) -> Result<Vec<Worker>, ContractError> {
        Ok(self.workers.clone())
    }
}

/// Registry backed by a JSON array file, re-read on every snapshot
///
/// Edits to the file are picked up by the next upload without a restart.
#[derive(Debug, Clone)]
pub struct JsonWorkerRegistry {
    name: String,
    path: PathBuf,
}

impl JsonWorkerRegistry {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl WorkerRegistry for JsonWorkerRegistry {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "json_registry_list",
        skip(self),
        fields(registry = %self.name, path = %self.path.display())
    )]
    async fn list_workers(&self) -> Result<Vec<Worker>, ContractError> {
        let body = tokio::fs::read(&self.path).await.map_err(|e| {
            ContractError::registry(&self.name, format!("{}: {e}", self.path.display()))
        })?;

        let workers: Vec<Worker> = serde_json::from_slice(&body).map_err(|e| {
            ContractError::registry(&self.name, format!("{}: {e}", self.path.display()))
        })?;

        let mut seen = HashSet::with_capacity(workers.len());
        if let Some(dup) = workers.iter().find(|w| !seen.insert(w.id.as_str())) {
            return Err(ContractError::registry(
                &self.name,
                format!("{}: duplicate worker id '{}'", self.path.display(), dup.id),
            ));
        }

        debug!(registry = %self.name, workers = workers.len(), "Worker snapshot loaded");
        Ok(workers)
    }
}
