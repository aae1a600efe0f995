//! Build the configured store and registry from `ServiceConfig`

use contracts::{
    Assignment, AssignmentStore, ContractError, ServiceConfig, StorageBackend, StoredAssignment,
    Worker, WorkerRegistry,
};
use tracing::info;

use crate::{JsonFileAssignmentStore, JsonWorkerRegistry, MemoryAssignmentStore, StaticWorkerRegistry};

/// Assignment store selected by `[storage] backend`
#[derive(Debug)]
pub enum ConfiguredStore {
    Memory(MemoryAssignmentStore),
    JsonFile(JsonFileAssignmentStore),
}

impl ConfiguredStore {
    /// Open the store described by the config
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ContractError> {
        let store = match config.storage.backend {
            StorageBackend::Memory => Self::Memory(MemoryAssignmentStore::default()),
            StorageBackend::JsonFile => {
                let store = JsonFileAssignmentStore::new("json_file", &config.storage.path)
                    .map_err(|e| {
                        ContractError::persistence(
                            "json_file",
                            format!("{}: {e}", config.storage.path.display()),
                        )
                    })?;
                Self::JsonFile(store)
            }
        };
        info!(store = store.name(), "Assignment store ready");
        Ok(store)
    }
}

impl AssignmentStore for ConfiguredStore {
    fn name(&self) -> &str {
        match self {
            Self::Memory(store) => store.name(),
            Self::JsonFile(store) => store.name(),
        }
    }

    async fn save(&self, assignment: Assignment) -> Result<StoredAssignment, ContractError> {
        match self {
            Self::Memory(store) => store.save(assignment).await,
            Self::JsonFile(store) => store.save(assignment).await,
        }
    }

    async fn list_all(&self) -> Result<Vec<StoredAssignment>, ContractError> {
        match self {
            Self::Memory(store) => store.list_all().await,
            Self::JsonFile(store) => store.list_all().await,
        }
    }
}

/// Worker registry selected by config: `[registry] path` wins over
/// inline `[[workers]]`
#[derive(Debug, Clone)]
pub enum ConfiguredRegistry {
    Static(StaticWorkerRegistry),
    JsonFile(JsonWorkerRegistry),
}

impl ConfiguredRegistry {
    pub fn from_config(config: &ServiceConfig) -> Self {
        match &config.registry {
            Some(registry) => Self::JsonFile(JsonWorkerRegistry::new("json_file", &registry.path)),
            None => Self::Static(StaticWorkerRegistry::from_config(&config.workers)),
        }
    }
}

impl WorkerRegistry for ConfiguredRegistry {
    fn name(&self) -> &str {
        match self {
            Self::Static(registry) => registry.name(),
            Self::JsonFile(registry) => registry.name(),
        }
    }

    async fn list_workers(&self) -> Result<Vec<Worker>, ContractError> {
        match self {
            Self::Static(registry) => registry.list_workers().await,
            Self::JsonFile(registry) => registry.list_workers().await,
        }
    }
}
