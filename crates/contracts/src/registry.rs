//! WorkerRegistry trait - source of the worker snapshot
//!
//! Worker lifecycle (create/update/delete) belongs to the registry; the
//! distribution engine only reads an ordered snapshot per run.

use serde::{Deserialize, Serialize};

use crate::{ContractError, WorkerId};

/// A distribution target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    /// Stable identifier
    pub id: WorkerId,

    /// Display name
    pub name: String,

    /// Contact email
    #[serde(default)]
    pub email: String,

    /// Contact phone
    #[serde(default)]
    pub mobile: String,
}

impl Worker {
    /// Create a worker with only id and name set
    pub fn new(id: impl Into<WorkerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: String::new(),
            mobile: String::new(),
        }
    }
}

/// Worker registry trait
///
/// Implementations return workers in the registry's natural order
/// (e.g. creation order). Callers treat the result as an immutable
/// snapshot for one distribution run.
#[trait_variant::make(WorkerRegistry: Send)]
pub trait LocalWorkerRegistry {
    /// Registry name (used for logging/errors)
    fn name(&self) -> &str;

    /// Take an ordered snapshot of all registered workers
    ///
    /// # Errors
    /// Returns a `Registry` error when the backing source is unreadable
    async fn list_workers(&self) -> Result<Vec<Worker>, ContractError>;
}
