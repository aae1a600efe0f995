//! MemoryAssignmentStore - process-local assignment store

use contracts::{Assignment, AssignmentId, AssignmentStore, ContractError, StoredAssignment};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Store that keeps assignments in memory, in save order
#[derive(Debug)]
pub struct MemoryAssignmentStore {
    name: String,
    assignments: RwLock<Vec<StoredAssignment>>,
}

impl MemoryAssignmentStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assignments: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored assignments
    pub async fn len(&self) -> usize {
        self.assignments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.assignments.read().await.is_empty()
    }
}

impl Default for MemoryAssignmentStore {
    fn default() -> Self {
        Self::new("memory")
    }
}

impl AssignmentStore for MemoryAssignmentStore {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "memory_store_save",
        skip(self, assignment),
        fields(store = %self.name, items = assignment.items.len())
    )]
    async fn save(&self, assignment: Assignment) -> Result<StoredAssignment, ContractError> {
        let stored = StoredAssignment {
            id: AssignmentId::generate(),
            assignment,
        };
        self.assignments.write().await.push(stored.clone());
        debug!(store = %self.name, id = %stored.id, "Assignment saved");
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<StoredAssignment>, ContractError> {
        Ok(self.assignments.read().await.clone())
    }
}
