//! AssignmentStore trait - persistence collaborator
//!
//! Defines the abstract save/query interface for assignments.

use crate::{Assignment, ContractError, StoredAssignment};

/// Assignment persistence trait
///
/// All store implementations must implement this trait. A store never
/// exposes a partially written assignment.
#[trait_variant::make(AssignmentStore: Send)]
pub trait LocalAssignmentStore {
    /// Store name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Persist a new assignment and return its stored form
    ///
    /// # Errors
    /// Returns a `Persistence` error (should include context)
    async fn save(&self, assignment: Assignment) -> Result<StoredAssignment, ContractError>;

    /// List every stored assignment, oldest first
    async fn list_all(&self) -> Result<Vec<StoredAssignment>, ContractError>;
}
