//! Assignment - Distribution engine output
//!
//! The persisted aggregate of one distribution run, and its query views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{ContactRecord, WorkerId};

/// One contact bound to exactly one worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentItem {
    /// Validated contact
    #[serde(flatten)]
    pub record: ContactRecord,

    /// Worker the contact was assigned to (member of the run's snapshot)
    pub worker_id: WorkerId,
}

/// Result of one distribution run
///
/// Created once per successful upload and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Name of the uploaded file
    pub file_name: String,

    /// Worker-bound contacts, in source order of the valid rows
    pub items: Vec<AssignmentItem>,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Rows produced by the normalizer, valid or not
    #[serde(default)]
    pub total_rows: usize,
}

impl Assignment {
    /// Number of contacts that made it into the assignment
    pub fn processed(&self) -> usize {
        self.items.len()
    }

    /// Number of source rows dropped by validation
    pub fn dropped(&self) -> usize {
        self.total_rows.saturating_sub(self.items.len())
    }

    /// Items assigned to one worker, in assignment order
    pub fn items_for<'a>(
        &'a self,
        worker_id: &'a str,
    ) -> impl Iterator<Item = &'a AssignmentItem> + 'a {
        self.items.iter().filter(move |item| item.worker_id == worker_id)
    }
}

/// Identifier issued by an assignment store
///
/// UUID v7, so identifiers sort by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId(Uuid);

impl AssignmentId {
    /// Issue a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An assignment together with its store identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAssignment {
    /// Store-issued identifier
    pub id: AssignmentId,

    /// The persisted aggregate
    #[serde(flatten)]
    pub assignment: Assignment,
}

/// Display attributes of a worker, as shown in listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSummary {
    pub id: WorkerId,
    pub name: String,
    pub email: String,
}

/// Assignment item with its worker resolved for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedItem {
    #[serde(flatten)]
    pub record: ContactRecord,

    /// Raw worker id as stored
    pub worker_id: WorkerId,

    /// `None` when the worker is no longer registered
    pub worker: Option<WorkerSummary>,
}

/// Stored assignment with every item resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAssignment {
    pub id: AssignmentId,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
    pub total_rows: usize,
    pub items: Vec<ResolvedItem>,
}

/// Item count for one worker within an assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerLoad {
    pub worker_id: WorkerId,

    /// Display name, `None` when unresolved
    pub name: Option<String>,

    pub items: usize,
}
