//! Assignment listing with worker resolution

use std::collections::HashMap;

use contracts::{
    AssignmentStore, ResolvedAssignment, ResolvedItem, StoredAssignment, Worker, WorkerLoad,
    WorkerRegistry, WorkerSummary,
};
use tracing::{debug, instrument};

use crate::error::DistributionError;

/// Read-side query over stored assignments
pub struct ListQuery<'a, S, R> {
    store: &'a S,
    registry: &'a R,
}

impl<'a, S, R> ListQuery<'a, S, R>
where
    S: AssignmentStore + Sync,
    R: WorkerRegistry + Sync,
{
    pub fn new(store: &'a S, registry: &'a R) -> Self {
        Self { store, registry }
    }

    /// Every stored assignment in store order, worker ids resolved against
    /// the current registry snapshot
    #[instrument(
        name = "list_query_list_all",
        skip(self),
        fields(store = self.store.name(), registry = self.registry.name())
    )]
    pub async fn list_all(&self) -> Result<Vec<ResolvedAssignment>, DistributionError> {
        let stored = self
            .store
            .list_all()
            .await
            .map_err(DistributionError::Persistence)?;
        let workers = self
            .registry
            .list_workers()
            .await
            .map_err(DistributionError::Registry)?;

        debug!(assignments = stored.len(), workers = workers.len(), "resolving");
        Ok(stored
            .into_iter()
            .map(|assignment| resolve_assignment(assignment, &workers))
            .collect())
    }
}

/// Resolve each item's worker id; unknown ids resolve to `None`
pub fn resolve_assignment(stored: StoredAssignment, workers: &[Worker]) -> ResolvedAssignment {
    let by_id: HashMap<&str, &Worker> = workers.iter().map(|w| (w.id.as_str(), w)).collect();

    let StoredAssignment { id, assignment } = stored;
    let items = assignment
        .items
        .into_iter()
        .map(|item| {
            let worker = by_id.get(item.worker_id.as_str()).map(|w| WorkerSummary {
                id: w.id.clone(),
                name: w.name.clone(),
                email: w.email.clone(),
            });
            ResolvedItem {
                record: item.record,
                worker_id: item.worker_id,
                worker,
            }
        })
        .collect();

    ResolvedAssignment {
        id,
        file_name: assignment.file_name,
        created_at: assignment.created_at,
        total_rows: assignment.total_rows,
        items,
    }
}

/// Per-worker counts of a resolved assignment, in first-appearance order
pub fn assignment_loads(resolved: &ResolvedAssignment) -> Vec<WorkerLoad> {
    let mut loads: Vec<WorkerLoad> = Vec::new();
    for item in &resolved.items {
        match loads.iter_mut().find(|l| l.worker_id == item.worker_id) {
            Some(load) => load.items += 1,
            None => loads.push(WorkerLoad {
                worker_id: item.worker_id.clone(),
                name: item.worker.as_ref().map(|w| w.name.clone()),
                items: 1,
            }),
        }
    }
    loads
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use contracts::{Assignment, AssignmentId, AssignmentItem, ContactRecord};
    use storage::{MemoryAssignmentStore, StaticWorkerRegistry};

    fn item(name: &str, worker: &str) -> AssignmentItem {
        AssignmentItem {
            record: ContactRecord {
                first_name: name.into(),
                phone: "1".into(),
                notes: String::new(),
            },
            worker_id: worker.into(),
        }
    }

    fn stored(items: Vec<AssignmentItem>) -> StoredAssignment {
        StoredAssignment {
            id: AssignmentId::generate(),
            assignment: Assignment {
                file_name: "leads.csv".into(),
                total_rows: items.len(),
                items,
                created_at: Utc::now(),
            },
        }
    }

    #[test]
    fn test_unknown_worker_resolves_to_none() {
        let mut asha = Worker::new("w1", "Asha");
        asha.email = "asha@example.com".into();

        let resolved = resolve_assignment(
            stored(vec![item("Amy", "w1"), item("Bo", "gone")]),
            &[asha],
        );

        assert_eq!(resolved.file_name, "leads.csv");
        let first = resolved.items[0].worker.as_ref().unwrap();
        assert_eq!(first.name, "Asha");
        assert_eq!(first.email, "asha@example.com");
        assert!(resolved.items[1].worker.is_none());
        assert_eq!(resolved.items[1].worker_id, "gone");
    }

    #[test]
    fn test_assignment_loads_first_appearance() {
        let resolved = resolve_assignment(
            stored(vec![
                item("a", "w2"),
                item("b", "w1"),
                item("c", "w2"),
                item("d", "gone"),
            ]),
            &[Worker::new("w1", "Asha"), Worker::new("w2", "Ben")],
        );

        let loads = assignment_loads(&resolved);
        let summary: Vec<_> = loads
            .iter()
            .map(|l| (l.worker_id.as_str(), l.name.as_deref(), l.items))
            .collect();
        assert_eq!(
            summary,
            vec![("w2", Some("Ben"), 2), ("w1", Some("Asha"), 1), ("gone", None, 1)]
        );
    }

    #[tokio::test]
    async fn test_list_all_in_store_order() {
        let store = MemoryAssignmentStore::default();
        let registry = StaticWorkerRegistry::new("static", vec![Worker::new("w1", "Asha")]);

        let first = store
            .save(stored(vec![item("Amy", "w1")]).assignment)
            .await
            .unwrap();
        let second = store
            .save(stored(vec![item("Bo", "w1")]).assignment)
            .await
            .unwrap();

        let listed = ListQuery::new(&store, &registry).list_all().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[1].id, second.id);
        assert_eq!(listed[1].items[0].record.first_name, "Bo");
    }
}
