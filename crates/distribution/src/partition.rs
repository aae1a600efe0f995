//! Round-robin partitioning

use std::collections::{HashMap, HashSet};

use contracts::{AssignmentItem, ContactRecord, Worker, WorkerId, WorkerLoad};

/// Worker slot for the `index`-th valid record
///
/// `workers` must be non-zero.
#[inline]
pub fn slot_for(index: usize, workers: usize) -> usize {
    index % workers
}

/// Bind records to workers round-robin, preserving record order
///
/// Worker `j` receives records `j, j + n, j + 2n, ...`; the first `k mod n`
/// workers get one record more than the rest. Returns an empty vector when
/// `workers` is empty.
pub fn partition(records: Vec<ContactRecord>, workers: &[WorkerId]) -> Vec<AssignmentItem> {
    if workers.is_empty() {
        return Vec::new();
    }

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| AssignmentItem {
            record,
            worker_id: workers[slot_for(index, workers.len())].clone(),
        })
        .collect()
}

/// Count items per worker
///
/// Workers from `snapshot` come first, in snapshot order and including
/// those with zero items; a repeated snapshot id is reported once, under its
/// first entry. Worker ids that are not in the snapshot follow in
/// first-appearance order with no name.
pub fn worker_loads(items: &[AssignmentItem], snapshot: &[Worker]) -> Vec<WorkerLoad> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut unknown: Vec<&WorkerId> = Vec::new();

    for item in items {
        let count = counts.entry(item.worker_id.as_str()).or_insert(0);
        if *count == 0 && !snapshot.iter().any(|w| w.id == item.worker_id) {
            unknown.push(&item.worker_id);
        }
        *count += 1;
    }

    let mut listed: HashSet<&str> = HashSet::with_capacity(snapshot.len());
    let known = snapshot
        .iter()
        .filter(|worker| listed.insert(worker.id.as_str()))
        .map(|worker| WorkerLoad {
            worker_id: worker.id.clone(),
            name: Some(worker.name.clone()),
            items: counts.get(worker.id.as_str()).copied().unwrap_or(0),
        });

    let unresolved = unknown.into_iter().map(|id| WorkerLoad {
        worker_id: id.clone(),
        name: None,
        items: counts.get(id.as_str()).copied().unwrap_or(0),
    });

    known.chain(unresolved).collect()
}
