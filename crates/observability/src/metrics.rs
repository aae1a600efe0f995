//! Upload metrics
//!
//! Prometheus series emitted by the upload pipeline, plus an in-memory
//! aggregator used by the CLI to print a run summary.

use std::collections::HashMap;

use contracts::WorkerLoad;
use metrics::{counter, gauge, histogram};

/// Record a persisted upload
///
/// Call once per successful upload, after the store accepted the
/// assignment.
pub fn record_upload_succeeded(format: &str, processed: usize, dropped: usize) {
    counter!(
        "contact_distributor_uploads_total",
        "format" => format.to_string(),
        "status" => "success"
    )
    .increment(1);

    counter!("contact_distributor_records_assigned_total").increment(processed as u64);
    histogram!("contact_distributor_upload_records").record(processed as f64);

    if dropped > 0 {
        counter!("contact_distributor_rows_dropped_total").increment(dropped as u64);
    }
    gauge!("contact_distributor_rows_dropped_last").set(dropped as f64);
}

/// Record a rejected upload, labelled by error kind
pub fn record_upload_failed(kind: &str) {
    counter!(
        "contact_distributor_uploads_total",
        "status" => "failure",
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// Record per-worker record counts of the latest upload
pub fn record_worker_loads(loads: &[WorkerLoad]) {
    for load in loads {
        counter!(
            "contact_distributor_worker_records_total",
            "worker_id" => load.worker_id.to_string()
        )
        .increment(load.items as u64);
    }
}

/// Record end-to-end upload latency
pub fn record_distribution_latency_ms(latency_ms: f64) {
    histogram!("contact_distributor_upload_latency_ms").record(latency_ms);
}

/// Record the size of a worker snapshot
pub fn record_worker_snapshot(workers: usize) {
    gauge!("contact_distributor_workers_available").set(workers as f64);
}

/// Upload statistics aggregator
///
/// Aggregates upload results in memory for summaries.
#[derive(Debug, Clone, Default)]
pub struct UploadStatsAggregator {
    pub uploads_succeeded: u64,
    pub uploads_failed: u64,
    pub total_rows: u64,
    pub total_processed: u64,
    pub latency_ms: RunningStats,
    pub failures_by_kind: HashMap<String, u64>,
    pub records_by_worker: HashMap<String, u64>,
}

impl UploadStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a persisted upload
    pub fn record_success(
        &mut self,
        total_rows: usize,
        processed: usize,
        loads: &[WorkerLoad],
        latency_ms: f64,
    ) {
        self.uploads_succeeded += 1;
        self.total_rows += total_rows as u64;
        self.total_processed += processed as u64;
        self.latency_ms.push(latency_ms);

        for load in loads {
            *self
                .records_by_worker
                .entry(load.worker_id.to_string())
                .or_insert(0) += load.items as u64;
        }
    }

    /// Account for a rejected upload
    pub fn record_failure(&mut self, kind: &str) {
        self.uploads_failed += 1;
        *self.failures_by_kind.entry(kind.to_string()).or_insert(0) += 1;
    }

    /// Build a summary report
    pub fn summary(&self) -> UploadSummary {
        let total_dropped = self.total_rows.saturating_sub(self.total_processed);
        UploadSummary {
            uploads_succeeded: self.uploads_succeeded,
            uploads_failed: self.uploads_failed,
            total_rows: self.total_rows,
            total_processed: self.total_processed,
            total_dropped,
            drop_rate: if self.total_rows > 0 {
                total_dropped as f64 / self.total_rows as f64 * 100.0
            } else {
                0.0
            },
            latency_ms: StatsSummary::from(&self.latency_ms),
            failures_by_kind: self.failures_by_kind.clone(),
            records_by_worker: self.records_by_worker.clone(),
        }
    }
}

/// Upload summary
#[derive(Debug, Clone, Default)]
pub struct UploadSummary {
    pub uploads_succeeded: u64,
    pub uploads_failed: u64,
    pub total_rows: u64,
    pub total_processed: u64,
    pub total_dropped: u64,
    pub drop_rate: f64,
    pub latency_ms: StatsSummary,
    pub failures_by_kind: HashMap<String, u64>,
    pub records_by_worker: HashMap<String, u64>,
}

impl std::fmt::Display for UploadSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Upload Summary ===")?;
        writeln!(
            f,
            "Uploads: {} succeeded, {} failed",
            self.uploads_succeeded, self.uploads_failed
        )?;
        writeln!(f, "Rows read: {}", self.total_rows)?;
        writeln!(f, "Records assigned: {}", self.total_processed)?;
        writeln!(
            f,
            "Rows dropped: {} ({:.2}%)",
            self.total_dropped, self.drop_rate
        )?;
        writeln!(f, "Latency (ms): {}", self.latency_ms)?;

        if !self.records_by_worker.is_empty() {
            writeln!(f, "Records per worker:")?;
            let mut workers: Vec<_> = self.records_by_worker.iter().collect();
            workers.sort();
            for (worker, count) in workers {
                writeln!(f, "  {}: {}", worker, count)?;
            }
        }

        if !self.failures_by_kind.is_empty() {
            writeln!(f, "Failures:")?;
            let mut kinds: Vec<_> = self.failures_by_kind.iter().collect();
            kinds.sort();
            for (kind, count) in kinds {
                writeln!(f, "  {}: {}", kind, count)?;
            }
        }

        Ok(())
    }
}

/// Summary of a [`RunningStats`]
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online mean/variance (Welford)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(id: &str, items: usize) -> WorkerLoad {
        WorkerLoad {
            worker_id: id.into(),
            name: None,
            items,
        }
    }

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        for v in [4.0, 8.0, 6.0] {
            stats.push(v);
        }

        assert_eq!(stats.count(), 3);
        assert!((stats.mean() - 6.0).abs() < 1e-10);
        assert!((stats.min() - 4.0).abs() < 1e-10);
        assert!((stats.max() - 8.0).abs() < 1e-10);
        assert!((stats.variance() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator() {
        let mut agg = UploadStatsAggregator::new();
        agg.record_success(3, 2, &[load("W1", 1), load("W2", 1)], 12.0);
        agg.record_success(5, 5, &[load("W1", 3), load("W2", 2)], 8.0);
        agg.record_failure("no_workers");

        let summary = agg.summary();
        assert_eq!(summary.uploads_succeeded, 2);
        assert_eq!(summary.uploads_failed, 1);
        assert_eq!(summary.total_rows, 8);
        assert_eq!(summary.total_processed, 7);
        assert_eq!(summary.total_dropped, 1);
        assert!((summary.drop_rate - 12.5).abs() < 1e-10);
        assert_eq!(summary.records_by_worker.get("W1"), Some(&4));
        assert_eq!(summary.failures_by_kind.get("no_workers"), Some(&1));
        assert_eq!(summary.latency_ms.count, 2);
    }

    #[test]
    fn test_summary_display() {
        let mut agg = UploadStatsAggregator::new();
        agg.record_success(4, 3, &[load("W1", 2), load("W2", 1)], 5.0);

        let output = agg.summary().to_string();
        assert!(output.contains("Records assigned: 3"));
        assert!(output.contains("25.00%"));
        assert!(output.contains("  W1: 2"));
    }
}
