//! Upload pipeline: snapshot, normalize, distribute, persist

use std::time::Instant;

use bytes::Bytes;
use contracts::{
    AssignmentStore, InputFormat, ResolvedAssignment, StoredAssignment, WorkerId, WorkerLoad,
    WorkerRegistry,
};
use ingestion::{Normalizer, NormalizerConfig};
use observability::metrics;
use tracing::{info, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::engine::DistributionEngine;
use crate::error::DistributionError;
use crate::partition::worker_loads;
use crate::query::ListQuery;

/// One uploaded file
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub payload: Bytes,
    /// Declared format; sniffed from `file_name` when `None`
    pub format: Option<InputFormat>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            payload: payload.into(),
            format: None,
        }
    }

    pub fn with_format(mut self, format: InputFormat) -> Self {
        self.format = Some(format);
        self
    }
}

/// Result of a persisted upload
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub assignment: StoredAssignment,
    pub format: InputFormat,
    /// Item counts in worker snapshot order, idle workers included
    pub per_worker: Vec<WorkerLoad>,
}

impl UploadOutcome {
    /// Records assigned to a worker
    pub fn processed(&self) -> usize {
        self.assignment.assignment.processed()
    }

    /// Rows read from the payload
    pub fn total_rows(&self) -> usize {
        self.assignment.assignment.total_rows
    }

    /// Rows dropped by validation
    pub fn dropped(&self) -> usize {
        self.assignment.assignment.dropped()
    }

    /// Human-readable summary
    pub fn message(&self) -> String {
        format!(
            "File uploaded and distributed successfully. {} items processed.",
            self.processed()
        )
    }
}

/// Orchestrates one upload end to end
///
/// The store is written exactly once, and only after distribution
/// succeeded; on any error nothing is persisted.
pub struct UploadPipeline<R, S, C = SystemClock> {
    registry: R,
    store: S,
    normalizer: Normalizer,
    engine: DistributionEngine<C>,
}

impl<R, S> UploadPipeline<R, S>
where
    R: WorkerRegistry + Sync,
    S: AssignmentStore + Sync,
{
    pub fn new(registry: R, store: S, config: NormalizerConfig) -> Self {
        Self::with_engine(
            registry,
            store,
            Normalizer::new(config),
            DistributionEngine::new(),
        )
    }
}

impl<R, S, C> UploadPipeline<R, S, C>
where
    R: WorkerRegistry + Sync,
    S: AssignmentStore + Sync,
    C: Clock,
{
    pub fn with_engine(
        registry: R,
        store: S,
        normalizer: Normalizer,
        engine: DistributionEngine<C>,
    ) -> Self {
        Self {
            registry,
            store,
            normalizer,
            engine,
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Distribute an uploaded file across the current workers and persist
    /// the assignment
    ///
    /// # Errors
    /// `NoWorkers` is checked before the payload is parsed. Then `Format`,
    /// `EmptyInput`, `NoValidRecords`; collaborator failures surface as
    /// `Registry` / `Persistence`.
    #[instrument(
        name = "upload_pipeline_upload",
        skip(self, upload),
        fields(file_name = %upload.file_name, bytes = upload.payload.len())
    )]
    pub async fn upload(&self, upload: Upload) -> Result<UploadOutcome, DistributionError> {
        let started = Instant::now();

        match self.run(upload).await {
            Ok(outcome) => {
                let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
                metrics::record_upload_succeeded(
                    outcome.format.as_str(),
                    outcome.processed(),
                    outcome.dropped(),
                );
                metrics::record_worker_loads(&outcome.per_worker);
                metrics::record_distribution_latency_ms(latency_ms);

                info!(
                    id = %outcome.assignment.id,
                    processed = outcome.processed(),
                    total_rows = outcome.total_rows(),
                    latency_ms,
                    "{}",
                    outcome.message()
                );
                Ok(outcome)
            }
            Err(e) => {
                metrics::record_upload_failed(e.kind().as_str());
                warn!(kind = e.kind().as_str(), error = %e, "Upload rejected");
                Err(e)
            }
        }
    }

    async fn run(&self, upload: Upload) -> Result<UploadOutcome, DistributionError> {
        let workers = self
            .registry
            .list_workers()
            .await
            .map_err(DistributionError::Registry)?;
        metrics::record_worker_snapshot(workers.len());
        if workers.is_empty() {
            return Err(DistributionError::NoWorkers);
        }

        let Upload {
            file_name,
            payload,
            format,
        } = upload;

        let format = Normalizer::resolve_format(&file_name, format)?;
        let rows = self.normalizer.normalize(payload, format)?.collect_rows()?;

        let snapshot: Vec<WorkerId> = workers.iter().map(|w| w.id.clone()).collect();
        let assignment = self.engine.distribute(&file_name, rows, &snapshot)?;
        let per_worker = worker_loads(&assignment.items, &workers);

        let stored = self
            .store
            .save(assignment)
            .await
            .map_err(DistributionError::Persistence)?;

        Ok(UploadOutcome {
            assignment: stored,
            format,
            per_worker,
        })
    }

    /// Every stored assignment with workers resolved
    pub async fn list_assignments(&self) -> Result<Vec<ResolvedAssignment>, DistributionError> {
        ListQuery::new(&self.store, &self.registry).list_all().await
    }
}
