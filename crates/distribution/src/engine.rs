//! Distribution engine: validation, partitioning and assembly.

use contracts::{Assignment, ContactRecord, RawRow, WorkerId};
use tracing::{debug, instrument};

use crate::clock::{Clock, SystemClock};
use crate::error::DistributionError;
use crate::partition::partition;
use crate::validate::validate_row;

/// Round-robin distribution engine
///
/// Stateless apart from its clock: every call works on its own rows and
/// worker snapshot, so one engine can serve concurrent uploads.
#[derive(Debug, Clone, Default)]
pub struct DistributionEngine<C = SystemClock> {
    clock: C,
}

impl DistributionEngine {
    /// Create an engine stamping assignments with the wall clock
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> DistributionEngine<C> {
    /// Create an engine with a custom clock
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Distribute rows across a worker snapshot
    ///
    /// Checks, in order: non-empty snapshot, at least one row, at least one
    /// valid record. The `i`-th valid record goes to `workers[i % n]`;
    /// dropped rows do not consume an index.
    ///
    /// # Errors
    /// - `NoWorkers` (no rows are read)
    /// - `EmptyInput`
    /// - `NoValidRecords`
    #[instrument(
        name = "distribution_engine_distribute",
        skip(self, rows, workers),
        fields(file_name = %file_name, workers = workers.len())
    )]
    pub fn distribute<I>(
        &self,
        file_name: &str,
        rows: I,
        workers: &[WorkerId],
    ) -> Result<Assignment, DistributionError>
    where
        I: IntoIterator<Item = RawRow>,
    {
        if workers.is_empty() {
            return Err(DistributionError::NoWorkers);
        }

        let mut total_rows = 0usize;
        let records: Vec<ContactRecord> = rows
            .into_iter()
            .inspect(|_| total_rows += 1)
            .filter_map(|row| validate_row(&row))
            .collect();

        if total_rows == 0 {
            return Err(DistributionError::EmptyInput);
        }
        if records.is_empty() {
            return Err(DistributionError::NoValidRecords { total_rows });
        }

        let valid = records.len();
        debug!(
            total_rows,
            valid,
            dropped = total_rows - valid,
            "rows validated"
        );

        Ok(Assignment {
            file_name: file_name.to_string(),
            items: partition(records, workers),
            created_at: self.clock.now(),
            total_rows,
        })
    }
}
