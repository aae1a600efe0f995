//! Distribution error types

use contracts::ContractError;
use ingestion::IngestionError;
use thiserror::Error;

/// Upload / distribution errors
///
/// All variants are terminal and never retried here. When one is returned
/// no assignment has been persisted.
#[derive(Debug, Error)]
pub enum DistributionError {
    /// Payload is not interpretable as the declared tabular format
    #[error("invalid input file: {0}")]
    Format(#[source] IngestionError),

    /// Payload parsed but held no data rows
    #[error("no data rows found in the file")]
    EmptyInput,

    /// Worker snapshot was empty
    #[error("no workers available to distribute contacts")]
    NoWorkers,

    /// Every row was dropped by validation
    #[error(
        "no valid data found in the file ({total_rows} rows read); \
         ensure columns: FirstName, Phone, Notes"
    )]
    NoValidRecords {
        /// Rows produced by the normalizer
        total_rows: usize,
    },

    /// Worker registry could not produce a snapshot
    #[error("worker registry error: {0}")]
    Registry(#[source] ContractError),

    /// Assignment store failure, propagated unchanged
    #[error("persistence error: {0}")]
    Persistence(#[source] ContractError),
}

impl From<IngestionError> for DistributionError {
    fn from(e: IngestionError) -> Self {
        if e.is_format_error() {
            Self::Format(e)
        } else {
            Self::EmptyInput
        }
    }
}

/// Stable classification of a [`DistributionError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Format,
    EmptyInput,
    NoWorkers,
    NoValidRecords,
    Registry,
    Persistence,
}

impl ErrorKind {
    /// Label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::EmptyInput => "empty_input",
            Self::NoWorkers => "no_workers",
            Self::NoValidRecords => "no_valid_records",
            Self::Registry => "registry",
            Self::Persistence => "persistence",
        }
    }
}

impl DistributionError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Format(_) => ErrorKind::Format,
            Self::EmptyInput => ErrorKind::EmptyInput,
            Self::NoWorkers => ErrorKind::NoWorkers,
            Self::NoValidRecords { .. } => ErrorKind::NoValidRecords,
            Self::Registry(_) => ErrorKind::Registry,
            Self::Persistence(_) => ErrorKind::Persistence,
        }
    }

    /// True when the caller supplied input or state that violates a
    /// precondition, false for collaborator failures
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, Self::Registry(_) | Self::Persistence(_))
    }
}
