//! # Distribution
//!
//! Validates normalized rows into contact records and spreads them
//! round-robin over a worker snapshot.
//!
//! - `DistributionEngine::distribute`: pure rows + workers -> `Assignment`
//! - `UploadPipeline::upload`: registry snapshot, normalization,
//!   distribution and a single store write
//! - `ListQuery::list_all`: stored assignments with workers resolved
//!
//! ## Example
//!
//! ```ignore
//! use distribution::{Upload, UploadPipeline};
//!
//! let pipeline = UploadPipeline::new(registry, store, NormalizerConfig::default());
//! let outcome = pipeline.upload(Upload::new("leads.csv", payload)).await?;
//! println!("{}", outcome.message());
//! ```

mod clock;
mod engine;
mod error;
mod partition;
mod pipeline;
mod query;
mod validate;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::DistributionEngine;
pub use error::{DistributionError, ErrorKind};
pub use partition::{partition, slot_for, worker_loads};
pub use pipeline::{Upload, UploadOutcome, UploadPipeline};
pub use query::{assignment_loads, resolve_assignment, ListQuery};
pub use validate::{validate_row, FIRST_NAME_HEADER, NOTES_HEADER, PHONE_HEADER};

pub use contracts::{Assignment, AssignmentItem, ContactRecord, StoredAssignment, WorkerLoad};
