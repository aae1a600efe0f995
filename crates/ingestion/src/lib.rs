//! # Ingestion
//!
//! Record normalizer: uploaded tabular payload -> `RawRow` sequence.
//!
//! Responsibilities:
//! - Resolve the payload format (declared, or sniffed from the file name)
//! - Read CSV or the first worksheet of a workbook
//! - Pair each row's cells with the verbatim header names
//! - Reject oversized, malformed or empty payloads
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{Normalizer, NormalizerConfig};
//!
//! let normalizer = Normalizer::new(NormalizerConfig::default());
//! let format = Normalizer::resolve_format("contacts.csv", None)?;
//! let rows = normalizer.normalize(payload, format)?;
//! for row in rows.rows() {
//!     let row = row?;
//!     // ...
//! }
//! ```

mod adapter;
mod adapters;
mod config;
mod error;
mod normalizer;

// Re-exports
pub use adapter::{RowIter, RowSource};
pub use adapters::{DelimitedSource, SpreadsheetSource};
pub use config::{IngestionMetrics, MetricsSnapshot, NormalizerConfig};
pub use contracts::{InputFormat, RawRow};
pub use error::{IngestionError, Result};
pub use normalizer::{NormalizedRows, Normalizer};
