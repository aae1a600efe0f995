//! Row source trait

use contracts::{InputFormat, RawRow};

use crate::error::Result;

/// Boxed row iterator borrowed from its source
pub type RowIter<'a> = Box<dyn Iterator<Item = Result<RawRow>> + 'a>;

/// Row source trait
///
/// Implemented once per tabular format. Each implementation is responsible for:
/// 1. Locating the header row
/// 2. Pairing every following row's cells with the headers
/// 3. Reporting framing problems as `IngestionError::Format`
pub trait RowSource: Send + Sync {
    /// Format this source reads
    fn format(&self) -> InputFormat;

    /// Start a fresh pass over the rows
    ///
    /// Every call starts from the first data row; iterators are independent.
    fn rows(&self) -> RowIter<'_>;
}
