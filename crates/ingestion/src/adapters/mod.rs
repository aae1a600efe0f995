//! Row source adapters
//!
//! Each adapter turns one tabular format into `RawRow`s.

pub mod common;
mod delimited;
mod spreadsheet;

pub use delimited::DelimitedSource;
pub use spreadsheet::SpreadsheetSource;
