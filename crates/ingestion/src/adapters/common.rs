//! Adapter common utility functions

/// Header used for a cell with no matching header name
///
/// Covers surplus CSV cells and blank spreadsheet header cells.
#[inline]
pub fn positional_header(index: usize) -> String {
    format!("_{index}")
}

/// Header name for column `index`, falling back to a positional name
#[inline]
pub fn header_at(headers: &[String], index: usize) -> String {
    match headers.get(index) {
        Some(h) if !h.is_empty() => h.clone(),
        _ => positional_header(index),
    }
}
