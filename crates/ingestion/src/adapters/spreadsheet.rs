//! Spreadsheet (xlsx / xlsm / xls / ods) source

use std::io::Cursor;

use bytes::Bytes;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use contracts::{CellValue, InputFormat, RawRow};
use tracing::debug;

use super::common::header_at;
use crate::adapter::{RowIter, RowSource};
use crate::error::{IngestionError, Result};

/// Workbook row source
///
/// Reads the first worksheet. The first occupied row holds the headers;
/// empty cells are left out of a row and rows without any value are
/// skipped.
pub struct SpreadsheetSource {
    range: Range<Data>,
}

impl SpreadsheetSource {
    /// Open the workbook container and load its first sheet
    ///
    /// # Errors
    /// `Format` when the container is corrupt or holds no sheets
    pub fn open(payload: Bytes) -> Result<Self> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(payload)).map_err(format_error)?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| {
                IngestionError::format(InputFormat::Spreadsheet, "workbook contains no sheets")
            })?
            .map_err(format_error)?;

        debug!(
            height = range.height(),
            width = range.width(),
            "loaded first worksheet"
        );

        Ok(Self { range })
    }
}

impl RowSource for SpreadsheetSource {
    fn format(&self) -> InputFormat {
        InputFormat::Spreadsheet
    }

    fn rows(&self) -> RowIter<'_> {
        let mut rows = self.range.rows();
        let headers: Vec<String> = rows
            .next()
            .map(|cells| cells.iter().map(header_text).collect())
            .unwrap_or_default();

        Box::new(
            rows.filter_map(move |cells| build_row(&headers, cells))
                .map(Ok),
        )
    }
}

fn build_row(headers: &[String], cells: &[Data]) -> Option<RawRow> {
    let mut row = RawRow::new();
    for (index, cell) in cells.iter().enumerate() {
        if let Some(value) = cell_value(cell) {
            row.insert(header_at(headers, index), value);
        }
    }
    (!row.is_empty()).then_some(row)
}

fn cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Int(i) => Some(CellValue::Text(i.to_string())),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        other => Some(CellValue::Text(other.to_string())),
    }
}

fn header_text(cell: &Data) -> String {
    cell_value(cell)
        .map(|v| v.as_text().into_owned())
        .unwrap_or_default()
}

fn format_error(e: impl std::fmt::Display) -> IngestionError {
    IngestionError::format(InputFormat::Spreadsheet, e.to_string())
}
