//! Delimited text (CSV) source

use bytes::Bytes;
use contracts::{InputFormat, RawRow};
use csv::{Reader, ReaderBuilder, StringRecord};
use tracing::trace;

use super::common::header_at;
use crate::adapter::{RowIter, RowSource};
use crate::error::{IngestionError, Result};

/// CSV row source
///
/// The first record is the header line. Rows may be ragged: missing
/// trailing cells are left out of the row, surplus cells get positional
/// headers. Blank lines are skipped. Every value is text.
pub struct DelimitedSource {
    payload: Bytes,
}

impl DelimitedSource {
    /// Wrap a payload; parsing happens lazily on each pass
    pub fn new(payload: Bytes) -> Self {
        Self { payload }
    }

    fn reader(&self) -> Reader<&[u8]> {
        ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(self.payload.as_ref())
    }
}

impl RowSource for DelimitedSource {
    fn format(&self) -> InputFormat {
        InputFormat::Delimited
    }

    fn rows(&self) -> RowIter<'_> {
        Box::new(DelimitedRows {
            reader: self.reader(),
            headers: None,
            record: StringRecord::new(),
            done: false,
        })
    }
}

struct DelimitedRows<'a> {
    reader: Reader<&'a [u8]>,
    headers: Option<Vec<String>>,
    record: StringRecord,
    done: bool,
}

impl DelimitedRows<'_> {
    fn load_headers(&mut self) -> Result<()> {
        if self.headers.is_none() {
            let headers = self.reader.headers().map_err(format_error)?;
            self.headers = Some(headers.iter().map(str::to_string).collect());
        }
        Ok(())
    }

    fn build_row(&self) -> RawRow {
        let headers = self.headers.as_deref().unwrap_or_default();
        let mut row = RawRow::with_capacity(self.record.len());
        for (index, value) in self.record.iter().enumerate() {
            row.insert(header_at(headers, index), value);
        }
        row
    }
}

impl Iterator for DelimitedRows<'_> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Err(e) = self.load_headers() {
            self.done = true;
            return Some(Err(e));
        }

        match self.reader.read_record(&mut self.record) {
            Ok(true) => {
                trace!(line = self.record.position().map(|p| p.line()), "csv record read");
                Some(Ok(self.build_row()))
            }
            Ok(false) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(format_error(e)))
            }
        }
    }
}

fn format_error(e: csv::Error) -> IngestionError {
    IngestionError::format(InputFormat::Delimited, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::CellValue;

    fn rows(input: &'static str) -> Vec<RawRow> {
        DelimitedSource::new(Bytes::from_static(input.as_bytes()))
            .rows()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_headers_and_order() {
        let rows = rows("FirstName,Phone,Notes\nAmy,111,\nBo,333,vip\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("FirstName"), Some(&CellValue::from("Amy")));
        assert_eq!(rows[0].get("Notes"), Some(&CellValue::from("")));
        assert_eq!(rows[1].get("Notes"), Some(&CellValue::from("vip")));
        let headers: Vec<_> = rows[1].iter().map(|(h, _)| h).collect();
        assert_eq!(headers, vec!["FirstName", "Phone", "Notes"]);
    }

    #[test]
    fn test_headers_kept_verbatim() {
        let rows = rows(" FirstName ,phone\nAmy,111\n");
        assert!(rows[0].get("FirstName").is_none());
        assert!(rows[0].get(" FirstName ").is_some());
        assert!(rows[0].get("phone").is_some());
    }

    #[test]
    fn test_ragged_rows() {
        let rows = rows("FirstName,Phone,Notes\nAmy\nBo,333,vip,extra\n");
        assert_eq!(rows[0].len(), 1);
        assert!(rows[0].get("Phone").is_none());
        assert_eq!(rows[1].get("_3"), Some(&CellValue::from("extra")));
    }

    #[test]
    fn test_quoted_fields() {
        let rows = rows("FirstName,Phone,Notes\n\"Smith, Jo\",\"0044\",\"said \"\"hi\"\"\"\n");
        assert_eq!(rows[0].get("FirstName"), Some(&CellValue::from("Smith, Jo")));
        assert_eq!(rows[0].get("Phone"), Some(&CellValue::from("0044")));
        assert_eq!(rows[0].get("Notes"), Some(&CellValue::from("said \"hi\"")));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let rows = rows("FirstName,Phone\n\nAmy,1\n\n\nBo,2\n");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_restartable() {
        let source = DelimitedSource::new(Bytes::from_static(b"FirstName,Phone\nAmy,1\nBo,2\n"));
        let first: Vec<_> = source.rows().collect();
        let second: Vec<_> = source.rows().collect();
        assert_eq!(first.len(), 2);
        assert_eq!(
            first.into_iter().map(|r| r.unwrap()).collect::<Vec<_>>(),
            second.into_iter().map(|r| r.unwrap()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_invalid_utf8_is_format_error() {
        let source = DelimitedSource::new(Bytes::from_static(b"FirstName,Phone\n\xff\xfe,1\n"));
        let result: Result<Vec<_>> = source.rows().collect();
        assert!(matches!(
            result,
            Err(IngestionError::Format {
                format: InputFormat::Delimited,
                ..
            })
        ));
    }

    #[test]
    fn test_header_only_yields_nothing() {
        let source = DelimitedSource::new(Bytes::from_static(b"FirstName,Phone\n"));
        assert_eq!(source.rows().count(), 0);
    }
}
