//! Record Normalizer main entry

use std::sync::Arc;

use bytes::Bytes;
use contracts::{InputFormat, RawRow};
use metrics::counter;
use tracing::{debug, info, instrument, warn};

use crate::adapter::RowSource;
use crate::adapters::{DelimitedSource, SpreadsheetSource};
use crate::config::{IngestionMetrics, NormalizerConfig};
use crate::error::{IngestionError, Result};

/// Record Normalizer
///
/// Turns an uploaded payload into a format-independent sequence of
/// `RawRow`. The format is dispatched once, here; nothing downstream sees it.
pub struct Normalizer {
    config: NormalizerConfig,

    /// Shared metrics
    metrics: Arc<IngestionMetrics>,
}

impl Normalizer {
    /// Create a normalizer
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(IngestionMetrics::new()),
        }
    }

    /// Pick the format for an upload
    ///
    /// A declared format wins; otherwise it is sniffed from the file
    /// extension.
    pub fn resolve_format(file_name: &str, declared: Option<InputFormat>) -> Result<InputFormat> {
        declared
            .or_else(|| InputFormat::from_file_name(file_name))
            .ok_or_else(|| IngestionError::UnsupportedFormat {
                file_name: file_name.to_string(),
            })
    }

    /// Normalize a payload
    ///
    /// The payload is checked eagerly: oversized input, a corrupt
    /// container, a malformed first record or zero data rows all fail here.
    /// Later rows are parsed lazily by [`NormalizedRows::rows`].
    ///
    /// # Errors
    /// - `PayloadTooLarge`
    /// - `Format`
    /// - `EmptyInput`
    #[instrument(
        name = "normalizer_normalize",
        skip(self, payload),
        fields(format = %format, bytes = payload.len())
    )]
    pub fn normalize(&self, payload: Bytes, format: InputFormat) -> Result<NormalizedRows> {
        match self.open(payload, format) {
            Ok(rows) => {
                self.metrics.record_accepted();
                debug!("payload accepted");
                Ok(rows)
            }
            Err(e) => {
                self.metrics.record_rejected();
                warn!(error = %e, "payload rejected");
                Err(e)
            }
        }
    }

    fn open(&self, payload: Bytes, format: InputFormat) -> Result<NormalizedRows> {
        if payload.len() as u64 > self.config.max_payload_bytes {
            return Err(IngestionError::PayloadTooLarge {
                size: payload.len(),
                limit: self.config.max_payload_bytes,
            });
        }

        let source: Box<dyn RowSource> = match format {
            InputFormat::Delimited => Box::new(DelimitedSource::new(payload)),
            InputFormat::Spreadsheet => Box::new(SpreadsheetSource::open(payload)?),
        };

        let first = source.rows().next().map(|row| row.map(|_| ()));
        match first {
            None => Err(IngestionError::EmptyInput),
            Some(Err(e)) => Err(e),
            Some(Ok(())) => Ok(NormalizedRows {
                source,
                metrics: self.metrics.clone(),
            }),
        }
    }

    /// Get metrics reference
    pub fn metrics(&self) -> Arc<IngestionMetrics> {
        self.metrics.clone()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}

/// Normalized, non-empty row set
///
/// Restartable: each call to [`rows`](Self::rows) starts from the first
/// data row. Holds the payload in memory only.
pub struct NormalizedRows {
    source: Box<dyn RowSource>,
    metrics: Arc<IngestionMetrics>,
}

impl NormalizedRows {
    /// Source format
    pub fn format(&self) -> InputFormat {
        self.source.format()
    }

    /// Start a fresh pass over the rows, in source order
    ///
    /// A `Format` item is terminal: the caller must abandon the upload.
    pub fn rows(&self) -> impl Iterator<Item = Result<RawRow>> + '_ {
        let metrics = &self.metrics;
        self.source.rows().inspect(move |row| {
            if row.is_ok() {
                metrics.record_row();
            }
        })
    }

    /// Read every row, failing on the first format error
    pub fn collect_rows(&self) -> Result<Vec<RawRow>> {
        let rows = self.rows().collect::<Result<Vec<_>>>()?;
        counter!(
            "contact_distributor_rows_normalized_total",
            "format" => self.format().as_str()
        )
        .increment(rows.len() as u64);
        info!(format = %self.format(), rows = rows.len(), "payload normalized");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format() {
        assert_eq!(
            Normalizer::resolve_format("a.csv", None).unwrap(),
            InputFormat::Delimited
        );
        assert_eq!(
            Normalizer::resolve_format("a.txt", Some(InputFormat::Delimited)).unwrap(),
            InputFormat::Delimited
        );
        assert!(matches!(
            Normalizer::resolve_format("a.pdf", None),
            Err(IngestionError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_normalize_csv() {
        let normalizer = Normalizer::default();
        let rows = normalizer
            .normalize(
                Bytes::from_static(b"FirstName,Phone\nAmy,1\nBo,2\n"),
                InputFormat::Delimited,
            )
            .unwrap();
        assert_eq!(rows.format(), InputFormat::Delimited);
        assert_eq!(rows.collect_rows().unwrap().len(), 2);
        assert_eq!(rows.collect_rows().unwrap().len(), 2);

        let snapshot = normalizer.metrics().snapshot();
        assert_eq!(snapshot.payloads_accepted, 1);
        assert_eq!(snapshot.rows_produced, 4);
    }

    #[test]
    fn test_empty_input() {
        let normalizer = Normalizer::default();
        for payload in [&b""[..], &b"FirstName,Phone\n"[..], &b"FirstName,Phone\n\n\n"[..]] {
            let result = normalizer.normalize(Bytes::copy_from_slice(payload), InputFormat::Delimited);
            assert!(matches!(result, Err(IngestionError::EmptyInput)));
        }
        assert_eq!(normalizer.metrics().snapshot().payloads_rejected, 3);
    }

    #[test]
    fn test_payload_too_large() {
        let normalizer = Normalizer::new(NormalizerConfig {
            max_payload_bytes: 8,
        });
        let result = normalizer.normalize(
            Bytes::from_static(b"FirstName,Phone\nAmy,1\n"),
            InputFormat::Delimited,
        );
        assert!(matches!(
            result,
            Err(IngestionError::PayloadTooLarge { limit: 8, .. })
        ));
    }

    #[test]
    fn test_spreadsheet_declared_for_csv_bytes() {
        let normalizer = Normalizer::default();
        let result = normalizer.normalize(
            Bytes::from_static(b"FirstName,Phone\nAmy,1\n"),
            InputFormat::Spreadsheet,
        );
        assert!(matches!(result, Err(IngestionError::Format { .. })));
    }

    #[test]
    fn test_format_error_in_first_row_rejects_payload() {
        let normalizer = Normalizer::default();
        let result = normalizer.normalize(
            Bytes::from_static(b"FirstName,Phone\n\xff,1\nBo,2\n"),
            InputFormat::Delimited,
        );
        assert!(matches!(result, Err(IngestionError::Format { .. })));

        let snapshot = normalizer.metrics().snapshot();
        assert_eq!(snapshot.payloads_accepted, 0);
        assert_eq!(snapshot.payloads_rejected, 1);
    }

    #[test]
    fn test_late_format_error_surfaces_on_collect() {
        let normalizer = Normalizer::default();
        let rows = normalizer
            .normalize(
                Bytes::from_static(b"FirstName,Phone\nAmy,1\n\xff,2\n"),
                InputFormat::Delimited,
            )
            .unwrap();
        assert!(matches!(
            rows.collect_rows(),
            Err(IngestionError::Format { .. })
        ));
    }
}
