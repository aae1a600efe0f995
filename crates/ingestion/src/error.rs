//! Ingestion error types

use contracts::InputFormat;
use thiserror::Error;

/// Normalizer errors
///
/// Every variant is terminal for the upload: no partial row set is ever
/// handed downstream.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Payload could not be read as the declared format
    #[error("payload is not valid {format} input: {message}")]
    Format {
        /// Declared format
        format: InputFormat,
        /// Parser message
        message: String,
    },

    /// No format declared and none could be inferred from the file name
    #[error("unsupported file type '{file_name}', expected .csv, .xlsx, .xls or .ods")]
    UnsupportedFormat {
        /// Uploaded file name
        file_name: String,
    },

    /// Payload exceeds the configured size limit
    #[error("payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge {
        /// Payload size in bytes
        size: usize,
        /// Configured limit in bytes
        limit: u64,
    },

    /// Payload parsed but produced zero data rows
    #[error("input contains no data rows")]
    EmptyInput,
}

impl IngestionError {
    /// Create a format error
    pub fn format(format: InputFormat, message: impl Into<String>) -> Self {
        Self::Format {
            format,
            message: message.into(),
        }
    }

    /// True for every variant that means "not interpretable as tabular input"
    pub fn is_format_error(&self) -> bool {
        !matches!(self, Self::EmptyInput)
    }
}

/// Ingestion Result alias
pub type Result<T> = std::result::Result<T, IngestionError>;
