//! Declared tabular format of an uploaded payload

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Input format tag
///
/// Dispatched once at the normalizer boundary; nothing downstream branches
/// on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// Comma-delimited text with a header line
    Delimited,
    /// Workbook (xlsx / xlsm / xls / ods), first sheet only
    Spreadsheet,
}

impl InputFormat {
    /// Infer format from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(Self::Delimited),
            "xlsx" | "xlsm" | "xls" | "ods" => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    /// Infer format from an uploaded file name
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Short label used in logs and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delimited => "delimited",
            Self::Spreadsheet => "spreadsheet",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(InputFormat::from_extension("csv"), Some(InputFormat::Delimited));
        assert_eq!(InputFormat::from_extension("CSV"), Some(InputFormat::Delimited));
        assert_eq!(
            InputFormat::from_extension("xlsx"),
            Some(InputFormat::Spreadsheet)
        );
        assert_eq!(InputFormat::from_extension("xls"), Some(InputFormat::Spreadsheet));
        assert_eq!(InputFormat::from_extension("txt"), None);
    }

    #[test]
    fn test_from_file_name() {
        assert_eq!(
            InputFormat::from_file_name("leads.2024.XLSX"),
            Some(InputFormat::Spreadsheet)
        );
        assert_eq!(
            InputFormat::from_file_name("contacts.csv"),
            Some(InputFormat::Delimited)
        );
        assert_eq!(InputFormat::from_file_name("contacts"), None);
    }
}
