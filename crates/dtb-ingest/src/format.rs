use std::fmt;
use std::path::Path;

use crate::error::{IngestError, Result};

/// Storage format of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Binary or XML workbook (xls, xlsx, xlsm, xlsb, ods).
    Workbook,
    /// A sheet exported as comma-separated text.
    Csv,
    /// Legacy flat file of fixed-width records.
    FixedWidth,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => Ok(Self::Workbook),
            "csv" => Ok(Self::Csv),
            "txt" | "dat" => Ok(Self::FixedWidth),
            _ => Err(IngestError::UnsupportedFormat {
                name: path.display().to_string(),
            }),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Workbook => f.write_str("workbook"),
            SourceFormat::Csv => f.write_str("csv"),
            SourceFormat::FixedWidth => f.write_str("fixed-width"),
        }
    }
}
