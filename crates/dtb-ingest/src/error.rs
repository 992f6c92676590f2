#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported source format: {name}")]
    UnsupportedFormat { name: String },

    #[error("failed to open workbook: {message}")]
    Workbook { message: String },

    #[error("sheet {sheet} not found (available: {available})")]
    MissingSheet { sheet: String, available: String },

    #[error("workbook has no sheets")]
    NoSheets,

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn workbook(error: impl std::fmt::Display) -> Self {
        Self::Workbook {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
