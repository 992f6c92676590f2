#![deny(unsafe_code)]

use std::path::PathBuf;

use dtb_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum EditionError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML editions file {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid editions file: {message}")]
    InvalidTable { message: String },

    #[error("edition {year} has invalid layout: {source}")]
    Layout {
        year: u16,
        #[source]
        source: ModelError,
    },

    #[error("duplicate edition in table: {year}")]
    DuplicateEdition { year: u16 },

    #[error("no edition configured for {year}")]
    UnknownEdition { year: u16 },

    #[error("invalid sha256 for edition {year}: {message}")]
    InvalidSha256 { year: u16, message: String },

    #[error("sha256 mismatch for {file} (expected {expected}, got {actual})")]
    Sha256Mismatch {
        file: String,
        expected: String,
        actual: String,
    },
}

impl EditionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
