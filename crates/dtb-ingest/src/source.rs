//! Raw byte sources.
//!
//! Retrieval (download, archive extraction, caching) happens elsewhere; a
//! source only hands over the complete bytes of one workbook or flat file.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IngestError, Result};
use crate::format::SourceFormat;

/// Something that yields the bytes of one source file.
pub trait ByteSource {
    /// Human-readable label used in logs and errors.
    fn describe(&self) -> String;

    /// Format hint derived from the source name.
    fn format(&self) -> Result<SourceFormat>;

    fn read_bytes(&self) -> Result<Vec<u8>>;
}

/// A file on local disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn format(&self) -> Result<SourceFormat> {
        SourceFormat::from_path(&self.path)
    }

    fn read_bytes(&self) -> Result<Vec<u8>> {
        let bytes = std::fs::read(&self.path).map_err(|error| IngestError::io(&self.path, error))?;
        debug!(
            source = %self.path.display(),
            byte_count = bytes.len(),
            "read source bytes"
        );
        Ok(bytes)
    }
}

/// Bytes already held in memory, labelled with a file name.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl ByteSource for MemorySource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn format(&self) -> Result<SourceFormat> {
        SourceFormat::from_path(Path::new(&self.name))
    }

    fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}
