//! Source ingestion for territorial division editions.
//!
//! Turns the bytes of a source file into rows the core can adapt:
//! workbook sheets and CSV exports become rows of [`dtb_model::Cell`],
//! the legacy flat file becomes a list of fixed-width byte records.

pub mod error;
pub mod fixed_width;
pub mod format;
pub mod sheet;
pub mod source;

pub use error::{IngestError, Result};
pub use fixed_width::split_records;
pub use format::SourceFormat;
pub use sheet::{decode_text, read_csv_rows, read_sheet_rows};
pub use source::{ByteSource, FileSource, MemorySource};

use dtb_model::Cell;

/// Rows read from a source, in the shape its format produces.
#[derive(Debug, Clone)]
pub enum SourceRows {
    Cells(Vec<Vec<Cell>>),
    Records(Vec<Vec<u8>>),
}

impl SourceRows {
    pub fn len(&self) -> usize {
        match self {
            SourceRows::Cells(rows) => rows.len(),
            SourceRows::Records(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read all rows of a source.
///
/// `sheet` selects the workbook sheet and is ignored for other formats.
pub fn read_source(source: &dyn ByteSource, sheet: Option<&str>) -> Result<SourceRows> {
    let format = source.format()?;
    let bytes = source.read_bytes()?;
    read_bytes(format, bytes, sheet)
}

/// Read rows from bytes already fetched.
pub fn read_bytes(format: SourceFormat, bytes: Vec<u8>, sheet: Option<&str>) -> Result<SourceRows> {
    match format {
        SourceFormat::Workbook => read_sheet_rows(bytes, sheet).map(SourceRows::Cells),
        SourceFormat::Csv => read_csv_rows(&bytes).map(SourceRows::Cells),
        SourceFormat::FixedWidth => Ok(SourceRows::Records(split_records(&bytes))),
    }
}
