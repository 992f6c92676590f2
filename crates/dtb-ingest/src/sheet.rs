//! Sheet readers yielding rows of [`Cell`] values.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use csv::{ByteRecord, ReaderBuilder};
use tracing::debug;

use dtb_model::Cell;

use crate::error::{IngestError, Result};

/// Read one sheet of a workbook (xls, xlsx, ods).
///
/// Picks the first sheet when `sheet` is `None`. Column positions are kept
/// absolute: a sheet whose used range starts at column C still yields cells
/// at indices 0 and 1 (as blanks) before the first value.
pub fn read_sheet_rows(bytes: Vec<u8>, sheet: Option<&str>) -> Result<Vec<Vec<Cell>>> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(IngestError::workbook)?;
    let sheet_names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(wanted) => sheet_names
            .iter()
            .find(|name| name.trim().eq_ignore_ascii_case(wanted.trim()))
            .cloned()
            .ok_or_else(|| IngestError::MissingSheet {
                sheet: wanted.to_string(),
                available: sheet_names.join(", "),
            })?,
        None => sheet_names.first().cloned().ok_or(IngestError::NoSheets)?,
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(IngestError::workbook)?;
    let column_offset = range.start().map_or(0, |(_, col)| col as usize);
    let rows: Vec<Vec<Cell>> = range
        .rows()
        .map(|row| {
            let mut cells = vec![Cell::Empty; column_offset];
            cells.extend(row.iter().map(data_to_cell));
            cells
        })
        .collect();
    debug!(sheet = %sheet_name, row_count = rows.len(), "read workbook sheet");
    Ok(rows)
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(value) => Cell::from(value.as_str()),
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        other => Cell::Text(other.to_string()),
    }
}

/// Read a sheet exported as CSV.
///
/// Blank lines are kept as empty rows: they mark the end of data for the
/// row adapters. Fields that are not valid UTF-8 are decoded as Latin-1.
pub fn read_csv_rows(bytes: &[u8]) -> Result<Vec<Vec<Cell>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut records = reader.byte_records();
    let mut rows = Vec::new();
    // The reader skips empty lines; put them back where they were.
    for line in split_csv_lines(bytes) {
        if line.iter().all(|byte| *byte == b'\r') {
            rows.push(Vec::new());
            continue;
        }
        match records.next() {
            Some(record) => rows.push(record_cells(&record?)),
            None => break,
        }
    }
    for record in records {
        rows.push(record_cells(&record?));
    }
    debug!(row_count = rows.len(), "read csv sheet");
    Ok(rows)
}

fn record_cells(record: &ByteRecord) -> Vec<Cell> {
    record
        .iter()
        .map(|field| Cell::from(normalize_cell(&decode_text(field)).as_str()))
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Quote {
    Outside,
    Inside,
    Closing,
}

/// Split CSV text on line feeds, keeping line breaks inside quoted fields
/// with their record. A trailing line feed does not start another line.
fn split_csv_lines(bytes: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut quote = Quote::Outside;
    let mut field_start = true;
    for (index, byte) in bytes.iter().enumerate() {
        match (quote, *byte) {
            (Quote::Inside, b'"') => quote = Quote::Closing,
            (Quote::Inside, _) => {}
            (Quote::Closing, b'"') => quote = Quote::Inside,
            (Quote::Outside, b'"') if field_start => {
                quote = Quote::Inside;
                field_start = false;
            }
            (_, b'\n') => {
                lines.push(&bytes[start..index]);
                start = index + 1;
                quote = Quote::Outside;
                field_start = true;
            }
            (_, b',') => {
                quote = Quote::Outside;
                field_start = true;
            }
            _ => {
                quote = Quote::Outside;
                field_start = false;
            }
        }
    }
    if start < bytes.len() {
        lines.push(&bytes[start..]);
    }
    lines
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Decode bytes as UTF-8, falling back to Latin-1.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|byte| char::from(*byte)).collect(),
    }
}
