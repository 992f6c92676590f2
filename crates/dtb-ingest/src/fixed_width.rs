//! Record splitting for the legacy fixed-width flat file.

/// Split a flat file into records, one per line.
///
/// Carriage returns are stripped. Blank lines in the middle of the file are
/// kept as empty records so the reader can stop on them.
pub fn split_records(bytes: &[u8]) -> Vec<Vec<u8>> {
    let mut records: Vec<Vec<u8>> = bytes
        .split(|byte| *byte == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line).to_vec())
        .collect();
    if records.last().is_some_and(Vec::is_empty) {
        records.pop();
    }
    records
}
