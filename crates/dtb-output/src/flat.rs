//! Delimited flat output: one line per source row with its full ancestor chain.

use std::io::Write;

use anyhow::{Context, Result};

use dtb_model::Dataset;

/// Write the flat rows of a dataset with the given field delimiter.
pub fn write_delimited<W: Write>(dataset: &Dataset, delimiter: u8, writer: W) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    csv.write_record(dataset.flat_columns())
        .context("write header")?;
    for row in dataset.rows() {
        let mut fields = Vec::with_capacity(dataset.levels().len() * 2);
        for level in dataset.levels() {
            match row.get(*level) {
                Some(value) => {
                    fields.push(value.id.to_string());
                    fields.push(value.name.clone());
                }
                None => {
                    fields.push(String::new());
                    fields.push(String::new());
                }
            }
        }
        csv.write_record(&fields).context("write row")?;
    }
    csv.flush().context("flush delimited output")?;
    Ok(())
}

pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    write_delimited(dataset, b',', writer)
}

pub fn write_tsv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    write_delimited(dataset, b'\t', writer)
}
