//! Format dispatch.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use dtb_model::Dataset;

use crate::common::{create_file, ensure_output_dir, output_file_name};
use crate::document::{write_cbor, write_json, write_yaml};
use crate::flat::{write_csv, write_tsv};
use crate::format::{EncodeOptions, OutputFormat};
use crate::sql::write_sql;
use crate::sqlite::{first_duplicate_id, write_sqlite};
use crate::xml::write_xml;

/// Encode a dataset into a stream.
///
/// SQLite needs a file; use [`write_output`] for it.
pub fn encode<W: Write>(
    dataset: &Dataset,
    format: OutputFormat,
    options: EncodeOptions,
    writer: W,
) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(dataset, writer),
        OutputFormat::Tsv => write_tsv(dataset, writer),
        OutputFormat::Json => write_json(dataset, options, writer),
        OutputFormat::Yaml => write_yaml(dataset, writer),
        OutputFormat::Xml => write_xml(dataset, options, writer),
        OutputFormat::Sql => write_sql(dataset, options, writer),
        OutputFormat::Cbor => write_cbor(dataset, writer),
        OutputFormat::Sqlite => bail!("sqlite output can only be written to a file"),
    }
}

/// Write a dataset to `path` in one format.
pub fn write_output(
    dataset: &Dataset,
    format: OutputFormat,
    path: &Path,
    options: EncodeOptions,
) -> Result<()> {
    if format == OutputFormat::Sqlite {
        write_sqlite(dataset, options, path)?;
    } else {
        let mut writer = create_file(path)?;
        encode(dataset, format, options, &mut writer)
            .with_context(|| format!("write {format} output {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("flush {}", path.display()))?;
    }
    debug!(format = %format, path = %path.display(), "output written");
    Ok(())
}

/// Write one `dtb_<edition>.<ext>` file per format into `output_dir`.
///
/// When SQLite is requested, ids must be unique per level; otherwise nothing
/// is written.
pub fn write_outputs(
    dataset: &Dataset,
    formats: &[OutputFormat],
    output_dir: &Path,
    options: EncodeOptions,
) -> Result<Vec<PathBuf>> {
    if formats.contains(&OutputFormat::Sqlite)
        && let Some((level, id)) = first_duplicate_id(dataset)
    {
        bail!(
            "{level} id {id} is shared by conflicting records; sqlite output needs \
             unique ids (use the last-write-wins duplicate policy)"
        );
    }
    let output_dir = ensure_output_dir(output_dir)?;
    let mut paths = Vec::with_capacity(formats.len());
    for format in formats {
        let path = output_dir.join(output_file_name(dataset.edition(), *format));
        write_output(dataset, *format, &path, options)?;
        paths.push(path);
    }
    info!(
        edition = dataset.edition(),
        files = paths.len(),
        output_dir = %output_dir.display(),
        "outputs written"
    );
    Ok(paths)
}
