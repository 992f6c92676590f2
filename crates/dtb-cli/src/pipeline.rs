//! Edition build pipeline with explicit stages.
//!
//! 1. **Editions**: load the edition table and resolve the requested year
//! 2. **Ingest**: read the source bytes, verify the pinned checksum, split rows
//! 3. **Normalize**: adapt, normalize and deduplicate rows into a dataset
//! 4. **Output**: write one file per requested format

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use dtb_core::{BuildOptions, build_dataset};
use dtb_editions::{Edition, EditionRegistry, load_registry, verify_source};
use dtb_ingest::{ByteSource, SourceRows, read_bytes};
use dtb_model::Dataset;
use dtb_output::{EncodeOptions, OutputFormat, write_outputs};

/// Load the edition table and pick one edition from it.
pub fn resolve_edition(editions_file: Option<&Path>, year: u16) -> Result<Edition> {
    let registry = load_editions(editions_file)?;
    let edition = registry.get(year).context("resolve edition")?;
    Ok(edition.clone())
}

pub fn load_editions(editions_file: Option<&Path>) -> Result<EditionRegistry> {
    load_registry(editions_file).context("load editions table")
}

/// Rows read from one source.
#[derive(Debug)]
pub struct IngestResult {
    pub rows: SourceRows,
    /// Label of the source the rows came from.
    pub source: String,
}

pub fn ingest(source: &dyn ByteSource, edition: &Edition) -> Result<IngestResult> {
    let span = info_span!("ingest", edition = edition.year, source = %source.describe());
    let _guard = span.enter();
    let start = Instant::now();

    let format = source
        .format()
        .with_context(|| format!("detect format of {}", source.describe()))?;
    let bytes = source
        .read_bytes()
        .with_context(|| format!("read {}", source.describe()))?;
    verify_source(edition, &bytes).context("verify source checksum")?;
    let byte_count = bytes.len();
    let rows = read_bytes(format, bytes, edition.sheet.as_deref())
        .with_context(|| format!("read rows from {}", source.describe()))?;

    info!(
        %format,
        byte_count,
        row_count = rows.len(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(IngestResult {
        rows,
        source: source.describe(),
    })
}

pub fn normalize(edition: &Edition, rows: SourceRows, options: &BuildOptions) -> Result<Dataset> {
    let span = info_span!(
        "normalize",
        edition = edition.year,
        layout = %edition.layout,
        duplicate_policy = %options.duplicate_policy
    );
    let _guard = span.enter();
    let start = Instant::now();

    let dataset = build_dataset(
        &edition.label(),
        edition.layout,
        rows,
        edition.skip_rows,
        options,
    )
    .with_context(|| format!("build edition {}", edition.year))?;

    info!(
        rows = dataset.rows().len(),
        records = dataset.record_count(),
        duration_ms = start.elapsed().as_millis(),
        "normalize complete"
    );
    Ok(dataset)
}

pub fn output(
    dataset: &Dataset,
    formats: &[OutputFormat],
    output_dir: &Path,
    options: EncodeOptions,
) -> Result<Vec<PathBuf>> {
    let span = info_span!("output", edition = dataset.edition(), output_dir = %output_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let paths = write_outputs(dataset, formats, output_dir, options)?;

    info!(
        file_count = paths.len(),
        duration_ms = start.elapsed().as_millis(),
        "output complete"
    );
    Ok(paths)
}
