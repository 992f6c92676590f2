use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use comfy_table::Table;
use tracing::info_span;

use dtb_cli::pipeline::{ingest, load_editions, normalize, output, resolve_edition};
use dtb_core::{BuildOptions, DuplicatePolicy};
use dtb_ingest::FileSource;
use dtb_model::Dataset;
use dtb_output::{EncodeOptions, OutputFormat};

use crate::cli::{BuildArgs, DedupArg, OutputFormatArg};
use crate::summary::{apply_table_style, header_cell};
use crate::types::{BuildResult, LevelSummary};

pub fn run_editions(editions_file: Option<&Path>) -> Result<()> {
    let registry = load_editions(editions_file)?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Year"),
        header_cell("Layout"),
        header_cell("File"),
        header_cell("Sheet"),
        header_cell("Skip"),
        header_cell("SHA-256"),
    ]);
    apply_table_style(&mut table);
    for edition in registry.iter() {
        table.add_row(vec![
            edition.year.to_string(),
            edition.layout.to_string(),
            edition.file.clone(),
            edition.sheet.clone().unwrap_or_else(|| "-".to_string()),
            edition.skip_rows.to_string(),
            edition
                .sha256
                .as_deref()
                .map(|hash| hash.get(..12).unwrap_or(hash).to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_build(args: &BuildArgs, editions_file: Option<&Path>) -> Result<BuildResult> {
    let edition_span = info_span!("edition", year = args.edition);
    let _edition_guard = edition_span.enter();

    let edition = resolve_edition(editions_file, args.edition)?;
    let build_options = BuildOptions {
        duplicate_policy: duplicate_policy(args.dedup),
    };
    let encode_options = EncodeOptions {
        minify: args.minify,
    };

    let source = FileSource::new(&args.source);
    let ingested = ingest(&source, &edition)?;
    let dataset = normalize(&edition, ingested.rows, &build_options)?;

    let (output_dir, outputs) = if args.dry_run {
        (None, Vec::new())
    } else {
        let output_dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| default_output_dir(&args.source));
        let formats = output_formats(&args.formats);
        let outputs = output(&dataset, &formats, &output_dir, encode_options)?;
        (Some(output_dir), outputs)
    };

    Ok(BuildResult {
        edition: edition.year,
        layout: edition.layout,
        source: ingested.source,
        duplicate_policy: build_options.duplicate_policy,
        output_dir,
        rows: dataset.rows().len(),
        levels: level_summaries(&dataset),
        outputs,
    })
}

fn duplicate_policy(arg: DedupArg) -> DuplicatePolicy {
    match arg {
        DedupArg::Structural => DuplicatePolicy::Structural,
        DedupArg::LastWriteWins => DuplicatePolicy::LastWriteWins,
    }
}

/// Requested formats in table order, without repeats; `all` expands to every format.
fn output_formats(args: &[OutputFormatArg]) -> Vec<OutputFormat> {
    if args.contains(&OutputFormatArg::All) {
        return OutputFormat::ALL.to_vec();
    }
    let mut formats: Vec<OutputFormat> = args
        .iter()
        .filter_map(|arg| match arg {
            OutputFormatArg::Csv => Some(OutputFormat::Csv),
            OutputFormatArg::Tsv => Some(OutputFormat::Tsv),
            OutputFormatArg::Json => Some(OutputFormat::Json),
            OutputFormatArg::Yaml => Some(OutputFormat::Yaml),
            OutputFormatArg::Xml => Some(OutputFormat::Xml),
            OutputFormatArg::Sql => Some(OutputFormat::Sql),
            OutputFormatArg::Sqlite => Some(OutputFormat::Sqlite),
            OutputFormatArg::Cbor => Some(OutputFormat::Cbor),
            OutputFormatArg::All => None,
        })
        .collect();
    formats.sort();
    formats.dedup();
    formats
}

fn default_output_dir(source: &Path) -> PathBuf {
    source
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("output"), |parent| parent.join("output"))
}

fn level_summaries(dataset: &Dataset) -> Vec<LevelSummary> {
    dataset
        .levels()
        .iter()
        .map(|level| {
            let records = dataset.records(*level);
            let distinct: HashSet<i64> = records.iter().map(|record| record.id).collect();
            LevelSummary {
                level: *level,
                records: records.len(),
                duplicate_ids: records.len() - distinct.len(),
            }
        })
        .collect()
}
