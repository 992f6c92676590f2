//! CLI argument definitions for the territorial division builder.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dtb",
    version,
    about = "Build the Brazilian territorial division dataset from IBGE sources",
    long_about = "Build the Brazilian territorial division (DTB) dataset from one \
                  published edition.\n\n\
                  Reads the edition's workbook, CSV export or legacy flat file, \
                  reconstructs the state to subdistrict hierarchy and writes it \
                  as CSV, TSV, JSON, YAML, XML, SQL, SQLite or CBOR."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Editions table to use instead of the built-in one
    /// (falls back to DTB_EDITIONS_FILE).
    #[arg(long = "editions", value_name = "PATH", global = true)]
    pub editions: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build one edition from its source file.
    Build(BuildArgs),

    /// List the known editions and their layouts.
    Editions,
}

#[derive(Parser)]
pub struct BuildArgs {
    /// Source workbook, CSV export or fixed-width flat file.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Edition year the source belongs to.
    #[arg(long = "edition", value_name = "YEAR")]
    pub edition: u16,

    /// Output directory (default: <SOURCE_DIR>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format to generate; repeat for several.
    #[arg(long = "format", value_enum, default_values = ["all"])]
    pub formats: Vec<OutputFormatArg>,

    /// Drop indentation from JSON, XML and SQL output.
    #[arg(long = "minify")]
    pub minify: bool,

    /// How records sharing an id are reconciled.
    #[arg(long = "dedup", value_enum, default_value = "structural")]
    pub dedup: DedupArg,

    /// Build and summarize without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Csv,
    Tsv,
    Json,
    Yaml,
    Xml,
    Sql,
    Sqlite,
    Cbor,
    All,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DedupArg {
    /// Keep every distinct record, even when ids repeat.
    Structural,
    /// Keep the last record seen for each id.
    LastWriteWins,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
