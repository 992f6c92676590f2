//! Logging setup with `tracing` and `tracing-subscriber`.
//!
//! # Log Levels
//!
//! - `error`: Fatal build failures
//! - `warn`: Conflicting records, checksum mismatches
//! - `info`: Stage progress and counts
//! - `debug`: Row counters, per-level record totals, files written
//! - `trace`: Everything else

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Crates whose events follow the configured level; everything else stays at warn.
const WORKSPACE_CRATES: [&str; 7] = [
    "dtb",
    "dtb_cli",
    "dtb_core",
    "dtb_editions",
    "dtb_ingest",
    "dtb_model",
    "dtb_output",
];

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` override `level_filter` when set.
    pub use_env_filter: bool,
    pub with_timestamps: bool,
    /// Include the module path in log output.
    pub with_target: bool,
    /// Emit span close events (json only).
    pub with_spans: bool,
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Write logs to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format with colors.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON format for machine parsing.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_timestamps: false,
            with_target: false,
            with_spans: true,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn with_level(mut self, level_filter: LevelFilter) -> Self {
        self.level_filter = level_filter;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }
}

/// Install the global subscriber. Call once at startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a subscriber is
/// already installed.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        init_logging_with_writer(config, SharedFileWriter::new(file))
    } else {
        init_logging_with_writer(config, io::stderr)
    }
}

/// Install the global subscriber with a custom writer.
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W) -> io::Result<()>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = build_env_filter(config);
    let result = match config.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(config.with_target)
                .with_span_events(if config.with_spans {
                    fmt::format::FmtSpan::CLOSE
                } else {
                    fmt::format::FmtSpan::NONE
                });
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_writer(writer)
                .with_ansi(config.with_ansi)
                .with_target(config.with_target);
            if config.with_timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(config.with_ansi)
                .with_target(config.with_target);
            if config.with_timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.without_time())
                    .try_init()
            }
        }
    };
    result.map_err(io::Error::other)
}

#[derive(Clone)]
struct SharedFileWriter {
    file: Arc<Mutex<std::fs::File>>,
}

impl SharedFileWriter {
    fn new(file: std::fs::File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }
}

struct SharedFileGuard {
    file: Arc<Mutex<std::fs::File>>,
}

impl Write for SharedFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        guard.flush()
    }
}

impl<'a> MakeWriter<'a> for SharedFileWriter {
    type Writer = SharedFileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        SharedFileGuard {
            file: Arc::clone(&self.file),
        }
    }
}

/// Directive string for the workspace crates at `level`.
pub fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(
        WORKSPACE_CRATES
            .iter()
            .map(|krate| format!("{krate}={level}")),
    );
    directives.join(",")
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    let fallback = || EnvFilter::new(default_directives(config.level_filter));
    if config.use_env_filter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
    } else {
        fallback()
    }
}
