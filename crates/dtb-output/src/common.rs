//! Helpers shared by the encoders.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use dtb_model::{Dataset, Level};

use crate::format::OutputFormat;

/// Root element and file name prefix.
pub const DATASET_NAME: &str = "dtb";

/// `dtb_<edition>.<ext>`
pub fn output_file_name(edition: &str, format: OutputFormat) -> String {
    format!("{DATASET_NAME}_{edition}.{}", format.extension())
}

pub fn ensure_output_dir(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir.to_path_buf())
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    Ok(())
}

pub fn create_file(path: &Path) -> Result<BufWriter<File>> {
    ensure_parent_dir(path)?;
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Levels with at least one record, parent first. Empty levels are left out
/// of every table-oriented output.
pub fn populated_levels(dataset: &Dataset) -> Vec<Level> {
    dataset.populated_levels().collect()
}
