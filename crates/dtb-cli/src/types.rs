use std::path::PathBuf;

use dtb_core::DuplicatePolicy;
use dtb_model::{ColumnLayout, Level};

#[derive(Debug)]
pub struct BuildResult {
    pub edition: u16,
    pub layout: ColumnLayout,
    pub source: String,
    pub duplicate_policy: DuplicatePolicy,
    pub output_dir: Option<PathBuf>,
    pub rows: usize,
    pub levels: Vec<LevelSummary>,
    pub outputs: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct LevelSummary {
    pub level: Level,
    pub records: usize,
    /// Records beyond the first for an id already seen.
    pub duplicate_ids: usize,
}
