#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};

/// On-disk shape of an editions override file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditionsFile {
    pub manifest: ManifestHeader,
    pub editions: Vec<EditionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub schema: String,
    pub schema_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditionEntry {
    pub year: u16,
    pub layout: String,
    pub file: String,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub skip_rows: Option<usize>,
    #[serde(default)]
    pub sha256: Option<String>,
}
