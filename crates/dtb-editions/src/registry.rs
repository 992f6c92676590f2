#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use dtb_model::ColumnLayout;

use crate::error::EditionError;
use crate::hash::sha256_hex;
use crate::manifest::{EditionEntry, EditionsFile};

const SCHEMA: &str = "dtb-editions";
const SCHEMA_VERSION: u32 = 1;
const DEFAULT_SKIP_ROWS: usize = 1;

/// Source configuration of one edition.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Edition {
    pub year: u16,
    pub layout: ColumnLayout,
    /// Name of the source file inside the published archive.
    pub file: String,
    /// Sheet to read; the first sheet when absent.
    pub sheet: Option<String>,
    /// Header rows preceding the data.
    pub skip_rows: usize,
    /// Expected SHA-256 of the source bytes, lowercase hex.
    pub sha256: Option<String>,
}

impl Edition {
    pub fn label(&self) -> String {
        self.year.to_string()
    }
}

type BuiltinEntry = (u16, ColumnLayout, &'static str, Option<&'static str>);

const BUILTIN_EDITIONS: &[BuiltinEntry] = &[
    (1940, ColumnLayout::TwoLevel, "DTB_1940.xls", Some("Municipios")),
    (1950, ColumnLayout::TwoLevel, "DTB_1950.xls", Some("Municipios")),
    (1960, ColumnLayout::TwoLevel, "DTB_1960.xls", Some("Municipios")),
    (1970, ColumnLayout::TwoLevel, "DTB_1970.xls", Some("Municipios")),
    (1980, ColumnLayout::FourLevel, "DTB_1980.xls", Some("Municipios")),
    (1988, ColumnLayout::FourLevel, "DTB_1988.xls", Some("Municipios")),
    (1991, ColumnLayout::FixedWidth, "DTB1991.TXT", None),
    (2000, ColumnLayout::SixLevelGapped, "DTB_2000.xls", Some("DTB_2000")),
    (2003, ColumnLayout::SixLevel, "DTB_2003.xls", Some("DTB_2003")),
    (2005, ColumnLayout::SixLevel, "DTB_2005.xls", Some("DTB_2005")),
    (2006, ColumnLayout::SixLevel, "DTB_2006.xls", Some("DTB_2006")),
    (2007, ColumnLayout::SixLevel, "DTB_2007.xls", Some("DTB_2007")),
    (2008, ColumnLayout::SixLevel, "DTB_2008.xls", Some("DTB_2008")),
    (2009, ColumnLayout::SixLevel, "DTB_2009.xls", Some("DTB_2009")),
    (2010, ColumnLayout::SixLevel, "DTB_2010.xls", Some("DTB_2010")),
    (2011, ColumnLayout::SixLevel, "DTB_2011.xls", Some("DTB_2011")),
    (2012, ColumnLayout::SixLevel, "DTB_2012.xls", Some("DTB_2012")),
    (2013, ColumnLayout::SixLevel, "DTB_2013.xls", Some("DTB_2013")),
    (2014, ColumnLayout::SixLevel, "DTB_2014.xls", Some("DTB_2014")),
    (2015, ColumnLayout::SixLevel, "DTB_2015.xls", Some("DTB_2015")),
    (2016, ColumnLayout::SixLevel, "DTB_2016.xls", Some("DTB_2016")),
    (2017, ColumnLayout::SixLevel, "DTB_2017.xls", Some("DTB_2017")),
    (2018, ColumnLayout::SixLevel, "RELATORIO_DTB_BRASIL_SUBDISTRITO.xls", Some("DTB_2018")),
];

/// Lookup table from edition year to its source configuration.
#[derive(Debug, Clone)]
pub struct EditionRegistry {
    editions: BTreeMap<u16, Edition>,
}

impl EditionRegistry {
    /// The table compiled into the binary.
    pub fn builtin() -> Self {
        let editions = BUILTIN_EDITIONS
            .iter()
            .map(|(year, layout, file, sheet)| {
                let edition = Edition {
                    year: *year,
                    layout: *layout,
                    file: (*file).to_string(),
                    sheet: sheet.map(str::to_string),
                    skip_rows: if layout.is_tabular() {
                        DEFAULT_SKIP_ROWS
                    } else {
                        0
                    },
                    sha256: None,
                };
                (*year, edition)
            })
            .collect();
        Self { editions }
    }

    /// Load a TOML editions file, replacing the built-in table.
    pub fn load(path: &Path) -> Result<Self, EditionError> {
        let text = std::fs::read_to_string(path).map_err(|error| EditionError::io(path, error))?;
        let registry = Self::from_toml_str(&text, &path.display().to_string())?;
        debug!(
            editions_file = %path.display(),
            edition_count = registry.len(),
            "loaded editions file"
        );
        Ok(registry)
    }

    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, EditionError> {
        let file: EditionsFile = toml::from_str(text).map_err(|source| EditionError::Toml {
            origin: origin.to_string(),
            source,
        })?;
        if file.manifest.schema != SCHEMA {
            return Err(EditionError::InvalidTable {
                message: format!("schema must be {SCHEMA}, got {}", file.manifest.schema),
            });
        }
        if file.manifest.schema_version != SCHEMA_VERSION {
            return Err(EditionError::InvalidTable {
                message: format!(
                    "unsupported schema_version {} (expected {SCHEMA_VERSION})",
                    file.manifest.schema_version
                ),
            });
        }
        if file.editions.is_empty() {
            return Err(EditionError::InvalidTable {
                message: "no editions listed".to_string(),
            });
        }
        let mut editions = BTreeMap::new();
        for entry in file.editions {
            let year = entry.year;
            let edition = edition_from_entry(entry)?;
            if editions.insert(year, edition).is_some() {
                return Err(EditionError::DuplicateEdition { year });
            }
        }
        Ok(Self { editions })
    }

    pub fn get(&self, year: u16) -> Result<&Edition, EditionError> {
        self.editions
            .get(&year)
            .ok_or(EditionError::UnknownEdition { year })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edition> {
        self.editions.values()
    }

    pub fn len(&self) -> usize {
        self.editions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editions.is_empty()
    }
}

impl Default for EditionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn edition_from_entry(entry: EditionEntry) -> Result<Edition, EditionError> {
    let year = entry.year;
    let layout: ColumnLayout = entry
        .layout
        .parse()
        .map_err(|source| EditionError::Layout { year, source })?;
    if entry.file.trim().is_empty() {
        return Err(EditionError::InvalidTable {
            message: format!("edition {year} has an empty file name"),
        });
    }
    let sha256 = match entry.sha256 {
        Some(value) => Some(validate_sha256(year, &value)?),
        None => None,
    };
    let skip_rows = entry.skip_rows.unwrap_or(if layout.is_tabular() {
        DEFAULT_SKIP_ROWS
    } else {
        0
    });
    Ok(Edition {
        year,
        layout,
        file: entry.file,
        sheet: entry.sheet.filter(|sheet| !sheet.trim().is_empty()),
        skip_rows,
        sha256,
    })
}

fn validate_sha256(year: u16, value: &str) -> Result<String, EditionError> {
    let normalized = value.trim().to_ascii_lowercase();
    if normalized.len() != 64 || !normalized.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(EditionError::InvalidSha256 {
            year,
            message: "expected 64 hex characters".to_string(),
        });
    }
    Ok(normalized)
}

/// Check source bytes against the edition's pinned checksum.
///
/// Editions without a pin always pass.
pub fn verify_source(edition: &Edition, bytes: &[u8]) -> Result<(), EditionError> {
    let Some(expected) = &edition.sha256 else {
        return Ok(());
    };
    let actual = sha256_hex(bytes);
    if &actual != expected {
        warn!(year = edition.year, file = %edition.file, "source checksum mismatch");
        return Err(EditionError::Sha256Mismatch {
            file: edition.file.clone(),
            expected: expected.clone(),
            actual,
        });
    }
    Ok(())
}
