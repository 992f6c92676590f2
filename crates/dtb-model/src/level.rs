//! Administrative hierarchy levels.

use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// One tier of the territorial hierarchy, ordered parent before child.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    State,
    Mesoregion,
    Microregion,
    Municipality,
    District,
    Subdistrict,
}

impl Level {
    /// All levels in strict parent-to-child order.
    pub const ALL: [Level; 6] = [
        Level::State,
        Level::Mesoregion,
        Level::Microregion,
        Level::Municipality,
        Level::District,
        Level::Subdistrict,
    ];

    /// Position of the level in [`Level::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Level::State => 0,
            Level::Mesoregion => 1,
            Level::Microregion => 2,
            Level::Municipality => 3,
            Level::District => 4,
            Level::Subdistrict => 5,
        }
    }

    /// Ancestors ordered nearest first (parent, grandparent, ..., state).
    pub fn ancestors(self) -> impl Iterator<Item = Level> {
        Level::ALL.into_iter().take(self.index()).rev()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Level::State => "state",
            Level::Mesoregion => "mesoregion",
            Level::Microregion => "microregion",
            Level::Municipality => "municipality",
            Level::District => "district",
            Level::Subdistrict => "subdistrict",
        }
    }

    /// Plural name used for output tables and sections.
    pub const fn table_name(self) -> &'static str {
        match self {
            Level::State => "states",
            Level::Mesoregion => "mesoregions",
            Level::Microregion => "microregions",
            Level::Municipality => "municipalities",
            Level::District => "districts",
            Level::Subdistrict => "subdistricts",
        }
    }

    /// Foreign key column name used by descendant records (`state_id`, ...).
    pub fn id_column(self) -> String {
        format!("{}_id", self.as_str())
    }

    /// Name column used by flat exports (`state_name`, ...).
    pub fn name_column(self) -> String {
        format!("{}_name", self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized || level.table_name() == normalized)
            .ok_or_else(|| ModelError::UnknownLevel(value.to_string()))
    }
}
