//! Row shapes flowing from the row adapters to the hierarchy builder.

use crate::layout::ColumnLayout;
use crate::level::Level;

/// Raw id/name strings for one level, as read from the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawPair {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl RawPair {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
        }
    }

    pub fn absent() -> Self {
        Self::default()
    }
}

/// One source row before interpretation: exactly one pair per level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawRow {
    pub layout: ColumnLayout,
    pairs: [RawPair; 6],
}

impl RawRow {
    pub fn new(layout: ColumnLayout, pairs: [RawPair; 6]) -> Self {
        Self { layout, pairs }
    }

    /// A row with every level absent.
    pub fn empty(layout: ColumnLayout) -> Self {
        Self::new(layout, Default::default())
    }

    pub fn pair(&self, level: Level) -> &RawPair {
        &self.pairs[level.index()]
    }

    pub fn set(&mut self, level: Level, pair: RawPair) {
        self.pairs[level.index()] = pair;
    }

    pub fn pairs(&self) -> &[RawPair; 6] {
        &self.pairs
    }
}

/// A resolved level: absolute id plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct LevelValue {
    pub id: i64,
    pub name: String,
}

impl LevelValue {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Canonical flat record with one optional (id, name) per level.
///
/// A level is either fully present or fully absent, so `name` can never be
/// set without `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DatabaseRow {
    pub state: Option<LevelValue>,
    pub mesoregion: Option<LevelValue>,
    pub microregion: Option<LevelValue>,
    pub municipality: Option<LevelValue>,
    pub district: Option<LevelValue>,
    pub subdistrict: Option<LevelValue>,
}

impl DatabaseRow {
    pub fn get(&self, level: Level) -> Option<&LevelValue> {
        match level {
            Level::State => self.state.as_ref(),
            Level::Mesoregion => self.mesoregion.as_ref(),
            Level::Microregion => self.microregion.as_ref(),
            Level::Municipality => self.municipality.as_ref(),
            Level::District => self.district.as_ref(),
            Level::Subdistrict => self.subdistrict.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, level: Level) -> &mut Option<LevelValue> {
        match level {
            Level::State => &mut self.state,
            Level::Mesoregion => &mut self.mesoregion,
            Level::Microregion => &mut self.microregion,
            Level::Municipality => &mut self.municipality,
            Level::District => &mut self.district,
            Level::Subdistrict => &mut self.subdistrict,
        }
    }

    pub fn id(&self, level: Level) -> Option<i64> {
        self.get(level).map(|value| value.id)
    }

    pub fn name(&self, level: Level) -> Option<&str> {
        self.get(level).map(|value| value.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        Level::ALL.iter().all(|level| self.get(*level).is_none())
    }

    /// Deepest level present in the row.
    pub fn leaf(&self) -> Option<Level> {
        Level::ALL
            .into_iter()
            .rev()
            .find(|level| self.get(*level).is_some())
    }

    /// Every field as text, `id` then `name` per level.
    ///
    /// Used by consumers that need homogeneous string rows.
    pub fn to_string_fields(&self) -> [Option<String>; 12] {
        let mut fields: [Option<String>; 12] = Default::default();
        for level in Level::ALL {
            if let Some(value) = self.get(level) {
                fields[level.index() * 2] = Some(value.id.to_string());
                fields[level.index() * 2 + 1] = Some(value.name.clone());
            }
        }
        fields
    }
}

/// A row reduced to its present levels, parent first.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FlatRow {
    pub entries: Vec<(Level, LevelValue)>,
}

impl FlatRow {
    pub fn from_row(row: &DatabaseRow, layout: ColumnLayout) -> Self {
        let entries = layout
            .levels()
            .iter()
            .filter_map(|level| row.get(*level).map(|value| (*level, value.clone())))
            .collect();
        Self { entries }
    }

    pub fn get(&self, level: Level) -> Option<&LevelValue> {
        self.entries
            .iter()
            .find(|(entry_level, _)| *entry_level == level)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
