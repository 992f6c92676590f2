//! Read model handed to format encoders.

use std::collections::BTreeMap;

use crate::layout::ColumnLayout;
use crate::level::Level;
use crate::row::{DatabaseRow, FlatRow};

/// One deduplicated, fully resolved entity of a level.
///
/// `ancestor_ids` follows the order of [`Dataset::columns`]: nearest ancestor
/// first, restricted to the levels the edition carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct EntityRecord {
    pub level: Level,
    pub id: i64,
    pub ancestor_ids: Vec<i64>,
    pub name: String,
}

/// A single output value of an entity record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Integer(i64),
    Text(&'a str),
}

impl EntityRecord {
    /// Values in column order: id, ancestor ids, name.
    pub fn values(&self) -> Vec<FieldValue<'_>> {
        let mut values = Vec::with_capacity(self.ancestor_ids.len() + 2);
        values.push(FieldValue::Integer(self.id));
        values.extend(self.ancestor_ids.iter().map(|id| FieldValue::Integer(*id)));
        values.push(FieldValue::Text(&self.name));
        values
    }
}

/// The built dataset of one edition.
#[derive(Debug, Clone)]
pub struct Dataset {
    edition: String,
    layout: ColumnLayout,
    database_rows: Vec<DatabaseRow>,
    rows: Vec<FlatRow>,
    records: BTreeMap<Level, Vec<EntityRecord>>,
}

impl Dataset {
    /// An empty dataset for one edition.
    pub fn new(edition: impl Into<String>, layout: ColumnLayout) -> Self {
        Self::from_parts(edition, layout, Vec::new(), Vec::new(), BTreeMap::new())
    }

    pub fn from_parts(
        edition: impl Into<String>,
        layout: ColumnLayout,
        database_rows: Vec<DatabaseRow>,
        rows: Vec<FlatRow>,
        mut records: BTreeMap<Level, Vec<EntityRecord>>,
    ) -> Self {
        records.retain(|level, _| layout.contains(*level));
        for level in layout.levels() {
            records.entry(*level).or_default();
        }
        Self {
            edition: edition.into(),
            layout,
            database_rows,
            rows,
            records,
        }
    }

    pub fn edition(&self) -> &str {
        &self.edition
    }

    pub fn layout(&self) -> ColumnLayout {
        self.layout
    }

    pub fn levels(&self) -> &'static [Level] {
        self.layout.levels()
    }

    /// Normalized rows in source order.
    pub fn database_rows(&self) -> &[DatabaseRow] {
        &self.database_rows
    }

    /// Flat rows in source order, each one leaf entity with its ancestor chain.
    pub fn rows(&self) -> &[FlatRow] {
        &self.rows
    }

    /// Deduplicated records of a level, sorted by id ascending.
    pub fn records(&self, level: Level) -> &[EntityRecord] {
        self.records
            .get(&level)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Field names of a level: `id`, ancestor id columns nearest first, `name`.
    pub fn columns(&self, level: Level) -> Vec<String> {
        let mut columns = vec!["id".to_string()];
        columns.extend(self.layout.ancestors_of(level).map(Level::id_column));
        columns.push("name".to_string());
        columns
    }

    /// Field names of the flat rows: `<level>_id`, `<level>_name` per level.
    pub fn flat_columns(&self) -> Vec<String> {
        self.levels()
            .iter()
            .flat_map(|level| [level.id_column(), level.name_column()])
            .collect()
    }

    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    /// Levels that have at least one record.
    pub fn populated_levels(&self) -> impl Iterator<Item = Level> + '_ {
        self.levels()
            .iter()
            .copied()
            .filter(|level| !self.records(*level).is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.record_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_list_ancestors_nearest_first() {
        let dataset = Dataset::new("2018", ColumnLayout::SixLevel);
        assert_eq!(
            dataset.columns(Level::Microregion),
            vec!["id", "mesoregion_id", "state_id", "name"]
        );
    }

    #[test]
    fn columns_skip_levels_outside_layout() {
        let dataset = Dataset::new("1940", ColumnLayout::TwoLevel);
        assert_eq!(
            dataset.columns(Level::Municipality),
            vec!["id", "state_id", "name"]
        );
        assert_eq!(
            dataset.flat_columns(),
            vec!["state_id", "state_name", "municipality_id", "municipality_name"]
        );
    }

    #[test]
    fn empty_dataset_has_empty_levels() {
        let dataset = Dataset::new("2018", ColumnLayout::FourLevel);
        assert!(dataset.is_empty());
        assert!(dataset.records(Level::Municipality).is_empty());
        assert!(dataset.records(Level::District).is_empty());
        assert_eq!(dataset.populated_levels().count(), 0);
    }
}
