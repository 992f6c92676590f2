//! Entity record extraction and deduplication.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use dtb_model::{ColumnLayout, Dataset, DatabaseRow, EntityRecord, FlatRow, Level};

/// How records that share an id are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Records are duplicates only when every field matches. Two records
    /// with the same id and a different name are both kept.
    #[default]
    Structural,
    /// One record per id; a later row replaces the earlier record.
    LastWriteWins,
}

impl DuplicatePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            DuplicatePolicy::Structural => "structural",
            DuplicatePolicy::LastWriteWins => "last-write-wins",
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "structural" => Ok(Self::Structural),
            "last-write-wins" | "lww" => Ok(Self::LastWriteWins),
            other => Err(format!("unknown duplicate policy: {other}")),
        }
    }
}

#[derive(Debug, Default)]
struct LevelRecords {
    records: Vec<EntityRecord>,
    seen: HashSet<EntityRecord>,
    by_id: HashMap<i64, usize>,
    conflicts: usize,
}

impl LevelRecords {
    fn accept(&mut self, record: EntityRecord, policy: DuplicatePolicy) {
        match policy {
            DuplicatePolicy::Structural => {
                if self.seen.contains(&record) {
                    return;
                }
                if let Some(index) = self.by_id.get(&record.id) {
                    self.conflicts += 1;
                    warn!(
                        level = %record.level,
                        id = record.id,
                        kept = %self.records[*index].name,
                        name = %record.name,
                        "conflicting records share an id"
                    );
                } else {
                    self.by_id.insert(record.id, self.records.len());
                }
                self.seen.insert(record.clone());
                self.records.push(record);
            }
            DuplicatePolicy::LastWriteWins => match self.by_id.get(&record.id) {
                Some(index) => {
                    let existing = &mut self.records[*index];
                    if *existing != record {
                        self.conflicts += 1;
                        debug!(
                            level = %record.level,
                            id = record.id,
                            replaced = %existing.name,
                            name = %record.name,
                            "replacing record with a later row"
                        );
                        *existing = record;
                    }
                }
                None => {
                    self.by_id.insert(record.id, self.records.len());
                    self.records.push(record);
                }
            },
        }
    }
}

/// Accumulates normalized rows of one edition into a [`Dataset`].
#[derive(Debug)]
pub struct HierarchyBuilder {
    layout: ColumnLayout,
    policy: DuplicatePolicy,
    database_rows: Vec<DatabaseRow>,
    rows: Vec<FlatRow>,
    levels: BTreeMap<Level, LevelRecords>,
}

impl HierarchyBuilder {
    pub fn new(layout: ColumnLayout, policy: DuplicatePolicy) -> Self {
        let levels = layout
            .levels()
            .iter()
            .map(|level| (*level, LevelRecords::default()))
            .collect();
        Self {
            layout,
            policy,
            database_rows: Vec::new(),
            rows: Vec::new(),
            levels,
        }
    }

    pub fn layout(&self) -> ColumnLayout {
        self.layout
    }

    /// Number of rows pushed so far.
    pub fn len(&self) -> usize {
        self.database_rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.database_rows.is_empty()
    }

    pub fn push(&mut self, row: &DatabaseRow) {
        let flat = FlatRow::from_row(row, self.layout);
        if !flat.is_empty() {
            self.rows.push(flat);
        }
        for (level, records) in &mut self.levels {
            if let Some(record) = entity_record(row, self.layout, *level) {
                records.accept(record, self.policy);
            }
        }
        self.database_rows.push(row.clone());
    }

    pub fn finish(self, edition: impl Into<String>) -> Dataset {
        let mut records = BTreeMap::new();
        for (level, mut entries) in self.levels {
            entries.records.sort_by_key(|record| record.id);
            debug!(
                level = %level,
                records = entries.records.len(),
                conflicts = entries.conflicts,
                "level records built"
            );
            records.insert(level, entries.records);
        }
        Dataset::from_parts(edition, self.layout, self.database_rows, self.rows, records)
    }
}

/// The record a row asserts for `level`, when the level and all of its
/// layout ancestors are present.
fn entity_record(row: &DatabaseRow, layout: ColumnLayout, level: Level) -> Option<EntityRecord> {
    let value = row.get(level)?;
    let ancestor_ids = layout
        .ancestors_of(level)
        .map(|ancestor| row.id(ancestor))
        .collect::<Option<Vec<_>>>()?;
    Some(EntityRecord {
        level,
        id: value.id,
        ancestor_ids,
        name: value.name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use dtb_model::LevelValue;

    use super::*;

    fn row(state: (i64, &str), municipality: Option<(i64, &str)>) -> DatabaseRow {
        DatabaseRow {
            state: Some(LevelValue::new(state.0, state.1)),
            municipality: municipality.map(|(id, name)| LevelValue::new(id, name)),
            ..DatabaseRow::default()
        }
    }

    #[test]
    fn identical_rows_yield_one_record() {
        let mut builder = HierarchyBuilder::new(ColumnLayout::TwoLevel, DuplicatePolicy::Structural);
        builder.push(&row((35, "São Paulo"), Some((3500105, "Adamantina"))));
        builder.push(&row((35, "São Paulo"), Some((3500105, "Adamantina"))));
        let dataset = builder.finish("1940");
        assert_eq!(dataset.records(Level::State).len(), 1);
        assert_eq!(dataset.records(Level::Municipality).len(), 1);
        assert_eq!(dataset.rows().len(), 2);
    }

    #[test]
    fn structural_policy_keeps_conflicting_names() {
        let mut builder = HierarchyBuilder::new(ColumnLayout::TwoLevel, DuplicatePolicy::Structural);
        builder.push(&row((35, "São Paulo"), None));
        builder.push(&row((35, "Sao Paulo"), None));
        let dataset = builder.finish("1940");
        let names: Vec<_> = dataset
            .records(Level::State)
            .iter()
            .map(|record| record.name.as_str())
            .collect();
        assert_eq!(names, ["São Paulo", "Sao Paulo"]);
    }

    #[test]
    fn last_write_wins_replaces_in_place() {
        let mut builder =
            HierarchyBuilder::new(ColumnLayout::TwoLevel, DuplicatePolicy::LastWriteWins);
        builder.push(&row((35, "São Paulo"), None));
        builder.push(&row((33, "Rio de Janeiro"), None));
        builder.push(&row((35, "Sao Paulo"), None));
        let dataset = builder.finish("1940");
        let states = dataset.records(Level::State);
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].id, 33);
        assert_eq!(states[1].name, "Sao Paulo");
    }

    #[test]
    fn records_are_sorted_by_id() {
        let mut builder = HierarchyBuilder::new(ColumnLayout::TwoLevel, DuplicatePolicy::Structural);
        builder.push(&row((35, "São Paulo"), Some((3550308, "São Paulo"))));
        builder.push(&row((33, "Rio de Janeiro"), Some((3304557, "Rio de Janeiro"))));
        builder.push(&row((35, "São Paulo"), Some((3500105, "Adamantina"))));
        let dataset = builder.finish("1940");
        let ids: Vec<_> = dataset
            .records(Level::Municipality)
            .iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(ids, [3304557, 3500105, 3550308]);
        assert_eq!(dataset.records(Level::Municipality)[0].ancestor_ids, [33]);
    }

    #[test]
    fn empty_rows_are_not_flattened() {
        let mut builder = HierarchyBuilder::new(ColumnLayout::SixLevel, DuplicatePolicy::Structural);
        builder.push(&DatabaseRow::default());
        assert_eq!(builder.len(), 1);
        let dataset = builder.finish("2018");
        assert!(dataset.rows().is_empty());
        assert_eq!(dataset.record_count(), 0);
    }

    #[test]
    fn policy_parses_from_text() {
        assert_eq!("structural".parse::<DuplicatePolicy>(), Ok(DuplicatePolicy::Structural));
        assert_eq!(
            "last_write_wins".parse::<DuplicatePolicy>(),
            Ok(DuplicatePolicy::LastWriteWins)
        );
        assert!("first".parse::<DuplicatePolicy>().is_err());
    }
}
