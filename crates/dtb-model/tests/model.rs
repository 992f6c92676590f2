//! Tests for dtb-model types.

use std::collections::BTreeMap;

use dtb_model::{
    ColumnLayout, DatabaseRow, Dataset, EntityRecord, FieldValue, FlatRow, Level, LevelValue,
};

fn record(level: Level, id: i64, ancestor_ids: Vec<i64>, name: &str) -> EntityRecord {
    EntityRecord {
        level,
        id,
        ancestor_ids,
        name: name.to_string(),
    }
}

#[test]
fn record_values_follow_columns() {
    let record = record(Level::Municipality, 3550308, vec![35061, 3515, 35], "São Paulo");
    let values = record.values();
    assert_eq!(values.len(), 5);
    assert_eq!(values[0], FieldValue::Integer(3550308));
    assert_eq!(values[3], FieldValue::Integer(35));
    assert_eq!(values[4], FieldValue::Text("São Paulo"));
}

#[test]
fn from_parts_drops_levels_outside_layout() {
    let mut records = BTreeMap::new();
    records.insert(Level::State, vec![record(Level::State, 35, vec![], "São Paulo")]);
    records.insert(
        Level::District,
        vec![record(Level::District, 355030801, vec![35], "Centro")],
    );
    let dataset = Dataset::from_parts(
        "1950",
        ColumnLayout::TwoLevel,
        Vec::new(),
        Vec::new(),
        records,
    );
    assert_eq!(dataset.records(Level::State).len(), 1);
    assert!(dataset.records(Level::District).is_empty());
    assert_eq!(dataset.record_count(), 1);
    let populated: Vec<Level> = dataset.populated_levels().collect();
    assert_eq!(populated, vec![Level::State]);
}

#[test]
fn dataset_exposes_rows_in_order() {
    let first = DatabaseRow {
        state: Some(LevelValue::new(33, "Rio de Janeiro")),
        ..DatabaseRow::default()
    };
    let second = DatabaseRow {
        state: Some(LevelValue::new(35, "São Paulo")),
        ..DatabaseRow::default()
    };
    let rows = vec![
        FlatRow::from_row(&first, ColumnLayout::SixLevel),
        FlatRow::from_row(&second, ColumnLayout::SixLevel),
    ];
    let dataset = Dataset::from_parts(
        "2018",
        ColumnLayout::SixLevel,
        vec![first, second],
        rows,
        BTreeMap::new(),
    );
    assert_eq!(dataset.edition(), "2018");
    assert_eq!(dataset.database_rows().len(), 2);
    assert_eq!(
        dataset.rows()[1].get(Level::State).map(|value| value.id),
        Some(35)
    );
}

#[test]
fn database_row_serializes() {
    let row = DatabaseRow {
        state: Some(LevelValue::new(35, "São Paulo")),
        ..DatabaseRow::default()
    };
    let json = serde_json::to_string(&row).expect("serialize row");
    let round: DatabaseRow = serde_json::from_str(&json).expect("deserialize row");
    assert_eq!(round, row);
}
