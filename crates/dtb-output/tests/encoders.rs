use std::collections::BTreeMap;

use dtb_model::{ColumnLayout, Dataset, DatabaseRow, EntityRecord, FlatRow, Level, LevelValue};
use dtb_output::{EncodeOptions, OutputFormat, encode, write_outputs};
use rusqlite::Connection;

fn record(level: Level, id: i64, ancestor_ids: Vec<i64>, name: &str) -> EntityRecord {
    EntityRecord {
        level,
        id,
        ancestor_ids,
        name: name.to_string(),
    }
}

fn row(state: (i64, &str), municipality: Option<(i64, &str)>) -> DatabaseRow {
    DatabaseRow {
        state: Some(LevelValue::new(state.0, state.1)),
        municipality: municipality.map(|(id, name)| LevelValue::new(id, name)),
        ..DatabaseRow::default()
    }
}

fn sample_dataset() -> Dataset {
    let database_rows = vec![
        row((35, "São Paulo"), Some((3500105, "Pingo-d'Água"))),
        row((33, "Rio de Janeiro"), Some((3304557, "Rio de Janeiro"))),
        row((53, "Distrito Federal"), None),
    ];
    let rows = database_rows
        .iter()
        .map(|row| FlatRow::from_row(row, ColumnLayout::TwoLevel))
        .collect();
    let mut records = BTreeMap::new();
    records.insert(
        Level::State,
        vec![
            record(Level::State, 33, vec![], "Rio de Janeiro"),
            record(Level::State, 35, vec![], "São Paulo"),
            record(Level::State, 53, vec![], "Distrito Federal"),
        ],
    );
    records.insert(
        Level::Municipality,
        vec![
            record(Level::Municipality, 3304557, vec![33], "Rio de Janeiro"),
            record(Level::Municipality, 3500105, vec![35], "Pingo-d'Água"),
        ],
    );
    Dataset::from_parts("1940", ColumnLayout::TwoLevel, database_rows, rows, records)
}

fn encode_text(format: OutputFormat, options: EncodeOptions) -> String {
    let mut out = Vec::new();
    encode(&sample_dataset(), format, options, &mut out).expect("encode");
    String::from_utf8(out).expect("utf-8 output")
}

#[test]
fn csv_lists_flat_rows() {
    let text = encode_text(OutputFormat::Csv, EncodeOptions::default());
    insta::assert_snapshot!(text.trim_end(), @r"
state_id,state_name,municipality_id,municipality_name
35,São Paulo,3500105,Pingo-d'Água
33,Rio de Janeiro,3304557,Rio de Janeiro
53,Distrito Federal,,
");
}

#[test]
fn tsv_uses_tabs() {
    let text = encode_text(OutputFormat::Tsv, EncodeOptions::default());
    assert_eq!(
        text.lines().next(),
        Some("state_id\tstate_name\tmunicipality_id\tmunicipality_name")
    );
}

#[test]
fn sql_script_declares_keys() {
    let text = encode_text(OutputFormat::Sql, EncodeOptions::default());
    insta::assert_snapshot!(text.trim_end(), @r"
BEGIN TRANSACTION;

CREATE TABLE states (
    id INTEGER NOT NULL PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE municipalities (
    id INTEGER NOT NULL PRIMARY KEY,
    state_id INTEGER NOT NULL REFERENCES states (id),
    name TEXT NOT NULL
);

INSERT INTO states (id, name) VALUES (33, 'Rio de Janeiro');
INSERT INTO states (id, name) VALUES (35, 'São Paulo');
INSERT INTO states (id, name) VALUES (53, 'Distrito Federal');

INSERT INTO municipalities (id, state_id, name) VALUES (3304557, 33, 'Rio de Janeiro');
INSERT INTO municipalities (id, state_id, name) VALUES (3500105, 35, 'Pingo-d''Água');
COMMIT;
");
}

#[test]
fn minified_sql_has_one_statement_per_line() {
    let text = encode_text(OutputFormat::Sql, EncodeOptions { minify: true });
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 9);
    assert_eq!(
        lines[2],
        "CREATE TABLE municipalities (id INTEGER NOT NULL PRIMARY KEY, state_id INTEGER NOT NULL REFERENCES states (id), name TEXT NOT NULL);"
    );
}

#[test]
fn json_and_yaml_share_one_document() {
    let json: serde_json::Value =
        serde_json::from_str(&encode_text(OutputFormat::Json, EncodeOptions::default()))
            .expect("valid json");
    let yaml: serde_json::Value =
        serde_yaml::from_str(&encode_text(OutputFormat::Yaml, EncodeOptions::default()))
            .expect("valid yaml");
    assert_eq!(json, yaml);
    assert_eq!(json["layout"], "two-level");
    assert_eq!(json["municipalities"][1]["state_id"], 35);
    assert!(json.get("mesoregions").is_none());
}

#[test]
fn xml_has_one_element_per_record() {
    let text = encode_text(OutputFormat::Xml, EncodeOptions::default());
    assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(text.contains("<dtb edition=\"1940\" layout=\"two-level\""));
    assert!(text.contains("<state id=\"35\" name=\"São Paulo\"/>"));
    assert!(text.contains("<municipality id=\"3304557\" state_id=\"33\" name=\"Rio de Janeiro\"/>"));
    assert_eq!(text.matches("<municipality ").count(), 2);
}

#[test]
fn sqlite_output_is_queryable() {
    let dir = tempfile::tempdir().expect("temp dir");
    let paths = write_outputs(
        &sample_dataset(),
        &[OutputFormat::Sqlite, OutputFormat::Csv],
        dir.path(),
        EncodeOptions::default(),
    )
    .expect("write outputs");
    assert_eq!(paths[0], dir.path().join("dtb_1940.sqlite3"));
    assert_eq!(paths[1], dir.path().join("dtb_1940.csv"));

    let conn = Connection::open(&paths[0]).expect("open database");
    let name: String = conn
        .query_row(
            "SELECT m.name FROM municipalities m JOIN states s ON s.id = m.state_id WHERE s.id = 35",
            [],
            |row| row.get(0),
        )
        .expect("query");
    assert_eq!(name, "Pingo-d'Água");
}

#[test]
fn sqlite_cannot_stream() {
    let mut out = Vec::new();
    let error = encode(
        &sample_dataset(),
        OutputFormat::Sqlite,
        EncodeOptions::default(),
        &mut out,
    )
    .expect_err("sqlite needs a file");
    assert!(error.to_string().contains("file"));
}

#[test]
fn conflicting_ids_stop_sqlite_before_any_file_is_written() {
    let mut records = BTreeMap::new();
    records.insert(
        Level::State,
        vec![
            record(Level::State, 35, vec![], "São Paulo"),
            record(Level::State, 35, vec![], "Sao Paulo"),
        ],
    );
    let dataset = Dataset::from_parts("1940", ColumnLayout::TwoLevel, Vec::new(), Vec::new(), records);
    let dir = tempfile::tempdir().expect("temp dir");
    let output_dir = dir.path().join("out");

    let error = write_outputs(
        &dataset,
        &[OutputFormat::Csv, OutputFormat::Sqlite, OutputFormat::Cbor],
        &output_dir,
        EncodeOptions::default(),
    )
    .expect_err("duplicate state id");
    assert!(error.to_string().contains("state id 35"));
    assert!(!output_dir.exists());

    let paths = write_outputs(&dataset, &[OutputFormat::Csv], &output_dir, EncodeOptions::default())
        .expect("csv has no keys");
    assert_eq!(paths.len(), 1);
}
