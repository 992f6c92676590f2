//! Serde view shared by the JSON, YAML and CBOR encoders.
//!
//! The document is a map with `edition`, `layout` and one key per populated
//! level (its table name) holding that level's records. Each record is a map
//! from column name to value in [`Dataset::columns`] order.

use std::io::Write;

use anyhow::{Context, Result};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use dtb_model::{Dataset, EntityRecord, FieldValue, Level};

use crate::common::populated_levels;
use crate::format::EncodeOptions;

/// Borrowed, ordered view of a dataset.
pub struct DatasetDocument<'a> {
    dataset: &'a Dataset,
    levels: Vec<(Level, Vec<String>)>,
}

impl<'a> DatasetDocument<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        let levels = populated_levels(dataset)
            .into_iter()
            .map(|level| (level, dataset.columns(level)))
            .collect();
        Self { dataset, levels }
    }
}

impl Serialize for DatasetDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.levels.len() + 2))?;
        map.serialize_entry("edition", self.dataset.edition())?;
        map.serialize_entry("layout", self.dataset.layout().as_str())?;
        for (level, columns) in &self.levels {
            map.serialize_entry(
                level.table_name(),
                &RecordList {
                    columns,
                    records: self.dataset.records(*level),
                },
            )?;
        }
        map.end()
    }
}

struct RecordList<'a> {
    columns: &'a [String],
    records: &'a [EntityRecord],
}

impl Serialize for RecordList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for record in self.records {
            seq.serialize_element(&RecordView {
                columns: self.columns,
                record,
            })?;
        }
        seq.end()
    }
}

struct RecordView<'a> {
    columns: &'a [String],
    record: &'a EntityRecord,
}

impl Serialize for RecordView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(self.record.values()) {
            match value {
                FieldValue::Integer(id) => map.serialize_entry(column, &id)?,
                FieldValue::Text(text) => map.serialize_entry(column, text)?,
            }
        }
        map.end()
    }
}

pub fn write_json<W: Write>(dataset: &Dataset, options: EncodeOptions, writer: W) -> Result<()> {
    let document = DatasetDocument::new(dataset);
    if options.minify {
        serde_json::to_writer(writer, &document).context("encode json")
    } else {
        serde_json::to_writer_pretty(writer, &document).context("encode json")
    }
}

pub fn write_yaml<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    serde_yaml::to_writer(writer, &DatasetDocument::new(dataset)).context("encode yaml")
}

pub fn write_cbor<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    ciborium::into_writer(&DatasetDocument::new(dataset), writer).context("encode cbor")
}

#[cfg(test)]
mod tests {
    use dtb_model::{ColumnLayout, DatabaseRow, LevelValue};
    use std::collections::BTreeMap;

    use super::*;

    fn dataset() -> Dataset {
        let mut records = BTreeMap::new();
        records.insert(
            Level::State,
            vec![EntityRecord {
                level: Level::State,
                id: 35,
                ancestor_ids: vec![],
                name: "São Paulo".to_string(),
            }],
        );
        records.insert(
            Level::Municipality,
            vec![EntityRecord {
                level: Level::Municipality,
                id: 3500105,
                ancestor_ids: vec![35],
                name: "Adamantina".to_string(),
            }],
        );
        let row = DatabaseRow {
            state: Some(LevelValue::new(35, "São Paulo")),
            ..DatabaseRow::default()
        };
        Dataset::from_parts("1940", ColumnLayout::TwoLevel, vec![row], Vec::new(), records)
    }

    #[test]
    fn json_keeps_column_order() {
        let mut out = Vec::new();
        write_json(&dataset(), EncodeOptions { minify: true }, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            r#"{"edition":"1940","layout":"two-level","states":[{"id":35,"name":"São Paulo"}],"municipalities":[{"id":3500105,"state_id":35,"name":"Adamantina"}]}"#
        );
    }

    #[test]
    fn cbor_decodes_to_same_document() {
        let mut out = Vec::new();
        write_cbor(&dataset(), &mut out).unwrap();
        let value: serde_json::Value = ciborium::from_reader(out.as_slice()).unwrap();
        assert_eq!(value["municipalities"][0]["state_id"], 35);
        assert_eq!(value["states"][0]["name"], "São Paulo");
    }
}
