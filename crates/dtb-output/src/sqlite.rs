//! SQLite database output.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use tracing::debug;

use dtb_model::{Dataset, FieldValue, Level};

use crate::common::{ensure_parent_dir, populated_levels};
use crate::format::EncodeOptions;
use crate::sql::{create_table, insert_prefix};

/// First id shared by two records of one level. Such a dataset cannot be
/// loaded into keyed tables.
pub fn first_duplicate_id(dataset: &Dataset) -> Option<(Level, i64)> {
    dataset.populated_levels().find_map(|level| {
        dataset
            .records(level)
            .windows(2)
            .find(|pair| pair[0].id == pair[1].id)
            .map(|pair| (level, pair[0].id))
    })
}

/// Write the dataset into a new SQLite database at `path`.
///
/// An existing file at `path` is replaced. Tables and rows are written in one
/// transaction; a duplicate id rolls the whole write back.
pub fn write_sqlite(dataset: &Dataset, options: EncodeOptions, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("remove {}", path.display()))?;
    }
    let mut conn = Connection::open(path).with_context(|| format!("open {}", path.display()))?;
    let tx = conn.transaction().context("begin transaction")?;
    let levels = populated_levels(dataset);
    for level in &levels {
        tx.execute(&create_table(dataset, *level, options), [])
            .with_context(|| format!("create table {}", level.table_name()))?;
    }
    for level in &levels {
        let columns = dataset.columns(*level);
        let placeholders: Vec<String> = (1..=columns.len()).map(|index| format!("?{index}")).collect();
        let sql = format!(
            "{} VALUES ({})",
            insert_prefix(dataset, *level),
            placeholders.join(", ")
        );
        let mut statement = tx
            .prepare(&sql)
            .with_context(|| format!("prepare insert into {}", level.table_name()))?;
        for record in dataset.records(*level) {
            let values = record.values().into_iter().map(|value| match value {
                FieldValue::Integer(id) => Value::Integer(id),
                FieldValue::Text(text) => Value::Text(text.to_string()),
            });
            statement
                .execute(params_from_iter(values))
                .with_context(|| {
                    format!("insert {} {} into {}", level, record.id, level.table_name())
                })?;
        }
        debug!(
            table = level.table_name(),
            rows = dataset.records(*level).len(),
            "sqlite table written"
        );
    }
    tx.commit().context("commit transaction")?;
    Ok(())
}
