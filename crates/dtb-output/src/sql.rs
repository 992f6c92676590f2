//! SQL script output and the statements shared with the SQLite writer.

use std::io::Write;

use anyhow::{Context, Result};

use dtb_model::{Dataset, FieldValue, Level};

use crate::common::populated_levels;
use crate::format::EncodeOptions;

/// `CREATE TABLE` statement of a level.
///
/// Ancestor columns reference the `id` of the ancestor level's table.
pub fn create_table(dataset: &Dataset, level: Level, options: EncodeOptions) -> String {
    let mut definitions = vec!["id INTEGER NOT NULL PRIMARY KEY".to_string()];
    for ancestor in dataset.layout().ancestors_of(level) {
        definitions.push(format!(
            "{} INTEGER NOT NULL REFERENCES {} (id)",
            ancestor.id_column(),
            ancestor.table_name()
        ));
    }
    definitions.push("name TEXT NOT NULL".to_string());
    if options.minify {
        format!(
            "CREATE TABLE {} ({});",
            level.table_name(),
            definitions.join(", ")
        )
    } else {
        format!(
            "CREATE TABLE {} (\n    {}\n);",
            level.table_name(),
            definitions.join(",\n    ")
        )
    }
}

/// `INSERT INTO <table> (<columns>)` prefix of a level's insert statements.
pub fn insert_prefix(dataset: &Dataset, level: Level) -> String {
    format!(
        "INSERT INTO {} ({})",
        level.table_name(),
        dataset.columns(level).join(", ")
    )
}

/// Render a value as a SQL literal.
pub fn sql_literal(value: &FieldValue<'_>) -> String {
    match value {
        FieldValue::Integer(id) => id.to_string(),
        FieldValue::Text(text) => format!("'{}'", text.replace('\'', "''")),
    }
}

/// Full script: every populated level's table, parent first, then its rows.
pub fn sql_statements(dataset: &Dataset, options: EncodeOptions) -> Vec<String> {
    let levels = populated_levels(dataset);
    let mut statements = Vec::with_capacity(dataset.record_count() + levels.len());
    for level in &levels {
        statements.push(create_table(dataset, *level, options));
    }
    for level in &levels {
        let prefix = insert_prefix(dataset, *level);
        for record in dataset.records(*level) {
            let values: Vec<String> = record.values().iter().map(sql_literal).collect();
            statements.push(format!("{prefix} VALUES ({});", values.join(", ")));
        }
    }
    statements
}

pub fn write_sql<W: Write>(dataset: &Dataset, options: EncodeOptions, mut writer: W) -> Result<()> {
    writeln!(writer, "BEGIN TRANSACTION;").context("write sql")?;
    let mut group = String::new();
    for statement in sql_statements(dataset, options) {
        // Blank line before each table definition and each table's inserts.
        let prefix = statement.split(" VALUES").next().unwrap_or_default();
        if !options.minify && prefix != group {
            writeln!(writer).context("write sql")?;
            group = prefix.to_string();
        }
        writeln!(writer, "{statement}").context("write sql")?;
    }
    writeln!(writer, "COMMIT;").context("write sql")?;
    writer.flush().context("flush sql")?;
    Ok(())
}
