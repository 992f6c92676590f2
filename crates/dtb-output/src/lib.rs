//! Output encoders for the territorial division dataset.
//!
//! Every encoder reads a built [`dtb_model::Dataset`] and nothing else:
//!
//! - **CSV / TSV**: flat rows, one per source row, with the full ancestor chain
//! - **JSON / YAML / CBOR**: one document with a record list per level
//! - **XML**: one element per level, one empty element per record
//! - **SQL**: `CREATE TABLE` and `INSERT` statements with foreign keys
//! - **SQLite**: the same tables in a database file
//!
//! Levels without records are left out of every table-oriented format.

mod common;
mod document;
mod flat;
mod format;
mod sql;
mod sqlite;
mod writer;
mod xml;

pub use common::{DATASET_NAME, output_file_name};
pub use document::{DatasetDocument, write_cbor, write_json, write_yaml};
pub use flat::{write_csv, write_delimited, write_tsv};
pub use format::{EncodeOptions, OutputFormat};
pub use sql::{create_table, sql_statements, write_sql};
pub use sqlite::{first_duplicate_id, write_sqlite};
pub use writer::{encode, write_output, write_outputs};
pub use xml::write_xml;
