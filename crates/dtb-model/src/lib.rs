//! Data model for the Brazilian territorial division dataset.
//!
//! Rows move through three shapes: [`RawRow`] (strings as read from a source
//! edition), [`DatabaseRow`] (absolute integer ids, absent levels nulled) and
//! finally the per-level [`EntityRecord`] tables owned by a [`Dataset`].

pub mod dataset;
pub mod error;
pub mod layout;
pub mod level;
pub mod row;
pub mod table;

pub use dataset::{Dataset, EntityRecord, FieldValue};
pub use error::{ModelError, Result};
pub use layout::ColumnLayout;
pub use level::Level;
pub use row::{DatabaseRow, FlatRow, LevelValue, RawPair, RawRow};
pub use table::{Cell, filled_cells};
