//! Normalization and hierarchy reconstruction.
//!
//! Rows flow through three stages:
//!
//! 1. a [`RowSource`] adapter maps a source row onto one raw (id, name) pair
//!    per level,
//! 2. the [`RowNormalizer`] composes truncated ids into absolute integers and
//!    drops levels that cannot be resolved,
//! 3. the [`HierarchyBuilder`] collects flat rows and one deduplicated,
//!    id-sorted record list per level into a [`dtb_model::Dataset`].
//!
//! [`build_dataset`] runs all three over the rows of one edition.

pub mod error;
pub mod hierarchy;
pub mod normalize;
pub mod pipeline;
pub mod source;

pub use error::{CoreError, Result};
pub use hierarchy::{DuplicatePolicy, HierarchyBuilder};
pub use normalize::{IdComposition, RowNormalizer, id_composition};
pub use pipeline::{BuildOptions, build_dataset};
pub use source::{FixedWidthSource, FixedWidthState, RowSource, TabularSource, is_terminal_row};
