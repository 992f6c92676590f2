use thiserror::Error;

use dtb_model::ColumnLayout;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The layout has no adapter of the requested kind.
    #[error("no {kind} row adapter for layout {layout}")]
    NoAdapter {
        layout: ColumnLayout,
        kind: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
