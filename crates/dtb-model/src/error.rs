use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown column layout: {0}")]
    UnknownLayout(String),
    #[error("unknown hierarchy level: {0}")]
    UnknownLevel(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
