#![deny(unsafe_code)]

//! Edition table: which file, sheet and column layout each published
//! edition of the territorial division uses.

pub mod error;
pub mod hash;
pub mod manifest;
pub mod paths;
pub mod registry;

pub use crate::error::EditionError;
pub use crate::paths::{EDITIONS_ENV_VAR, editions_file, load_registry};
pub use crate::registry::{Edition, EditionRegistry, verify_source};
