//! Editions file path resolution.

use std::path::{Path, PathBuf};

use crate::error::EditionError;
use crate::registry::EditionRegistry;

/// Environment variable pointing at an editions override file.
pub const EDITIONS_ENV_VAR: &str = "DTB_EDITIONS_FILE";

/// Get the editions file to load, if any.
///
/// Resolution order:
/// 1. An explicit path (the `--editions` flag)
/// 2. `DTB_EDITIONS_FILE` environment variable
pub fn editions_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    std::env::var_os(EDITIONS_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Load the editions table, falling back to the built-in one.
pub fn load_registry(explicit: Option<&Path>) -> Result<EditionRegistry, EditionError> {
    match editions_file(explicit) {
        Some(path) => EditionRegistry::load(&path),
        None => Ok(EditionRegistry::builtin()),
    }
}
