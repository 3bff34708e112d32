//! Project root discovery.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::GeneratorError;

/// File whose presence marks a project root.
pub const ROOT_MARKER: &str = "Cargo.toml";

/// Walks up from `start` to the nearest directory containing `Cargo.toml`.
///
/// ## Errors
///
/// Returns `GeneratorError::ProjectRootNotFound` if no ancestor has the marker.
pub fn find_project_root(start: &Path) -> Result<PathBuf, GeneratorError> {
    let root = start
        .ancestors()
        .find(|dir| dir.join(ROOT_MARKER).is_file())
        .ok_or_else(|| GeneratorError::ProjectRootNotFound {
            start: start.to_path_buf(),
        })?;
    debug!("Project root: {}", root.display());
    Ok(root.to_path_buf())
}
