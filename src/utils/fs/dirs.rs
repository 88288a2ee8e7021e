//! Directory creation helpers.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Ensures a directory exists, creating it and its parents if necessary.
///
/// # Errors
///
/// Fails if the directory cannot be created or if `path` exists but is not
/// a directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_context(|| {
            let platform_help = if crate::utils::platform::is_windows() {
                "On Windows: Check that the path length is < 260 chars or that long path support is enabled"
            } else {
                "Check directory permissions and path validity"
            };

            format!("Failed to create directory: {}\n\n{}", path.display(), platform_help)
        })?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Ensures the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    Ok(())
}
