//! Atomic file write operations using temp-and-rename strategy.
//!
//! Several processes may replace the same file at once (two shells running
//! the tool while a background refresher finishes). Each writer therefore uses
//! its own temporary sibling, named after the process id, a millisecond
//! timestamp and a per-process sequence number, before renaming it over the
//! target. Readers see either the old content or the new content, never a mix.

use crate::utils::fs::dirs::ensure_parent_dir;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Safely writes a string to a file using atomic operations.
///
/// Convenience wrapper around [`atomic_write`].
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// 1. Creates the parent directory if needed
/// 2. Writes `content` to `<file>.tmp.<pid>.<millis>.<seq>` and syncs it
/// 3. Renames the temporary file over `path`
///
/// If any step fails the temporary file is removed (best effort) and `path`
/// is left untouched.
///
/// # Examples
///
/// ```rust,no_run
/// use configmesh_npm::utils::fs::atomic_write;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// atomic_write(Path::new("/tmp/configmesh/update.json"), br#"{"lastChecked":0}"#)?;
/// # Ok(())
/// # }
/// ```
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    ensure_parent_dir(path)?;

    let temp_path = unique_temp_path(path);
    let result = write_then_rename(&temp_path, path, content);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_then_rename(temp_path: &Path, path: &Path, content: &[u8]) -> Result<()> {
    {
        let mut file = fs::File::create(temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

        file.sync_all().with_context(|| "Failed to sync file to disk")?;
    }

    fs::rename(temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// Temporary sibling of `path` unique to this process and call.
pub fn unique_temp_path(path: &Path) -> PathBuf {
    let millis = chrono::Utc::now().timestamp_millis();
    let seq = TEMP_SEQUENCE.fetch_add(1, Ordering::Relaxed);

    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(format!(".tmp.{}.{}.{}", std::process::id(), millis, seq));
    path.with_file_name(name)
}
