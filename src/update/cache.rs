//! On-disk record shared by the notifier and the background refresher.
//!
//! The record lives at `<cache dir>/configmesh/update.json`:
//!
//! ```json
//! { "lastChecked": 1718000000000, "latest": "1.4.0", "lastNotified": 0 }
//! ```
//!
//! Several processes may touch the file at once (a foreground `run` and a
//! detached `update-check`). There is no lock. Every write goes through
//! [`atomic_write`], so readers always see either the previous or the next
//! complete record, and the last writer wins. Each writer starts from a fresh
//! read and only changes its own fields, so unrelated fields (including ones
//! this version does not know about) survive.

use crate::constants::UPDATE_CACHE_FILE;
use crate::utils::fs::atomic_write;
use crate::utils::platform::get_cache_dir;
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Update-check state persisted between invocations.
///
/// Timestamps are milliseconds since the Unix epoch, `0` meaning "never".
/// Fields with the wrong JSON type read back as their sentinel instead of
/// failing the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord {
    /// When the registry was last queried.
    #[serde(default, deserialize_with = "lenient_millis")]
    pub last_checked: u64,
    /// Latest published version, empty when unknown.
    #[serde(default, deserialize_with = "lenient_string")]
    pub latest: String,
    /// When a notice was last printed.
    #[serde(default, deserialize_with = "lenient_millis")]
    pub last_notified: u64,
    /// Fields written by other versions, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn lenient_millis<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
        .unwrap_or(0))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}

/// Resolves where the cache file lives.
pub trait CacheLocation: Send + Sync {
    /// Full path of the cache file.
    fn cache_file(&self) -> Result<PathBuf>;
}

/// The per-user cache directory of the current platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformCacheLocation;

impl CacheLocation for PlatformCacheLocation {
    fn cache_file(&self) -> Result<PathBuf> {
        Ok(get_cache_dir()?.join(UPDATE_CACHE_FILE))
    }
}

/// A fixed file path, mostly for tests.
impl CacheLocation for PathBuf {
    fn cache_file(&self) -> Result<PathBuf> {
        Ok(self.clone())
    }
}

/// Reads and atomically replaces the update cache file.
#[derive(Clone)]
pub struct UpdateCacheStore {
    location: Arc<dyn CacheLocation>,
}

impl std::fmt::Debug for UpdateCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateCacheStore").field("path", &self.path().ok()).finish()
    }
}

impl Default for UpdateCacheStore {
    fn default() -> Self {
        Self::new(PlatformCacheLocation)
    }
}

impl UpdateCacheStore {
    pub fn new(location: impl CacheLocation + 'static) -> Self {
        Self {
            location: Arc::new(location),
        }
    }

    /// Store backed by a specific file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self::new(path.into())
    }

    pub fn path(&self) -> Result<PathBuf> {
        self.location.cache_file()
    }

    /// Current record, or `None` when missing, unreadable or malformed.
    pub fn read(&self) -> Option<CacheRecord> {
        let path = self.path().ok()?;
        match read_record(&path) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("No usable update cache at {}: {:#}", path.display(), e);
                None
            }
        }
    }

    /// Replace the record on disk.
    pub fn write(&self, record: &CacheRecord) -> Result<()> {
        let path = self.path()?;
        let json = serde_json::to_vec(record).context("Failed to serialize update cache")?;
        atomic_write(&path, &json)
            .with_context(|| format!("Failed to write update cache: {}", path.display()))
    }

    /// Read the latest record (or an empty one), apply `change`, write it back.
    pub fn update<F>(&self, change: F) -> Result<CacheRecord>
    where
        F: FnOnce(&mut CacheRecord),
    {
        let mut record = self.read().unwrap_or_default();
        change(&mut record);
        self.write(&record)?;
        Ok(record)
    }

    /// Delete the cache file. Returns whether there was one.
    pub fn clear(&self) -> Result<bool> {
        let path = self.path()?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove update cache: {}", path.display())),
        }
    }
}

fn read_record(path: &Path) -> Result<CacheRecord> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}
