//! Runs the installed `configmesh` binary on behalf of the npm shim.
//!
//! The launcher forwards every argument verbatim, lets the child inherit
//! stdin/stdout/stderr, and exits with the child's exit code. While the child
//! runs it shows the update notice (if one is due) and, when the cache is
//! stale, starts a detached refresher. Neither step can change the exit code.

use crate::config::Settings;
use crate::constants::{BINARY_NAME, binary_file_name};
use crate::core::LauncherError;
use crate::update::{UpdateCacheStore, UpdateNotifier, is_stale, now_millis, spawn_update_check};
use crate::utils::fs::make_executable;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitStatus;
use tokio::process::Command;
use tracing::debug;

/// Exit code used when the child ends without one (killed by a signal).
pub const FALLBACK_EXIT_CODE: i32 = 1;

/// Map a child's exit status to the code this process exits with.
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(FALLBACK_EXIT_CODE)
}

/// Launches the wrapped binary from `bin_dir`.
#[derive(Debug, Clone)]
pub struct Launcher {
    bin_dir: PathBuf,
    settings: Settings,
    store: UpdateCacheStore,
    update_checks: bool,
}

impl Launcher {
    pub fn new(bin_dir: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            bin_dir: bin_dir.into(),
            settings,
            store: UpdateCacheStore::default(),
            update_checks: true,
        }
    }

    /// Use a specific update cache instead of the per-user one.
    pub fn with_store(mut self, store: UpdateCacheStore) -> Self {
        self.store = store;
        self
    }

    /// Turn the update notice and background refresh on or off.
    pub fn with_update_checks(mut self, enabled: bool) -> Self {
        self.update_checks = enabled;
        self
    }

    pub fn binary_path(&self) -> PathBuf {
        self.bin_dir.join(binary_file_name())
    }

    /// Path of the wrapped binary, if it exists.
    pub fn locate(&self) -> Result<PathBuf, LauncherError> {
        let path = self.binary_path();
        if path.is_file() {
            Ok(path)
        } else {
            Err(LauncherError::BinaryNotFound {
                path: path.display().to_string(),
            })
        }
    }

    /// Run the binary with `args` and return its exit code.
    ///
    /// # Errors
    ///
    /// [`LauncherError::BinaryNotFound`] when the binary is missing, or an
    /// I/O error if it cannot be started or waited on.
    pub async fn run(&self, args: Vec<OsString>) -> Result<i32> {
        let binary = self.locate()?;
        if let Err(e) = make_executable(&binary) {
            debug!("Could not set permissions on {}: {}", binary.display(), e);
        }

        debug!("Launching {} with {} argument(s)", binary.display(), args.len());
        let mut child = Command::new(&binary)
            .args(&args)
            .spawn()
            .with_context(|| format!("Failed to start {}", binary.display()))?;

        if self.update_checks {
            self.check_for_updates();
        }

        let status = loop {
            tokio::select! {
                status = child.wait() => {
                    break status.with_context(|| format!("Failed to wait for {BINARY_NAME}"))?;
                }
                _ = tokio::signal::ctrl_c() => {
                    debug!("Interrupt received, waiting for {} to exit", BINARY_NAME);
                }
            }
        };

        let code = exit_code(status);
        debug!("{} exited with {}", BINARY_NAME, code);
        Ok(code)
    }

    /// Print the notice if due and schedule a refresh if the cache is stale.
    fn check_for_updates(&self) {
        let now = now_millis();
        let outcome = UpdateNotifier::new(self.store.clone(), &self.settings).notify_stderr(now);
        debug!("Update notice: {:?}", outcome);

        if self.refresh_due(now) {
            if let Err(e) = spawn_update_check() {
                debug!("Could not schedule update check: {:#}", e);
            }
        }
    }

    /// Local check only: notifications on and the cached check is stale.
    pub(crate) fn refresh_due(&self, now_millis: u64) -> bool {
        !self.settings.notifications_disabled && is_stale(self.store.read().as_ref(), now_millis)
    }
}
