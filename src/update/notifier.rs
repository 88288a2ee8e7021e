//! Once-per-day "update available" notice.
//!
//! The notifier never touches the network. It compares the installed version
//! with whatever the background refresher last stored in the cache, prints a
//! single line to stderr when a newer release exists, and records when it did
//! so the next notice waits a full freshness window.

use crate::config::Settings;
use crate::constants::{BINARY_NAME, UPDATE_CHECK_INTERVAL, UPDATE_COMMAND};
use crate::update::cache::UpdateCacheStore;
use crate::utils::platform::stderr_is_terminal;
use crate::version::{is_newer, normalize};
use std::io::Write;
use tracing::debug;

/// Why a notice was or was not printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Opted out through the environment or running under CI.
    Disabled,
    /// stderr is not a terminal.
    NotInteractive,
    /// The installed version could not be determined.
    UnknownInstalled,
    /// No cache yet, or it holds no usable `latest`.
    NoLatest,
    /// Installed version is current.
    UpToDate,
    /// A notice was already shown inside the current window.
    Suppressed,
    /// The notice was printed.
    Notified {
        installed: String,
        latest: String,
    },
}

/// The one-line notice shown when `latest` is newer than `installed`.
///
/// Falls back to a version-less wording when either side is unknown.
pub fn format_notice(installed: &str, latest: &str) -> String {
    if installed.is_empty() || latest.is_empty() {
        return format!("{BINARY_NAME}: an update is available. Update with: {UPDATE_COMMAND}");
    }
    format!(
        "{BINARY_NAME}: an update is available (installed {installed}, latest {latest}). \
         Update with: {UPDATE_COMMAND}"
    )
}

/// Decides whether to print the update notice for this invocation.
#[derive(Debug, Clone)]
pub struct UpdateNotifier {
    store: UpdateCacheStore,
    installed_version: String,
    disabled: bool,
    interactive: bool,
}

impl UpdateNotifier {
    /// Notifier for this package's own version, reading `settings` for opt-outs.
    pub fn new(store: UpdateCacheStore, settings: &Settings) -> Self {
        Self {
            store,
            installed_version: env!("CARGO_PKG_VERSION").to_string(),
            disabled: settings.notifications_disabled,
            interactive: stderr_is_terminal(),
        }
    }

    pub fn with_installed_version(mut self, version: impl Into<String>) -> Self {
        self.installed_version = version.into();
        self
    }

    /// Override terminal detection.
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Print the notice to stderr if due.
    pub fn notify_stderr(&self, now_millis: u64) -> NotifyOutcome {
        self.notify(now_millis, &mut std::io::stderr())
    }

    /// Print the notice to `out` if due and record that it was shown.
    ///
    /// Nothing here can fail the caller: cache and output errors are logged
    /// at debug level and otherwise ignored.
    pub fn notify<W: Write>(&self, now_millis: u64, out: &mut W) -> NotifyOutcome {
        if self.disabled {
            return NotifyOutcome::Disabled;
        }
        if !self.interactive {
            return NotifyOutcome::NotInteractive;
        }

        let installed = normalize(&self.installed_version);
        if installed.is_empty() {
            return NotifyOutcome::UnknownInstalled;
        }

        let Some(record) = self.store.read() else {
            return NotifyOutcome::NoLatest;
        };
        let latest = normalize(&record.latest);
        if latest.is_empty() {
            return NotifyOutcome::NoLatest;
        }
        if !is_newer(&latest, &installed) {
            return NotifyOutcome::UpToDate;
        }

        let window = UPDATE_CHECK_INTERVAL.as_millis() as u64;
        if record.last_notified != 0 && now_millis.saturating_sub(record.last_notified) < window {
            debug!("Update notice already shown at {}", record.last_notified);
            return NotifyOutcome::Suppressed;
        }

        if let Err(e) = writeln!(out, "{}", format_notice(&installed, &latest)) {
            debug!("Failed to print update notice: {}", e);
        }
        if let Err(e) = self.store.update(|record| record.last_notified = now_millis) {
            debug!("Failed to record update notice: {:#}", e);
        }

        NotifyOutcome::Notified {
            installed,
            latest,
        }
    }
}
