//! Update notification for the npm-distributed binary.
//!
//! Two halves share one cache file:
//!
//! - [`notifier`] runs in the foreground after the wrapped binary starts. It
//!   reads the cache, prints at most one notice per freshness window, and
//!   never touches the network.
//! - [`refresher`] runs in a detached `update-check` process ([`spawn`]),
//!   queries the registry for the latest version, and writes the result.
//!
//! The foreground never waits for the refresher; a notice reflects the
//! previous refresh, not the current one.

pub mod cache;
pub mod notifier;
pub mod refresher;
pub mod spawn;

pub use cache::{CacheLocation, CacheRecord, PlatformCacheLocation, UpdateCacheStore};
pub use notifier::{NotifyOutcome, UpdateNotifier, format_notice};
pub use refresher::{RefreshOutcome, UpdateRefresher, is_stale};
pub use spawn::{UPDATE_CHECK_COMMAND, detached_command, spawn_update_check};

/// Current time as milliseconds since the Unix epoch (0 if the clock is
/// before 1970).
pub fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}
