//! Background refresh of the latest published version.
//!
//! The refresher runs in a detached `update-check` process so the wrapped
//! command never waits on the registry. It asks `<registry>/<package>/latest`
//! for the current version, stores it in the cache together with the check
//! time, and exits. Each run makes one attempt: timeouts, HTTP errors,
//! malformed bodies, and cache write failures all end the run quietly.

use crate::config::Settings;
use crate::constants::{
    PACKAGE_NAME, UPDATE_CHECK_INTERVAL, UPDATE_CHECK_TIMEOUT, update_check_user_agent,
};
use crate::core::LauncherError;
use crate::release::http_client;
use crate::update::cache::{CacheRecord, UpdateCacheStore};
use crate::version::normalize;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Whether a record is old enough to query the registry again.
///
/// A record that was never checked (`lastChecked == 0`) always needs a refresh.
pub fn is_stale(record: Option<&CacheRecord>, now_millis: u64) -> bool {
    let window = UPDATE_CHECK_INTERVAL.as_millis() as u64;
    match record {
        None => true,
        Some(record) => {
            record.last_checked == 0 || now_millis.saturating_sub(record.last_checked) >= window
        }
    }
}

/// What a refresh run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Disabled,
    /// The cache was checked recently enough.
    Fresh,
    /// The registry answered and the cache now holds `latest`, which is empty
    /// when the body carried no version string.
    Updated {
        latest: String,
    },
    /// Cancelled before the registry answered.
    Cancelled,
    /// Network, parse or write failure; the cache is unchanged.
    Failed {
        reason: String,
    },
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    version: Option<serde_json::Value>,
}

/// Queries the registry and refreshes the update cache.
#[derive(Debug, Clone)]
pub struct UpdateRefresher {
    store: UpdateCacheStore,
    client: Client,
    latest_url: String,
    disabled: bool,
}

impl UpdateRefresher {
    /// Refresher for the package's registry entry from `settings`.
    pub fn new(store: UpdateCacheStore, settings: &Settings) -> Result<Self, LauncherError> {
        Ok(Self {
            store,
            client: http_client(&update_check_user_agent(), Some(UPDATE_CHECK_TIMEOUT))?,
            latest_url: format!("{}/{}/latest", settings.registry_url, PACKAGE_NAME),
            disabled: settings.notifications_disabled,
        })
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn latest_url(&self) -> &str {
        &self.latest_url
    }

    /// Whether notifications are on and the cache is stale.
    pub fn needs_refresh(&self, now_millis: u64) -> bool {
        !self.disabled && is_stale(self.store.read().as_ref(), now_millis)
    }

    /// Fetch the latest version string, unnormalized.
    ///
    /// A well-formed body without a string `version` yields an empty string;
    /// only transport, status and JSON errors fail.
    pub async fn fetch_latest_version(&self) -> Result<String, LauncherError> {
        let url = self.latest_url.as_str();
        let network_error = |e: reqwest::Error| LauncherError::NetworkError {
            url: url.to_string(),
            reason: e.to_string(),
        };

        debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(network_error)?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(network_error)?;
        let parsed: LatestResponse = serde_json::from_slice(&body)?;
        match parsed.version {
            Some(serde_json::Value::String(version)) => Ok(version),
            _ => {
                debug!("{} returned no version string", url);
                Ok(String::new())
            }
        }
    }

    /// Run one refresh attempt, giving up early when `cancel` fires.
    pub async fn refresh(&self, now_millis: u64, cancel: &CancellationToken) -> RefreshOutcome {
        if self.disabled {
            return RefreshOutcome::Disabled;
        }
        if !is_stale(self.store.read().as_ref(), now_millis) {
            debug!("Update cache is fresh, skipping registry query");
            return RefreshOutcome::Fresh;
        }

        let fetched = tokio::select! {
            biased;
            () = cancel.cancelled() => return RefreshOutcome::Cancelled,
            fetched = self.fetch_latest_version() => fetched,
        };

        let raw = match fetched {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Update check failed: {}", e);
                return RefreshOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let normalized = normalize(&raw);
        let latest = if normalized.is_empty() { raw } else { normalized };

        match self.store.update(|record| {
            record.last_checked = now_millis;
            record.latest = latest.clone();
        }) {
            Ok(_) => {
                debug!("Latest {} is {}", PACKAGE_NAME, latest);
                RefreshOutcome::Updated {
                    latest,
                }
            }
            Err(e) => {
                debug!("Failed to store update check: {:#}", e);
                RefreshOutcome::Failed {
                    reason: format!("{e:#}"),
                }
            }
        }
    }
}
