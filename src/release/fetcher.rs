//! HTTP retrieval of release artifacts and checksum manifests.
//!
//! Downloads are small, so every body is buffered in memory. Redirects (the
//! GitHub release host always answers with a 302 to its CDN) are followed by
//! reqwest's redirect policy, capped at [`MAX_REDIRECTS`] hops. Any terminal
//! status other than `200 OK` is reported as
//! [`LauncherError::DownloadFailed`] carrying the requested URL and the
//! status code; transport failures become [`LauncherError::NetworkError`].

use crate::constants::{MAX_REDIRECTS, postinstall_user_agent};
use crate::core::LauncherError;
use crate::release::{ArtifactDescriptor, ChecksumIndex};
use reqwest::{Client, StatusCode, redirect};
use std::time::Duration;
use tracing::debug;

/// Build an HTTP client with the crate's redirect policy.
///
/// # Arguments
///
/// * `user_agent` - value of the `User-Agent` header on every request
/// * `timeout` - total request timeout, `None` for no limit
pub fn http_client(user_agent: &str, timeout: Option<Duration>) -> Result<Client, LauncherError> {
    let mut builder =
        Client::builder().user_agent(user_agent).redirect(redirect::Policy::limited(MAX_REDIRECTS));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| LauncherError::Other {
        message: format!("Failed to build HTTP client: {e}"),
    })
}

/// Downloads release files for the installer.
#[derive(Debug, Clone)]
pub struct ReleaseFetcher {
    client: Client,
}

impl ReleaseFetcher {
    /// Fetcher identifying itself as `<repo>-postinstall`.
    pub fn new() -> Result<Self, LauncherError> {
        Ok(Self {
            client: http_client(&postinstall_user_agent(), None)?,
        })
    }

    /// Fetcher using a caller-supplied client.
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
        }
    }

    /// GET `url` and return the whole body.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, LauncherError> {
        debug!("GET {}", url);
        let network_error = |e: reqwest::Error| LauncherError::NetworkError {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(network_error)?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(network_error)?;
        debug!("GET {} -> {} bytes", url, body.len());
        Ok(body.to_vec())
    }

    /// GET `url` as UTF-8 text (invalid sequences are replaced).
    pub async fn get_text(&self, url: &str) -> Result<String, LauncherError> {
        let bytes = self.get_bytes(url).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Download the release archive described by `artifact`.
    pub async fn fetch_artifact(
        &self,
        artifact: &ArtifactDescriptor,
    ) -> Result<Vec<u8>, LauncherError> {
        self.get_bytes(&artifact.download_url()).await
    }

    /// Download the release's raw `checksums.txt`.
    pub async fn fetch_manifest(&self, artifact: &ArtifactDescriptor) -> Result<String, LauncherError> {
        self.get_text(&artifact.checksums_url()).await
    }

    /// Download and parse the release's `checksums.txt`.
    pub async fn fetch_checksums(
        &self,
        artifact: &ArtifactDescriptor,
    ) -> Result<ChecksumIndex, LauncherError> {
        let content = self.fetch_manifest(artifact).await?;
        Ok(ChecksumIndex::parse(&content))
    }
}
