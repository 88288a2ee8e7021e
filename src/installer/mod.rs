//! Download-and-place installation of the configmesh binary.
//!
//! The installer runs from the package manager's postinstall hook. Its job is
//! to leave an executable `configmesh` in the destination directory, or fail
//! loudly so the package manager reports a broken install.
//!
//! # Installation Process
//!
//! 1. **Resolve**: platform and architecture must have a published artifact;
//!    unsupported hosts fail here, before any network I/O
//! 2. **Short-circuit**: an existing binary only gets its permissions repaired
//! 3. **Download**: the archive is fetched into memory (fatal on failure)
//! 4. **Verify**: the SHA-256 is checked against `checksums.txt`; every failure
//!    in this step is downgraded to a warning
//! 5. **Extract**: the archive is staged in a temporary file and only the
//!    top-level `configmesh` entry is placed, with mode `0755`
//!
//! # Checksum Policy
//!
//! Verification is best-effort. A missing manifest, a missing entry, or even a
//! digest mismatch logs a warning and the install proceeds. This favours
//! availability when release tooling changes its manifest layout; it also
//! means a tampered artifact served together with a tampered manifest is not
//! caught. See `DESIGN.md` for the recorded trade-off.

mod extract;

pub use extract::extract_binary;

use crate::config::Settings;
use crate::constants::{BINARY_NAME, REPO_NAME};
use crate::core::LauncherError;
use crate::release::{ArtifactDescriptor, ReleaseFetcher};
use crate::utils::fs::{ensure_dir, make_executable};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Result of the checksum step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksumStatus {
    /// The artifact matched its manifest entry.
    Verified,
    /// Verification could not be completed; the message says why.
    Skipped(String),
}

/// What [`Installer::install`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The binary was already present; only permissions were touched.
    AlreadyInstalled {
        path: PathBuf,
    },
    /// The binary was downloaded and placed.
    Installed {
        path: PathBuf,
        artifact: String,
        checksum: ChecksumStatus,
    },
}

/// Installs the release binary into a destination directory.
///
/// # Examples
///
/// ```rust,no_run
/// use configmesh_npm::config::Settings;
/// use configmesh_npm::installer::Installer;
///
/// # async fn example() -> anyhow::Result<()> {
/// let installer = Installer::new("node_modules/configmesh", Settings::from_env())?;
/// installer.install().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Installer {
    dest_dir: PathBuf,
    settings: Settings,
    version: String,
    fetcher: ReleaseFetcher,
}

impl Installer {
    /// Installer for `dest_dir` using the version from `settings`.
    pub fn new(dest_dir: impl Into<PathBuf>, settings: Settings) -> Result<Self> {
        let version = settings.release_version();
        Ok(Self {
            dest_dir: dest_dir.into(),
            settings,
            version,
            fetcher: ReleaseFetcher::new()?,
        })
    }

    /// Install a specific release version instead of the configured one.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Use a custom fetcher (e.g. a client with a proxy or timeout).
    pub fn with_fetcher(mut self, fetcher: ReleaseFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Where the binary ends up.
    pub fn binary_path(&self) -> PathBuf {
        self.dest_dir.join(BINARY_NAME)
    }

    /// Run the installation.
    ///
    /// # Errors
    ///
    /// Fatal failures only: unsupported platform/arch, artifact download
    /// failure, or extraction failure. Checksum problems never error.
    pub async fn install(&self) -> Result<InstallOutcome> {
        let artifact = ArtifactDescriptor::resolve(&self.settings, &self.version)?;
        let binary_path = self.binary_path();

        if binary_path.exists() {
            if let Err(e) = make_executable(&binary_path) {
                debug!("Could not repair permissions on {}: {}", binary_path.display(), e);
            }
            debug!("{} already present, skipping download", binary_path.display());
            return Ok(InstallOutcome::AlreadyInstalled {
                path: binary_path,
            });
        }

        info!("postinstall: downloading {} from {}", artifact.file_name(), artifact.download_url());
        let archive = self.fetcher.fetch_artifact(&artifact).await?;

        let checksum = match self.verify_checksum(&artifact, &archive).await {
            Ok(()) => {
                info!("postinstall: checksum OK");
                ChecksumStatus::Verified
            }
            Err(e) => {
                warn!("postinstall: checksum skipped/failed: {}", e);
                ChecksumStatus::Skipped(e.to_string())
            }
        };

        ensure_dir(&self.dest_dir)?;
        let path = self.place_binary(&artifact, archive).await?;
        info!("postinstall: installed {} to {}", artifact.binary, self.dest_dir.display());

        Ok(InstallOutcome::Installed {
            path,
            artifact: artifact.file_name(),
            checksum,
        })
    }

    async fn verify_checksum(
        &self,
        artifact: &ArtifactDescriptor,
        archive: &[u8],
    ) -> Result<(), LauncherError> {
        let index = self.fetcher.fetch_checksums(artifact).await?;
        index.verify(&artifact.file_name(), archive)
    }

    /// Stage the archive in a scoped temp file and extract the binary.
    async fn place_binary(&self, artifact: &ArtifactDescriptor, archive: Vec<u8>) -> Result<PathBuf> {
        let binary = artifact.binary.clone();
        let dest_dir = self.dest_dir.clone();

        tokio::task::spawn_blocking(move || -> Result<PathBuf> {
            let mut staged = tempfile::Builder::new()
                .prefix(&format!("{REPO_NAME}-"))
                .suffix(".tar.gz")
                .tempfile()
                .context("Failed to create temporary archive file")?;
            staged.write_all(&archive).context("Failed to write temporary archive file")?;
            staged.flush()?;

            // `staged` is removed on drop, on both the success and error paths.
            Ok(extract_binary(staged.path(), &binary, &dest_dir)?)
        })
        .await
        .context("Extraction task panicked")?
    }
}
