//! Platform/architecture resolution and artifact naming.
//!
//! Release artifacts are published as
//! `<binary>_<version>_<platform>_<arch>.tar.gz` next to a `checksums.txt`
//! manifest. [`ArtifactDescriptor`] derives all three names (artifact file,
//! download URL, manifest URL) from a single place so the installer and the
//! checksum lookup can never disagree on the file name.

use crate::config::Settings;
use crate::constants::{BINARY_NAME, CHECKSUMS_FILE, REPO_NAME, REPO_OWNER};
use crate::core::LauncherError;
use std::fmt;
use std::str::FromStr;

/// Operating systems with published release artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Darwin,
    Linux,
}

impl Platform {
    /// Platform of the running process, if a release exists for it.
    pub fn current() -> Result<Self, LauncherError> {
        std::env::consts::OS.parse()
    }

    /// Name used in artifact file names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Darwin => "darwin",
            Self::Linux => "linux",
        }
    }
}

impl FromStr for Platform {
    type Err = LauncherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "darwin" | "macos" => Ok(Self::Darwin),
            "linux" => Ok(Self::Linux),
            _ => Err(LauncherError::UnsupportedPlatform {
                platform: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architectures with published release artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    Amd64,
    Arm64,
}

impl Arch {
    /// Architecture of the running process, if a release exists for it.
    pub fn current() -> Result<Self, LauncherError> {
        std::env::consts::ARCH.parse()
    }

    /// Name used in artifact file names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
        }
    }
}

impl FromStr for Arch {
    type Err = LauncherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accepts Rust (`x86_64`), Go (`amd64`) and Node (`x64`) spellings.
        match s.trim().to_ascii_lowercase().as_str() {
            "amd64" | "x86_64" | "x64" => Ok(Self::Amd64),
            "arm64" | "aarch64" => Ok(Self::Arm64),
            _ => Err(LauncherError::UnsupportedArch {
                arch: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to locate one release artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    /// Name of the binary inside the archive.
    pub binary: String,
    /// Release version exactly as it appears in the tag and file name.
    pub version: String,
    pub platform: Platform,
    pub arch: Arch,
    /// Directory URL holding the artifact and `checksums.txt`.
    pub base_url: String,
}

impl ArtifactDescriptor {
    /// Resolve the descriptor for this host, honouring overrides.
    ///
    /// Fails with [`LauncherError::UnsupportedPlatform`] or
    /// [`LauncherError::UnsupportedArch`] before anything touches the network.
    pub fn resolve(settings: &Settings, version: &str) -> Result<Self, LauncherError> {
        let platform = match &settings.platform_override {
            Some(name) => name.parse()?,
            None => Platform::current()?,
        };
        let arch = match &settings.arch_override {
            Some(name) => name.parse()?,
            None => Arch::current()?,
        };
        let base_url = settings
            .base_url_override
            .clone()
            .unwrap_or_else(|| default_base_url(version));

        Ok(Self {
            binary: BINARY_NAME.to_string(),
            version: version.to_string(),
            platform,
            arch,
            base_url,
        })
    }

    /// `<binary>_<version>_<platform>_<arch>.tar.gz`
    pub fn file_name(&self) -> String {
        format!("{}_{}_{}_{}.tar.gz", self.binary, self.version, self.platform, self.arch)
    }

    pub fn download_url(&self) -> String {
        format!("{}/{}", self.base_url, self.file_name())
    }

    pub fn checksums_url(&self) -> String {
        format!("{}/{}", self.base_url, CHECKSUMS_FILE)
    }
}

/// GitHub release download directory for `version`.
pub fn default_base_url(version: &str) -> String {
    format!("https://github.com/{REPO_OWNER}/{REPO_NAME}/releases/download/{version}")
}
