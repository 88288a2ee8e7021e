use crate::config::Settings;
use crate::installer::{ChecksumStatus, InstallOutcome, Installer};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Download and install the configmesh binary.
///
/// Run by the package manager after `npm install`. A failure here makes the
/// package install fail, which is the point: a half-installed package would
/// only fail later with a less helpful message.
///
/// ```bash
/// configmesh-npm postinstall
/// CONFIGMESH_VERSION=v1.4.0 configmesh-npm postinstall --dest ./bin
/// ```
#[derive(Args, Debug, Clone, Default)]
pub struct PostinstallCommand {
    /// Directory to install the binary into [default: directory of this executable]
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Release version to install instead of the package version
    #[arg(long, value_name = "VERSION")]
    pub version: Option<String>,
}

impl PostinstallCommand {
    pub async fn execute(self, settings: Settings) -> Result<()> {
        let dest = match self.dest {
            Some(dest) => dest,
            None => super::default_bin_dir()?,
        };

        let mut installer = Installer::new(dest, settings)?;
        if let Some(version) = self.version {
            installer = installer.with_version(version);
        }

        match installer.install().await? {
            InstallOutcome::AlreadyInstalled {
                path,
            } => info!("postinstall: {} already installed", path.display()),
            InstallOutcome::Installed {
                checksum: ChecksumStatus::Skipped(_),
                artifact,
                ..
            } => info!("postinstall: {} installed without checksum verification", artifact),
            InstallOutcome::Installed {
                ..
            } => {}
        }
        Ok(())
    }
}
