//! Command-line interface for the configmesh npm package.
//!
//! The npm package ships this executable next to the `configmesh` binary it
//! installs. npm calls it twice: once from the `postinstall` hook, and on
//! every user invocation through the package's bin shim (`run`).
//!
//! # Commands
//!
//! - `postinstall` - Download, verify and place the configmesh binary
//! - `run` - Execute configmesh with the given arguments
//! - `cache` - Inspect or reset the update-check cache
//! - `update-check` - Refresh the cached latest version (hidden, spawned by `run`)
//!
//! # Global Options
//!
//! `--verbose` and `--quiet` are accepted before the subcommand only, so that
//! `run -v` reaches configmesh unchanged.
//!
//! # Logging
//!
//! `RUST_LOG` always wins. Otherwise `--verbose` logs at `debug`, `--quiet`
//! turns logging off, and the default is `info` for `postinstall` (progress
//! lines in the npm log) and `warn` elsewhere so the wrapper stays silent
//! around configmesh's own output.

mod cache;
mod postinstall;
mod run;
mod update_check;

pub use cache::{CacheCommand, CacheSubcommand};
pub use postinstall::PostinstallCommand;
pub use run::RunCommand;
pub use update_check::UpdateCheckCommand;

use crate::config::Settings;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Installer and launcher for the configmesh binary.
#[derive(Parser, Debug)]
#[command(
    name = "configmesh-npm",
    about = "Installs and launches the configmesh binary for the npm package",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable all logging
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download and install the configmesh binary (npm postinstall hook)
    Postinstall(PostinstallCommand),

    /// Run configmesh, forwarding all arguments
    Run(RunCommand),

    /// Inspect or reset the update-check cache
    Cache(CacheCommand),

    #[command(name = "update-check", hide = true)]
    UpdateCheck(UpdateCheckCommand),
}

impl Cli {
    /// Log filter directive for this invocation, `None` for no logging.
    #[must_use]
    pub fn log_level(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            None
        } else {
            match self.command {
                Commands::Postinstall(_) | Commands::Cache(_) => Some("info"),
                Commands::Run(_) | Commands::UpdateCheck(_) => Some("warn"),
            }
        }
    }

    /// Execute the command and return the process exit code.
    pub async fn execute(self) -> Result<i32> {
        self.execute_with_settings(Settings::from_env()).await
    }

    /// Execute with explicit settings instead of the process environment.
    pub async fn execute_with_settings(self, settings: Settings) -> Result<i32> {
        match self.command {
            Commands::Postinstall(cmd) => cmd.execute(settings).await.map(|()| 0),
            Commands::Run(cmd) => cmd.execute(settings).await,
            Commands::Cache(cmd) => cmd.execute().await.map(|()| 0),
            Commands::UpdateCheck(cmd) => cmd.execute(settings).await.map(|()| 0),
        }
    }
}

/// Directory containing this executable, where the npm package keeps the
/// configmesh binary.
pub fn default_bin_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate current executable")?;
    exe.parent()
        .map(PathBuf::from)
        .with_context(|| format!("Executable has no parent directory: {}", exe.display()))
}
