//! Platform-specific helpers: standard directories and terminal detection.

use anyhow::Result;
use std::io::IsTerminal;
use std::path::PathBuf;

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Returns the platform-specific cache directory for configmesh.
///
/// # Platform Paths
///
/// - **Linux**: `$XDG_CACHE_HOME/configmesh` or `$HOME/.cache/configmesh`
/// - **macOS**: `$HOME/Library/Caches/configmesh`
/// - **Windows**: `%LOCALAPPDATA%\configmesh`
pub fn get_cache_dir() -> Result<PathBuf> {
    dirs::cache_dir().map(|p| p.join(crate::constants::PACKAGE_NAME)).ok_or_else(|| {
        let platform_help = if is_windows() {
            "On Windows: Check that the LOCALAPPDATA environment variable is set"
        } else if cfg!(target_os = "macos") {
            "On macOS: Check that the HOME environment variable is set"
        } else {
            "On Linux: Check that the XDG_CACHE_HOME or HOME environment variable is set"
        };
        anyhow::anyhow!("Could not determine cache directory.\n\n{platform_help}")
    })
}

/// Whether standard error is attached to an interactive terminal.
pub fn stderr_is_terminal() -> bool {
    std::io::stderr().is_terminal()
}
