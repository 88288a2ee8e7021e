//! Executable permission handling.

use std::io;
use std::path::Path;

/// Set `rwxr-xr-x` on `path`.
///
/// A no-op on Windows, where executability is decided by the file extension.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

/// Set `rwxr-xr-x` on `path`.
///
/// A no-op on Windows, where executability is decided by the file extension.
#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Whether `path` carries the owner-execute bit. Always true off Unix.
pub fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path).map(|m| m.permissions().mode() & 0o100 != 0).unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        path.exists()
    }
}
