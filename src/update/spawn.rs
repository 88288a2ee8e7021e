//! Launching the refresher as a detached process.
//!
//! The child is started from this executable with the hidden `update-check`
//! subcommand. Its stdio is redirected to null and it is moved out of the
//! foreground process group (a new console-less process on Windows), so it
//! neither writes into the user's terminal nor receives the terminal's Ctrl-C.
//! The returned handle is dropped immediately and never waited on.

use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Hidden subcommand that runs one refresh.
pub const UPDATE_CHECK_COMMAND: &str = "update-check";

#[cfg(windows)]
const DETACHED_PROCESS: u32 = 0x0000_0008;
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Build the command that runs `program` detached with `args`.
pub fn detached_command<I, S>(program: &Path, args: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args).stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        command.creation_flags(DETACHED_PROCESS | CREATE_NO_WINDOW);
    }

    command
}

/// Spawn `<current exe> update-check` in the background.
///
/// Returns the child's PID. The process is not waited on; if this process
/// exits first the child keeps running.
pub fn spawn_update_check() -> Result<u32> {
    let exe = std::env::current_exe().context("Failed to locate current executable")?;
    let child = detached_command(&exe, [UPDATE_CHECK_COMMAND])
        .spawn()
        .with_context(|| format!("Failed to spawn {} {}", exe.display(), UPDATE_CHECK_COMMAND))?;
    let pid = child.id();
    debug!("Spawned detached update check (pid {})", pid);
    Ok(pid)
}
