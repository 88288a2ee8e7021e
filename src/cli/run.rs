use crate::config::Settings;
use crate::launcher::Launcher;
use anyhow::Result;
use clap::Args;
use std::ffi::OsString;
use std::path::PathBuf;

/// Run the installed configmesh binary, forwarding all arguments.
///
/// Everything after the subcommand (or after `--`) goes to configmesh
/// untouched, including `--help` and `-v`.
///
/// ```bash
/// configmesh-npm run -- sync --dry-run
/// configmesh-npm run --bin-dir ./bin status
/// ```
#[derive(Args, Debug, Clone, Default)]
#[command(disable_help_flag = true)]
pub struct RunCommand {
    /// Directory holding the configmesh binary [default: directory of this executable]
    #[arg(long, value_name = "DIR")]
    pub bin_dir: Option<PathBuf>,

    /// Arguments passed to configmesh
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<OsString>,
}

impl RunCommand {
    /// Run the binary and return its exit code.
    pub async fn execute(self, settings: Settings) -> Result<i32> {
        let bin_dir = match self.bin_dir {
            Some(dir) => dir,
            None => super::default_bin_dir()?,
        };
        Launcher::new(bin_dir, settings).run(self.args).await
    }
}
