//! configmesh-npm entry point
//!
//! Parses the command line, sets up logging on stderr, runs the command and
//! turns errors into a user-friendly message with exit code 1. For `run`, the
//! process exits with the wrapped binary's exit code.

use clap::Parser;
use configmesh_npm::cli::Cli;
use configmesh_npm::core::user_friendly_error;
use configmesh_npm::utils::stderr_is_terminal;
use tracing_subscriber::EnvFilter;

fn init_logging(cli: &Cli) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match cli.log_level() {
            Some(level) => EnvFilter::new(level),
            None => return,
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(stderr_is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    init_logging(&cli);

    match cli.execute().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
