//! Test utilities for configmesh-npm
//!
//! Helpers shared by unit tests and the integration suite:
//! - Release archive and checksum manifest builders ([`fixtures`])
//! - Once-only tracing initialisation
//!
//! # Example
//!
//! ```rust,no_run
//! use configmesh_npm::test_utils::fixtures::{ArchiveEntry, build_tar_gz};
//!
//! let archive = build_tar_gz(&[ArchiveEntry::file("configmesh", b"#!/bin/sh\n")]);
//! assert!(!archive.is_empty());
//! ```

pub mod fixtures;

pub use fixtures::{ArchiveEntry, ReleaseFixture, build_tar_gz, manifest_line};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. `RUST_LOG` is honoured when `level` is
/// `None`; with neither set, tests run without a subscriber.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
