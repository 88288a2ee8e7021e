//! configmesh-npm: the npm-side installer and launcher for `configmesh`.
//!
//! The `configmesh` npm package does not ship the tool itself. At install time
//! it downloads the matching release archive from GitHub, checks it against
//! the release's `checksums.txt`, and extracts the binary next to this
//! launcher. At run time it starts that binary and, once a day, tells the
//! user when a newer version has been published.
//!
//! # Modules
//!
//! - [`release`] - Artifact naming, HTTP download, checksum manifests
//! - [`installer`] - The postinstall flow
//! - [`launcher`] - Running the installed binary
//! - [`update`] - Update cache, notice and background refresh
//! - [`version`] - Lenient version normalization
//! - [`config`] / [`constants`] - Environment-driven settings
//! - [`core`] - Error types and user-facing error formatting
//! - [`cli`] - Command-line entry points
//!
//! # Environment
//!
//! See [`config`] for the full list of variables, e.g. `CONFIGMESH_VERSION`
//! to pin a release or `CONFIGMESH_NO_UPDATE_NOTICE=1` to silence notices.

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;

pub mod installer;
pub mod launcher;
pub mod release;
pub mod update;

pub mod utils;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
