//! Integration test suite for configmesh-npm
//!
//! End-to-end tests against mock HTTP servers and the compiled binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **install**: postinstall flow against a mock release host
//! - **update_notice**: refresher and notifier sharing one cache file
//! - **cli**: the `configmesh-npm` binary (exit codes, stderr, env overrides)

mod cli;
mod install;
mod update_notice;
