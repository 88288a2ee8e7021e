//! Runtime configuration for the installer, launcher and update checks.
//!
//! Everything configurable comes from environment variables set by the user
//! or by the host package manager. [`Settings`] gathers them once at startup
//! so the rest of the crate never touches the process environment directly.
//!
//! | Variable                       | Effect                                        |
//! |--------------------------------|-----------------------------------------------|
//! | `CONFIGMESH_VERSION`           | release version to install                    |
//! | `CONFIGMESH_BASE_URL`          | base URL for the artifact and `checksums.txt` |
//! | `CONFIGMESH_PLATFORM`          | override the detected platform                |
//! | `CONFIGMESH_ARCH`              | override the detected architecture            |
//! | `CONFIGMESH_REGISTRY_URL`      | registry queried for the latest version       |
//! | `CONFIGMESH_NO_UPDATE_NOTICE`  | `1`/`true` disables update notices            |
//! | `NO_UPDATE_NOTIFIER`           | `1`/`true` disables update notices            |
//! | `CI`                           | `1`/`true`/`yes` disables update notices      |
//!
//! The freshness window is fixed at 24 hours and is not configurable.
//!
//! # Examples
//!
//! ```rust
//! use configmesh_npm::config::Settings;
//! use std::collections::HashMap;
//!
//! let env = HashMap::from([("CI", "true"), ("CONFIGMESH_VERSION", "v1.2.0")]);
//! let settings = Settings::from_lookup(|key| env.get(key).map(|v| v.to_string()));
//!
//! assert!(settings.notifications_disabled);
//! assert_eq!(settings.release_version(), "v1.2.0");
//! ```

use crate::constants::{
    ARCH_ENV, BASE_URL_ENV, CI_ENV, DEFAULT_REGISTRY_URL, NO_UPDATE_NOTICE_ENV,
    NO_UPDATE_NOTIFIER_ENV, PLATFORM_ENV, REGISTRY_URL_ENV, VERSION_ENV,
};

/// Configuration resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Explicit release version to install instead of the package version.
    pub version_override: Option<String>,
    /// Explicit base URL replacing the GitHub release download location.
    pub base_url_override: Option<String>,
    /// Explicit platform name replacing the detected one.
    pub platform_override: Option<String>,
    /// Explicit architecture name replacing the detected one.
    pub arch_override: Option<String>,
    /// Registry serving `<package>/latest`.
    pub registry_url: String,
    /// Whether update notices and background refreshes are switched off.
    pub notifications_disabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version_override: None,
            base_url_override: None,
            platform_override: None,
            arch_override: None,
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            notifications_disabled: false,
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset, matching how shells export
    /// `FOO=` to mean "no value".
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let flag = |key: &str, truthy: &[&str]| {
            get(key).is_some_and(|v| truthy.contains(&v.trim().to_ascii_lowercase().as_str()))
        };

        let notifications_disabled = flag(NO_UPDATE_NOTICE_ENV, &["1", "true"])
            || flag(NO_UPDATE_NOTIFIER_ENV, &["1", "true"])
            || flag(CI_ENV, &["1", "true", "yes"]);

        Self {
            version_override: get(VERSION_ENV),
            base_url_override: get(BASE_URL_ENV).map(|url| url.trim_end_matches('/').to_string()),
            platform_override: get(PLATFORM_ENV),
            arch_override: get(ARCH_ENV),
            registry_url: get(REGISTRY_URL_ENV)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string()),
            notifications_disabled,
        }
    }

    /// Release version to install: the override, or this package's version.
    pub fn release_version(&self) -> String {
        self.version_override.clone().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
    }
}
