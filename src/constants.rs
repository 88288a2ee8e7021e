//! Global constants used throughout the configmesh-npm codebase.
//!
//! Release coordinates, environment variable names, timeouts and the
//! freshness window are defined here so that the installer, the update
//! notifier and the background refresher agree on them.

use std::time::Duration;

/// Name of the wrapped native binary (without platform extension).
pub const BINARY_NAME: &str = "configmesh";

/// GitHub owner of the release repository.
pub const REPO_OWNER: &str = "dvcrn";

/// GitHub repository publishing the release artifacts.
pub const REPO_NAME: &str = "configmesh-cli";

/// Package name queried on the registry for update checks.
pub const PACKAGE_NAME: &str = "configmesh";

/// Command shown to the user in the update notice.
pub const UPDATE_COMMAND: &str = "npm install -g configmesh";

/// Default registry serving `<package>/latest`.
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// File name of the checksum manifest published next to each release.
pub const CHECKSUMS_FILE: &str = "checksums.txt";

/// File name of the update cache inside the cache directory.
pub const UPDATE_CACHE_FILE: &str = "update.json";

/// Freshness window for both re-checking and re-notifying (24 hours).
pub const UPDATE_CHECK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Timeout for the latest-version query issued by the background refresher.
pub const UPDATE_CHECK_TIMEOUT: Duration = Duration::from_millis(1200);

/// Maximum number of 3xx hops followed when downloading release files.
pub const MAX_REDIRECTS: usize = 5;

/// Environment variable overriding the release version to install.
pub const VERSION_ENV: &str = "CONFIGMESH_VERSION";

/// Environment variable overriding the release download base URL.
pub const BASE_URL_ENV: &str = "CONFIGMESH_BASE_URL";

/// Environment variable overriding the detected platform.
pub const PLATFORM_ENV: &str = "CONFIGMESH_PLATFORM";

/// Environment variable overriding the detected CPU architecture.
pub const ARCH_ENV: &str = "CONFIGMESH_ARCH";

/// Environment variable overriding the registry used for update checks.
pub const REGISTRY_URL_ENV: &str = "CONFIGMESH_REGISTRY_URL";

/// Product-specific opt-out for update notices.
pub const NO_UPDATE_NOTICE_ENV: &str = "CONFIGMESH_NO_UPDATE_NOTICE";

/// Generic opt-out shared with other CLI tools.
pub const NO_UPDATE_NOTIFIER_ENV: &str = "NO_UPDATE_NOTIFIER";

/// Generic CI detection variable.
pub const CI_ENV: &str = "CI";

/// `User-Agent` sent by the installer.
pub fn postinstall_user_agent() -> String {
    format!("{REPO_NAME}-postinstall")
}

/// `User-Agent` sent by the background refresher.
pub fn update_check_user_agent() -> String {
    format!("{PACKAGE_NAME}-update-check")
}

/// File name of the wrapped binary on the current platform.
pub fn binary_file_name() -> String {
    if cfg!(windows) { format!("{BINARY_NAME}.exe") } else { BINARY_NAME.to_string() }
}
