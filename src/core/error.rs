//! Error handling for configmesh-npm
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** for the fatal installer and launcher paths
//! 2. **User-friendly messages** with actionable suggestions when reported on the CLI
//!
//! # Error Categories
//!
//! - **Preconditions**: [`LauncherError::UnsupportedPlatform`], [`LauncherError::UnsupportedArch`]
//! - **Network**: [`LauncherError::DownloadFailed`], [`LauncherError::NetworkError`]
//! - **Integrity**: [`LauncherError::ChecksumMismatch`], [`LauncherError::ChecksumEntryMissing`]
//! - **Installation**: [`LauncherError::ExtractionFailed`], [`LauncherError::BinaryNotFound`]
//!
//! Integrity errors are produced by the checksum step but are never fatal: the
//! installer downgrades them to a warning. Everything the update notifier and
//! background refresher produce is swallowed before it reaches this module.
//!
//! # Examples
//!
//! ```rust,no_run
//! use configmesh_npm::core::{LauncherError, user_friendly_error};
//!
//! let err = anyhow::Error::from(LauncherError::UnsupportedArch {
//!     arch: "riscv64".to_string(),
//! });
//! user_friendly_error(err).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Errors raised by the installer, the release fetcher and the launcher.
#[derive(Error, Debug)]
pub enum LauncherError {
    /// The operating system has no published release artifact.
    #[error("Unsupported platform: {platform}")]
    UnsupportedPlatform {
        /// Platform name as detected or overridden.
        platform: String,
    },

    /// The CPU architecture has no published release artifact.
    #[error("Unsupported arch: {arch}")]
    UnsupportedArch {
        /// Architecture name as detected or overridden.
        arch: String,
    },

    /// The server answered with a non-success terminal status.
    #[error("GET {url} -> {status}")]
    DownloadFailed {
        /// URL of the failed request (before redirects).
        url: String,
        /// HTTP status code of the terminal response.
        status: u16,
    },

    /// The request never produced a response (DNS, TLS, timeout, redirect loop).
    #[error("GET {url} failed: {reason}")]
    NetworkError {
        /// URL of the failed request.
        url: String,
        /// Transport-level failure description.
        reason: String,
    },

    /// The downloaded artifact does not hash to the manifest value.
    #[error("checksum mismatch for '{name}': expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Artifact file name.
        name: String,
        /// Digest listed in the manifest.
        expected: String,
        /// Digest of the downloaded bytes.
        actual: String,
    },

    /// The manifest has no line for the artifact.
    #[error("asset '{name}' not in checksums manifest")]
    ChecksumEntryMissing {
        /// Artifact file name.
        name: String,
    },

    /// The archive could not be unpacked or did not contain the binary.
    #[error("failed to extract binary '{binary}': {reason}")]
    ExtractionFailed {
        /// Name of the entry that was expected in the archive.
        binary: String,
        /// What went wrong.
        reason: String,
    },

    /// The wrapped executable is missing at launch time.
    #[error("Binary not found: {path}")]
    BinaryNotFound {
        /// Expected location of the executable.
        path: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{message}")]
    Other {
        /// Free-form message.
        message: String,
    },
}

/// A [`LauncherError`] enriched with optional details and a suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error.
    pub error: LauncherError,
    /// What the user can do about it.
    pub suggestion: Option<String>,
    /// Extra background shown under the error line.
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: LauncherError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for CLI display.
///
/// Known [`LauncherError`] variants anywhere in the chain get tailored
/// suggestions; everything else is wrapped as [`LauncherError::Other`] with
/// the full context chain as the message.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(launcher_error) = error.chain().find_map(|e| e.downcast_ref::<LauncherError>()) {
        let context = create_error_context(launcher_error);
        // Keep the outer context messages (e.g. "postinstall error") visible.
        return if error.chain().count() > 1 {
            context.with_details(format!("{error:#}"))
        } else {
            context
        };
    }

    let permission_denied = error
        .downcast_ref::<std::io::Error>()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied);
    if permission_denied {
        return ErrorContext::new(LauncherError::Other {
            message: format!("{error:#}"),
        })
        .with_suggestion("Check that the install directory is writable by the current user");
    }

    ErrorContext::new(LauncherError::Other {
        message: format!("{error:#}"),
    })
}

fn create_error_context(error: &LauncherError) -> ErrorContext {
    match error {
        LauncherError::UnsupportedPlatform {
            platform,
        } => ErrorContext::new(LauncherError::UnsupportedPlatform {
            platform: platform.clone(),
        })
        .with_details("configmesh: npm install supports macOS (darwin) and Linux only")
        .with_suggestion("Download a release manually or set CONFIGMESH_PLATFORM to darwin or linux"),
        LauncherError::UnsupportedArch {
            arch,
        } => ErrorContext::new(LauncherError::UnsupportedArch {
            arch: arch.clone(),
        })
        .with_suggestion("Release artifacts exist for amd64 and arm64 only"),
        LauncherError::DownloadFailed {
            url,
            status,
        } => {
            let ctx = ErrorContext::new(LauncherError::DownloadFailed {
                url: url.clone(),
                status: *status,
            });
            if *status == 404 {
                ctx.with_suggestion(
                    "Check that the release exists, or set CONFIGMESH_VERSION / CONFIGMESH_BASE_URL",
                )
            } else {
                ctx.with_suggestion("Retry the installation; the release host may be unavailable")
            }
        }
        LauncherError::NetworkError {
            url,
            reason,
        } => ErrorContext::new(LauncherError::NetworkError {
            url: url.clone(),
            reason: reason.clone(),
        })
        .with_suggestion("Check your network connection and proxy settings"),
        LauncherError::ExtractionFailed {
            binary,
            reason,
        } => ErrorContext::new(LauncherError::ExtractionFailed {
            binary: binary.clone(),
            reason: reason.clone(),
        })
        .with_details("postinstall: failed to extract binary"),
        LauncherError::BinaryNotFound {
            path,
        } => ErrorContext::new(LauncherError::BinaryNotFound {
            path: path.clone(),
        })
        .with_suggestion("Reinstall the package so the postinstall step can download the binary"),
        other => ErrorContext::new(LauncherError::Other {
            message: other.to_string(),
        }),
    }
}
