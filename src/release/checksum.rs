//! Checksum manifest parsing and SHA-256 verification.
//!
//! Releases publish a `checksums.txt` listing one digest per artifact. Release
//! tooling differs in how it writes that file, so the parser accepts the three
//! common layouts and silently skips anything else:
//!
//! ```text
//! 3f7a...e1  configmesh_1.4.0_linux_amd64.tar.gz
//! sha256:3f7a...e1 configmesh_1.4.0_linux_amd64.tar.gz
//! SHA256 (configmesh_1.4.0_linux_amd64.tar.gz) = 3f7a...e1
//! ```
//!
//! Digests are stored as written. Case is only folded when comparing, so an
//! uppercase manifest still verifies.

use crate::core::LauncherError;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

static PLAIN_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:sha256:)?([0-9A-Fa-f]{64})\s+\*?(\S.*)$").expect("valid checksum pattern")
});

static BSD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^SHA256 \((.+)\) = ([0-9A-Fa-f]{64})$").expect("valid checksum pattern")
});

/// Lookup table from artifact file name to its expected SHA-256 digest.
///
/// Built fresh for every install attempt and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumIndex {
    entries: HashMap<String, String>,
}

impl ChecksumIndex {
    /// Parse manifest text. Lines that match no known layout are skipped.
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();

        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let entry = if let Some(caps) = BSD_LINE.captures(line) {
                Some((caps[1].to_string(), caps[2].to_string()))
            } else {
                PLAIN_LINE
                    .captures(line)
                    .map(|caps| (caps[2].trim_end().to_string(), caps[1].to_string()))
            };

            match entry {
                Some((name, digest)) => {
                    entries.insert(name, digest);
                }
                None => debug!("Skipping unrecognized checksum line: {}", line),
            }
        }

        Self {
            entries,
        }
    }

    /// Digest listed for `file_name`, exact name match only.
    pub fn expected_for(&self, file_name: &str) -> Option<&str> {
        self.entries.get(file_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check `content` against the manifest entry for `file_name`.
    ///
    /// # Errors
    ///
    /// - [`LauncherError::ChecksumEntryMissing`] if the manifest has no entry
    /// - [`LauncherError::ChecksumMismatch`] if the digests differ
    pub fn verify(&self, file_name: &str, content: &[u8]) -> Result<(), LauncherError> {
        let expected = self.expected_for(file_name).ok_or_else(|| {
            LauncherError::ChecksumEntryMissing {
                name: file_name.to_string(),
            }
        })?;

        let actual = sha256_hex(content);
        // Case-insensitive comparison (checksums may be uppercase or lowercase)
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(LauncherError::ChecksumMismatch {
                name: file_name.to_string(),
                expected: expected.to_string(),
                actual,
            });
        }

        Ok(())
    }
}

/// Lowercase hex SHA-256 of `content`.
pub fn sha256_hex(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}
