//! Version normalization for update checks.
//!
//! Versions come from three loosely controlled places: the crate's own
//! version, the `latest` field in the on-disk cache, and the registry's
//! `<package>/latest` response. All of them pass through [`normalize`] before
//! being compared, so a stray `v` prefix or a partial `1.4` never breaks the
//! comparison.
//!
//! Normalization never fails. An input with no recognizable version yields an
//! empty string, and callers treat empty as "unknown, skip comparison".
//!
//! # Examples
//!
//! ```rust
//! use configmesh_npm::version::{is_newer, normalize};
//!
//! assert_eq!(normalize("v1.2.3"), "1.2.3");
//! assert_eq!(normalize("release 2.1"), "2.1.0");
//! assert_eq!(normalize("garbage"), "");
//! assert!(is_newer("1.3.0", "v1.2.9"));
//! ```

use regex::Regex;
use semver::Version;
use std::sync::LazyLock;

/// First `MAJOR[.MINOR[.PATCH]]` run of digits in a string.
static COERCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,16})(?:\.(\d{1,16}))?(?:\.(\d{1,16}))?").expect("valid coerce pattern")
});

/// Parse a version, trying a strict parse first and a coercive one second.
///
/// The strict pass accepts full semver (including prerelease and build
/// metadata) after trimming whitespace, a leading `=` and a leading `v`.
/// The coercive pass picks the first numeric run anywhere in the input and
/// pads missing minor/patch components with zero.
pub fn parse_loose(input: &str) -> Option<Version> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let cleaned = trimmed.trim_start_matches('=').trim_start();
    let cleaned = cleaned.strip_prefix(['v', 'V']).unwrap_or(cleaned);
    if let Ok(version) = Version::parse(cleaned) {
        return Some(version);
    }

    coerce(trimmed)
}

fn coerce(input: &str) -> Option<Version> {
    let caps = COERCE_PATTERN.captures(input)?;
    let part = |idx: usize| -> Option<u64> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    Some(Version::new(part(1)?, part(2)?, part(3)?))
}

/// Canonical string form of `input`, or `""` when it holds no version.
pub fn normalize(input: &str) -> String {
    parse_loose(input).map(|v| v.to_string()).unwrap_or_default()
}

/// Strict greater-than on normalized versions.
///
/// Returns `false` when either side is unparsable.
pub fn is_newer(latest: &str, installed: &str) -> bool {
    match (parse_loose(latest), parse_loose(installed)) {
        (Some(latest), Some(installed)) => latest > installed,
        _ => false,
    }
}
