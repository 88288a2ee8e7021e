//! Release artifact resolution, download and checksum verification.
//!
//! - [`artifact`]: platform/arch detection and artifact naming
//! - [`checksum`]: `checksums.txt` parsing and SHA-256 verification
//! - [`fetcher`]: HTTP downloads with bounded redirects

pub mod artifact;
pub mod checksum;
pub mod fetcher;

pub use artifact::{Arch, ArtifactDescriptor, Platform};
pub use checksum::{ChecksumIndex, sha256_hex};
pub use fetcher::{ReleaseFetcher, http_client};
