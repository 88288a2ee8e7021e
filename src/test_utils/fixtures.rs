//! Test fixtures for release archives and checksum manifests.

use crate::release::sha256_hex;
use flate2::Compression;
use flate2::write::GzEncoder;

/// One file inside a generated `.tar.gz`.
#[derive(Clone, Debug)]
pub struct ArchiveEntry<'a> {
    pub path: &'a str,
    pub content: &'a [u8],
    pub mode: u32,
}

impl<'a> ArchiveEntry<'a> {
    /// Regular file with mode `0644`.
    pub fn file(path: &'a str, content: &'a [u8]) -> Self {
        Self {
            path,
            content,
            mode: 0o644,
        }
    }

    /// Regular file with an explicit mode.
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }
}

/// Build an in-memory gzip'd tarball from `entries`, in order.
pub fn build_tar_gz(entries: &[ArchiveEntry<'_>]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for entry in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(entry.content.len() as u64);
        header.set_mode(entry.mode);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        builder
            .append_data(&mut header, entry.path, entry.content)
            .expect("append archive entry");
    }

    builder.into_inner().and_then(|encoder| encoder.finish()).expect("finish archive")
}

/// `<sha256>  <file_name>` line for `content`, as written by `sha256sum`.
pub fn manifest_line(file_name: &str, content: &[u8]) -> String {
    format!("{}  {}\n", sha256_hex(content), file_name)
}

/// A complete release for one platform: archive bytes plus its manifest.
#[derive(Clone, Debug)]
pub struct ReleaseFixture {
    pub file_name: String,
    pub archive: Vec<u8>,
    pub manifest: String,
}

impl ReleaseFixture {
    /// Release whose archive holds a single `configmesh` entry with `binary`.
    pub fn new(version: &str, platform: &str, arch: &str, binary: &[u8]) -> Self {
        let file_name = format!("configmesh_{version}_{platform}_{arch}.tar.gz");
        let archive = build_tar_gz(&[
            ArchiveEntry::file("configmesh", binary).with_mode(0o755),
            ArchiveEntry::file("README.md", b"configmesh release"),
        ]);
        let manifest = manifest_line(&file_name, &archive);
        Self {
            file_name,
            archive,
            manifest,
        }
    }

    /// Same release, but the manifest lists some other file only.
    pub fn without_manifest_entry(mut self) -> Self {
        self.manifest = manifest_line("configmesh_other.tar.gz", b"unrelated");
        self
    }
}
