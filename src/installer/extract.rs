//! Extraction of the single binary entry from a release archive.

use crate::core::LauncherError;
use crate::utils::fs::make_executable;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};
use tar::Archive;

/// Extract the top-level entry named `binary` from the `.tar.gz` at
/// `archive_path` into `dest_dir/binary`, marked executable.
///
/// The entry is first written to a temporary file inside `dest_dir` and only
/// renamed into place once complete, so a failed extraction never leaves a
/// partial binary behind.
///
/// # Errors
///
/// [`LauncherError::ExtractionFailed`] if the archive is not a valid gzip'd
/// tarball, has no such entry, or the file cannot be written.
pub fn extract_binary(
    archive_path: &Path,
    binary: &str,
    dest_dir: &Path,
) -> Result<PathBuf, LauncherError> {
    let fail = |reason: String| LauncherError::ExtractionFailed {
        binary: binary.to_string(),
        reason,
    };

    let file = File::open(archive_path)
        .map_err(|e| fail(format!("cannot open {}: {e}", archive_path.display())))?;
    let mut archive = Archive::new(GzDecoder::new(file));
    let entries = archive.entries().map_err(|e| fail(format!("invalid archive: {e}")))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| fail(format!("invalid archive: {e}")))?;
        let entry_path = entry.path().map_err(|e| fail(format!("invalid entry path: {e}")))?;
        if !is_top_level_entry(&entry_path, binary) || !entry.header().entry_type().is_file() {
            continue;
        }

        let mut staged = tempfile::Builder::new()
            .prefix(&format!(".{binary}."))
            .tempfile_in(dest_dir)
            .map_err(|e| fail(format!("cannot create file in {}: {e}", dest_dir.display())))?;
        io::copy(&mut entry, staged.as_file_mut())
            .map_err(|e| fail(format!("failed to write binary: {e}")))?;
        make_executable(staged.path())
            .map_err(|e| fail(format!("failed to set permissions: {e}")))?;

        let target = dest_dir.join(binary);
        staged.persist(&target).map_err(|e| fail(format!("failed to place binary: {e}")))?;
        return Ok(target);
    }

    Err(fail("entry not found in archive".to_string()))
}

/// `binary` or `./binary`, nothing nested.
fn is_top_level_entry(entry_path: &Path, binary: &str) -> bool {
    let mut normal = entry_path.components().filter(|c| !matches!(c, Component::CurDir));
    matches!(
        (normal.next(), normal.next()),
        (Some(Component::Normal(name)), None) if name == binary
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{ArchiveEntry, build_tar_gz};
    use tempfile::tempdir;

    fn write_archive(dir: &Path, entries: &[ArchiveEntry<'_>]) -> PathBuf {
        let path = dir.join("release.tar.gz");
        std::fs::write(&path, build_tar_gz(entries)).unwrap();
        path
    }

    #[test]
    fn test_extracts_only_named_binary() {
        let work = tempdir().unwrap();
        let dest = tempdir().unwrap();
        let archive = write_archive(
            work.path(),
            &[
                ArchiveEntry::file("README.md", b"docs"),
                ArchiveEntry::file("configmesh", b"#!/bin/sh\necho hi\n"),
                ArchiveEntry::file("LICENSE", b"MIT"),
            ],
        );

        let installed = extract_binary(&archive, "configmesh", dest.path()).unwrap();

        assert_eq!(installed, dest.path().join("configmesh"));
        assert_eq!(std::fs::read(&installed).unwrap(), b"#!/bin/sh\necho hi\n");
        assert!(crate::utils::fs::is_executable(&installed));
        let names: Vec<_> = std::fs::read_dir(dest.path()).unwrap().collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_accepts_dot_slash_prefix() {
        let work = tempdir().unwrap();
        let dest = tempdir().unwrap();
        let archive = write_archive(work.path(), &[ArchiveEntry::file("./configmesh", b"bin")]);

        extract_binary(&archive, "configmesh", dest.path()).unwrap();
        assert!(dest.path().join("configmesh").exists());
    }

    #[test]
    fn test_nested_entry_is_not_used() {
        let work = tempdir().unwrap();
        let dest = tempdir().unwrap();
        let archive = write_archive(work.path(), &[ArchiveEntry::file("bin/configmesh", b"bin")]);

        let err = extract_binary(&archive, "configmesh", dest.path()).unwrap_err();
        assert!(matches!(err, LauncherError::ExtractionFailed { .. }));
        assert_eq!(std::fs::read_dir(dest.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_corrupt_archive_fails_cleanly() {
        let work = tempdir().unwrap();
        let dest = tempdir().unwrap();
        let archive = work.path().join("broken.tar.gz");
        std::fs::write(&archive, b"definitely not gzip").unwrap();

        let err = extract_binary(&archive, "configmesh", dest.path()).unwrap_err();
        assert!(matches!(err, LauncherError::ExtractionFailed { .. }));
        assert_eq!(std::fs::read_dir(dest.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_top_level_matching() {
        assert!(is_top_level_entry(Path::new("configmesh"), "configmesh"));
        assert!(is_top_level_entry(Path::new("./configmesh"), "configmesh"));
        assert!(!is_top_level_entry(Path::new("x/configmesh"), "configmesh"));
        assert!(!is_top_level_entry(Path::new("configmesh-extra"), "configmesh"));
    }
}
