//! Copying files together with their metadata.
//!
//! `std::fs::copy` carries permission bits over but leaves the destination
//! with fresh timestamps. Build graphs compare modification times, so the
//! publisher copies access and modification times as well.

use crate::error::{PublishError, Result};
use camino::Utf8Path;
use log::trace;
use std::fs::{self, File, FileTimes, Metadata};
use std::io;

/// Copy `from` to `to`, including permission bits and timestamps.
///
/// An existing destination is overwritten, even when it is read-only.
/// Returns the number of bytes copied.
///
/// # Errors
///
/// Returns [`PublishError::SameFile`] when `to` is the same file as `from`,
/// and [`PublishError::CopyFailed`] when reading, writing or updating
/// metadata fails.
pub fn copy_with_metadata(from: &Utf8Path, to: &Utf8Path) -> Result<u64> {
    let copy_failed = |source: io::Error| PublishError::CopyFailed {
        from: from.to_owned(),
        to: to.to_owned(),
        source,
    };

    if same_file(from, to).map_err(copy_failed)? {
        return Err(PublishError::SameFile {
            path: to.to_owned(),
        });
    }

    make_writable(to).map_err(copy_failed)?;
    let bytes = fs::copy(from, to).map_err(copy_failed)?;
    let metadata = fs::metadata(from).map_err(copy_failed)?;
    apply_times(to, &metadata).map_err(copy_failed)?;

    trace!("copied {bytes} bytes from {from} to {to}");
    Ok(bytes)
}

/// Set the access and modification times of `path` from `metadata`.
///
/// Only attribute access is requested, so this works on read-only files the
/// caller owns. The access time is skipped on platforms that do not record
/// it.
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be opened or its times
/// cannot be changed.
pub fn apply_times(path: &Utf8Path, metadata: &Metadata) -> io::Result<()> {
    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    open_for_attributes(path)?.set_times(times)
}

#[cfg(windows)]
fn open_for_attributes(path: &Utf8Path) -> io::Result<File> {
    use std::os::windows::fs::OpenOptionsExt;

    const FILE_WRITE_ATTRIBUTES: u32 = 0x0100;
    File::options()
        .access_mode(FILE_WRITE_ATTRIBUTES)
        .open(path)
}

#[cfg(not(windows))]
fn open_for_attributes(path: &Utf8Path) -> io::Result<File> {
    File::open(path)
}

/// Whether `a` and `b` name the same file on disk.
///
/// Hard links and symlinks count as the same file. A path that does not exist
/// is never the same file as anything.
///
/// # Errors
///
/// Returns the underlying I/O error if either path cannot be inspected.
pub fn same_file(a: &Utf8Path, b: &Utf8Path) -> io::Result<bool> {
    match (file_identity(a)?, file_identity(b)?) {
        (Some(a), Some(b)) => Ok(a == b),
        _ => Ok(false),
    }
}

/// Device and inode of `path`, or `None` when it does not exist.
#[cfg(unix)]
fn file_identity(path: &Utf8Path) -> io::Result<Option<(u64, u64)>> {
    use std::os::unix::fs::MetadataExt;

    Ok(existing_metadata(path)?.map(|metadata| (metadata.dev(), metadata.ino())))
}

#[cfg(not(unix))]
fn file_identity(path: &Utf8Path) -> io::Result<Option<std::path::PathBuf>> {
    if existing_metadata(path)?.is_none() {
        return Ok(None);
    }
    fs::canonicalize(path).map(Some)
}

fn existing_metadata(path: &Utf8Path) -> io::Result<Option<Metadata>> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Give the owner write access to an existing read-only destination.
fn make_writable(path: &Utf8Path) -> io::Result<()> {
    let Some(metadata) = existing_metadata(path)? else {
        return Ok(());
    };

    let permissions = metadata.permissions();
    if !permissions.readonly() {
        return Ok(());
    }
    fs::set_permissions(path, owner_writable(&permissions))
}

#[cfg(unix)]
fn owner_writable(permissions: &fs::Permissions) -> fs::Permissions {
    use std::os::unix::fs::PermissionsExt;

    fs::Permissions::from_mode(permissions.mode() | 0o200)
}

#[cfg(not(unix))]
#[expect(
    clippy::permissions_set_readonly_false,
    reason = "only reached on platforms without Unix permission bits"
)]
fn owner_writable(permissions: &fs::Permissions) -> fs::Permissions {
    let mut permissions = permissions.clone();
    permissions.set_readonly(false);
    permissions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Scratch, fixed_time, mtime};

    #[test]
    fn copies_bytes_and_modification_time() {
        let scratch = Scratch::new();
        let source = scratch.write_build_file("game.so", b"\x7fELF payload");
        let dest = scratch.out_dir().join("game.so");

        let bytes = copy_with_metadata(&source, &dest).expect("copy should succeed");

        assert_eq!(bytes, 12);
        assert_eq!(fs::read(&dest).expect("read dest"), b"\x7fELF payload");
        assert_eq!(mtime(&dest), fixed_time());
    }

    #[test]
    fn overwrites_existing_destination() {
        let scratch = Scratch::new();
        let source = scratch.write_build_file("game.so", b"new");
        let dest = scratch.out_dir().join("game.so");
        fs::write(&dest, b"old and longer").expect("write stale dest");

        copy_with_metadata(&source, &dest).expect("copy should succeed");

        assert_eq!(fs::read(&dest).expect("read dest"), b"new");
    }

    #[test]
    fn refuses_to_copy_onto_itself() {
        let scratch = Scratch::new();
        let source = scratch.write_build_file("game.so", b"keep me");

        let err = copy_with_metadata(&source, &source).expect_err("expected same-file error");

        assert!(matches!(err, PublishError::SameFile { .. }));
        assert_eq!(fs::read(&source).expect("read source"), b"keep me");
    }

    #[cfg(unix)]
    #[test]
    fn refuses_to_copy_onto_a_hard_link_of_itself() {
        let scratch = Scratch::new();
        let source = scratch.write_build_file("game.so", b"keep me");
        let dest = scratch.out_dir().join("game.so");
        fs::hard_link(&source, &dest).expect("hard link dest to source");

        let err = copy_with_metadata(&source, &dest).expect_err("expected same-file error");

        assert!(matches!(err, PublishError::SameFile { .. }));
        assert_eq!(fs::read(&source).expect("read source"), b"keep me");
    }

    #[test]
    fn distinct_and_missing_files_are_not_the_same() {
        let scratch = Scratch::new();
        let source = scratch.write_build_file("game.so", b"elf");
        let copy = scratch.write_build_file("other.so", b"elf");
        let absent = scratch.out_dir().join("game.so");

        assert!(!same_file(&source, &copy).expect("compare files"));
        assert!(!same_file(&source, &absent).expect("compare files"));
        let dotted = scratch.build_dir().join("../build/game.so");
        assert!(same_file(&source, &dotted).expect("compare files"));
    }

    #[test]
    fn missing_source_reports_copy_failure() {
        let scratch = Scratch::new();
        let source = scratch.build_dir().join("absent.so");
        let dest = scratch.out_dir().join("absent.so");

        let err = copy_with_metadata(&source, &dest).expect_err("expected copy failure");

        assert!(matches!(err, PublishError::CopyFailed { .. }));
        assert_eq!(err.category(), crate::error::FailureCategory::MissingSource);
    }

    #[cfg(unix)]
    #[test]
    fn copies_permission_bits() {
        use crate::test_utils::{mode, set_mode};

        let scratch = Scratch::new();
        let source = scratch.write_build_file("game.so", b"elf");
        set_mode(&source, 0o751);
        let dest = scratch.out_dir().join("game.so");

        copy_with_metadata(&source, &dest).expect("copy should succeed");

        assert_eq!(mode(&dest), 0o751);
    }

    #[cfg(unix)]
    #[test]
    fn recopying_read_only_artifact_succeeds() {
        use crate::test_utils::{mode, set_mode};

        let scratch = Scratch::new();
        let source = scratch.write_build_file("game.so", b"elf");
        set_mode(&source, 0o444);
        let dest = scratch.out_dir().join("game.so");

        copy_with_metadata(&source, &dest).expect("first copy should succeed");
        copy_with_metadata(&source, &dest).expect("second copy should succeed");

        assert_eq!(mode(&dest), 0o444);
        assert_eq!(mtime(&dest), fixed_time());
    }
}
