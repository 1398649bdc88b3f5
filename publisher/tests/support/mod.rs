//! Test support utilities for publisher behavioural tests.
//!
//! Provides a scratch build tree, timestamp and permission helpers, and a
//! snapshot of an output directory for idempotence checks.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, File};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// A scratch directory with `build/` and `out/` subdirectories.
pub struct Scratch {
    _temp: TempDir,
    pub root: Utf8PathBuf,
}

impl Scratch {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("temp dir not UTF-8");
        fs::create_dir(root.join("build")).expect("failed to create build dir");
        fs::create_dir(root.join("out")).expect("failed to create out dir");
        Self { _temp: temp, root }
    }

    pub fn build_dir(&self) -> Utf8PathBuf {
        self.root.join("build")
    }

    pub fn out_dir(&self) -> Utf8PathBuf {
        self.root.join("out")
    }

    /// Write a build product with a fixed modification time.
    pub fn write_build_file(&self, name: &str, contents: &[u8]) -> Utf8PathBuf {
        let path = self.build_dir().join(name);
        fs::write(&path, contents).expect("failed to write build file");
        let file = File::options()
            .write(true)
            .open(&path)
            .expect("failed to reopen build file");
        file.set_modified(fixed_time())
            .expect("failed to set build file mtime");
        path
    }
}

/// A timestamp well in the past.
pub fn fixed_time() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000)
}

pub fn mtime(path: &Utf8Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .expect("failed to read mtime")
}

#[cfg(unix)]
pub fn mode(path: &Utf8Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .expect("failed to read metadata")
        .permissions()
        .mode()
        & 0o7777
}

#[cfg(unix)]
pub fn set_mode(path: &Utf8Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode)).expect("failed to set mode");
}

/// File names, contents, modification times and modes under `dir`.
pub type Snapshot = Vec<(String, Vec<u8>, SystemTime, bool)>;

pub fn snapshot_dir(dir: &Utf8Path) -> Snapshot {
    let mut entries: Snapshot = dir
        .read_dir_utf8()
        .expect("failed to list directory")
        .map(|entry| {
            let entry = entry.expect("failed to read directory entry");
            let path = entry.path();
            let readonly = fs::metadata(path)
                .expect("failed to read metadata")
                .permissions()
                .readonly();
            (
                entry.file_name().to_owned(),
                fs::read(path).expect("failed to read entry"),
                mtime(path),
                readonly,
            )
        })
        .collect();
    entries.sort();
    entries
}
