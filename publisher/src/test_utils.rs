//! Shared test utilities for the publisher crate.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, File};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// A scratch directory with `build/` and `out/` subdirectories.
pub struct Scratch {
    _temp: TempDir,
    /// Root of the scratch tree.
    pub root: Utf8PathBuf,
}

impl Scratch {
    /// Create a fresh scratch tree.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("temp dir not UTF-8");
        fs::create_dir(root.join("build")).expect("failed to create build dir");
        fs::create_dir(root.join("out")).expect("failed to create out dir");
        Self { _temp: temp, root }
    }

    /// Directory holding build products.
    pub fn build_dir(&self) -> Utf8PathBuf {
        self.root.join("build")
    }

    /// Directory receiving published files.
    pub fn out_dir(&self) -> Utf8PathBuf {
        self.root.join("out")
    }

    /// Write a build product and give it a fixed modification time.
    pub fn write_build_file(&self, name: &str, contents: &[u8]) -> Utf8PathBuf {
        let path = self.build_dir().join(name);
        fs::write(&path, contents).expect("failed to write build file");
        set_mtime(&path, fixed_time());
        path
    }
}

/// A timestamp well in the past, so freshly created files never match it by
/// accident.
pub fn fixed_time() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000)
}

/// Set the modification time of `path`.
pub fn set_mtime(path: &Utf8Path, time: SystemTime) {
    let file = File::options()
        .write(true)
        .open(path)
        .expect("failed to open file for timestamp update");
    file.set_modified(time).expect("failed to set mtime");
}

/// Read the modification time of `path`.
pub fn mtime(path: &Utf8Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .expect("failed to read mtime")
}

/// Permission bits of `path`.
#[cfg(unix)]
pub fn mode(path: &Utf8Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .expect("failed to read metadata")
        .permissions()
        .mode()
        & 0o7777
}

/// Set the permission bits of `path`.
#[cfg(unix)]
pub fn set_mode(path: &Utf8Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode)).expect("failed to set mode");
}
