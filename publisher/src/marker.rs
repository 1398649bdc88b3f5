//! Completion marker handling.
//!
//! The marker is a file whose contents are never read. Build tooling compares
//! its modification time against its inputs, so after publishing it carries
//! the artifact's timestamps and permission bits, minus every execute bit.

use crate::error::{PublishError, Result};
use crate::transfer::apply_times;
use camino::Utf8Path;
use std::fs::{self, Metadata, OpenOptions, Permissions};
use std::io;

/// What happened to the marker during publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerOutcome {
    /// The marker did not exist and was created empty.
    Created,
    /// An existing marker had its metadata refreshed; contents untouched.
    Refreshed,
}

/// Stamp `marker` with the timestamps and permissions in `artifact`.
///
/// The marker is created when absent and never truncated when present.
///
/// # Errors
///
/// Returns [`PublishError::MarkerUpdateFailed`] when the marker cannot be
/// created or its attributes cannot be changed.
pub fn stamp(marker: &Utf8Path, artifact: &Metadata) -> Result<MarkerOutcome> {
    let update_failed = |source: io::Error| PublishError::MarkerUpdateFailed {
        path: marker.to_owned(),
        source,
    };

    let outcome = touch(marker).map_err(update_failed)?;
    apply_times(marker, artifact).map_err(update_failed)?;
    fs::set_permissions(marker, non_executable(&artifact.permissions())).map_err(update_failed)?;

    Ok(outcome)
}

fn touch(path: &Utf8Path) -> io::Result<MarkerOutcome> {
    if path.is_dir() {
        return Err(io::Error::from(io::ErrorKind::IsADirectory));
    }
    if path.exists() {
        return Ok(MarkerOutcome::Refreshed);
    }
    OpenOptions::new().append(true).create(true).open(path)?;
    Ok(MarkerOutcome::Created)
}

/// Return `permissions` with the owner, group and other execute bits cleared.
#[cfg(unix)]
#[must_use]
pub fn non_executable(permissions: &Permissions) -> Permissions {
    use std::os::unix::fs::PermissionsExt;

    Permissions::from_mode(permissions.mode() & 0o7777 & !0o111)
}

/// Return `permissions` unchanged; this platform has no execute bits.
#[cfg(not(unix))]
#[must_use]
pub fn non_executable(permissions: &Permissions) -> Permissions {
    permissions.clone()
}
