//! Output target resolution.
//!
//! The caller names either a destination file or a destination directory.
//! Resolution turns that into the concrete file path the artifact is copied
//! to, plus the directory sidecar files land in.

use crate::artifact::Artifact;
use crate::error::{PublishError, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// Where a published artifact should end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Copy to exactly this path.
    File(Utf8PathBuf),
    /// Copy into this directory under the artifact's own file name.
    Directory(Utf8PathBuf),
}

/// A destination that has been checked against the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Path the artifact is copied to.
    pub file: Utf8PathBuf,
    /// Directory containing `file`; sidecars are copied here.
    pub directory: Utf8PathBuf,
}

impl ResolvedTarget {
    /// Destination for a sidecar file, keeping the sidecar's own name.
    #[must_use]
    pub fn sidecar_destination(&self, sidecar: &Utf8Path) -> Utf8PathBuf {
        match sidecar.file_name() {
            Some(name) => self.directory.join(name),
            None => self.directory.clone(),
        }
    }
}

impl OutputTarget {
    /// Resolve this target for `artifact`.
    ///
    /// A [`OutputTarget::File`] that names an existing directory is treated as
    /// a directory target.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::DestinationMissing`] when the directory that
    /// should receive the artifact does not exist.
    pub fn resolve(&self, artifact: &Artifact) -> Result<ResolvedTarget> {
        match self {
            Self::Directory(dir) => resolve_in_directory(dir, artifact),
            Self::File(path) if path.is_dir() => resolve_in_directory(path, artifact),
            Self::File(path) => {
                let directory = parent_directory(path);
                require_directory(&directory)?;
                Ok(ResolvedTarget {
                    file: path.clone(),
                    directory,
                })
            }
        }
    }

    /// The path given by the caller, before resolution.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::File(path) | Self::Directory(path) => path,
        }
    }
}

fn resolve_in_directory(dir: &Utf8Path, artifact: &Artifact) -> Result<ResolvedTarget> {
    require_directory(dir)?;
    Ok(ResolvedTarget {
        file: dir.join(artifact.file_name()),
        directory: dir.to_owned(),
    })
}

/// Parent of `path`, with a bare file name resolving to the current directory.
pub(crate) fn parent_directory(path: &Utf8Path) -> Utf8PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent.to_owned(),
        _ => Utf8PathBuf::from("."),
    }
}

fn require_directory(dir: &Utf8Path) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(PublishError::DestinationMissing {
            path: dir.to_owned(),
        })
    }
}
