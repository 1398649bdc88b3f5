//! The built shared library being published and its sidecar files.
//!
//! A sidecar is a file next to the artifact that shares its base name but has
//! a different extension, such as a `.pdb` debug-symbol file produced by MSVC
//! builds. Sidecars are optional: candidates that do not exist are skipped.

use crate::error::{PublishError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::fs::{self, Metadata};
use std::io;

/// Extensions copied alongside the artifact when no override is given.
pub const DEFAULT_SIDECAR_EXTENSIONS: &[&str] = &["pdb"];

/// An extension used to derive a sidecar path from the artifact path.
///
/// Stored without a leading dot, so `".pdb"` and `"pdb"` are the same
/// extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SidecarExtension(String);

impl SidecarExtension {
    /// Create a sidecar extension, dropping any leading dot.
    #[must_use]
    pub fn new(ext: &str) -> Self {
        Self(ext.trim_start_matches('.').to_owned())
    }

    /// Get the extension as a string slice, without the leading dot.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SidecarExtension {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for SidecarExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.0)
    }
}

/// Return the sidecar extensions used when the caller does not supply any.
#[must_use]
pub fn default_sidecar_extensions() -> Vec<SidecarExtension> {
    DEFAULT_SIDECAR_EXTENSIONS
        .iter()
        .copied()
        .map(SidecarExtension::new)
        .collect()
}

/// A built shared library that exists on disk.
#[derive(Debug, Clone)]
pub struct Artifact {
    path: Utf8PathBuf,
    metadata: Metadata,
}

impl Artifact {
    /// Open the artifact at `path`, checking that it is a regular file.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::ArtifactNotFound`] when nothing exists at
    /// `path`, [`PublishError::ArtifactNotFile`] when the path is a directory
    /// or has no file name, and [`PublishError::ArtifactUnreadable`] when the
    /// metadata cannot be read for any other reason.
    pub fn open(path: &Utf8Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => PublishError::ArtifactNotFound {
                path: path.to_owned(),
            },
            _ => PublishError::ArtifactUnreadable {
                path: path.to_owned(),
                source,
            },
        })?;

        if !metadata.is_file() || path.file_name().is_none() {
            return Err(PublishError::ArtifactNotFile {
                path: path.to_owned(),
            });
        }

        Ok(Self {
            path: path.to_owned(),
            metadata,
        })
    }

    /// Path the artifact was opened from.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Metadata captured when the artifact was opened.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The artifact's file name, e.g. `gamex86_64.so`.
    #[must_use]
    pub fn file_name(&self) -> &str {
        // `open` rejects paths without a file name.
        self.path.file_name().unwrap_or_default()
    }

    /// Candidate sidecar paths for the given extensions.
    ///
    /// Each candidate is the artifact path with its extension replaced. An
    /// artifact without an extension has no candidates. Whether a candidate
    /// exists is not checked here.
    pub fn sidecar_candidates<'a>(
        &'a self,
        extensions: &'a [SidecarExtension],
    ) -> impl Iterator<Item = Utf8PathBuf> + 'a {
        let has_extension = self.path.extension().is_some();
        extensions
            .iter()
            .filter(move |_| has_extension)
            .map(move |ext| self.path.with_extension(ext.as_str()))
            .filter(move |candidate| candidate != &self.path)
    }

    /// Sidecar files that exist next to the artifact.
    pub fn existing_sidecars<'a>(
        &'a self,
        extensions: &'a [SidecarExtension],
    ) -> impl Iterator<Item = Utf8PathBuf> + 'a {
        self.sidecar_candidates(extensions)
            .filter(|candidate| candidate.is_file())
    }
}
