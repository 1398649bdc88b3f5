//! Error types for the artifact publisher.
//!
//! Every failure is fatal: the publisher never retries, and the invoking build
//! system is expected to halt dependent steps on a non-zero exit. Variants
//! carry the offending path so the diagnostic printed by the CLI is
//! actionable on its own.

use camino::Utf8PathBuf;
use std::fmt;
use std::io;
use thiserror::Error;

/// Errors that can occur while publishing an artifact.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The artifact to publish does not exist.
    #[error("artifact {path} does not exist")]
    ArtifactNotFound {
        /// Path that was expected to hold the artifact.
        path: Utf8PathBuf,
    },

    /// The artifact path exists but is not a regular file.
    #[error("artifact {path} is not a regular file")]
    ArtifactNotFile {
        /// Path to the offending entry.
        path: Utf8PathBuf,
    },

    /// The artifact exists but its metadata could not be read.
    #[error("cannot read artifact {path}")]
    ArtifactUnreadable {
        /// Path to the artifact.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The directory that should receive the artifact does not exist.
    #[error("output directory {path} does not exist")]
    DestinationMissing {
        /// The missing directory.
        path: Utf8PathBuf,
    },

    /// Source and destination refer to the same file.
    #[error("refusing to copy {path} onto itself")]
    SameFile {
        /// The shared path.
        path: Utf8PathBuf,
    },

    /// Copying a file (bytes or metadata) failed.
    #[error("failed to copy {from} to {to}")]
    CopyFailed {
        /// Source path.
        from: Utf8PathBuf,
        /// Destination path.
        to: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The marker path names the artifact or a file being published.
    #[error("marker {path} would overwrite a published file")]
    MarkerConflict {
        /// Path to the marker file.
        path: Utf8PathBuf,
    },

    /// Creating the marker or changing its attributes failed.
    #[error("failed to update marker {path}")]
    MarkerUpdateFailed {
        /// Path to the marker file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Broad classification of a [`PublishError`].
///
/// Build orchestrators only care whether a step failed, but the category lets
/// the CLI and tests tell a missing input apart from an access problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// The artifact (or a file it depends on) is absent.
    MissingSource,
    /// The operating system refused a copy or attribute change.
    PermissionDenied,
    /// The destination could not be resolved to a usable location.
    PathResolution,
    /// Any other I/O failure.
    Other,
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingSource => "missing source",
            Self::PermissionDenied => "permission denied",
            Self::PathResolution => "path resolution",
            Self::Other => "I/O failure",
        })
    }
}

impl PublishError {
    /// Classify this error.
    ///
    /// Permission problems win over the variant's own category, so a copy that
    /// fails with `EACCES` reports [`FailureCategory::PermissionDenied`].
    #[must_use]
    pub fn category(&self) -> FailureCategory {
        if self
            .io_source()
            .is_some_and(|e| e.kind() == io::ErrorKind::PermissionDenied)
        {
            return FailureCategory::PermissionDenied;
        }

        match self {
            Self::ArtifactNotFound { .. } | Self::ArtifactNotFile { .. } => {
                FailureCategory::MissingSource
            }
            Self::CopyFailed { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                FailureCategory::MissingSource
            }
            Self::DestinationMissing { .. }
            | Self::SameFile { .. }
            | Self::MarkerConflict { .. } => FailureCategory::PathResolution,
            Self::ArtifactUnreadable { .. }
            | Self::CopyFailed { .. }
            | Self::MarkerUpdateFailed { .. } => FailureCategory::Other,
        }
    }

    fn io_source(&self) -> Option<&io::Error> {
        match self {
            Self::ArtifactUnreadable { source, .. }
            | Self::CopyFailed { source, .. }
            | Self::MarkerUpdateFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias using [`PublishError`].
pub type Result<T> = std::result::Result<T, PublishError>;
