//! Publishing orchestration.
//!
//! Publishing happens in two phases. [`plan`] inspects the filesystem without
//! changing it: it opens the artifact, resolves the destination and finds the
//! sidecars that exist. [`execute`] then copies the artifact, copies each
//! sidecar and stamps the marker, in that order. [`publish`] runs both.
//!
//! Every step overwrites what a previous run left behind, so publishing the
//! same inputs twice ends in the same state.

use crate::artifact::{Artifact, SidecarExtension, default_sidecar_extensions};
use crate::error::{PublishError, Result};
use crate::marker::{MarkerOutcome, stamp};
use crate::target::{OutputTarget, ResolvedTarget, parent_directory};
use crate::transfer::{copy_with_metadata, same_file};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::io;

/// Everything needed to publish one artifact.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Path to the built shared library.
    pub artifact: Utf8PathBuf,
    /// Where the artifact should be copied.
    pub target: OutputTarget,
    /// Marker to stamp after copying, if any.
    pub marker: Option<Utf8PathBuf>,
    /// Extensions of sidecar files copied with the artifact.
    pub sidecar_extensions: Vec<SidecarExtension>,
}

impl PublishRequest {
    /// Create a request with the default sidecar extensions and no marker.
    #[must_use]
    pub fn new(artifact: impl Into<Utf8PathBuf>, target: OutputTarget) -> Self {
        Self {
            artifact: artifact.into(),
            target,
            marker: None,
            sidecar_extensions: default_sidecar_extensions(),
        }
    }

    /// Stamp `marker` once the artifact has been copied.
    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<Utf8PathBuf>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Replace the sidecar extensions.
    #[must_use]
    pub fn with_sidecar_extensions(mut self, extensions: Vec<SidecarExtension>) -> Self {
        self.sidecar_extensions = extensions;
        self
    }
}

/// A sidecar file and where it will be copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarCopy {
    /// Existing sidecar next to the artifact.
    pub source: Utf8PathBuf,
    /// Destination in the output directory.
    pub destination: Utf8PathBuf,
}

/// The resolved work for one publish run.
#[derive(Debug, Clone)]
pub struct PublishPlan {
    /// The artifact being published.
    pub artifact: Artifact,
    /// Resolved destination of the artifact.
    pub target: ResolvedTarget,
    /// Sidecars found next to the artifact.
    pub sidecars: Vec<SidecarCopy>,
    /// Marker to stamp, if any.
    pub marker: Option<Utf8PathBuf>,
}

/// What a publish run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Path the artifact was copied to.
    pub destination: Utf8PathBuf,
    /// Bytes copied for the artifact itself.
    pub bytes: u64,
    /// Destinations of the copied sidecars.
    pub sidecars: Vec<Utf8PathBuf>,
    /// The stamped marker and what happened to it.
    pub marker: Option<(Utf8PathBuf, MarkerOutcome)>,
}

/// Work out what publishing `request` would do, without side effects.
///
/// # Errors
///
/// Returns an error if the artifact cannot be opened, the destination
/// directory does not exist, or the marker names a file being published.
pub fn plan(request: &PublishRequest) -> Result<PublishPlan> {
    let artifact = Artifact::open(&request.artifact)?;
    let target = request.target.resolve(&artifact)?;
    let sidecars = artifact
        .existing_sidecars(&request.sidecar_extensions)
        .map(|source| SidecarCopy {
            destination: target.sidecar_destination(&source),
            source,
        })
        .collect::<Vec<_>>();

    if let Some(marker) = &request.marker {
        let published = [artifact.path(), target.file.as_path()]
            .into_iter()
            .chain(sidecars.iter().map(|sidecar| sidecar.destination.as_path()));
        check_marker(marker, published)?;
    }

    Ok(PublishPlan {
        artifact,
        target,
        sidecars,
        marker: request.marker.clone(),
    })
}

/// Carry out a plan produced by [`plan`].
///
/// # Errors
///
/// Returns the first copy or marker failure. Earlier steps are not rolled
/// back.
pub fn execute(plan: &PublishPlan) -> Result<PublishReport> {
    let source = plan.artifact.path();
    let destination = &plan.target.file;

    debug!("copying {source} to {destination}");
    let bytes = copy_with_metadata(source, destination)?;

    let sidecars = plan
        .sidecars
        .iter()
        .map(|sidecar| {
            debug!(
                "copying sidecar {} to {}",
                sidecar.source, sidecar.destination
            );
            copy_with_metadata(&sidecar.source, &sidecar.destination)
                .map(|_| sidecar.destination.clone())
        })
        .collect::<Result<Vec<_>>>()?;

    let marker = plan
        .marker
        .as_deref()
        .map(|marker| stamp_marker(marker, &plan.artifact))
        .transpose()?;

    info!(
        "published {} to {destination} ({} sidecar(s))",
        plan.artifact.file_name(),
        sidecars.len()
    );

    Ok(PublishReport {
        destination: destination.clone(),
        bytes,
        sidecars,
        marker,
    })
}

/// Publish an artifact: [`plan`] followed by [`execute`].
///
/// # Errors
///
/// Returns an error if planning or any publishing step fails.
pub fn publish(request: &PublishRequest) -> Result<PublishReport> {
    execute(&plan(request)?)
}

/// Reject a marker that aliases the artifact or one of its copies.
fn check_marker<'a>(
    marker: &Utf8Path,
    published: impl IntoIterator<Item = &'a Utf8Path>,
) -> Result<()> {
    for path in published {
        let aliased = same_location(marker, path).map_err(|source| {
            PublishError::MarkerUpdateFailed {
                path: marker.to_owned(),
                source,
            }
        })?;
        if aliased {
            return Err(PublishError::MarkerConflict {
                path: marker.to_owned(),
            });
        }
    }
    Ok(())
}

/// Whether `a` and `b` name the same file, including a file not created yet.
fn same_location(a: &Utf8Path, b: &Utf8Path) -> io::Result<bool> {
    if a == b || same_file(a, b)? {
        return Ok(true);
    }
    match (a.file_name(), b.file_name()) {
        (Some(a_name), Some(b_name)) if a_name == b_name => {
            same_file(&parent_directory(a), &parent_directory(b))
        }
        _ => Ok(false),
    }
}

fn stamp_marker(marker: &Utf8Path, artifact: &Artifact) -> Result<(Utf8PathBuf, MarkerOutcome)> {
    debug!("stamping marker {marker} from {}", artifact.path());
    let outcome = stamp(marker, artifact.metadata())?;
    Ok((marker.to_owned(), outcome))
}

#[cfg(test)]
#[path = "publisher_tests.rs"]
mod tests;
