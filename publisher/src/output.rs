//! Output formatting for the publish CLI.
//!
//! This module renders the completion summary, the per-file listing shown in
//! verbose mode and the dry-run description of a plan.

use crate::marker::MarkerOutcome;
use crate::publisher::{PublishPlan, PublishReport};
use std::fmt::Write as _;
use std::io::Write;

/// Format a one-line summary after publishing.
///
/// # Example
///
/// ```
/// use artifact_publisher::output::success_message;
/// use artifact_publisher::publisher::PublishReport;
/// use camino::Utf8PathBuf;
///
/// let report = PublishReport {
///     destination: Utf8PathBuf::from("/out/game.so"),
///     bytes: 4,
///     sidecars: Vec::new(),
///     marker: None,
/// };
///
/// assert_eq!(success_message(&report), "Published /out/game.so");
/// ```
#[must_use]
pub fn success_message(report: &PublishReport) -> String {
    let mut message = format!("Published {}", report.destination);
    if !report.sidecars.is_empty() {
        let count = report.sidecars.len();
        let noun = if count == 1 { "sidecar" } else { "sidecars" };
        let _ = write!(message, " with {count} {noun}");
    }
    if let Some((marker, _)) = &report.marker {
        let _ = write!(message, "; stamped {marker}");
    }
    message
}

/// List every file touched by a publish run, one per line.
#[must_use]
pub fn detail_lines(report: &PublishReport) -> Vec<String> {
    let mut lines = vec![format!(
        "  artifact: {} ({} bytes)",
        report.destination, report.bytes
    )];
    lines.extend(
        report
            .sidecars
            .iter()
            .map(|sidecar| format!("  sidecar:  {sidecar}")),
    );
    if let Some((marker, outcome)) = &report.marker {
        let verb = match outcome {
            MarkerOutcome::Created => "created",
            MarkerOutcome::Refreshed => "refreshed",
        };
        lines.push(format!("  marker:   {marker} ({verb})"));
    }
    lines
}

/// Dry-run description of a publish plan.
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// The plan that would be executed.
    pub plan: &'a PublishPlan,
}

impl DryRunInfo<'_> {
    /// Format the plan for display to the user.
    #[must_use]
    pub fn display_text(&self) -> String {
        let plan = self.plan;
        let mut text = String::from("Dry run - no files will be modified\n\n");
        let _ = writeln!(text, "Artifact: {}", plan.artifact.path());
        let _ = writeln!(text, "Destination: {}", plan.target.file);

        if plan.sidecars.is_empty() {
            text.push_str("Sidecars: none\n");
        } else {
            text.push_str("Sidecars:\n");
            for sidecar in &plan.sidecars {
                let _ = writeln!(text, "  - {} -> {}", sidecar.source, sidecar.destination);
            }
        }

        match &plan.marker {
            Some(marker) => {
                let _ = write!(text, "Marker: {marker}");
            }
            None => text.push_str("Marker: none"),
        }
        text
    }
}

/// Write a line to `stderr`, ignoring failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}
