//! CLI argument definitions for the `publish` binary.
//!
//! The positional shape selects the mode: two paths copy straight to an
//! output file, three paths copy into a directory and stamp a marker.

use crate::artifact::{DEFAULT_SIDECAR_EXTENSIONS, SidecarExtension};
use crate::publisher::PublishRequest;
use crate::target::OutputTarget;
use camino::Utf8PathBuf;
use clap::Parser;

/// Copy a built game library into the build output and stamp a marker.
#[derive(Parser, Debug)]
#[command(name = "publish")]
#[command(version, about)]
#[command(long_about = concat!(
    "Copy a built game library into the build output and stamp a marker.\n\n",
    "The library is copied together with its permission bits and timestamps. ",
    "Debug-symbol sidecars next to the library (same base name, .pdb extension ",
    "by default) are copied along with it when they exist.\n\n",
    "When a marker is given, it is created if missing and receives the ",
    "library's modification time and permission bits with execute bits ",
    "cleared, so build tools can use it as a completion stamp.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Copy to an explicit output file:\n",
    "    $ publish out/gamex86_64.so build/game/gamex86_64.so\n\n",
    "  Copy into a directory and stamp a marker:\n",
    "    $ publish out/.game.stamp build/game/gamex86_64.so out/baseq2\n",
))]
pub struct Cli {
    /// Output file (two-path form) or marker file (three-path form).
    #[arg(value_name = "OUTPUT_OR_MARKER")]
    pub output_or_marker: Utf8PathBuf,

    /// Built shared library to publish.
    #[arg(value_name = "ARTIFACT")]
    pub artifact: Utf8PathBuf,

    /// Output directory; switches to the marker form when given.
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<Utf8PathBuf>,

    /// Sidecar extension to copy alongside the library (can be repeated; an
    /// empty value disables sidecar copying).
    #[arg(
        long = "sidecar-ext",
        value_name = "EXT",
        default_values_t = DEFAULT_SIDECAR_EXTENSIONS.iter().map(|ext| (*ext).to_owned())
    )]
    pub sidecar_ext: Vec<String>,

    /// Show what would be published and exit without copying.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase output verbosity (repeatable).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Build the publish request described by the arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use artifact_publisher::cli::Cli;
    /// use artifact_publisher::target::OutputTarget;
    /// use clap::Parser;
    ///
    /// let cli = Cli::parse_from(["publish", "out/.stamp", "build/game.so", "out"]);
    /// let request = cli.request();
    ///
    /// assert_eq!(request.target, OutputTarget::Directory("out".into()));
    /// assert_eq!(
    ///     request.marker.as_deref(),
    ///     Some(camino::Utf8Path::new("out/.stamp"))
    /// );
    /// ```
    #[must_use]
    pub fn request(&self) -> PublishRequest {
        let request = match &self.output_dir {
            Some(dir) => PublishRequest::new(&self.artifact, OutputTarget::Directory(dir.clone()))
                .with_marker(&self.output_or_marker),
            None => PublishRequest::new(
                &self.artifact,
                OutputTarget::File(self.output_or_marker.clone()),
            ),
        };
        request.with_sidecar_extensions(self.sidecar_extensions())
    }

    /// Sidecar extensions requested on the command line.
    #[must_use]
    pub fn sidecar_extensions(&self) -> Vec<SidecarExtension> {
        self.sidecar_ext
            .iter()
            .map(|ext| SidecarExtension::new(ext))
            .filter(|ext| !ext.as_str().is_empty())
            .collect()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
