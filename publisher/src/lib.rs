//! Artifact publisher library.
//!
//! This crate copies a freshly built game shared library into the build
//! output, brings its debug-symbol sidecars along, and stamps a marker file
//! whose modification time mirrors the library so build tools can use it as
//! a completion signal. It backs the `publish` binary and can be driven
//! programmatically from tests or other build helpers.
//!
//! # Modules
//!
//! - [`artifact`] - The published library and its sidecar candidates
//! - [`cli`] - Command-line argument definitions
//! - [`error`] - Error types and failure categories
//! - [`marker`] - Completion marker stamping
//! - [`output`] - Summary and dry-run formatting
//! - [`publisher`] - Plan and execute a publish run
//! - [`target`] - Output target resolution
//! - [`transfer`] - File copies that preserve timestamps and permissions

pub mod artifact;
pub mod cli;
pub mod error;
pub mod marker;
pub mod output;
pub mod publisher;
pub mod target;
pub mod transfer;

#[cfg(test)]
mod test_utils;
