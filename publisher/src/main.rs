//! `publish` CLI entrypoint.
//!
//! Copies a built game library (and its sidecars) into the build output and
//! optionally stamps a completion marker. Any failure is reported on stderr
//! and turns into a non-zero exit code so the build step fails.

use artifact_publisher::cli::Cli;
use artifact_publisher::error::Result;
use artifact_publisher::output::{DryRunInfo, detail_lines, success_message, write_stderr_line};
use artifact_publisher::publisher::{execute, plan};
use clap::Parser;
use std::error::Error as _;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let request = cli.request();
    let plan = plan(&request)?;

    if cli.dry_run {
        write_stderr_line(stderr, DryRunInfo { plan: &plan }.display_text());
        return Ok(());
    }

    let report = execute(&plan)?;

    if !cli.quiet {
        write_stderr_line(stderr, success_message(&report));
    }
    if cli.verbosity > 0 {
        for line in detail_lines(&report) {
            write_stderr_line(stderr, line);
        }
    }

    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            let mut message = format!("error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                message.push_str(&format!(": {cause}"));
                source = cause.source();
            }
            message.push_str(&format!(" [{}]", err.category()));
            write_stderr_line(stderr, message);
            1
        }
    }
}
