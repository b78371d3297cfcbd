//! verdict: normalize `go test -json` output into a single test report
//!
//! Reads a test run from stdin, prints a condensed rendering to stdout and
//! saves the normalized report below the project root.

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error};
use verdict::{Config, Reporter};

fn main() -> ExitCode {
    let config = Config::parse();

    // Logs go to stderr; stdout carries the console rendering
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(io::stderr)
        .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    let reporter = Reporter::from_config(config)?;
    debug!(base = %reporter.storage().base().display(), "reading test output from stdin");

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    reporter
        .run(stdin, stdout)
        .context("failed to process test output")?;

    Ok(())
}
