// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! The verdict pipeline
//!
//! A [`Reporter`] reads a complete `go test -json` run, echoes a condensed
//! rendering of it, builds the normalized report and saves it. Scope checks
//! run before any input is read.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use verdict_gotest::{
    ClassifiedStream, ConsoleFormatter, GotestError, ResultAggregator, StreamLine, TestReport,
    classify_reader, transform,
};

use crate::config::{Config, ConfigError};
use crate::storage::{Storage, StorageError};

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct Outcome {
    /// The report that was saved
    pub report: TestReport,
    /// Where it was saved
    pub path: PathBuf,
}

/// Runs the pipeline for one invocation
#[derive(Debug, Clone)]
pub struct Reporter {
    storage: Storage,
    formatter: ConsoleFormatter,
}

impl Reporter {
    /// Create a reporter that saves below `base`
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            storage: Storage::new(base),
            formatter: ConsoleFormatter::new(),
        }
    }

    /// Create a reporter from the command-line configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the project root is rejected.
    pub fn from_config(config: &Config) -> Result<Self, ReporterError> {
        config.validate()?;
        Ok(Self::new(config.base_dir()?))
    }

    /// Create a reporter, validating the project root against `cwd`
    ///
    /// Without a project root, `cwd` is the base directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the project root is rejected.
    pub fn for_directory(config: &Config, cwd: &Path) -> Result<Self, ReporterError> {
        config.validate_within(cwd)?;
        let base = config
            .project_root()
            .map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);
        Ok(Self::new(base))
    }

    /// Storage used for the report
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Process a whole run
    ///
    /// Every input line is echoed to `console` in condensed form before the
    /// report is built. Console write failures are logged and do not stop
    /// the report from being saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or the report cannot be
    /// saved.
    pub fn run<R: BufRead, W: Write>(
        &self,
        input: R,
        mut console: W,
    ) -> Result<Outcome, ReporterError> {
        let stream = classify_reader(input)?;
        debug!(lines = stream.lines.len(), "classified input");

        if let Err(e) = self.echo(&stream, &mut console) {
            warn!(error = %e, "failed to write console output");
        }

        let aggregator = ResultAggregator::from_events(stream.events());
        let report = transform(&aggregator, stream.compile_error.as_ref());

        let path = self.storage.save(&report)?;
        info!(
            modules = report.test_modules.len(),
            failing = report.failing_tests().len(),
            path = %path.display(),
            "test report saved"
        );

        Ok(Outcome { report, path })
    }

    fn echo<W: Write>(&self, stream: &ClassifiedStream, console: &mut W) -> std::io::Result<()> {
        for line in &stream.lines {
            match line {
                StreamLine::Event(event) => {
                    if let Some(rendered) = self.formatter.format(event) {
                        writeln!(console, "{rendered}")?;
                    }
                }
                StreamLine::Text(text) => writeln!(console, "{text}")?,
            }
        }
        console.flush()
    }
}

/// Errors from a verdict run
#[derive(Debug, thiserror::Error)]
pub enum ReporterError {
    /// Project root rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Input could not be read
    #[error("Failed to read test output: {0}")]
    Input(#[from] GotestError),

    /// Report could not be saved
    #[error(transparent)]
    Storage(#[from] StorageError),
}
