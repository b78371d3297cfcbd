//! Configuration for the verdict binary
//!
//! This module provides the command-line configuration, including the
//! project root that scopes where results are written and the logging
//! options.

use std::path::{Path, PathBuf};

use clap::Parser;

/// Verdict - normalize `go test -json` output into a single test report
///
/// Reads test output from stdin, echoes a condensed rendering to stdout and
/// saves the report under `.claude/tdd-guard/data/test.json`.
///
/// Example:
///   go test -json ./... 2>&1 | verdict --project-root "$PWD"
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "verdict")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Project root directory (absolute path)
    ///
    /// Results are written below this directory. The current directory must
    /// be inside it. Defaults to the current working directory, also when
    /// given as an empty value.
    #[arg(long, env = "VERDICT_PROJECT_ROOT", value_parser = parse_project_root)]
    pub project_root: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so they never mix with the console
    /// rendering on stdout.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Accept any value, including the empty one that clap's path parser rejects
fn parse_project_root(value: &str) -> Result<PathBuf, std::convert::Infallible> {
    Ok(PathBuf::from(value))
}

impl Config {
    /// Effective project root
    ///
    /// An empty path counts as unset.
    #[must_use]
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root
            .as_deref()
            .filter(|root| !root.as_os_str().is_empty())
    }

    /// Validate the project root against the current working directory
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined or if
    /// [`Config::validate_within`] rejects the project root.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_root().is_none() {
            return Ok(());
        }
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        self.validate_within(&cwd)
    }

    /// Validate the project root against an explicit working directory
    ///
    /// The containment check is textual: `cwd` must start with the project
    /// root as a string. No canonicalization is performed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The project root is not an absolute path
    /// - `cwd` does not start with the project root
    pub fn validate_within(&self, cwd: &Path) -> Result<(), ConfigError> {
        let Some(root) = self.project_root() else {
            return Ok(());
        };

        if !root.is_absolute() {
            return Err(ConfigError::NotAbsolute(root.to_path_buf()));
        }

        let root_text = root.to_string_lossy();
        if !cwd.to_string_lossy().starts_with(root_text.as_ref()) {
            return Err(ConfigError::OutsideProjectRoot {
                root: root.to_path_buf(),
                cwd: cwd.to_path_buf(),
            });
        }

        Ok(())
    }

    /// Directory the results file is written below
    ///
    /// Returns the project root when given, otherwise the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no project root is set and the current directory
    /// cannot be determined.
    pub fn base_dir(&self) -> Result<PathBuf, ConfigError> {
        match self.project_root() {
            Some(root) => Ok(root.to_path_buf()),
            None => std::env::current_dir().map_err(ConfigError::CurrentDir),
        }
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Project root given as a relative path
    #[error("project root must be an absolute path")]
    NotAbsolute(PathBuf),

    /// Current directory is not below the project root
    #[error("current directory must be within project root")]
    OutsideProjectRoot {
        /// Configured project root
        root: PathBuf,
        /// Working directory at validation time
        cwd: PathBuf,
    },

    /// Failed to determine the current directory
    #[error("Failed to determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}
