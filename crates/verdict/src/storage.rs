// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Persistence of the normalized report
//!
//! The report is written as compact JSON to a fixed location below the base
//! directory, replacing any previous run.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use verdict_gotest::TestReport;

/// Path components of the results file, relative to the base directory
pub const RESULTS_PATH: [&str; 4] = [".claude", "tdd-guard", "data", "test.json"];

/// Writes reports below a base directory
#[derive(Debug, Clone)]
pub struct Storage {
    base: PathBuf,
}

impl Storage {
    /// Create a storage rooted at `base`
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Base directory
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Full path of the results file
    #[must_use]
    pub fn results_path(&self) -> PathBuf {
        RESULTS_PATH
            .iter()
            .fold(self.base.clone(), |path, part| path.join(part))
    }

    /// Save a report, creating parent directories as needed
    ///
    /// Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the report
    /// cannot be serialized, or the file cannot be written.
    pub fn save(&self, report: &TestReport) -> Result<PathBuf, StorageError> {
        let path = self.results_path();

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let data = serde_json::to_vec(report)?;
        fs::write(&path, &data).map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), bytes = data.len(), "saved test report");
        Ok(path)
    }
}

/// Persistence errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Failed to create the results directory
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize the report
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to write the results file
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;
    use verdict_gotest::{Reason, TestCase, TestModule, TestState};

    fn temp_base(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "verdict-storage-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn sample_report() -> TestReport {
        TestReport {
            test_modules: vec![TestModule {
                module_id: "example.com/pkg".to_string(),
                tests: vec![TestCase {
                    name: "TestExample".to_string(),
                    full_name: "example.com/pkg/TestExample".to_string(),
                    state: TestState::Passed,
                    errors: Vec::new(),
                }],
            }],
            reason: Reason::Passed,
        }
    }

    #[test]
    fn test_results_path() {
        let storage = Storage::new("/work/project");
        assert_eq!(
            storage.results_path(),
            PathBuf::from("/work/project/.claude/tdd-guard/data/test.json")
        );
    }

    #[test]
    fn test_save_creates_directories() {
        let base = temp_base("creates");
        let storage = Storage::new(&base);

        let path = storage.save(&sample_report()).expect("save");
        assert_eq!(path, storage.results_path());

        let written = fs::read_to_string(&path).expect("read back");
        assert_eq!(
            written,
            r#"{"testModules":[{"moduleId":"example.com/pkg","tests":[{"name":"TestExample","fullName":"example.com/pkg/TestExample","state":"passed"}]}],"reason":"passed"}"#
        );

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_save_overwrites_previous_run() {
        let base = temp_base("overwrites");
        let storage = Storage::new(&base);

        storage.save(&sample_report()).expect("first save");
        let path = storage.save(&TestReport::empty()).expect("second save");

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"testModules":[],"reason":"passed"}"#
        );

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_save_fails_when_base_is_a_file() {
        let base = temp_base("file-base");
        fs::write(&base, "not a directory").unwrap();

        let err = Storage::new(&base).save(&sample_report()).unwrap_err();
        assert!(matches!(err, StorageError::CreateDir { .. }));

        let _ = fs::remove_file(&base);
    }
}
