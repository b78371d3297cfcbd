//! Normalized test result types
//!
//! These types form the document handed to downstream consumers. Field names
//! are part of the contract and serialize in camelCase:
//!
//! ```json
//! {
//!   "testModules": [
//!     {
//!       "moduleId": "example.com/pkg",
//!       "tests": [
//!         {
//!           "name": "TestAdd",
//!           "fullName": "example.com/pkg/TestAdd",
//!           "state": "failed",
//!           "errors": [{ "message": "add_test.go:9: got 3, want 4" }]
//!         }
//!       ]
//!     }
//!   ],
//!   "reason": "failed"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::GotestError;

/// Name of the synthetic test recorded for build failures
pub const COMPILATION_ERROR: &str = "CompilationError";

/// Possible test outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestState {
    /// Test passed
    Passed,
    /// Test failed
    Failed,
    /// Test was skipped
    Skipped,
}

impl TestState {
    /// Lowercase name as used in the result document
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// Overall outcome of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reason {
    /// No test failed
    Passed,
    /// At least one test failed
    Failed,
}

/// A single failure message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestError {
    /// Diagnostic text
    pub message: String,
}

impl TestError {
    /// Create an error from a message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One test in the result document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// Test name relative to its module
    pub name: String,
    /// `module/name`
    pub full_name: String,
    /// Outcome
    pub state: TestState,
    /// Failure messages, only present for failed tests that produced any
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<TestError>,
}

impl TestCase {
    /// Whether the test failed
    #[must_use]
    pub fn failed(&self) -> bool {
        self.state == TestState::Failed
    }
}

/// The tests of one module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestModule {
    /// Module (package) identifier
    pub module_id: String,
    /// Leaf tests of the module
    pub tests: Vec<TestCase>,
}

/// The normalized result document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
    /// All modules seen in the run
    pub test_modules: Vec<TestModule>,
    /// Overall outcome
    pub reason: Reason,
}

impl TestReport {
    /// A report with no modules
    #[must_use]
    pub fn empty() -> Self {
        Self {
            test_modules: Vec::new(),
            reason: Reason::Passed,
        }
    }

    /// Check if no test failed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.reason == Reason::Passed
    }

    /// Get failing tests across all modules
    #[must_use]
    pub fn failing_tests(&self) -> Vec<&TestCase> {
        self.test_modules
            .iter()
            .flat_map(|m| m.tests.iter())
            .filter(|t| t.failed())
            .collect()
    }

    /// Look up a module by id
    #[must_use]
    pub fn module(&self, module_id: &str) -> Option<&TestModule> {
        self.test_modules.iter().find(|m| m.module_id == module_id)
    }

    /// Serialize to compact JSON
    ///
    /// # Errors
    ///
    /// Returns `GotestError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, GotestError> {
        Ok(serde_json::to_string(self)?)
    }
}
