// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Structured events from `go test -json`
//!
//! Each line of `go test -json` output is a single JSON object describing one
//! occurrence during the run. Not every action populates every field, so all
//! fields default to empty when absent.
//!
//! The wire names are the ones `go test` emits (`Action`, `Package`, ...). The
//! neutral names (`action`, `module`, `buildUnit`, ...) are accepted as aliases.
//!
//! ```
//! use verdict_gotest::event::{Action, TestEvent};
//!
//! let event = TestEvent::from_json_line(
//!     r#"{"Action":"pass","Package":"example.com/pkg","Elapsed":0.003}"#,
//! ).unwrap();
//! assert_eq!(event.action, Action::Pass);
//! assert!(event.is_module_level());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GotestError;

/// The kind of occurrence a [`TestEvent`] describes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    /// Package test binary is about to start
    Start,
    /// Test has started running
    Run,
    /// Test has been paused
    Pause,
    /// Test has continued running
    Cont,
    /// Test or package printed output
    Output,
    /// Test or package passed
    Pass,
    /// Test or package failed
    Fail,
    /// Test was skipped or package contained no tests
    Skip,
    /// Benchmark printed log output but did not fail
    Bench,
    /// Compiler output attributed to a build unit
    BuildOutput,
    /// Build of a unit failed
    BuildFail,
    /// Any action not listed above, kept verbatim
    Other(String),
}

impl Action {
    /// The wire representation of the action
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Start => "start",
            Self::Run => "run",
            Self::Pause => "pause",
            Self::Cont => "cont",
            Self::Output => "output",
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skip => "skip",
            Self::Bench => "bench",
            Self::BuildOutput => "build-output",
            Self::BuildFail => "build-fail",
            Self::Other(other) => other,
        }
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for Action {
    fn from(value: String) -> Self {
        match value.as_str() {
            "start" => Self::Start,
            "run" => Self::Run,
            "pause" => Self::Pause,
            "cont" => Self::Cont,
            "output" => Self::Output,
            "pass" => Self::Pass,
            "fail" => Self::Fail,
            "skip" => Self::Skip,
            "bench" => Self::Bench,
            "build-output" => Self::BuildOutput,
            "build-fail" => Self::BuildFail,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Action {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        match action {
            Action::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single event from `go test -json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestEvent {
    /// What happened
    #[serde(rename = "Action", alias = "action")]
    pub action: Action,
    /// Package (module) the event belongs to, empty for build events
    #[serde(
        rename = "Package",
        alias = "module",
        alias = "package",
        skip_serializing_if = "String::is_empty"
    )]
    pub module: String,
    /// Slash-delimited test name, empty for package-level events
    #[serde(rename = "Test", alias = "test", skip_serializing_if = "String::is_empty")]
    pub test: String,
    /// Elapsed time in seconds
    #[serde(rename = "Elapsed", alias = "elapsed")]
    pub elapsed: f64,
    /// Output fragment, usually newline-terminated
    #[serde(rename = "Output", alias = "output", skip_serializing_if = "String::is_empty")]
    pub output: String,
    /// Build unit for `build-output` / `build-fail` events
    #[serde(
        rename = "ImportPath",
        alias = "buildUnit",
        alias = "importPath",
        skip_serializing_if = "String::is_empty"
    )]
    pub build_unit: String,
    /// Build unit whose failure caused a package `fail` event
    #[serde(
        rename = "FailedBuild",
        alias = "failedBuildUnit",
        alias = "failedBuild",
        skip_serializing_if = "String::is_empty"
    )]
    pub failed_build: String,
}

impl TestEvent {
    /// Create an event for the given action, module and test
    #[must_use]
    pub fn new(action: impl Into<Action>, module: &str, test: &str) -> Self {
        Self {
            action: action.into(),
            module: module.to_string(),
            test: test.to_string(),
            ..Default::default()
        }
    }

    /// Set the output fragment
    #[must_use]
    pub fn with_output(mut self, output: &str) -> Self {
        self.output = output.to_string();
        self
    }

    /// Set the elapsed time in seconds
    #[must_use]
    pub fn with_elapsed(mut self, elapsed: f64) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Set the build unit
    #[must_use]
    pub fn with_build_unit(mut self, unit: &str) -> Self {
        self.build_unit = unit.to_string();
        self
    }

    /// Set the failed build unit
    #[must_use]
    pub fn with_failed_build(mut self, unit: &str) -> Self {
        self.failed_build = unit.to_string();
        self
    }

    /// Decode a single line as an event
    ///
    /// JSON objects are accepted with any subset of fields present. A JSON
    /// `null` decodes to an empty event, as Go's decoder does.
    ///
    /// # Errors
    ///
    /// Returns `GotestError::Json` if the line is neither `null` nor a JSON
    /// object with correctly typed fields.
    pub fn from_json_line(line: &str) -> Result<Self, GotestError> {
        if line.trim() == "null" {
            return Ok(Self::default());
        }
        if !line.trim_start().starts_with('{') {
            // serde would happily build a struct out of a JSON array
            return Err(GotestError::Json(serde::de::Error::custom(
                "structured event must be a JSON object",
            )));
        }
        Ok(serde_json::from_str(line)?)
    }

    /// Whether the event describes a package rather than a single test
    #[must_use]
    pub fn is_module_level(&self) -> bool {
        self.test.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_decode_go_field_names() {
        let event = TestEvent::from_json_line(
            r#"{"Time":"2026-01-01T00:00:00Z","Action":"output","Package":"example.com/pkg","Test":"TestA","Output":"hello\n"}"#,
        )
        .expect("Should parse");

        assert_eq!(event.action, Action::Output);
        assert_eq!(event.module, "example.com/pkg");
        assert_eq!(event.test, "TestA");
        assert_eq!(event.output, "hello\n");
        assert!(!event.is_module_level());
    }

    #[test]
    fn test_decode_neutral_field_names() {
        let event =
            TestEvent::from_json_line(r#"{"action":"pass","module":"pkg","elapsed":0.003}"#)
                .expect("Should parse");

        assert_eq!(event.action, Action::Pass);
        assert_eq!(event.module, "pkg");
        assert_eq!(event.elapsed, 0.003);
        assert!(event.is_module_level());
    }

    #[test]
    fn test_decode_build_events() {
        let output = TestEvent::from_json_line(
            r#"{"ImportPath":"example.com/pkg [example.com/pkg.test]","Action":"build-output","Output":"./a.go:3:1: syntax error\n"}"#,
        )
        .expect("Should parse");
        assert_eq!(output.action, Action::BuildOutput);
        assert_eq!(output.build_unit, "example.com/pkg [example.com/pkg.test]");

        let fail = TestEvent::from_json_line(
            r#"{"Action":"fail","Package":"example.com/pkg","FailedBuild":"example.com/pkg [example.com/pkg.test]"}"#,
        )
        .expect("Should parse");
        assert_eq!(fail.failed_build, "example.com/pkg [example.com/pkg.test]");
    }

    #[test]
    fn test_decode_partial_object() {
        let event = TestEvent::from_json_line("{}").expect("Should parse");
        assert_eq!(event, TestEvent::default());
    }

    #[test]
    fn test_unknown_action_is_kept() {
        let event = TestEvent::from_json_line(r#"{"Action":"weird","Output":"x"}"#)
            .expect("Should parse");
        assert_eq!(event.action, Action::Other("weird".to_string()));
        assert_eq!(event.action.to_string(), "weird");
    }

    #[test]
    fn test_null_is_an_empty_event() {
        assert_eq!(TestEvent::from_json_line("null").unwrap(), TestEvent::default());
        assert_eq!(TestEvent::from_json_line("  null ").unwrap(), TestEvent::default());
        assert!(TestEvent::from_json_line("nullx").is_err());
    }

    #[test]
    fn test_reject_non_objects() {
        assert!(TestEvent::from_json_line("not json").is_err());
        assert!(TestEvent::from_json_line("[]").is_err());
        assert!(TestEvent::from_json_line("42").is_err());
        assert!(TestEvent::from_json_line("").is_err());
        assert!(TestEvent::from_json_line(r#"{"Action":"pass""#).is_err());
    }

    #[test]
    fn test_reject_mistyped_fields() {
        assert!(TestEvent::from_json_line(r#"{"Action":1}"#).is_err());
        assert!(TestEvent::from_json_line(r#"{"Elapsed":"slow"}"#).is_err());
    }

    #[test]
    fn test_action_wire_names() {
        for name in [
            "start",
            "run",
            "pause",
            "cont",
            "output",
            "pass",
            "fail",
            "skip",
            "bench",
            "build-output",
            "build-fail",
        ] {
            let action = Action::from(name);
            assert!(!matches!(action, Action::Other(_)), "{name} should be known");
            assert_eq!(String::from(action), name);
        }
    }

    #[test]
    fn test_serialize_omits_empty_fields() {
        let event = TestEvent::new(Action::Pass, "pkg", "").with_elapsed(0.5);
        let json = serde_json::to_string(&event).expect("Should serialize");
        assert_eq!(json, r#"{"Action":"pass","Package":"pkg","Elapsed":0.5}"#);
    }
}
