// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! verdict-gotest: normalization of `go test -json` output
//!
//! This library crate turns the mixed output of `go test -json` (structured
//! events interleaved with plain compiler diagnostics) into a single
//! [`TestReport`] describing every leaf test and why the failing ones failed.
//!
//! The pipeline is a single synchronous pass:
//!
//! 1. [`classifier`] separates events from free text and spots build failures
//!    that never produced any events.
//! 2. [`aggregator`] folds the events into per-module test state and output.
//! 3. [`bounding`] caps the diagnostic text of each test.
//! 4. [`transformer`] produces the report.
//!
//! # Example
//!
//! ```
//! use verdict_gotest::{ResultAggregator, classify_str, transform};
//!
//! let input = r#"{"Action":"run","Package":"example.com/pkg","Test":"TestAdd"}
//! {"Action":"output","Package":"example.com/pkg","Test":"TestAdd","Output":"    add_test.go:9: got 3, want 4\n"}
//! {"Action":"fail","Package":"example.com/pkg","Test":"TestAdd","Elapsed":0.01}
//! {"Action":"fail","Package":"example.com/pkg","Elapsed":0.02}"#;
//!
//! let stream = classify_str(input);
//! let aggregator = ResultAggregator::from_events(stream.events());
//! let report = transform(&aggregator, stream.compile_error.as_ref());
//!
//! assert!(!report.all_passed());
//! assert_eq!(report.failing_tests()[0].errors[0].message, "add_test.go:9: got 3, want 4");
//! ```

pub mod aggregator;
pub mod bounding;
pub mod classifier;
pub mod error;
pub mod event;
pub mod formatter;
pub mod result;
pub mod transformer;

pub use aggregator::{ModuleAggregate, ModuleResults, ResultAggregator, Results};
pub use classifier::{
    ClassifiedStream, CompileError, StreamClassifier, StreamLine, classify_lines, classify_reader,
    classify_str,
};
pub use error::GotestError;
pub use event::{Action, TestEvent};
pub use formatter::ConsoleFormatter;
pub use result::{
    COMPILATION_ERROR, Reason, TestCase, TestError, TestModule, TestReport, TestState,
};
pub use transformer::transform;

/// Classify, aggregate and transform a complete input in one call
///
/// ```
/// let report = verdict_gotest::report_from_str(r#"{"Action":"pass","Package":"pkg","Test":"TestA"}"#);
/// assert!(report.all_passed());
/// ```
#[must_use]
pub fn report_from_str(input: &str) -> TestReport {
    let stream = classify_str(input);
    let aggregator = ResultAggregator::from_events(stream.events());
    transform(&aggregator, stream.compile_error.as_ref())
}

/// Re-export commonly used types
pub mod prelude {
    pub use crate::aggregator::ResultAggregator;
    pub use crate::classifier::{ClassifiedStream, StreamClassifier, classify_str};
    pub use crate::error::GotestError;
    pub use crate::event::{Action, TestEvent};
    pub use crate::formatter::ConsoleFormatter;
    pub use crate::result::{Reason, TestReport, TestState};
    pub use crate::transformer::transform;
}
