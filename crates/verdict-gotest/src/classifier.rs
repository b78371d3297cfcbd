// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Separation of structured events from free text
//!
//! `go test -json` only emits JSON once a package has been built. When the
//! build itself fails the toolchain prints plain text instead:
//!
//! ```text
//! # example.com/pkg
//! ./pkg_test.go:9:8: undefined: Foo
//! FAIL    example.com/pkg [build failed]
//! ```
//!
//! The classifier keeps every line in order, decoding the ones that are
//! events, and turns a `#` header plus the lines after it into a
//! [`CompileError`].
//!
//! # Example
//!
//! ```
//! use verdict_gotest::classifier::classify_str;
//!
//! let stream = classify_str("# pkg\nfile.go:9:8: undefined: Foo\nFAIL\tpkg [build failed]");
//! let compile_error = stream.compile_error.unwrap();
//! assert_eq!(compile_error.unit, "pkg");
//! assert_eq!(compile_error.messages, vec!["file.go:9:8: undefined: Foo"]);
//! ```

use std::io::BufRead;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GotestError;
use crate::event::TestEvent;

/// First character of a compile-error header line
pub const HEADER_MARKER: char = '#';

/// Prefix of the toolchain's terminal summary line
pub const SUMMARY_MARKER: &str = "FAIL";

/// A build failure reported as plain text rather than JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileError {
    /// Unit named in the `#` header
    pub unit: String,
    /// Diagnostic lines following the header, in order
    pub messages: Vec<String>,
}

/// One input line after classification
#[derive(Debug, Clone, PartialEq)]
pub enum StreamLine {
    /// Line decoded as a structured event
    Event(TestEvent),
    /// Line that is not a structured event
    Text(String),
}

/// The classified contents of a whole stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedStream {
    /// Every line in input order
    pub lines: Vec<StreamLine>,
    /// Build failure detected in the free text, if any
    pub compile_error: Option<CompileError>,
}

impl ClassifiedStream {
    /// Structured events in input order
    pub fn events(&self) -> impl Iterator<Item = &TestEvent> {
        self.lines.iter().filter_map(|line| match line {
            StreamLine::Event(event) => Some(event),
            StreamLine::Text(_) => None,
        })
    }

    /// Free-text lines in input order
    pub fn free_text(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            StreamLine::Event(_) => None,
            StreamLine::Text(text) => Some(text.as_str()),
        })
    }

    /// Consume the stream, keeping only the structured events
    #[must_use]
    pub fn into_events(self) -> Vec<TestEvent> {
        self.lines
            .into_iter()
            .filter_map(|line| match line {
                StreamLine::Event(event) => Some(event),
                StreamLine::Text(_) => None,
            })
            .collect()
    }
}

/// Incremental classifier fed one line at a time
#[derive(Debug, Default)]
pub struct StreamClassifier {
    lines: Vec<StreamLine>,
    compile_error: Option<CompileError>,
}

impl StreamClassifier {
    /// Create an empty classifier
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a single line
    ///
    /// A trailing carriage return is ignored.
    pub fn push_line(&mut self, line: &str) {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if let Ok(event) = TestEvent::from_json_line(line) {
            self.lines.push(StreamLine::Event(event));
            return;
        }

        self.observe_text(line);
        self.lines.push(StreamLine::Text(line.to_string()));
    }

    fn observe_text(&mut self, line: &str) {
        if let Some(unit) = line.strip_prefix(HEADER_MARKER) {
            match &self.compile_error {
                None => {
                    let unit = unit.trim();
                    debug!(unit, "compile error header");
                    self.compile_error = Some(CompileError {
                        unit: unit.to_string(),
                        messages: Vec::new(),
                    });
                }
                Some(open) => {
                    debug!(open = %open.unit, ignored = line, "ignoring additional header");
                }
            }
            return;
        }

        if let Some(record) = self.compile_error.as_mut() {
            if is_diagnostic(line) {
                record.messages.push(line.to_string());
            }
        }
    }

    /// The compile error detected so far
    #[must_use]
    pub fn compile_error(&self) -> Option<&CompileError> {
        self.compile_error.as_ref()
    }

    /// Finish classification
    #[must_use]
    pub fn finish(self) -> ClassifiedStream {
        ClassifiedStream {
            lines: self.lines,
            compile_error: self.compile_error,
        }
    }
}

fn is_diagnostic(line: &str) -> bool {
    !line.is_empty() && !line.starts_with(SUMMARY_MARKER)
}

/// Classify a sequence of lines
pub fn classify_lines<I, S>(lines: I) -> ClassifiedStream
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut classifier = StreamClassifier::new();
    for line in lines {
        classifier.push_line(line.as_ref());
    }
    classifier.finish()
}

/// Classify a complete newline-delimited string
#[must_use]
pub fn classify_str(input: &str) -> ClassifiedStream {
    classify_lines(input.lines())
}

/// Classify everything readable from `reader`
///
/// Invalid UTF-8 is replaced rather than rejected, so a stray byte in
/// compiler output cannot abort the run.
///
/// # Errors
///
/// Returns `GotestError::Io` if reading fails.
pub fn classify_reader<R: BufRead>(mut reader: R) -> Result<ClassifiedStream, GotestError> {
    let mut classifier = StreamClassifier::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        classifier.push_line(line.strip_suffix('\n').unwrap_or(&line));
    }

    Ok(classifier.finish())
}
