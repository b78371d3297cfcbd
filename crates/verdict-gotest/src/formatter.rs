// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Condensed console rendering of structured events
//!
//! `go test -json` is unreadable for a person watching the run. The formatter
//! turns each event back into something close to plain `go test` output while
//! dropping the noise: start/run markers, per-test pass lines and package
//! banners that are regenerated from pass/fail events.
//!
//! The formatter is stateless; each event is rendered on its own.

use crate::event::{Action, TestEvent};

/// Renders one event into at most one console line
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Create a formatter
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Render an event, or `None` when it should not be shown
    ///
    /// ```
    /// use verdict_gotest::event::{Action, TestEvent};
    /// use verdict_gotest::formatter::ConsoleFormatter;
    ///
    /// let event = TestEvent::new(Action::Pass, "pkg", "").with_elapsed(0.003);
    /// assert_eq!(ConsoleFormatter::new().format(&event).as_deref(), Some("ok  \tpkg\t0.003s"));
    /// ```
    #[must_use]
    pub fn format(&self, event: &TestEvent) -> Option<String> {
        let line = match &event.action {
            Action::Start | Action::Run => None,
            Action::BuildOutput => Some(trim_newline(&event.output).to_string()),
            Action::BuildFail => Some(format_build_fail(event)),
            Action::Output => format_output(event),
            Action::Pass => format_pass(event),
            Action::Fail => format_fail(event),
            other => Some(format!("{other}: {}", trim_newline(&event.output))),
        };
        line.filter(|line| !line.is_empty())
    }
}

fn format_build_fail(event: &TestEvent) -> String {
    if event.module.is_empty() {
        "BUILD FAILED".to_string()
    } else {
        format!("BUILD FAILED\t{}", event.module)
    }
}

fn format_output(event: &TestEvent) -> Option<String> {
    let output = event.output.as_str();

    match output {
        // Regenerated from the package pass event
        "PASS\n" => return None,
        "FAIL\n" => return Some("FAIL".to_string()),
        _ => {}
    }
    if output.starts_with("ok  \t") {
        return None;
    }
    if output.starts_with("exit status") || output.starts_with("FAIL\t") {
        return Some(trim_newline(output).to_string());
    }

    if !event.test.is_empty() && (output.starts_with("=== RUN") || output.starts_with("--- PASS:"))
    {
        return None;
    }

    Some(trim_newline(output).to_string())
}

fn format_pass(event: &TestEvent) -> Option<String> {
    if !event.module.is_empty() && event.is_module_level() {
        return Some(format!("ok  \t{}\t{:.3}s", event.module, event.elapsed));
    }
    None
}

fn format_fail(event: &TestEvent) -> Option<String> {
    if event.is_module_level() {
        if event.module.is_empty() {
            return None;
        }
        if !event.failed_build.is_empty() {
            return Some(format!("FAIL\t{} [build failed]", event.module));
        }
        return Some(format!("FAIL\t{}\t{:.3}s", event.module, event.elapsed));
    }
    Some(format!("FAIL\t{}/{}", event.module, event.test))
}

fn trim_newline(s: &str) -> &str {
    s.strip_suffix('\n').unwrap_or(s)
}
