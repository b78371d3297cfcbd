// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Aggregation of structured events into per-module test state
//!
//! The aggregator folds a run's events into one [`ModuleAggregate`] per
//! package: the last reported state of every test, the output each test
//! printed, and the package-level output printed outside any test. Build
//! output is kept separately, keyed by build unit.
//!
//! Go reports subtests with slash-delimited names and also reports their
//! parents. Only leaves are meaningful to consumers, so [`ResultAggregator::results`]
//! drops every test that has a recorded subtest.
//!
//! # Example
//!
//! ```
//! use verdict_gotest::aggregator::ResultAggregator;
//! use verdict_gotest::event::{Action, TestEvent};
//!
//! let mut aggregator = ResultAggregator::new();
//! aggregator.process_event(&TestEvent::new(Action::Pass, "pkg", "TestParent/Child"));
//! aggregator.process_event(&TestEvent::new(Action::Pass, "pkg", "TestParent"));
//!
//! let results = aggregator.results();
//! assert_eq!(results["pkg"].keys().collect::<Vec<_>>(), vec!["TestParent/Child"]);
//! ```

use std::collections::BTreeMap;
use std::ops::Bound;

use tracing::{debug, trace};

use crate::bounding::bound_output;
use crate::event::{Action, TestEvent};
use crate::result::{COMPILATION_ERROR, TestState};

/// Separator between a test name and its subtest names
pub const SUBTEST_SEPARATOR: char = '/';

/// Output fragment Go prints when a test starts
const RUN_BANNER: &str = "=== RUN";

/// Output fragment Go prints when a test fails
const FAIL_BANNER: &str = "--- FAIL";

/// Test name → state for one module
pub type ModuleResults = BTreeMap<String, TestState>;

/// Module name → test states
pub type Results = BTreeMap<String, ModuleResults>;

/// Everything recorded for one module
#[derive(Debug, Clone, Default)]
pub struct ModuleAggregate {
    states: ModuleResults,
    outputs: BTreeMap<String, String>,
    module_output: String,
}

impl ModuleAggregate {
    /// All recorded test states, including parents of subtests
    #[must_use]
    pub fn states(&self) -> &ModuleResults {
        &self.states
    }

    /// Recorded test states with parents of subtests removed
    #[must_use]
    pub fn leaf_states(&self) -> ModuleResults {
        leaf_tests(&self.states)
    }

    /// Raw output accumulated for a test
    ///
    /// `Some("")` means the test passed without printing anything, `None`
    /// that no output was ever attributed to it.
    #[must_use]
    pub fn output(&self, test: &str) -> Option<&str> {
        self.outputs.get(test).map(String::as_str)
    }

    /// Output printed at module level, outside any test
    #[must_use]
    pub fn module_output(&self) -> &str {
        &self.module_output
    }

    fn record(&mut self, test: &str, state: TestState) {
        if let Some(previous) = self.states.insert(test.to_string(), state) {
            if previous != state {
                debug!(test, ?previous, ?state, "test state overwritten");
            }
        }
    }

    fn capture_output(&mut self, test: &str, output: &str) {
        if output.starts_with(RUN_BANNER) || output.starts_with(FAIL_BANNER) {
            return;
        }
        self.outputs
            .entry(test.to_string())
            .or_default()
            .push_str(output.trim_start_matches([' ', '\t']));
    }
}

/// Folds structured events into per-module results
///
/// One aggregator is meant to be used for exactly one run.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    modules: BTreeMap<String, ModuleAggregate>,
    build_outputs: BTreeMap<String, String>,
}

impl ResultAggregator {
    /// Create an empty aggregator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate all events from an iterator
    #[must_use]
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a TestEvent>) -> Self {
        let mut aggregator = Self::new();
        aggregator.process_events(events);
        aggregator
    }

    /// Process a sequence of events in order
    pub fn process_events<'a>(&mut self, events: impl IntoIterator<Item = &'a TestEvent>) {
        for event in events {
            self.process_event(event);
        }
    }

    /// Process a single event
    pub fn process_event(&mut self, event: &TestEvent) {
        if !event.build_unit.is_empty() && event.action == Action::BuildOutput {
            self.build_outputs
                .entry(event.build_unit.clone())
                .or_default()
                .push_str(&event.output);
            return;
        }

        if event.action == Action::Fail && !event.failed_build.is_empty() {
            debug!(
                module = %event.module,
                failed_build = %event.failed_build,
                "build failure reported by package"
            );
            self.module_mut(&event.module)
                .record(COMPILATION_ERROR, TestState::Failed);
            return;
        }

        if event.module.is_empty() {
            trace!(action = %event.action, "ignoring event without module");
            return;
        }

        if event.is_module_level() {
            self.process_module_event(event);
        } else {
            self.process_test_event(event);
        }
    }

    fn module_mut(&mut self, module: &str) -> &mut ModuleAggregate {
        self.modules.entry(module.to_string()).or_default()
    }

    fn process_module_event(&mut self, event: &TestEvent) {
        let aggregate = self.module_mut(&event.module);
        match event.action {
            Action::Output => aggregate.module_output.push_str(&event.output),
            Action::Fail if aggregate.states.is_empty() => {
                debug!(module = %event.module, "package failed without tests, recording compilation error");
                aggregate.record(COMPILATION_ERROR, TestState::Failed);
            }
            _ => {}
        }
    }

    fn process_test_event(&mut self, event: &TestEvent) {
        let aggregate = self.module_mut(&event.module);
        match event.action {
            Action::Output => aggregate.capture_output(&event.test, &event.output),
            Action::Pass => {
                aggregate.outputs.entry(event.test.clone()).or_default();
                aggregate.record(&event.test, TestState::Passed);
            }
            Action::Fail => aggregate.record(&event.test, TestState::Failed),
            Action::Skip => aggregate.record(&event.test, TestState::Skipped),
            _ => {}
        }
    }

    /// Leaf test states for every module seen
    ///
    /// Modules without any tests are included with an empty map.
    #[must_use]
    pub fn results(&self) -> Results {
        self.modules
            .iter()
            .map(|(name, aggregate)| (name.clone(), aggregate.leaf_states()))
            .collect()
    }

    /// Look up the aggregate of a module
    #[must_use]
    pub fn module(&self, module: &str) -> Option<&ModuleAggregate> {
        self.modules.get(module)
    }

    /// Whether no module has been seen
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Module-level output, empty when the module is unknown
    #[must_use]
    pub fn module_output(&self, module: &str) -> &str {
        self.modules
            .get(module)
            .map(ModuleAggregate::module_output)
            .unwrap_or_default()
    }

    /// Raw build output accumulated for a build unit
    #[must_use]
    pub fn build_output(&self, unit: &str) -> Option<&str> {
        self.build_outputs.get(unit).map(String::as_str)
    }

    /// Bounded diagnostic text for a test
    ///
    /// For the synthetic compilation error test this is the build output that
    /// belongs to the module, falling back to any build output and then to the
    /// module-level output.
    #[must_use]
    pub fn test_output(&self, module: &str, test: &str) -> String {
        if test == COMPILATION_ERROR {
            if let Some(build) = self.build_output_for(module) {
                return bound_output(build.trim());
            }
            let module_output = self.module_output(module).trim();
            if !module_output.is_empty() {
                return bound_output(module_output);
            }
        }

        self.modules
            .get(module)
            .and_then(|aggregate| aggregate.output(test))
            .map(|output| bound_output(output.trim_end_matches('\n')))
            .unwrap_or_default()
    }

    fn build_output_for(&self, module: &str) -> Option<&str> {
        let mut candidates = self
            .build_outputs
            .iter()
            .filter(|(_, output)| !output.trim().is_empty());

        let own = candidates.clone().find(|(unit, _)| {
            unit.strip_prefix(module)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
        });

        own.or_else(|| candidates.next())
            .map(|(_, output)| output.as_str())
    }
}

/// Whether `child` is a strict descendant of `parent` in the test hierarchy
///
/// ```
/// use verdict_gotest::aggregator::is_subtest_of;
///
/// assert!(is_subtest_of("TestFoo/case", "TestFoo"));
/// assert!(!is_subtest_of("TestFooBar", "TestFoo"));
/// ```
#[must_use]
pub fn is_subtest_of(child: &str, parent: &str) -> bool {
    child
        .strip_prefix(parent)
        .and_then(|rest| rest.strip_prefix(SUBTEST_SEPARATOR))
        .is_some_and(|rest| !rest.is_empty())
}

/// Whether any recorded test is a subtest of `test`
#[must_use]
pub fn has_subtests(test: &str, tests: &ModuleResults) -> bool {
    let prefix = format!("{test}{SUBTEST_SEPARATOR}");
    // Every name starting with the prefix sorts directly at or after it.
    tests
        .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
        .take_while(|(other, _)| other.starts_with(&prefix))
        .any(|(other, _)| is_subtest_of(other, test))
}

/// Drop every test that has a recorded subtest
#[must_use]
pub fn leaf_tests(tests: &ModuleResults) -> ModuleResults {
    tests
        .iter()
        .filter(|(name, _)| !has_subtests(name, tests))
        .map(|(name, state)| (name.clone(), *state))
        .collect()
}
