// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for event aggregation
//!
//! Builds well-formed event sequences from structured input so the fuzzer
//! spends its time on aggregation and leaf filtering rather than on JSON
//! syntax. Checks that no reported module keeps a test next to one of its
//! subtests.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use verdict_gotest::aggregator::is_subtest_of;
use verdict_gotest::{Action, ResultAggregator, TestEvent, transform};

const ACTIONS: [&str; 8] = [
    "run",
    "output",
    "pass",
    "fail",
    "skip",
    "build-output",
    "build-fail",
    "other",
];

#[derive(Debug, Arbitrary)]
struct FuzzEvent {
    action: u8,
    module: u8,
    test: Vec<u8>,
    output: String,
    failed_build: bool,
}

impl FuzzEvent {
    fn to_event(&self) -> TestEvent {
        let module = format!("m{}", self.module % 3);
        // Small alphabet so parents and subtests collide
        let test = self
            .test
            .iter()
            .take(4)
            .map(|b| format!("T{}", b % 3))
            .collect::<Vec<_>>()
            .join("/");
        let action = Action::from(ACTIONS[usize::from(self.action) % ACTIONS.len()]);

        let mut event = TestEvent::new(action, &module, &test).with_output(&self.output);
        if self.failed_build {
            event = event
                .with_failed_build(&format!("{module} [{module}.test]"))
                .with_build_unit(&format!("{module} [{module}.test]"));
        }
        event
    }
}

fuzz_target!(|input: Vec<FuzzEvent>| {
    let events: Vec<TestEvent> = input.iter().map(FuzzEvent::to_event).collect();
    let aggregator = ResultAggregator::from_events(&events);
    let report = transform(&aggregator, None);

    for module in &report.test_modules {
        for parent in &module.tests {
            for child in &module.tests {
                assert!(!is_subtest_of(&child.name, &parent.name));
            }
        }
    }
});
