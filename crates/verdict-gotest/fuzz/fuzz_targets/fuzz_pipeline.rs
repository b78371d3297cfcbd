// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the whole pipeline
//!
//! Classifies, aggregates, transforms and formats arbitrary input.

#![no_main]

use libfuzzer_sys::fuzz_target;

use verdict_gotest::{ConsoleFormatter, ResultAggregator, classify_str, transform};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let stream = classify_str(input);

        let formatter = ConsoleFormatter::new();
        for event in stream.events() {
            let _ = formatter.format(event);
        }

        let aggregator = ResultAggregator::from_events(stream.events());
        let report = transform(&aggregator, stream.compile_error.as_ref());
        let _ = report.to_json();
    }
});
