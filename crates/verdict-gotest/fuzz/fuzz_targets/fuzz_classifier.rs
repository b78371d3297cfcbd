// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the stream classifier
//!
//! Feeds arbitrary bytes through `classify_reader`, which must accept any
//! input including invalid UTF-8.

#![no_main]

use libfuzzer_sys::fuzz_target;

use verdict_gotest::classify_reader;

fuzz_target!(|data: &[u8]| {
    // Reading from a byte slice cannot fail
    let _ = classify_reader(data);
});
