//! Fuzz target for diagnostic bounding
//!
//! `bound_output` truncates by characters and must never split a UTF-8
//! sequence.

#![no_main]

use libfuzzer_sys::fuzz_target;

use verdict_gotest::bounding::bound_output;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = bound_output(input);
    }
});
