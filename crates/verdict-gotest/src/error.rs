// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for verdict-gotest

use thiserror::Error;

/// Errors that can occur while reading or emitting test results
#[derive(Debug, Error)]
pub enum GotestError {
    /// Error parsing or serializing JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error reading the test output stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
