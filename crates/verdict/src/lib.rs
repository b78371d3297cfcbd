//! verdict library
//!
//! This module exports the front-end of the verdict binary (configuration,
//! persistence and the run pipeline) for use in integration tests and as a
//! library. Parsing lives in the `verdict_gotest` crate.

pub mod config;
pub mod reporter;
pub mod storage;

pub use config::{Config, ConfigError};
pub use reporter::{Outcome, Reporter, ReporterError};
pub use storage::{RESULTS_PATH, Storage, StorageError};
