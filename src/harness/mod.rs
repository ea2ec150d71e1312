// src/harness/mod.rs
//! Exp kernel correctness and cycle-count harness
//!
//! Ties the dataset provider, the kernel set, the counter source and the
//! result validator together into one run with a pass/fail exit status.

pub mod arena;
pub mod driver;
pub mod report;

pub use arena::OutputArena;
pub use driver::HarnessDriver;
pub use report::{RunReport, VariantFailure, VariantTiming};

use crate::config::ConfigError;
use crate::counters::CounterError;
use crate::dataset::DatasetError;
use crate::kernels::VariantKey;

/// Exit status for a dataset size mismatch.
pub const SIZE_MISMATCH_EXIT_CODE: i32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error(
        "{width}-bit dataset size mismatch: expected {expected} elements, dataset has {actual}"
    )]
    SizeMismatch {
        width: u32,
        expected: usize,
        actual: usize,
    },

    #[error("no kernel registered for {0}")]
    MissingKernel(VariantKey),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("counter error: {0}")]
    Counters(#[from] CounterError),

    #[error("report output failed: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Every harness error terminates the process with status 1.
    pub fn exit_code(&self) -> i32 {
        SIZE_MISMATCH_EXIT_CODE
    }
}

/// Process exit status for a finished (or aborted) run.
pub fn exit_code(result: &Result<RunReport, HarnessError>) -> i32 {
    match result {
        Ok(report) => report.exit_code(),
        Err(err) => err.exit_code(),
    }
}
