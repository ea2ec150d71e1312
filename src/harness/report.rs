// src/harness/report.rs
//! Harness run results

use crate::counters::TimedRun;
use crate::kernels::VariantKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantTiming {
    pub variant: VariantKey,
    pub elements: usize,
    pub run: TimedRun,
}

impl VariantTiming {
    pub fn elapsed_cycles(&self) -> u64 {
        self.run.elapsed_cycles()
    }
}

/// The first variant whose output fell outside tolerance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantFailure {
    pub variant: VariantKey,
    pub error_flag: i32,
    pub mismatched_indices: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Run phase, in execution order.
    pub timings: Vec<VariantTiming>,
    /// Variants the check phase reached, in order.
    pub checked: Vec<VariantKey>,
    pub failure: Option<VariantFailure>,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }

    /// 0 on success, otherwise the failing variant's error flag.
    pub fn exit_code(&self) -> i32 {
        self.failure.as_ref().map_or(0, |failure| failure.error_flag)
    }

    pub fn total_cycles(&self) -> u64 {
        self.timings.iter().map(VariantTiming::elapsed_cycles).sum()
    }
}
