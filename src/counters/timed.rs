// src/counters/timed.rs
//! Counter-bracketed kernel invocation

use super::{completion_barrier, CounterSource};
use crate::element::Element;
use crate::kernels::ExpKernel;

/// Both counters read at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimingSample {
    pub instructions: u64,
    pub cycles: u64,
}

impl TimingSample {
    /// Instructions first, then cycles.
    #[inline(always)]
    pub fn read<C: CounterSource + ?Sized>(counters: &C) -> Self {
        let instructions = counters.read_instructions();
        let cycles = counters.read_cycles();
        Self {
            instructions,
            cycles,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimedRun {
    pub before: TimingSample,
    pub after: TimingSample,
}

impl TimedRun {
    pub fn elapsed_cycles(&self) -> u64 {
        self.after.cycles.saturating_sub(self.before.cycles)
    }

    pub fn retired_instructions(&self) -> u64 {
        self.after.instructions.saturating_sub(self.before.instructions)
    }
}

/// Run `kernel` once between two counter samples.
///
/// The completion barrier sits between the kernel call and the second
/// sample, so the delta covers the kernel's finished work and nothing else.
pub fn timed_run<T, K, C>(
    counters: &C,
    kernel: &K,
    input: &[T],
    output: &mut [T],
    count: usize,
) -> TimedRun
where
    T: Element,
    K: ExpKernel<T> + ?Sized,
    C: CounterSource + ?Sized,
{
    let before = TimingSample::read(counters);
    kernel.run(input, output, count);
    completion_barrier();
    let after = TimingSample::read(counters);

    TimedRun { before, after }
}
