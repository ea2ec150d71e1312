// src/counters/mod.rs
//! Performance counter sources
//!
//! The harness reads two monotonically increasing counters around every
//! kernel call: retired instructions and elapsed cycles. Where the target
//! exposes them to user code they are read directly; otherwise a monotonic
//! software clock stands in, and cycle counts become wall-clock nanoseconds.

pub mod timed;

pub use timed::{timed_run, TimedRun, TimingSample};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{compiler_fence, Ordering};
use std::time::Instant;

/// Capability to read the two counters the harness samples.
pub trait CounterSource {
    fn name(&self) -> &'static str;

    fn read_instructions(&self) -> u64;

    fn read_cycles(&self) -> u64;
}

/// `rdinstret` / `rdcycle` user-level CSR reads.
#[cfg(target_arch = "riscv64")]
#[derive(Debug, Clone, Copy, Default)]
pub struct CsrCounters;

#[cfg(target_arch = "riscv64")]
impl CounterSource for CsrCounters {
    fn name(&self) -> &'static str {
        "csr"
    }

    #[inline(always)]
    fn read_instructions(&self) -> u64 {
        let value: u64;
        // SAFETY: reads the user-visible instret CSR, no memory is touched.
        unsafe { std::arch::asm!("rdinstret {0}", out(reg) value, options(nostack)) };
        value
    }

    #[inline(always)]
    fn read_cycles(&self) -> u64 {
        let value: u64;
        // SAFETY: reads the user-visible cycle CSR, no memory is touched.
        unsafe { std::arch::asm!("rdcycle {0}", out(reg) value, options(nostack)) };
        value
    }
}

/// Time-stamp counter. Retired instructions are not readable from user
/// mode on x86, so that counter always reads 0.
#[cfg(target_arch = "x86_64")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TscCounters;

#[cfg(target_arch = "x86_64")]
impl CounterSource for TscCounters {
    fn name(&self) -> &'static str {
        "tsc"
    }

    fn read_instructions(&self) -> u64 {
        0
    }

    #[inline(always)]
    #[allow(unused_unsafe)]
    fn read_cycles(&self) -> u64 {
        // SAFETY: rdtsc is available on every x86_64 CPU.
        unsafe { std::arch::x86_64::_rdtsc() }
    }
}

/// Monotonic software clock. "Cycles" are nanoseconds since construction;
/// retired instructions always read 0.
#[derive(Debug, Clone, Copy)]
pub struct SoftwareCounters {
    origin: Instant,
}

impl SoftwareCounters {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SoftwareCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterSource for SoftwareCounters {
    fn name(&self) -> &'static str {
        "software"
    }

    fn read_instructions(&self) -> u64 {
        0
    }

    fn read_cycles(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

/// Which counter source to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterKind {
    /// Hardware counters if the target has them, software clock otherwise.
    #[default]
    Auto,
    Hardware,
    Software,
}

impl fmt::Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CounterKind::Auto => "auto",
            CounterKind::Hardware => "hardware",
            CounterKind::Software => "software",
        };
        f.write_str(name)
    }
}

impl FromStr for CounterKind {
    type Err = CounterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(CounterKind::Auto),
            "hardware" => Ok(CounterKind::Hardware),
            "software" => Ok(CounterKind::Software),
            other => Err(CounterError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    #[error("unknown counter source '{0}' (expected auto, hardware or software)")]
    UnknownKind(String),

    #[error("no user-readable hardware counters on {0}")]
    Unavailable(&'static str),
}

fn hardware_counters() -> Option<Box<dyn CounterSource>> {
    #[cfg(target_arch = "riscv64")]
    let source: Option<Box<dyn CounterSource>> = Some(Box::new(CsrCounters));

    #[cfg(target_arch = "x86_64")]
    let source: Option<Box<dyn CounterSource>> = Some(Box::new(TscCounters));

    #[cfg(not(any(target_arch = "riscv64", target_arch = "x86_64")))]
    let source: Option<Box<dyn CounterSource>> = None;

    source
}

/// Build the counter source selected by `kind`.
pub fn counter_source(kind: CounterKind) -> Result<Box<dyn CounterSource>, CounterError> {
    let source: Box<dyn CounterSource> = match kind {
        CounterKind::Software => Box::new(SoftwareCounters::new()),
        CounterKind::Hardware => {
            hardware_counters().ok_or(CounterError::Unavailable(std::env::consts::ARCH))?
        }
        CounterKind::Auto => {
            hardware_counters().unwrap_or_else(|| Box::new(SoftwareCounters::new()))
        }
    };

    log::debug!("using {} counters ({} requested)", source.name(), kind);
    Ok(source)
}

/// Wait until every previously issued memory access and instruction has
/// completed, so a counter read that follows observes finished work only.
#[inline(always)]
pub fn completion_barrier() {
    #[cfg(target_arch = "riscv64")]
    // SAFETY: fence has no operands and no effect besides ordering.
    unsafe {
        std::arch::asm!("fence", options(nostack))
    };

    #[cfg(not(target_arch = "riscv64"))]
    std::sync::atomic::fence(Ordering::SeqCst);

    compiler_fence(Ordering::SeqCst);
}
