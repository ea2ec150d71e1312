// src/validation/result_validator.rs
//! Golden sequence validation
//!
//! Compares a kernel's output buffer against the golden sequence of the same
//! precision, element by element and in index order. Every mismatch is
//! reported, not only the first, so a single pass shows the full damage.

use super::similarity::similar;
use crate::element::Element;
use std::fmt;
use std::io::{self, Write};

/// One element that fell outside the tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch<T: Element> {
    pub index: usize,
    pub computed: T,
    pub expected: T,
}

impl<T: Element> fmt::Display for Mismatch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-bit error at index {}. {:x} != {:x}",
            T::WIDTH,
            self.index,
            self.computed.to_bits(),
            self.expected.to_bits()
        )
    }
}

/// Outcome of validating one output buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Sticky error flag: set by the first mismatch, never cleared.
    pub error: bool,
    pub mismatched_indices: Vec<usize>,
}

impl ValidationOutcome {
    /// Raw flag value surfaced as the process exit status.
    pub fn error_flag(&self) -> i32 {
        i32::from(self.error)
    }
}

/// Yields every mismatch among the first `count` index pairs, in order.
///
/// # Panics
///
/// Panics if either slice is shorter than `count`.
pub fn mismatches<'a, T: Element>(
    results: &'a [T],
    golden: &'a [T],
    count: usize,
    tolerance: T,
) -> impl Iterator<Item = Mismatch<T>> + 'a {
    results[..count]
        .iter()
        .zip(&golden[..count])
        .enumerate()
        .filter(move |&(_, (&computed, &expected))| !similar(computed, expected, tolerance))
        .map(|(index, (&computed, &expected))| Mismatch {
            index,
            computed,
            expected,
        })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultValidator {
    tolerance: f64,
}

impl ResultValidator {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Validate `results[..count]` against `golden[..count]`, writing one
    /// diagnostic line per mismatch to `out`.
    ///
    /// A `count` past the end of either slice is an `InvalidInput` error;
    /// nothing is written in that case.
    pub fn validate<T: Element, W: Write + ?Sized>(
        &self,
        results: &[T],
        golden: &[T],
        count: usize,
        out: &mut W,
    ) -> io::Result<ValidationOutcome> {
        if count > results.len() || count > golden.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "{}-bit check of {} elements, but results hold {} and golden {}",
                    T::WIDTH,
                    count,
                    results.len(),
                    golden.len()
                ),
            ));
        }

        let mut outcome = ValidationOutcome::default();

        for mismatch in mismatches(results, golden, count, T::from_f64(self.tolerance)) {
            outcome.error = true;
            outcome.mismatched_indices.push(mismatch.index);
            writeln!(out, "{}", mismatch)?;
        }

        Ok(outcome)
    }
}

impl Default for ResultValidator {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_TOLERANCE)
    }
}
