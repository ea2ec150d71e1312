// src/validation/mod.rs
//! Golden sequence validation for exp kernel outputs
//!
//! This module compares kernel outputs against precomputed golden results
//! under a fixed absolute tolerance, reporting bit-exact diagnostics.

pub mod similarity;
pub mod result_validator;

// Re-export core validation types
pub use similarity::similar;
pub use result_validator::{mismatches, Mismatch, ResultValidator, ValidationOutcome};
