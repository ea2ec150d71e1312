// src/validation/similarity.rs
//! Absolute-difference similarity check between a computed and a golden value

use crate::element::Element;

/// True iff `|computed - expected| <= tolerance`.
///
/// Any NaN operand makes the comparison false, so NaN is never similar to
/// anything. Infinities of the same sign produce `inf - inf = NaN` and are
/// therefore dissimilar as well.
#[inline]
pub fn similar<T: Element>(computed: T, expected: T, tolerance: T) -> bool {
    (computed - expected).abs() <= tolerance
}
