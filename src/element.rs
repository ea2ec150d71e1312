// src/element.rs
//! Floating-point element types handled by the harness
//!
//! Only `f32` and `f64` implement [`Element`]; the trait is sealed so that
//! aligned buffers can rely on the all-zero bit pattern being a valid value.

use std::fmt::{Debug, Display, LowerHex};
use std::ops::Sub;

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

pub trait Element:
    sealed::Sealed
    + Copy
    + Default
    + PartialOrd
    + Debug
    + Display
    + Sub<Output = Self>
    + Send
    + Sync
    + 'static
{
    /// Bit width of the type, used in diagnostics ("64-bit error at ...").
    const WIDTH: u32;

    /// Unsigned integer of the same width.
    type Bits: Copy + Eq + Debug + LowerHex;

    /// Same-size bit reinterpretation. Never a numeric conversion.
    fn to_bits(self) -> Self::Bits;

    fn abs(self) -> Self;

    /// Reference exponential from the standard library.
    fn exp(self) -> Self;

    fn from_f64(value: f64) -> Self;
}

impl Element for f32 {
    const WIDTH: u32 = 32;
    type Bits = u32;

    #[inline]
    fn to_bits(self) -> u32 {
        f32::to_bits(self)
    }

    #[inline]
    fn abs(self) -> Self {
        f32::abs(self)
    }

    #[inline]
    fn exp(self) -> Self {
        f32::exp(self)
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Element for f64 {
    const WIDTH: u32 = 64;
    type Bits = u64;

    #[inline]
    fn to_bits(self) -> u64 {
        f64::to_bits(self)
    }

    #[inline]
    fn abs(self) -> Self {
        f64::abs(self)
    }

    #[inline]
    fn exp(self) -> Self {
        f64::exp(self)
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_are_reinterpreted_not_converted() {
        assert_eq!(Element::to_bits(1.0f64), 0x3ff0_0000_0000_0000);
        assert_eq!(Element::to_bits(1.0f32), 0x3f80_0000);
        assert_eq!(Element::to_bits(-0.0f32), 0x8000_0000);
    }

    #[test]
    fn test_hex_rendering_matches_printf_style() {
        assert_eq!(format!("{:x}", Element::to_bits(2.0f64)), "4000000000000000");
        assert_eq!(format!("{:x}", Element::to_bits(0.0f32)), "0");
    }

    #[test]
    fn test_widths() {
        assert_eq!(<f32 as Element>::WIDTH, 32);
        assert_eq!(<f64 as Element>::WIDTH, 64);
    }
}
