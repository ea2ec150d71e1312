// src/harness/arena.rs
//! Per-variant output buffers
//!
//! Every variant writes into its own aligned buffer, sized from the dataset
//! of its precision when the arena is allocated. Callers only ever see the
//! buffers as slices, so their length and precision are fixed for the life
//! of the arena.

use crate::buffer::AlignedBuffer;
use crate::kernels::GroupingFactor;

#[derive(Debug, Clone)]
pub struct OutputArena {
    fp64: [AlignedBuffer<f64>; 3],
    fp32: [AlignedBuffer<f32>; 3],
}

impl OutputArena {
    /// One zeroed buffer per variant.
    pub fn allocate(len_f64: usize, len_f32: usize) -> Self {
        Self {
            fp64: std::array::from_fn(|_| AlignedBuffer::zeroed(len_f64)),
            fp32: std::array::from_fn(|_| AlignedBuffer::zeroed(len_f32)),
        }
    }

    pub fn f64(&self, grouping: GroupingFactor) -> &[f64] {
        &self.fp64[grouping.index()]
    }

    pub fn f64_mut(&mut self, grouping: GroupingFactor) -> &mut [f64] {
        &mut self.fp64[grouping.index()]
    }

    pub fn f32(&self, grouping: GroupingFactor) -> &[f32] {
        &self.fp32[grouping.index()]
    }

    pub fn f32_mut(&mut self, grouping: GroupingFactor) -> &mut [f32] {
        &mut self.fp32[grouping.index()]
    }

    /// Number of variant buffers.
    pub fn len(&self) -> usize {
        self.fp64.len() + self.fp32.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BUFFER_ALIGNMENT;

    #[test]
    fn test_arena_has_one_buffer_per_variant() {
        let arena = OutputArena::allocate(128, 256);
        assert_eq!(arena.len(), 6);

        for grouping in GroupingFactor::ALL {
            let data = arena.f64(grouping);
            assert_eq!(data.len(), 128);
            assert_eq!(data.as_ptr() as usize % BUFFER_ALIGNMENT, 0);

            let data = arena.f32(grouping);
            assert_eq!(data.len(), 256);
            assert_eq!(data.as_ptr() as usize % BUFFER_ALIGNMENT, 0);
        }
    }

    #[test]
    fn test_buffers_are_distinct() {
        let arena = OutputArena::allocate(4, 4);
        let a = arena.f64(GroupingFactor::M1).as_ptr();
        let b = arena.f64(GroupingFactor::M2).as_ptr();
        assert_ne!(a, b);
    }

    #[test]
    fn test_writes_stay_in_their_variant() {
        let mut arena = OutputArena::allocate(4, 8);
        arena.f32_mut(GroupingFactor::M4).fill(3.0);

        assert!(arena.f32(GroupingFactor::M4).iter().all(|&v| v == 3.0));
        assert!(arena.f32(GroupingFactor::M2).iter().all(|&v| v == 0.0));
        assert_eq!(arena.f32(GroupingFactor::M4).len(), 8);
        assert!(arena.f64(GroupingFactor::M4).iter().all(|&v| v == 0.0));
    }
}
