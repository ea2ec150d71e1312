// src/buffer.rs
//! Fixed-capacity, 32-byte aligned element buffers
//!
//! Grouped vector register accesses need their operands on a 32-byte
//! boundary. Each buffer is one heap allocation made with that alignment,
//! zero-initialised, and never resized until it is dropped.

use crate::element::Element;
use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

/// Alignment of every input, golden and output buffer.
pub const BUFFER_ALIGNMENT: usize = 32;

pub struct AlignedBuffer<T: Element> {
    ptr: NonNull<T>,
    len: usize,
    layout: Layout,
    _owns: PhantomData<T>,
}

impl<T: Element> AlignedBuffer<T> {
    /// Allocate `len` zeroed elements.
    pub fn zeroed(len: usize) -> Self {
        let layout = match Layout::array::<T>(len).and_then(|l| l.align_to(BUFFER_ALIGNMENT)) {
            Ok(layout) => layout,
            Err(_) => panic!("aligned buffer of {} elements overflows the address space", len),
        };

        if layout.size() == 0 {
            return Self {
                ptr: NonNull::dangling(),
                len,
                layout,
                _owns: PhantomData,
            };
        }

        // SAFETY: layout has non-zero size. Element is sealed to f32/f64, for
        // which the all-zero bit pattern is 0.0.
        let raw = unsafe { alloc::alloc_zeroed(layout) } as *mut T;
        let ptr = match NonNull::new(raw) {
            Some(ptr) => ptr,
            None => alloc::handle_alloc_error(layout),
        };

        Self {
            ptr,
            len,
            layout,
            _owns: PhantomData,
        }
    }

    pub fn from_slice(values: &[T]) -> Self {
        let mut buffer = Self::zeroed(values.len());
        buffer.copy_from_slice(values);
        buffer
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[T] {
        self
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Element> Deref for AlignedBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        // SAFETY: ptr is valid for len initialised elements (or dangling with len 0).
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Element> DerefMut for AlignedBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        // SAFETY: &mut self gives exclusive access to the allocation.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Element> Drop for AlignedBuffer<T> {
    fn drop(&mut self) {
        if self.layout.size() > 0 {
            // SAFETY: allocated in `zeroed` with this exact layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr() as *mut u8, self.layout) };
        }
    }
}

impl<T: Element> Clone for AlignedBuffer<T> {
    fn clone(&self) -> Self {
        Self::from_slice(self)
    }
}

impl<T: Element> fmt::Debug for AlignedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .field("data", &self.as_slice())
            .finish()
    }
}

// SAFETY: the buffer uniquely owns its allocation, like Vec<T>.
unsafe impl<T: Element> Send for AlignedBuffer<T> {}
unsafe impl<T: Element> Sync for AlignedBuffer<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffers_are_32_byte_aligned() {
        for len in [1, 3, 128, 256] {
            let a = AlignedBuffer::<f64>::zeroed(len);
            let b = AlignedBuffer::<f32>::zeroed(len);
            assert_eq!(a.as_ptr() as usize % BUFFER_ALIGNMENT, 0);
            assert_eq!(b.as_ptr() as usize % BUFFER_ALIGNMENT, 0);
        }
    }

    #[test]
    fn test_zeroed_contents() {
        let buffer = AlignedBuffer::<f32>::zeroed(64);
        assert_eq!(buffer.len(), 64);
        assert!(buffer.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = AlignedBuffer::<f64>::zeroed(0);
        assert!(buffer.is_empty());
        assert_eq!(buffer.as_slice(), &[] as &[f64]);
    }

    #[test]
    fn test_from_slice_and_clone() {
        let mut buffer = AlignedBuffer::from_slice(&[1.0f64, 2.0, 3.0]);
        buffer[1] = 5.0;
        let copy = buffer.clone();
        assert_eq!(copy.as_slice(), &[1.0, 5.0, 3.0]);
        assert_ne!(copy.as_ptr(), buffer.as_ptr());
    }
}
