// src/kernels/mod.rs
//! Exp kernel variants
//!
//! A variant is one (precision, grouping factor) combination. The harness
//! runs all six in a fixed order; each variant is served by one kernel
//! registered in a [`KernelSet`].

pub mod exp;

pub use exp::{
    exp_f32m1_bmark, exp_f32m2_bmark, exp_f32m4_bmark, exp_f64m1_bmark, exp_f64m2_bmark,
    exp_f64m4_bmark, F32_LANES, F64_LANES,
};

use crate::element::Element;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precision {
    F64,
    F32,
}

impl Precision {
    pub fn bits(self) -> u32 {
        match self {
            Precision::F64 => 64,
            Precision::F32 => 32,
        }
    }
}

/// Number of vector registers combined per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupingFactor {
    M1,
    M2,
    M4,
}

impl GroupingFactor {
    pub const ALL: [GroupingFactor; 3] = [
        GroupingFactor::M1,
        GroupingFactor::M2,
        GroupingFactor::M4,
    ];

    /// Position in `ALL`.
    pub fn index(self) -> usize {
        match self {
            GroupingFactor::M1 => 0,
            GroupingFactor::M2 => 1,
            GroupingFactor::M4 => 2,
        }
    }

    pub fn registers(self) -> usize {
        match self {
            GroupingFactor::M1 => 1,
            GroupingFactor::M2 => 2,
            GroupingFactor::M4 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariantKey {
    pub precision: Precision,
    pub grouping: GroupingFactor,
}

impl VariantKey {
    pub const fn new(precision: Precision, grouping: GroupingFactor) -> Self {
        Self {
            precision,
            grouping,
        }
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit LMUL={}", self.precision.bits(), self.grouping.registers())
    }
}

/// Run and check order: 64-bit ×{1,2,4}, then 32-bit ×{1,2,4}.
pub const VARIANT_ORDER: [VariantKey; 6] = [
    VariantKey::new(Precision::F64, GroupingFactor::M1),
    VariantKey::new(Precision::F64, GroupingFactor::M2),
    VariantKey::new(Precision::F64, GroupingFactor::M4),
    VariantKey::new(Precision::F32, GroupingFactor::M1),
    VariantKey::new(Precision::F32, GroupingFactor::M2),
    VariantKey::new(Precision::F32, GroupingFactor::M4),
];

/// A vector exp kernel: fills `output[..count]` from `input[..count]`.
pub trait ExpKernel<T: Element> {
    fn run(&self, input: &[T], output: &mut [T], count: usize);
}

impl<T: Element, F> ExpKernel<T> for F
where
    F: Fn(&[T], &mut [T], usize),
{
    fn run(&self, input: &[T], output: &mut [T], count: usize) {
        self(input, output, count)
    }
}

/// Kernel bound to a variant, tagged with its element type.
pub enum VariantKernel {
    F64(Box<dyn ExpKernel<f64>>),
    F32(Box<dyn ExpKernel<f32>>),
}

impl VariantKernel {
    pub fn precision(&self) -> Precision {
        match self {
            VariantKernel::F64(_) => Precision::F64,
            VariantKernel::F32(_) => Precision::F32,
        }
    }
}

impl fmt::Debug for VariantKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VariantKernel::{:?}", self.precision())
    }
}

/// One kernel per variant.
#[derive(Debug, Default)]
pub struct KernelSet {
    kernels: BTreeMap<VariantKey, VariantKernel>,
}

impl KernelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The six built-in strip-mined kernels.
    pub fn builtin() -> Self {
        let mut set = Self::new();
        set.insert_f64(GroupingFactor::M1, exp_f64m1_bmark);
        set.insert_f64(GroupingFactor::M2, exp_f64m2_bmark);
        set.insert_f64(GroupingFactor::M4, exp_f64m4_bmark);
        set.insert_f32(GroupingFactor::M1, exp_f32m1_bmark);
        set.insert_f32(GroupingFactor::M2, exp_f32m2_bmark);
        set.insert_f32(GroupingFactor::M4, exp_f32m4_bmark);
        set
    }

    pub fn insert_f64<K>(&mut self, grouping: GroupingFactor, kernel: K) -> &mut Self
    where
        K: ExpKernel<f64> + 'static,
    {
        self.kernels.insert(
            VariantKey::new(Precision::F64, grouping),
            VariantKernel::F64(Box::new(kernel)),
        );
        self
    }

    pub fn insert_f32<K>(&mut self, grouping: GroupingFactor, kernel: K) -> &mut Self
    where
        K: ExpKernel<f32> + 'static,
    {
        self.kernels.insert(
            VariantKey::new(Precision::F32, grouping),
            VariantKernel::F32(Box::new(kernel)),
        );
        self
    }

    pub fn get(&self, key: &VariantKey) -> Option<&VariantKernel> {
        self.kernels.get(key)
    }

    pub fn contains(&self, key: &VariantKey) -> bool {
        self.kernels.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }
}
