//! Correctness and cycle-count harness for vector exp kernels.
//!
//! Six kernel variants (f64/f32 at register grouping 1, 2 and 4) run over a
//! fixed input dataset under hardware counters, then every output is checked
//! element-wise against a golden exp sequence.

pub mod buffer;
pub mod config;
pub mod counters;
pub mod dataset;
pub mod element;
pub mod harness;
pub mod kernels;
pub mod pipeview;
pub mod validation;

pub use buffer::AlignedBuffer;
pub use config::{ConfigError, HarnessConfig};
pub use dataset::{Dataset, ExpDatasets};
pub use element::Element;
pub use harness::{HarnessDriver, HarnessError, RunReport};
pub use kernels::{ExpKernel, GroupingFactor, KernelSet, Precision, VariantKey, VARIANT_ORDER};
pub use validation::{similar, ResultValidator};
