// src/dataset/mod.rs
//! Exp dataset provider
//!
//! Supplies, per precision, an aligned input sequence (the exponents) and the
//! aligned golden sequence of expected results. Datasets are either generated
//! from a seed, loaded from JSON, or emitted as an assembler data section for
//! bare-metal builds of the harness.

pub mod assembly;

pub use assembly::emit_symbol;

use crate::buffer::AlignedBuffer;
use crate::config::DatasetConfig;
use crate::element::Element;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "{width}-bit dataset is malformed: N = {reported}, {inputs} inputs, {golden} golden values"
    )]
    Shape {
        width: u32,
        reported: usize,
        inputs: usize,
        golden: usize,
    },
}

/// Inputs paired 1:1 with golden outputs.
#[derive(Debug, Clone)]
pub struct Dataset<T: Element> {
    inputs: AlignedBuffer<T>,
    golden: AlignedBuffer<T>,
}

impl<T: Element> Dataset<T> {
    pub fn new(inputs: &[T], golden: &[T]) -> Result<Self, DatasetError> {
        if inputs.len() != golden.len() {
            return Err(DatasetError::Shape {
                width: T::WIDTH,
                reported: inputs.len(),
                inputs: inputs.len(),
                golden: golden.len(),
            });
        }

        Ok(Self {
            inputs: AlignedBuffer::from_slice(inputs),
            golden: AlignedBuffer::from_slice(golden),
        })
    }

    /// Golden values computed with the standard library exp.
    pub fn from_inputs(inputs: &[T]) -> Self {
        let mut golden = AlignedBuffer::zeroed(inputs.len());
        for (g, &x) in golden.iter_mut().zip(inputs) {
            *g = x.exp();
        }

        Self {
            inputs: AlignedBuffer::from_slice(inputs),
            golden,
        }
    }

    fn generate<R: Rng>(rng: &mut R, len: usize, range: Range<f64>) -> Self {
        let inputs: Vec<T> = (0..len)
            .map(|_| T::from_f64(rng.gen_range(range.clone())))
            .collect();
        Self::from_inputs(&inputs)
    }

    fn from_parts(
        width: u32,
        reported: usize,
        inputs: &[T],
        golden: &[T],
    ) -> Result<Self, DatasetError> {
        if reported != inputs.len() || reported != golden.len() {
            return Err(DatasetError::Shape {
                width,
                reported,
                inputs: inputs.len(),
                golden: golden.len(),
            });
        }
        Self::new(inputs, golden)
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn inputs(&self) -> &[T] {
        &self.inputs
    }

    pub fn golden(&self) -> &[T] {
        &self.golden
    }
}

/// Both precisions' datasets, constructed once and handed to the driver.
#[derive(Debug, Clone)]
pub struct ExpDatasets {
    pub fp64: Dataset<f64>,
    pub fp32: Dataset<f32>,
}

/// On-disk JSON layout.
#[derive(Debug, Serialize, Deserialize)]
struct DatasetFile {
    #[serde(rename = "N_f64")]
    n_f64: usize,
    exponents_f64: Vec<f64>,
    gold_results_f64: Vec<f64>,
    #[serde(rename = "N_f32")]
    n_f32: usize,
    exponents_f32: Vec<f32>,
    gold_results_f32: Vec<f32>,
}

impl ExpDatasets {
    /// Seeded uniform inputs in `range`, golden from the standard library.
    pub fn generate(seed: u64, len_f64: usize, len_f32: usize, range: Range<f64>) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let fp64 = Dataset::generate(&mut rng, len_f64, range.clone());
        let fp32 = Dataset::generate(&mut rng, len_f32, range);

        log::info!(
            "generated exp dataset: seed {}, {} x f64, {} x f32",
            seed,
            len_f64,
            len_f32
        );
        Self { fp64, fp32 }
    }

    /// Load `config.file` if set, otherwise generate with the expected counts.
    pub fn from_config(config: &DatasetConfig) -> Result<Self, DatasetError> {
        match &config.file {
            Some(path) => Self::load_json(path),
            None => Ok(Self::generate(
                config.seed,
                config.expected_f64,
                config.expected_f32,
                config.input_min..config.input_max,
            )),
        }
    }

    pub fn len_f64(&self) -> usize {
        self.fp64.len()
    }

    pub fn len_f32(&self) -> usize {
        self.fp32.len()
    }

    pub fn from_json_str(content: &str) -> Result<Self, DatasetError> {
        let file: DatasetFile = serde_json::from_str(content)?;

        Ok(Self {
            fp64: Dataset::from_parts(64, file.n_f64, &file.exponents_f64, &file.gold_results_f64)?,
            fp32: Dataset::from_parts(32, file.n_f32, &file.exponents_f32, &file.gold_results_f32)?,
        })
    }

    pub fn to_json_string(&self) -> Result<String, DatasetError> {
        let file = DatasetFile {
            n_f64: self.len_f64(),
            exponents_f64: self.fp64.inputs().to_vec(),
            gold_results_f64: self.fp64.golden().to_vec(),
            n_f32: self.len_f32(),
            exponents_f32: self.fp32.inputs().to_vec(),
            gold_results_f32: self.fp32.golden().to_vec(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let datasets = Self::from_json_str(&content)?;

        log::info!(
            "loaded exp dataset from {}: {} x f64, {} x f32",
            path.as_ref().display(),
            datasets.len_f64(),
            datasets.len_f32()
        );
        Ok(datasets)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), DatasetError> {
        std::fs::write(path.as_ref(), self.to_json_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_seeded() {
        let a = ExpDatasets::generate(7, 16, 32, -5.0..5.0);
        let b = ExpDatasets::generate(7, 16, 32, -5.0..5.0);
        let c = ExpDatasets::generate(8, 16, 32, -5.0..5.0);

        assert_eq!(a.fp64.inputs(), b.fp64.inputs());
        assert_eq!(a.fp32.inputs(), b.fp32.inputs());
        assert_ne!(a.fp64.inputs(), c.fp64.inputs());
    }

    #[test]
    fn test_generated_shape_and_golden() {
        let data = ExpDatasets::generate(1, 128, 256, -2.0..2.0);
        assert_eq!(data.len_f64(), 128);
        assert_eq!(data.len_f32(), 256);

        for (&x, &g) in data.fp64.inputs().iter().zip(data.fp64.golden()) {
            assert!((-2.0..2.0).contains(&x));
            assert_eq!(g, x.exp());
        }
        for (&x, &g) in data.fp32.inputs().iter().zip(data.fp32.golden()) {
            assert_eq!(g, x.exp());
        }
    }

    #[test]
    fn test_dataset_rejects_length_disagreement() {
        let err = Dataset::<f64>::new(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(err, DatasetError::Shape { width: 64, .. }));
    }

    #[test]
    fn test_from_config_generates_expected_counts() {
        let config = DatasetConfig {
            expected_f64: 12,
            expected_f32: 20,
            ..DatasetConfig::default()
        };
        let data = ExpDatasets::from_config(&config).unwrap();
        assert_eq!(data.len_f64(), 12);
        assert_eq!(data.len_f32(), 20);
    }

    #[test]
    fn test_json_reported_count_must_match_arrays() {
        let json = r#"{
            "N_f64": 3,
            "exponents_f64": [0.0, 1.0],
            "gold_results_f64": [1.0, 2.718281828459045],
            "N_f32": 0,
            "exponents_f32": [],
            "gold_results_f32": []
        }"#;

        let err = ExpDatasets::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::Shape { width: 64, reported: 3, inputs: 2, golden: 2 }
        ));
    }

    #[test]
    fn test_json_preserves_bits() {
        let data = ExpDatasets::generate(3, 8, 8, -5.0..5.0);
        let parsed = ExpDatasets::from_json_str(&data.to_json_string().unwrap()).unwrap();

        let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(parsed.fp64.golden()), bits(data.fp64.golden()));
        assert_eq!(parsed.fp32.inputs(), data.fp32.inputs());
    }
}
