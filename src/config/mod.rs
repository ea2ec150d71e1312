// src/config/mod.rs
//! Harness configuration system
//! Handles TOML parsing and validation

use crate::counters::CounterKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Expected 64-bit element count the kernels were built for.
pub const DEFAULT_EXPECTED_F64: usize = 128;
/// Expected 32-bit element count the kernels were built for.
pub const DEFAULT_EXPECTED_F32: usize = 256;
/// Largest element count accepted for either precision.
pub const MAX_ELEMENTS: usize = 1 << 24;
/// Absolute similarity threshold shared by both precisions.
pub const DEFAULT_TOLERANCE: f64 = 1.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub dataset: DatasetConfig,
    pub validation: ValidationConfig,
    pub counters: CounterConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub expected_f64: usize,
    pub expected_f32: usize,
    pub seed: u64,
    pub input_min: f64,
    pub input_max: f64,
    /// Load the dataset from a JSON file instead of generating it.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub tolerance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub source: CounterKind,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            expected_f64: DEFAULT_EXPECTED_F64,
            expected_f32: DEFAULT_EXPECTED_F32,
            seed: 42,
            input_min: -5.0,
            input_max: 5.0,
            file: None,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: HarnessConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        let counts = [
            ("expected_f64", self.dataset.expected_f64),
            ("expected_f32", self.dataset.expected_f32),
        ];
        for (name, count) in counts {
            if count == 0 || count > MAX_ELEMENTS {
                return Err(ConfigError::Validation(format!(
                    "{} must be in 1..={}, got {}",
                    name, MAX_ELEMENTS, count
                )));
            }
        }

        let tolerance = self.validation.tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::Validation(format!(
                "Tolerance must be finite and non-negative, got {}",
                tolerance
            )));
        }

        let (min, max) = (self.dataset.input_min, self.dataset.input_max);
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(ConfigError::Validation(format!(
                "Input range [{}, {}) is empty or not finite",
                min, max
            )));
        }

        Ok(())
    }

    /// Export configuration to TOML string
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let toml_str = self.to_toml_string()?;
        std::fs::write(path.as_ref(), toml_str)?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}
