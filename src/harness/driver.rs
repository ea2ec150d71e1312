// src/harness/driver.rs
//! Harness driver
//!
//! One linear pass: size check, run every variant under the counters, then
//! check every variant's output against the golden sequence. The first
//! variant that fails its check ends the check phase.

use super::arena::OutputArena;
use super::report::{RunReport, VariantFailure, VariantTiming};
use super::HarnessError;
use crate::config::HarnessConfig;
use crate::counters::{counter_source, timed_run, CounterSource};
use crate::dataset::ExpDatasets;
use crate::kernels::{KernelSet, Precision, VariantKernel, VariantKey, VARIANT_ORDER};
use crate::validation::{ResultValidator, ValidationOutcome};
use std::io::Write;

pub struct HarnessDriver {
    config: HarnessConfig,
    datasets: ExpDatasets,
    kernels: KernelSet,
    counters: Box<dyn CounterSource>,
    outputs: OutputArena,
}

impl HarnessDriver {
    pub fn new(
        config: HarnessConfig,
        datasets: ExpDatasets,
        kernels: KernelSet,
        counters: Box<dyn CounterSource>,
    ) -> Self {
        let outputs = OutputArena::allocate(datasets.len_f64(), datasets.len_f32());
        Self {
            config,
            datasets,
            kernels,
            counters,
            outputs,
        }
    }

    /// Dataset, counters and built-in kernels as selected by `config`.
    pub fn from_config(config: HarnessConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        let datasets = ExpDatasets::from_config(&config.dataset)?;
        let counters = counter_source(config.counters.source)?;
        Ok(Self::new(config, datasets, KernelSet::builtin(), counters))
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn datasets(&self) -> &ExpDatasets {
        &self.datasets
    }

    pub fn outputs(&self) -> &OutputArena {
        &self.outputs
    }

    /// Execute the full harness, writing the progress report to `out`.
    pub fn run<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<RunReport, HarnessError> {
        self.check_sizes()?;
        self.check_kernels()?;

        writeln!(out, "FEXP")?;

        let mut report = RunReport::default();
        for key in VARIANT_ORDER {
            let timing = self.run_variant(key, out)?;
            report.timings.push(timing);
        }

        writeln!(out, "Checking results:")?;

        let validator = ResultValidator::new(self.config.validation.tolerance);
        for key in VARIANT_ORDER {
            report.checked.push(key);
            let outcome = self.check_variant(&validator, key, out)?;

            if outcome.error {
                log::debug!(
                    "{}: {} mismatches, skipping remaining checks",
                    key,
                    outcome.mismatched_indices.len()
                );
                report.failure = Some(VariantFailure {
                    variant: key,
                    error_flag: outcome.error_flag(),
                    mismatched_indices: outcome.mismatched_indices,
                });
                break;
            }
        }

        Ok(report)
    }

    fn check_sizes(&self) -> Result<(), HarnessError> {
        let expected = &self.config.dataset;
        let checks = [
            (64, expected.expected_f64, self.datasets.len_f64()),
            (32, expected.expected_f32, self.datasets.len_f32()),
        ];

        for (width, expected, actual) in checks {
            if expected != actual {
                return Err(HarnessError::SizeMismatch {
                    width,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    fn check_kernels(&self) -> Result<(), HarnessError> {
        match VARIANT_ORDER.iter().find(|key| !self.kernels.contains(key)) {
            Some(&missing) => Err(HarnessError::MissingKernel(missing)),
            None => Ok(()),
        }
    }

    fn run_variant<W: Write + ?Sized>(
        &mut self,
        key: VariantKey,
        out: &mut W,
    ) -> Result<VariantTiming, HarnessError> {
        let elements = match key.precision {
            Precision::F64 => self.datasets.len_f64(),
            Precision::F32 => self.datasets.len_f32(),
        };

        writeln!(
            out,
            "Executing exponential on {} {}-bit data LMUL={}...",
            elements,
            key.precision.bits(),
            key.grouping.registers()
        )?;

        let kernel = self.kernels.get(&key).ok_or(HarnessError::MissingKernel(key))?;
        let counters = self.counters.as_ref();

        let run = match kernel {
            VariantKernel::F64(kernel) => timed_run(
                counters,
                kernel.as_ref(),
                self.datasets.fp64.inputs(),
                self.outputs.f64_mut(key.grouping),
                elements,
            ),
            VariantKernel::F32(kernel) => timed_run(
                counters,
                kernel.as_ref(),
                self.datasets.fp32.inputs(),
                self.outputs.f32_mut(key.grouping),
                elements,
            ),
        };

        log::debug!(
            "{}: {} cycles, {} retired instructions",
            key,
            run.elapsed_cycles(),
            run.retired_instructions()
        );
        writeln!(out, "The execution took {} cycles.", run.elapsed_cycles())?;

        Ok(VariantTiming {
            variant: key,
            elements,
            run,
        })
    }

    fn check_variant<W: Write + ?Sized>(
        &self,
        validator: &ResultValidator,
        key: VariantKey,
        out: &mut W,
    ) -> Result<ValidationOutcome, HarnessError> {
        let outcome = match key.precision {
            Precision::F64 => {
                let golden = self.datasets.fp64.golden();
                let results = self.outputs.f64(key.grouping);
                validator.validate(results, golden, golden.len(), out)?
            }
            Precision::F32 => {
                let golden = self.datasets.fp32.golden();
                let results = self.outputs.f32(key.grouping);
                validator.validate(results, golden, golden.len(), out)?
            }
        };
        Ok(outcome)
    }
}
