// src/dataset/assembly.rs
//! GNU assembler data section emission
//!
//! Bare-metal builds link the dataset in as symbols. Every symbol is emitted
//! as little-endian 32-bit `.word` directives after a `.balign`.

use super::ExpDatasets;
use std::io::{self, Write};

/// Alignment of the float arrays, matching the aligned buffers.
const ARRAY_ALIGNMENT: usize = 32;
/// Alignment of the element-count words.
const COUNT_ALIGNMENT: usize = 8;

/// Emit one global symbol. `bytes` is padded with zeros to a multiple of 4.
pub fn emit_symbol<W: Write + ?Sized>(
    out: &mut W,
    name: &str,
    bytes: &[u8],
    alignment: usize,
) -> io::Result<()> {
    writeln!(out, ".global {}", name)?;
    writeln!(out, ".balign {}", alignment)?;
    writeln!(out, "{}:", name)?;

    for word in bytes.chunks(4) {
        let mut le = [0u8; 4];
        le[..word.len()].copy_from_slice(word);
        writeln!(out, "    .word 0x{:08x}", u32::from_le_bytes(le))?;
    }
    Ok(())
}

fn f64_bytes(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

impl ExpDatasets {
    /// Write the dataset, plus zeroed result arrays, as a `.data` section.
    pub fn write_assembly<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, ".section .data,\"aw\",@progbits")?;

        let n64 = self.len_f64();
        emit_symbol(out, "N_f64", &(n64 as u64).to_le_bytes(), COUNT_ALIGNMENT)?;
        emit_symbol(out, "exponents_f64", &f64_bytes(self.fp64.inputs()), ARRAY_ALIGNMENT)?;
        emit_symbol(out, "gold_results_f64", &f64_bytes(self.fp64.golden()), ARRAY_ALIGNMENT)?;
        emit_symbol(out, "results_f64", &vec![0u8; n64 * 8], ARRAY_ALIGNMENT)?;

        let n32 = self.len_f32();
        emit_symbol(out, "N_f32", &(n32 as u64).to_le_bytes(), COUNT_ALIGNMENT)?;
        emit_symbol(out, "exponents_f32", &f32_bytes(self.fp32.inputs()), ARRAY_ALIGNMENT)?;
        emit_symbol(out, "gold_results_f32", &f32_bytes(self.fp32.golden()), ARRAY_ALIGNMENT)?;
        emit_symbol(out, "results_f32", &vec![0u8; n32 * 4], ARRAY_ALIGNMENT)?;

        Ok(())
    }
}
