// src/kernels/exp.rs
//! Strip-mined vector exp kernels
//!
//! Each kernel walks its input in strips of `LANES × grouping factor`
//! elements, the amount one grouped register operation covers on a 256-bit
//! vector unit. The last strip is shortened to the remaining element count.
//! Grouping only changes the strip length; every lane runs the same
//! arithmetic, so all variants of one precision agree bit for bit.
//!
//! Lane math: Cody-Waite range reduction `x = n·ln2 + r`, a Horner
//! polynomial for `e^r`, then scaling by `2^n` through the exponent field.

/// 64-bit lanes in one 256-bit register.
pub const F64_LANES: usize = 4;
/// 32-bit lanes in one 256-bit register.
pub const F32_LANES: usize = 8;

const F64_LN2_HI: f64 = 6.931_471_803_691_238_164_9e-1;
const F64_LN2_LO: f64 = 1.908_214_929_270_587_700_02e-10;

const F32_LN2_HI: f32 = 0.693_145_75;
const F32_LN2_LO: f32 = 1.428_606_8e-6;

#[inline(always)]
fn exp_lane_f64(x: f64) -> f64 {
    // Keeps 2^n a normal number.
    let x = x.clamp(-708.0, 709.0);
    let n = (x * std::f64::consts::LOG2_E).round();
    let r = x - n * F64_LN2_HI - n * F64_LN2_LO;

    let p = 1.0 / 39_916_800.0;
    let p = p * r + 1.0 / 3_628_800.0;
    let p = p * r + 1.0 / 362_880.0;
    let p = p * r + 1.0 / 40_320.0;
    let p = p * r + 1.0 / 5_040.0;
    let p = p * r + 1.0 / 720.0;
    let p = p * r + 1.0 / 120.0;
    let p = p * r + 1.0 / 24.0;
    let p = p * r + 1.0 / 6.0;
    let p = p * r + 0.5;
    let p = p * r + 1.0;
    let p = p * r + 1.0;

    let scale = f64::from_bits(((n as i64 + 1023) as u64) << 52);
    p * scale
}

#[inline(always)]
fn exp_lane_f32(x: f32) -> f32 {
    let x = x.clamp(-87.0, 88.0);
    let n = (x * std::f32::consts::LOG2_E).round();
    let r = x - n * F32_LN2_HI - n * F32_LN2_LO;

    let p = 1.0 / 5_040.0;
    let p = p * r + 1.0 / 720.0;
    let p = p * r + 1.0 / 120.0;
    let p = p * r + 1.0 / 24.0;
    let p = p * r + 1.0 / 6.0;
    let p = p * r + 0.5;
    let p = p * r + 1.0;
    let p = p * r + 1.0;

    let scale = f32::from_bits(((n as i32 + 127) as u32) << 23);
    p * scale
}

#[inline(always)]
fn exp_f64_strip<const VL: usize>(input: &[f64], output: &mut [f64], count: usize) {
    let strips = input[..count].chunks(VL).zip(output[..count].chunks_mut(VL));
    for (x, y) in strips {
        for (xi, yi) in x.iter().zip(y.iter_mut()) {
            *yi = exp_lane_f64(*xi);
        }
    }
}

#[inline(always)]
fn exp_f32_strip<const VL: usize>(input: &[f32], output: &mut [f32], count: usize) {
    let strips = input[..count].chunks(VL).zip(output[..count].chunks_mut(VL));
    for (x, y) in strips {
        for (xi, yi) in x.iter().zip(y.iter_mut()) {
            *yi = exp_lane_f32(*xi);
        }
    }
}

pub fn exp_f64m1_bmark(input: &[f64], output: &mut [f64], count: usize) {
    exp_f64_strip::<F64_LANES>(input, output, count)
}

pub fn exp_f64m2_bmark(input: &[f64], output: &mut [f64], count: usize) {
    exp_f64_strip::<{ F64_LANES * 2 }>(input, output, count)
}

pub fn exp_f64m4_bmark(input: &[f64], output: &mut [f64], count: usize) {
    exp_f64_strip::<{ F64_LANES * 4 }>(input, output, count)
}

pub fn exp_f32m1_bmark(input: &[f32], output: &mut [f32], count: usize) {
    exp_f32_strip::<F32_LANES>(input, output, count)
}

pub fn exp_f32m2_bmark(input: &[f32], output: &mut [f32], count: usize) {
    exp_f32_strip::<{ F32_LANES * 2 }>(input, output, count)
}

pub fn exp_f32m4_bmark(input: &[f32], output: &mut [f32], count: usize) {
    exp_f32_strip::<{ F32_LANES * 4 }>(input, output, count)
}
