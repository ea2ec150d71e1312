use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use vexp_harness::kernels::{
    exp_f32m1_bmark, exp_f32m2_bmark, exp_f32m4_bmark, exp_f64m1_bmark, exp_f64m2_bmark,
    exp_f64m4_bmark,
};
use vexp_harness::AlignedBuffer;

type F64Kernel = fn(&[f64], &mut [f64], usize);
type F32Kernel = fn(&[f32], &mut [f32], usize);

fn bench_exp_f64(c: &mut Criterion) {
    let kernels: [(&str, F64Kernel); 3] = [
        ("m1", exp_f64m1_bmark),
        ("m2", exp_f64m2_bmark),
        ("m4", exp_f64m4_bmark),
    ];

    let mut group = c.benchmark_group("exp_f64");
    for &n in &[128, 1024, 16384] {
        let x: Vec<f64> = (0..n).map(|i| (i as f64 * 0.01) - 5.0).collect();
        let input = AlignedBuffer::from_slice(&x);
        let mut out = AlignedBuffer::<f64>::zeroed(n);
        for (name, kernel) in kernels {
            group.bench_with_input(BenchmarkId::new(name, n), &n, |b, &n| {
                b.iter(|| kernel(&input, &mut out, n));
            });
        }
    }
    group.finish();
}

fn bench_exp_f32(c: &mut Criterion) {
    let kernels: [(&str, F32Kernel); 3] = [
        ("m1", exp_f32m1_bmark),
        ("m2", exp_f32m2_bmark),
        ("m4", exp_f32m4_bmark),
    ];

    let mut group = c.benchmark_group("exp_f32");
    for &n in &[256, 2048, 16384] {
        let x: Vec<f32> = (0..n).map(|i| (i as f32 * 0.01).min(80.0) - 5.0).collect();
        let input = AlignedBuffer::from_slice(&x);
        let mut out = AlignedBuffer::<f32>::zeroed(n);
        for (name, kernel) in kernels {
            group.bench_with_input(BenchmarkId::new(name, n), &n, |b, &n| {
                b.iter(|| kernel(&input, &mut out, n));
            });
        }
    }
    group.finish();
}

fn bench_std_exp(c: &mut Criterion) {
    let n = 256;
    let x: Vec<f32> = (0..n).map(|i| (i as f32 * 0.01) - 5.0).collect();
    let mut out = vec![0.0f32; n];
    c.bench_function("std_exp_f32_256", |b| {
        b.iter(|| {
            for (o, &v) in out.iter_mut().zip(&x) {
                *o = v.exp();
            }
        });
    });
}

criterion_group!(benches, bench_exp_f64, bench_exp_f32, bench_std_exp);
criterion_main!(benches);
