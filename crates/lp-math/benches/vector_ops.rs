//! Criterion benchmarks for `lp-math`.
//!
//! Focus on the kernels that dominate the backup loop.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lp_math::{axpy, dot, dot_sparse};

fn bench_vector_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector");

    for n in [16usize, 256, 4096] {
        let alpha: Vec<f64> = (0..n).map(|i| (i as f64).sin()).collect();
        let other: Vec<f64> = (0..n).map(|i| (i as f64).cos()).collect();
        let sparse: Vec<(usize, f64)> = (0..n).step_by(8).map(|i| (i, 8.0 / n as f64)).collect();

        group.bench_with_input(BenchmarkId::new("dot", n), &n, |b, _| {
            b.iter(|| black_box(dot(black_box(&alpha), black_box(&other))));
        });

        group.bench_with_input(BenchmarkId::new("dot_sparse", n), &n, |b, _| {
            b.iter(|| black_box(dot_sparse(black_box(&alpha), black_box(&sparse))));
        });

        group.bench_with_input(BenchmarkId::new("axpy", n), &n, |b, _| {
            let mut y = vec![0.0; n];
            b.iter(|| axpy(black_box(&mut y), 0.9, black_box(&alpha)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_vector_kernels);
criterion_main!(benches);
