//! uqstat benchmarks using Criterion.
//!
//! Benchmarks cover:
//! - Moment accumulation (point-wise vs batch, 1 to 16 components)
//! - Compact history storage
//! - Leave-one-out (leverage shortcut vs refitting)
//! - K-Fold across decompositions (QR, SVD, incremental Cholesky)
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::prelude::*;
use rand_distr::Normal;
use std::hint::black_box;
use uqstat::prelude::*;

// ============================================================================
// Data Generation with Reproducible RNG
// ============================================================================

/// Gaussian sample of `size` points with `dimension` components.
fn generate_stream(size: usize, dimension: usize, seed: u64) -> Sample<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = Normal::new(1.0, 2.0).unwrap();
    let data: Vec<f64> = (0..size * dimension).map(|_| dist.sample(&mut rng)).collect();
    Sample::from_flat(data, dimension).unwrap()
}

/// Polynomial design of `degree` on uniform inputs, with a noisy response.
fn generate_regression(size: usize, degree: usize, seed: u64) -> (Sample<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.1).unwrap();

    let mut design = Sample::with_capacity(degree + 1, size);
    let mut y = Vec::with_capacity(size);
    for i in 0..size {
        let x = -1.0 + 2.0 * i as f64 / size as f64;
        let row: Vec<f64> = (0..=degree).map(|p| x.powi(p as i32)).collect();
        y.push(x.sin() + 0.5 * x * x + noise.sample(&mut rng));
        design.push(&row).unwrap();
    }
    (design, y)
}

// ============================================================================
// Benchmark Functions
// ============================================================================

fn bench_moments(c: &mut Criterion) {
    let mut group = c.benchmark_group("moments");
    group.sample_size(50);

    for dimension in [1, 4, 16] {
        let sample = generate_stream(10_000, dimension, 42);
        group.throughput(Throughput::Elements(sample.size() as u64));

        group.bench_with_input(BenchmarkId::new("pointwise", dimension), &dimension, |b, _| {
            b.iter(|| {
                let mut acc = MomentAccumulator::new(dimension);
                for row in black_box(&sample).rows() {
                    acc.increment(row).unwrap();
                }
                acc.kurtosis().unwrap()
            })
        });

        group.bench_with_input(BenchmarkId::new("batch", dimension), &dimension, |b, _| {
            b.iter(|| {
                let mut acc = MomentAccumulator::new(dimension);
                acc.increment_batch(black_box(&sample)).unwrap();
                acc.kurtosis().unwrap()
            })
        });
    }
    group.finish();
}

fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("history");
    group.sample_size(50);

    let sample = generate_stream(100_000, 3, 7);
    group.throughput(Throughput::Elements(sample.size() as u64));

    for half in [16, 256] {
        group.bench_with_input(BenchmarkId::new("compact", half), &half, |b, &half| {
            b.iter(|| {
                let mut history = CompactHistory::new(half).unwrap();
                for row in black_box(&sample).rows() {
                    history.store(row).unwrap();
                }
                history.index()
            })
        });
    }
    group.finish();
}

fn bench_leave_one_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("leave_one_out");
    group.sample_size(20);

    for size in [100, 500] {
        let (design, y) = generate_regression(size, 5, 42);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("analytical", size), &size, |b, _| {
            b.iter(|| {
                CrossValidation::new()
                    .leave_one_out()
                    .build()
                    .unwrap()
                    .fit(black_box(&design), black_box(&y))
                    .unwrap()
            })
        });

        group.bench_with_input(BenchmarkId::new("brute_force", size), &size, |b, _| {
            b.iter(|| {
                CrossValidation::new()
                    .leave_one_out()
                    .brute_force()
                    .build()
                    .unwrap()
                    .fit(black_box(&design), black_box(&y))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_kfold_decompositions(c: &mut Criterion) {
    let mut group = c.benchmark_group("kfold");
    group.sample_size(30);

    let (design, y) = generate_regression(2_000, 8, 42);
    let decompositions = [
        ("qr", Decomposition::Qr),
        ("svd", Decomposition::Svd),
        ("cholesky", Decomposition::Cholesky),
    ];

    for (name, decomposition) in decompositions {
        group.bench_with_input(
            BenchmarkId::new("decomposition", name),
            &decomposition,
            |b, &decomposition| {
                b.iter(|| {
                    CrossValidation::new()
                        .kfold(10)
                        .decomposition(decomposition)
                        .build()
                        .unwrap()
                        .fit(black_box(&design), black_box(&y))
                        .unwrap()
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_moments,
    bench_history,
    bench_leave_one_out,
    bench_kfold_decompositions,
);

criterion_main!(benches);
