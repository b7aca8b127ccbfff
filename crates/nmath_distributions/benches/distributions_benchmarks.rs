//! Criterion benchmarks for nmath_distributions.
//!
//! Measures the incomplete gamma across its expansion regions, the two
//! inversion-heavy quantiles (`qgamma`, `qbeta`), the noncentral chi-square
//! series and the discrete quantile search.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nmath_distributions::continuous::{pgamma, pnchisq, pnorm, qbeta, qgamma, qnorm, qt};
use nmath_distributions::discrete::{qbinom, qpois};

/// Benchmark `pgamma` in the series, continued fraction and asymptotic regions.
fn bench_pgamma(c: &mut Criterion) {
    let mut group = c.benchmark_group("pgamma");

    let cases = [
        ("small_x", 0.5, 3.0),
        ("upper_series", 2.0, 30.0),
        ("lower_cf", 30.0, 2.0),
        ("poisson_asymp", 1e4, 1.01e4),
    ];
    for (name, x, a) in cases {
        group.bench_function(name, |b| {
            b.iter(|| pgamma(black_box(x), black_box(a), 1.0, true, false));
        });
    }

    group.finish();
}

/// Benchmark quantile functions that iterate.
fn bench_quantiles(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantile");

    for shape in [0.1, 2.0, 200.0] {
        group.bench_with_input(BenchmarkId::new("qgamma", shape), &shape, |b, &a| {
            b.iter(|| qgamma(black_box(0.3), a, 1.0, true, false));
        });
    }
    group.bench_function("qbeta", |b| b.iter(|| qbeta(black_box(0.3), 2.0, 5.0, true, false)));
    group.bench_function("qbeta_log_tail", |b| {
        b.iter(|| qbeta(black_box(-500.0), 0.5, 3.0, true, true))
    });
    group.bench_function("qt", |b| b.iter(|| qt(black_box(0.975), 3.3, true, false)));
    group.bench_function("qnorm", |b| b.iter(|| qnorm(black_box(1e-10), 0.0, 1.0, true, false)));

    group.finish();
}

/// Benchmark distribution functions with many series terms.
fn bench_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("series");

    group.bench_function("pnorm_tail", |b| {
        b.iter(|| pnorm(black_box(12.0), 0.0, 1.0, false, true))
    });
    for ncp in [10.0, 100.0] {
        group.bench_with_input(BenchmarkId::new("pnchisq", ncp), &ncp, |b, &ncp| {
            b.iter(|| pnchisq(black_box(ncp + 5.0), 4.0, ncp, true, false));
        });
    }

    group.finish();
}

/// Benchmark the discrete quantile search, with and without coarse steps.
fn bench_discrete(c: &mut Criterion) {
    let mut group = c.benchmark_group("discrete_quantile");

    group.bench_function("qbinom_small", |b| b.iter(|| qbinom(black_box(0.4), 50.0, 0.3, true, false)));
    group.bench_function("qbinom_large", |b| b.iter(|| qbinom(black_box(0.4), 1e7, 0.3, true, false)));
    group.bench_function("qpois", |b| b.iter(|| qpois(black_box(0.9), 120.0, true, false)));

    group.finish();
}

criterion_group!(benches, bench_pgamma, bench_quantiles, bench_series, bench_discrete);
criterion_main!(benches);
