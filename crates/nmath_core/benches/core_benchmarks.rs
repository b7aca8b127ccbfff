//! Criterion benchmarks for nmath_core special functions and solvers.
//!
//! Measures log-gamma, the incomplete beta ratio across its algorithm regions,
//! and the two Brent solvers.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nmath_core::math::solvers::{BrentMinimizer, BrentSolver, SolverConfig};
use nmath_core::special::toms708::bratio;
use nmath_core::special::{lgamma1p, lgammafn};

/// Benchmark log-gamma on the small, medium and Stirling ranges.
fn bench_lgamma(c: &mut Criterion) {
    let mut group = c.benchmark_group("lgamma");

    for x in [0.3, 4.5, 250.0, 1e8] {
        group.bench_with_input(BenchmarkId::new("lgammafn", x), &x, |b, &x| {
            b.iter(|| lgammafn(black_box(x)));
        });
    }
    group.bench_function("lgamma1p_small", |b| b.iter(|| lgamma1p(black_box(0.01))));

    group.finish();
}

/// Benchmark `bratio` on parameter sets that reach different expansions.
fn bench_bratio(c: &mut Criterion) {
    let mut group = c.benchmark_group("bratio");

    let cases = [
        ("bpser", 0.5, 3.0, 0.1),
        ("bfrac", 20.0, 30.0, 0.4),
        ("bgrat", 1.0, 200.0, 0.01),
        ("basym", 200.0, 220.0, 0.48),
    ];
    for (name, a, bb, x) in cases {
        group.bench_function(name, |b| {
            b.iter(|| bratio(black_box(a), black_box(bb), black_box(x), 1.0 - x, false));
        });
    }

    group.finish();
}

/// Benchmark the root finder and minimiser on smooth objectives.
fn bench_solvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("brent");

    let solver = BrentSolver::new(SolverConfig::default());
    group.bench_function("find_root_cubic", |b| {
        b.iter(|| solver.find_root(|x: f64| x * x * x - 2.0 * x - 5.0, black_box(2.0), 3.0));
    });

    let minimizer = BrentMinimizer::new(SolverConfig::default());
    group.bench_function("minimize_cos", |b| {
        b.iter(|| minimizer.minimize(|x: f64| x.cos(), black_box(3.0), 4.0));
    });

    group.finish();
}

criterion_group!(benches, bench_lgamma, bench_bratio, bench_solvers);
criterion_main!(benches);
