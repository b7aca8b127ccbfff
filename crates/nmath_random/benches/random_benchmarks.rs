//! Criterion benchmarks for nmath_random.
//!
//! Measures each rejection sampler with a warm cache, the cost of a cache
//! rebuild on every draw, and the multinomial.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nmath_random::{NmathRng, RandomSource, Sampler};

/// Benchmark the samplers at fixed parameters.
fn bench_warm_samplers(c: &mut Criterion) {
    let mut group = c.benchmark_group("warm");
    let mut rng = NmathRng::from_seed(42);
    let mut s = Sampler::new();

    for shape in [0.5, 3.0, 50.0] {
        group.bench_with_input(BenchmarkId::new("gamma", shape), &shape, |b, &a| {
            b.iter(|| s.gamma(&mut rng, black_box(a), 1.0));
        });
    }
    for mu in [4.0, 100.0] {
        group.bench_with_input(BenchmarkId::new("poisson", mu), &mu, |b, &mu| {
            b.iter(|| s.poisson(&mut rng, black_box(mu)));
        });
    }
    group.bench_function("binomial_btpe", |b| {
        b.iter(|| s.binomial(&mut rng, black_box(1000.0), 0.4))
    });
    group.bench_function("hypergeometric_h2pe", |b| {
        b.iter(|| s.hypergeometric(&mut rng, black_box(3000.0), 7000.0, 1000.0))
    });
    group.bench_function("beta", |b| b.iter(|| s.beta(&mut rng, black_box(2.0), 3.0)));
    group.bench_function("exp_rand", |b| b.iter(|| rng.exp_rand()));

    group.finish();
}

/// Benchmark draws whose parameters change every call.
fn bench_cold_samplers(c: &mut Criterion) {
    let mut group = c.benchmark_group("cold");
    let mut rng = NmathRng::from_seed(7);
    let mut s = Sampler::new();
    let mut flip = false;

    group.bench_function("poisson_alternating", |b| {
        b.iter(|| {
            flip = !flip;
            s.poisson(&mut rng, if flip { 30.0 } else { 31.0 })
        })
    });

    group.finish();
}

fn bench_multinomial(c: &mut Criterion) {
    let mut rng = NmathRng::from_seed(9);
    let mut s = Sampler::new();
    let prob = [0.05; 20];
    c.bench_function("multinomial_20", |b| {
        b.iter(|| s.multinomial(&mut rng, black_box(1000), &prob))
    });
}

criterion_group!(benches, bench_warm_samplers, bench_cold_samplers, bench_multinomial);
criterion_main!(benches);
