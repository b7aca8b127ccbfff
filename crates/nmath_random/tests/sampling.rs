//! Integration tests for the random variate generators.
//!
//! Covers support of every discrete generator across parameter ranges,
//! agreement of sample frequencies with the probability mass functions and
//! independence of separately owned sampler caches.

use nmath_distributions::discrete::{dbinom, dhyper, dpois};
use nmath_distributions::distribution::Distribution;
use nmath_random::{rnorm, NmathRng, RandomSource, Sampler};
use proptest::prelude::*;

/// Observed frequency of each value in `0..=max`.
fn frequencies(draws: &[f64], max: usize) -> Vec<f64> {
    let mut counts = vec![0.0; max + 1];
    for &k in draws {
        counts[k as usize] += 1.0;
    }
    counts.iter().map(|c| c / draws.len() as f64).collect()
}

/// Five binomial standard errors of a frequency estimate.
fn freq_tolerance(p: f64, n: usize) -> f64 {
    5.0 * (p * (1.0 - p) / n as f64).sqrt() + 1e-3
}

// ========================================
// Support
// ========================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_binomial_support(n in 0u32..5000, p in 0.0f64..=1.0, seed in any::<u64>()) {
        let mut rng = NmathRng::from_seed(seed);
        let mut s = Sampler::new();
        for _ in 0..20 {
            let k = s.binomial(&mut rng, n as f64, p);
            prop_assert!(k >= 0.0 && k <= n as f64 && k == k.floor());
        }
    }

    #[test]
    fn prop_hypergeometric_support(
        red in 0u32..3000,
        black in 0u32..3000,
        frac in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let total = (red + black) as f64;
        let drawn = (frac * total).floor();
        let mut rng = NmathRng::from_seed(seed);
        let mut s = Sampler::new();
        for _ in 0..20 {
            let k = s.hypergeometric(&mut rng, red as f64, black as f64, drawn);
            prop_assert!(k >= (drawn - black as f64).max(0.0));
            prop_assert!(k <= drawn.min(red as f64));
            prop_assert!(k == k.floor());
        }
    }

    #[test]
    fn prop_gamma_and_beta_ranges(
        shape in 0.01f64..100.0,
        b in 0.01f64..100.0,
        seed in any::<u64>(),
    ) {
        let mut rng = NmathRng::from_seed(seed);
        let mut s = Sampler::new();
        for _ in 0..20 {
            prop_assert!(s.gamma(&mut rng, shape, 1.0) >= 0.0);
            let x = s.beta(&mut rng, shape, b);
            prop_assert!((0.0..=1.0).contains(&x));
        }
    }
}

// ========================================
// Frequencies against the mass functions
// ========================================

#[test]
fn test_binomial_frequencies_match_dbinom() {
    let n = 50_000;
    let mut rng = NmathRng::from_seed(31);
    let mut s = Sampler::new();
    // n p = 36, so BTPE
    let draws: Vec<f64> = (0..n).map(|_| s.binomial(&mut rng, 60.0, 0.6)).collect();
    let freq = frequencies(&draws, 60);
    for k in 28..45 {
        let p = dbinom(k as f64, 60.0, 0.6, false);
        assert!((freq[k] - p).abs() < freq_tolerance(p, n), "k = {}: {} vs {}", k, freq[k], p);
    }
}

#[test]
fn test_poisson_frequencies_match_dpois() {
    let n = 50_000;
    let mut rng = NmathRng::from_seed(32);
    let mut s = Sampler::new();
    for mu in [3.5, 25.0] {
        let draws: Vec<f64> = (0..n).map(|_| s.poisson(&mut rng, mu)).collect();
        let max = draws.iter().cloned().fold(0.0, f64::max) as usize;
        let freq = frequencies(&draws, max);
        for (k, &f) in freq.iter().enumerate() {
            let p = dpois(k as f64, mu, false);
            assert!((f - p).abs() < freq_tolerance(p, n), "mu = {}, k = {}", mu, k);
        }
    }
}

#[test]
fn test_hypergeometric_frequencies_match_dhyper() {
    let n = 50_000;
    let mut rng = NmathRng::from_seed(33);
    let mut s = Sampler::new();
    // Mode 30, so H2PE
    let draws: Vec<f64> = (0..n).map(|_| s.hypergeometric(&mut rng, 300.0, 700.0, 100.0)).collect();
    let freq = frequencies(&draws, 100);
    for k in 20..41 {
        let p = dhyper(k as f64, 300.0, 700.0, 100.0, false);
        assert!((freq[k] - p).abs() < freq_tolerance(p, n), "k = {}", k);
    }
}

// ========================================
// State ownership
// ========================================

#[test]
fn test_interleaved_parameters_do_not_leak_between_samplers() {
    let dist_a = Distribution::gamma(4.0, 1.0).unwrap();
    let dist_b = Distribution::gamma(0.5, 1.0).unwrap();

    // One sampler alternating between parameter sets...
    let mut rng = NmathRng::from_seed(77);
    let mut shared = Sampler::new();
    let mut alternating = Vec::new();
    for _ in 0..50 {
        alternating.push(shared.sample(&mut rng, &dist_a));
        alternating.push(shared.sample(&mut rng, &dist_b));
    }

    // ...draws the same stream as two fresh samplers used in the same order.
    let mut rng = NmathRng::from_seed(77);
    let (mut sa, mut sb) = (Sampler::new(), Sampler::new());
    let mut separate = Vec::new();
    for _ in 0..50 {
        separate.push(sa.sample(&mut rng, &dist_a));
        separate.push(sb.sample(&mut rng, &dist_b));
    }
    assert_eq!(alternating, separate);
}

/// A source that only provides uniforms still drives every generator.
#[test]
fn test_custom_uniform_source() {
    struct Lcg(u64);
    impl RandomSource for Lcg {
        fn unif_rand(&mut self) -> f64 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((self.0 >> 11) as f64 + 0.5) / (1u64 << 53) as f64
        }
    }

    let mut src = Lcg(12345);
    let mut s = Sampler::new();
    let n = 10_000;
    let mean = (0..n).map(|_| s.gamma(&mut src, 2.0, 1.0)).sum::<f64>() / n as f64;
    assert!((mean - 2.0).abs() < 5.0 * (2.0 / n as f64).sqrt());
    assert!(rnorm(&mut src, 0.0, 1.0).is_finite());
}
