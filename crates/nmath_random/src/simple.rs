//! Generators that need no state beyond the random source.

use crate::source::RandomSource;
use nmath_core::math::constants::M_PI;
use nmath_core::types::warning::domain_nan;

/// Normal variate with mean `mu` and standard deviation `sigma`.
pub fn rnorm<S: RandomSource + ?Sized>(rng: &mut S, mu: f64, sigma: f64) -> f64 {
    if mu.is_nan() || !sigma.is_finite() || sigma < 0.0 {
        return domain_nan("rnorm");
    }
    if sigma == 0.0 || !mu.is_finite() {
        mu
    } else {
        mu + sigma * rng.norm_rand()
    }
}

/// Log-normal variate.
pub fn rlnorm<S: RandomSource + ?Sized>(rng: &mut S, meanlog: f64, sdlog: f64) -> f64 {
    if meanlog.is_nan() || !sdlog.is_finite() || sdlog < 0.0 {
        return domain_nan("rlnorm");
    }
    rnorm(rng, meanlog, sdlog).exp()
}

/// Exponential variate with mean `scale`.
pub fn rexp<S: RandomSource + ?Sized>(rng: &mut S, scale: f64) -> f64 {
    if !scale.is_finite() || scale <= 0.0 {
        if scale == 0.0 {
            return 0.0;
        }
        return domain_nan("rexp");
    }
    scale * rng.exp_rand()
}

/// Uniform variate on `(a, b)`.
pub fn runif<S: RandomSource + ?Sized>(rng: &mut S, a: f64, b: f64) -> f64 {
    if !a.is_finite() || !b.is_finite() || b < a {
        return domain_nan("runif");
    }
    if a == b {
        return a;
    }
    let mut u = rng.unif_rand();
    while u <= 0.0 || u >= 1.0 {
        u = rng.unif_rand();
    }
    a + (b - a) * u
}

/// Cauchy variate.
pub fn rcauchy<S: RandomSource + ?Sized>(rng: &mut S, location: f64, scale: f64) -> f64 {
    if location.is_nan() || !scale.is_finite() || scale < 0.0 {
        return domain_nan("rcauchy");
    }
    if scale == 0.0 || !location.is_finite() {
        location
    } else {
        location + scale * (M_PI * rng.unif_rand()).tan()
    }
}

/// Wilcoxon rank-sum statistic for samples of sizes `m` and `n`.
///
/// Draws `n` of the ranks `0..m + n` without replacement.
pub fn rwilcox<S: RandomSource + ?Sized>(rng: &mut S, m: f64, n: f64) -> f64 {
    if m.is_nan() || n.is_nan() {
        return m + n;
    }
    if !m.is_finite() || !n.is_finite() {
        return domain_nan("rwilcox");
    }
    let m = m.round();
    let n = n.round();
    if m < 0.0 || n < 0.0 {
        return domain_nan("rwilcox");
    }
    if m == 0.0 || n == 0.0 {
        return 0.0;
    }

    let mut k = (m + n) as usize;
    let mut ranks: Vec<usize> = (0..k).collect();
    let mut r = 0.0;
    for _ in 0..n as usize {
        let j = ((k as f64 * rng.unif_rand()).floor() as usize).min(k - 1);
        r += ranks[j] as f64;
        k -= 1;
        ranks[j] = ranks[k];
    }
    r - n * (n - 1.0) / 2.0
}

/// Wilcoxon signed-rank statistic for a sample of size `n`.
pub fn rsignrank<S: RandomSource + ?Sized>(rng: &mut S, n: f64) -> f64 {
    if n.is_nan() {
        return n;
    }
    let n = n.round();
    if n < 0.0 || !n.is_finite() {
        return domain_nan("rsignrank");
    }
    let k = n as u64;
    (0..k)
        .map(|i| (i + 1) as f64 * (rng.unif_rand() + 0.5).floor())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::NmathRng;

    fn mean_of(n: usize, mut draw: impl FnMut() -> f64) -> f64 {
        (0..n).map(|_| draw()).sum::<f64>() / n as f64
    }

    #[test]
    fn test_degenerate_parameters() {
        let mut rng = NmathRng::from_seed(1);
        assert_eq!(rnorm(&mut rng, 3.0, 0.0), 3.0);
        assert_eq!(rnorm(&mut rng, f64::INFINITY, 1.0), f64::INFINITY);
        assert!(rnorm(&mut rng, 0.0, -1.0).is_nan());
        assert_eq!(rexp(&mut rng, 0.0), 0.0);
        assert!(rexp(&mut rng, -2.0).is_nan());
        assert_eq!(runif(&mut rng, 2.0, 2.0), 2.0);
        assert!(runif(&mut rng, 3.0, 2.0).is_nan());
        assert_eq!(rcauchy(&mut rng, 1.5, 0.0), 1.5);
        assert_eq!(rwilcox(&mut rng, 0.0, 5.0), 0.0);
        assert!(rwilcox(&mut rng, -1.0, 5.0).is_nan());
        assert_eq!(rsignrank(&mut rng, 0.0), 0.0);
    }

    #[test]
    fn test_continuous_means() {
        let n = 20_000;
        let tol = 5.0 / (n as f64).sqrt();
        let mut rng = NmathRng::from_seed(2);

        let m = mean_of(n, || rnorm(&mut rng, 1.0, 2.0));
        assert!((m - 1.0).abs() < 2.0 * tol);

        let m = mean_of(n, || rexp(&mut rng, 3.0));
        assert!((m - 3.0).abs() < 3.0 * tol);

        let m = mean_of(n, || runif(&mut rng, -1.0, 3.0));
        // sd of U(-1, 3) is 4 / sqrt(12)
        assert!((m - 1.0).abs() < 1.155 * tol);

        let m = mean_of(n, || rlnorm(&mut rng, 0.0, 0.5));
        let sd = ((0.25_f64).exp_m1() * 0.25_f64.exp()).sqrt();
        assert!((m - 0.125_f64.exp()).abs() < sd * tol);
    }

    #[test]
    fn test_uniform_support() {
        let mut rng = NmathRng::from_seed(3);
        for _ in 0..10_000 {
            let u = runif(&mut rng, 5.0, 6.0);
            assert!(u > 5.0 && u < 6.0);
        }
    }

    #[test]
    fn test_cauchy_median() {
        let mut rng = NmathRng::from_seed(4);
        let mut draws: Vec<f64> = (0..20_001).map(|_| rcauchy(&mut rng, 2.0, 1.0)).collect();
        draws.sort_by(|a, b| a.total_cmp(b));
        // sd of the sample median is pi / (2 sqrt(n))
        assert!((draws[10_000] - 2.0).abs() < 5.0 * std::f64::consts::PI / (2.0 * 141.42));
    }

    #[test]
    fn test_wilcox_support_and_mean() {
        let mut rng = NmathRng::from_seed(5);
        let (m, n) = (6.0, 4.0);
        let draws: Vec<f64> = (0..20_000).map(|_| rwilcox(&mut rng, m, n)).collect();
        assert!(draws.iter().all(|&w| (0.0..=m * n).contains(&w) && w == w.floor()));
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        let sd = (m * n * (m + n + 1.0) / 12.0).sqrt();
        assert!((mean - m * n / 2.0).abs() < 5.0 * sd / (draws.len() as f64).sqrt());
    }

    #[test]
    fn test_signrank_support_and_mean() {
        let mut rng = NmathRng::from_seed(6);
        let n = 10.0;
        let draws: Vec<f64> = (0..20_000).map(|_| rsignrank(&mut rng, n)).collect();
        assert!(draws.iter().all(|&v| (0.0..=55.0).contains(&v)));
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        let sd = (n * (n + 1.0) * (2.0 * n + 1.0) / 24.0).sqrt();
        assert!((mean - 27.5).abs() < 5.0 * sd / (draws.len() as f64).sqrt());
    }
}
