//! Caller-owned sampler state for every supported distribution.
//!
//! [`Sampler`] bundles the per-algorithm caches. Generators that are built on
//! others (chi-squared on gamma, negative binomial on gamma and Poisson)
//! share the caches held here, so one `Sampler` per thread or per stream is
//! all the state a simulation needs.
//!
//! # Examples
//!
//! ```rust
//! use nmath_distributions::distribution::Distribution;
//! use nmath_random::{NmathRng, Sampler};
//!
//! let mut rng = NmathRng::from_seed(42);
//! let mut sampler = Sampler::new();
//!
//! let x = sampler.gamma(&mut rng, 2.0, 1.5);
//! assert!(x > 0.0);
//!
//! let dist = Distribution::binomial(20.0, 0.3).unwrap();
//! let k = sampler.sample(&mut rng, &dist);
//! assert!((0.0..=20.0).contains(&k));
//! ```

use crate::beta::BetaSampler;
use crate::binomial::BinomialSampler;
use crate::gamma::GammaSampler;
use crate::hyper::HypergeometricSampler;
use crate::multinom::rmultinom;
use crate::poisson::PoissonSampler;
use crate::simple::{rcauchy, rexp, rlnorm, rnorm, runif};
use crate::source::RandomSource;
use nmath_core::math::constants::DBL_MAX;
use nmath_core::types::warning::domain_nan;
use nmath_core::types::SamplingError;
use nmath_distributions::distribution::Distribution;

/// Per-algorithm caches for the stateful generators.
#[derive(Debug, Clone, Default)]
pub struct Sampler {
    gamma: GammaSampler,
    beta: BetaSampler,
    poisson: PoissonSampler,
    binomial: BinomialSampler,
    hyper: HypergeometricSampler,
}

impl Sampler {
    /// Creates a sampler with empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gamma variate with `shape` and `scale`.
    pub fn gamma<S: RandomSource + ?Sized>(&mut self, rng: &mut S, shape: f64, scale: f64) -> f64 {
        self.gamma.sample(rng, shape, scale)
    }

    /// Beta variate.
    pub fn beta<S: RandomSource + ?Sized>(&mut self, rng: &mut S, a: f64, b: f64) -> f64 {
        self.beta.sample(rng, a, b)
    }

    /// Poisson variate.
    pub fn poisson<S: RandomSource + ?Sized>(&mut self, rng: &mut S, mu: f64) -> f64 {
        self.poisson.sample(rng, mu)
    }

    /// Binomial variate.
    pub fn binomial<S: RandomSource + ?Sized>(&mut self, rng: &mut S, size: f64, prob: f64) -> f64 {
        self.binomial.sample(rng, size, prob)
    }

    /// Hypergeometric variate: red balls among `drawn` from `red + black`.
    pub fn hypergeometric<S: RandomSource + ?Sized>(
        &mut self,
        rng: &mut S,
        red: f64,
        black: f64,
        drawn: f64,
    ) -> f64 {
        self.hyper.sample(rng, red, black, drawn)
    }

    /// Chi-squared variate as Gamma(df / 2, 2).
    pub fn chi_squared<S: RandomSource + ?Sized>(&mut self, rng: &mut S, df: f64) -> f64 {
        if !df.is_finite() || df < 0.0 {
            return domain_nan("rchisq");
        }
        self.gamma.sample(rng, df / 2.0, 2.0)
    }

    /// Noncentral chi-squared variate as a Poisson mixture of central ones.
    pub fn noncentral_chi_squared<S: RandomSource + ?Sized>(
        &mut self,
        rng: &mut S,
        df: f64,
        lambda: f64,
    ) -> f64 {
        if !df.is_finite() || !lambda.is_finite() || df < 0.0 || lambda < 0.0 {
            return domain_nan("rnchisq");
        }
        if lambda == 0.0 {
            return if df == 0.0 {
                0.0
            } else {
                self.gamma.sample(rng, df / 2.0, 2.0)
            };
        }
        let mut r = self.poisson.sample(rng, lambda / 2.0);
        if r > 0.0 {
            r = self.chi_squared(rng, 2.0 * r);
        }
        if df > 0.0 {
            r += self.gamma.sample(rng, df / 2.0, 2.0);
        }
        r
    }

    /// Student t variate.
    pub fn student_t<S: RandomSource + ?Sized>(&mut self, rng: &mut S, df: f64) -> f64 {
        if df.is_nan() || df <= 0.0 {
            return domain_nan("rt");
        }
        if df.is_infinite() {
            return rng.norm_rand();
        }
        let num = rng.norm_rand();
        num / (self.chi_squared(rng, df) / df).sqrt()
    }

    /// Geometric variate: failures before the first success.
    pub fn geometric<S: RandomSource + ?Sized>(&mut self, rng: &mut S, p: f64) -> f64 {
        if !p.is_finite() || p <= 0.0 || p > 1.0 {
            return domain_nan("rgeom");
        }
        let mu = self.gamma.sample(rng, 1.0, (1.0 - p) / p);
        self.poisson.sample(rng, mu)
    }

    /// Negative binomial variate with `size` and success probability `prob`.
    pub fn negative_binomial<S: RandomSource + ?Sized>(
        &mut self,
        rng: &mut S,
        size: f64,
        prob: f64,
    ) -> f64 {
        if !prob.is_finite() || size.is_nan() || size <= 0.0 || prob <= 0.0 || prob > 1.0 {
            return domain_nan("rnbinom");
        }
        let size = if size.is_finite() { size } else { DBL_MAX / 2.0 };
        if prob == 1.0 {
            return 0.0;
        }
        let mu = self.gamma.sample(rng, size, (1.0 - prob) / prob);
        self.poisson.sample(rng, mu)
    }

    /// Negative binomial variate with `size` and mean `mu`.
    pub fn negative_binomial_mu<S: RandomSource + ?Sized>(
        &mut self,
        rng: &mut S,
        size: f64,
        mu: f64,
    ) -> f64 {
        if !mu.is_finite() || size.is_nan() || size <= 0.0 || mu < 0.0 {
            return domain_nan("rnbinom_mu");
        }
        let size = if size.is_finite() { size } else { DBL_MAX / 2.0 };
        if mu == 0.0 {
            return 0.0;
        }
        let lambda = self.gamma.sample(rng, size, mu / size);
        self.poisson.sample(rng, lambda)
    }

    /// Multinomial counts for `size` trials over the weights `prob`.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError`] for an empty weight vector, a negative or
    /// non-finite weight, or weights summing to zero.
    pub fn multinomial<S: RandomSource + ?Sized>(
        &mut self,
        rng: &mut S,
        size: u64,
        prob: &[f64],
    ) -> Result<Vec<u64>, SamplingError> {
        rmultinom(&mut self.binomial, rng, size, prob)
    }

    /// One variate from `dist`.
    pub fn sample<S: RandomSource + ?Sized>(&mut self, rng: &mut S, dist: &Distribution) -> f64 {
        match *dist {
            Distribution::Normal { mean, sd } => rnorm(rng, mean, sd),
            Distribution::LogNormal { meanlog, sdlog } => rlnorm(rng, meanlog, sdlog),
            Distribution::Gamma { shape, scale } => self.gamma(rng, shape, scale),
            Distribution::Beta { a, b } => self.beta(rng, a, b),
            Distribution::ChiSquared { df } => self.chi_squared(rng, df),
            Distribution::NoncentralChiSquared { df, ncp } => {
                self.noncentral_chi_squared(rng, df, ncp)
            }
            Distribution::StudentT { df } => self.student_t(rng, df),
            Distribution::Cauchy { location, scale } => rcauchy(rng, location, scale),
            Distribution::Exponential { rate } => rexp(rng, 1.0 / rate),
            Distribution::Uniform { min, max } => runif(rng, min, max),
            Distribution::Bernoulli { prob } => self.binomial(rng, 1.0, prob),
            Distribution::Binomial { size, prob } => self.binomial(rng, size, prob),
            Distribution::Poisson { lambda } => self.poisson(rng, lambda),
            Distribution::Geometric { prob } => self.geometric(rng, prob),
            Distribution::NegativeBinomial { size, prob } => {
                self.negative_binomial(rng, size, prob)
            }
            Distribution::Hypergeometric { red, black, drawn } => {
                self.hypergeometric(rng, red, black, drawn)
            }
        }
    }

    /// Fills `out` with independent variates from `dist`.
    pub fn fill<S: RandomSource + ?Sized>(&mut self, rng: &mut S, dist: &Distribution, out: &mut [f64]) {
        for value in out.iter_mut() {
            *value = self.sample(rng, dist);
        }
    }
}
