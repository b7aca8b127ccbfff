//! Closed enum over the supported distributions.
//!
//! [`Distribution`] wraps the free functions of [`crate::continuous`] and
//! [`crate::discrete`] behind one value with validated parameters, so that
//! callers selecting a distribution at run time (the command line tool, for
//! instance) dispatch through a single `match`.
//!
//! ## Example
//!
//! ```
//! use nmath_distributions::distribution::Distribution;
//!
//! let d = Distribution::gamma(2.0, 3.0).unwrap();
//! let x = d.quantile(0.5, true, false);
//! assert!((d.cdf(x, true, false) - 0.5).abs() < 1e-14);
//! assert_eq!(d.name(), "gamma");
//! ```

use std::fmt;

use thiserror::Error;

use crate::continuous::{
    dbeta, dcauchy, dchisq, dexp, dgamma, dlnorm, dnchisq, dnorm, dt, dunif, pbeta, pcauchy,
    pchisq, pexp, pgamma, plnorm, pnchisq, pnorm, pt, punif, qbeta, qcauchy, qchisq, qexp,
    qgamma, qlnorm, qnchisq, qnorm, qt, qunif,
};
use crate::discrete::{
    dbinom, dgeom, dhyper, dnbinom, dpois, pbinom, pgeom, phyper, pnbinom, ppois, qbinom, qgeom,
    qhyper, qnbinom, qpois,
};

/// Rejected distribution parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistributionError {
    /// A parameter is outside its valid range.
    #[error("Invalid parameter {name} = {value} for {distribution}: {reason}")]
    InvalidParameter {
        /// Distribution name
        distribution: &'static str,
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
        /// Constraint that failed
        reason: &'static str,
    },

    /// The number of parameters does not match the distribution.
    #[error("{distribution} takes {expected} parameter(s), got {got}")]
    Arity {
        /// Distribution name
        distribution: &'static str,
        /// Required count
        expected: usize,
        /// Supplied count
        got: usize,
    },

    /// No distribution has this name.
    #[error("Unknown distribution: {0}")]
    Unknown(String),
}

/// A distribution with validated parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "family", rename_all = "snake_case"))]
pub enum Distribution {
    /// Normal with mean and standard deviation.
    Normal {
        /// Mean
        mean: f64,
        /// Standard deviation
        sd: f64,
    },
    /// Log-normal with the parameters of the underlying normal.
    LogNormal {
        /// Mean on the log scale
        meanlog: f64,
        /// Standard deviation on the log scale
        sdlog: f64,
    },
    /// Gamma with shape and scale.
    Gamma {
        /// Shape
        shape: f64,
        /// Scale
        scale: f64,
    },
    /// Beta with two shape parameters.
    Beta {
        /// First shape parameter
        a: f64,
        /// Second shape parameter
        b: f64,
    },
    /// Central chi-square.
    ChiSquared {
        /// Degrees of freedom
        df: f64,
    },
    /// Noncentral chi-square.
    NoncentralChiSquared {
        /// Degrees of freedom
        df: f64,
        /// Noncentrality
        ncp: f64,
    },
    /// Student t.
    StudentT {
        /// Degrees of freedom
        df: f64,
    },
    /// Cauchy with location and scale.
    Cauchy {
        /// Location
        location: f64,
        /// Scale
        scale: f64,
    },
    /// Exponential with rate.
    Exponential {
        /// Rate
        rate: f64,
    },
    /// Uniform on `[min, max]`.
    Uniform {
        /// Lower end
        min: f64,
        /// Upper end
        max: f64,
    },
    /// Bernoulli, a binomial with one trial.
    Bernoulli {
        /// Success probability
        prob: f64,
    },
    /// Binomial with trial count and success probability.
    Binomial {
        /// Number of trials
        size: f64,
        /// Success probability
        prob: f64,
    },
    /// Poisson with mean.
    Poisson {
        /// Mean
        lambda: f64,
    },
    /// Geometric, counting failures before the first success.
    Geometric {
        /// Success probability
        prob: f64,
    },
    /// Negative binomial, counting failures before `size` successes.
    NegativeBinomial {
        /// Target number of successes
        size: f64,
        /// Success probability
        prob: f64,
    },
    /// Hypergeometric: `drawn` balls from `red` red and `black` black ones.
    Hypergeometric {
        /// Red balls in the urn
        red: f64,
        /// Black balls in the urn
        black: f64,
        /// Balls drawn
        drawn: f64,
    },
}

fn check(
    ok: bool,
    distribution: &'static str,
    name: &'static str,
    value: f64,
    reason: &'static str,
) -> Result<(), DistributionError> {
    if ok {
        Ok(())
    } else {
        Err(DistributionError::InvalidParameter {
            distribution,
            name,
            value,
            reason,
        })
    }
}

fn is_count(x: f64) -> bool {
    x >= 0.0 && x.is_finite() && x.fract() == 0.0
}

fn is_prob(p: f64) -> bool {
    (0.0..=1.0).contains(&p)
}

impl Distribution {
    /// Every name accepted by [`Distribution::from_name`], with its arity.
    pub const NAMES: [(&'static str, usize); 16] = [
        ("norm", 2),
        ("lnorm", 2),
        ("gamma", 2),
        ("beta", 2),
        ("chisq", 1),
        ("nchisq", 2),
        ("t", 1),
        ("cauchy", 2),
        ("exp", 1),
        ("unif", 2),
        ("bernoulli", 1),
        ("binom", 2),
        ("pois", 1),
        ("geom", 1),
        ("nbinom", 2),
        ("hyper", 3),
    ];

    /// Normal distribution; `sd` must be non-negative and finite.
    pub fn normal(mean: f64, sd: f64) -> Result<Self, DistributionError> {
        check(mean.is_finite(), "norm", "mean", mean, "must be finite")?;
        check(sd >= 0.0 && sd.is_finite(), "norm", "sd", sd, "must be finite and >= 0")?;
        Ok(Distribution::Normal { mean, sd })
    }

    /// Log-normal distribution.
    pub fn log_normal(meanlog: f64, sdlog: f64) -> Result<Self, DistributionError> {
        check(meanlog.is_finite(), "lnorm", "meanlog", meanlog, "must be finite")?;
        check(sdlog >= 0.0 && sdlog.is_finite(), "lnorm", "sdlog", sdlog, "must be finite and >= 0")?;
        Ok(Distribution::LogNormal { meanlog, sdlog })
    }

    /// Gamma distribution; shape 0 is the point mass at zero.
    pub fn gamma(shape: f64, scale: f64) -> Result<Self, DistributionError> {
        check(shape >= 0.0 && shape.is_finite(), "gamma", "shape", shape, "must be finite and >= 0")?;
        check(scale > 0.0 && scale.is_finite(), "gamma", "scale", scale, "must be finite and > 0")?;
        Ok(Distribution::Gamma { shape, scale })
    }

    /// Beta distribution.
    pub fn beta(a: f64, b: f64) -> Result<Self, DistributionError> {
        check(a >= 0.0 && !a.is_nan(), "beta", "a", a, "must be >= 0")?;
        check(b >= 0.0 && !b.is_nan(), "beta", "b", b, "must be >= 0")?;
        Ok(Distribution::Beta { a, b })
    }

    /// Chi-square distribution.
    pub fn chi_squared(df: f64) -> Result<Self, DistributionError> {
        check(df >= 0.0 && df.is_finite(), "chisq", "df", df, "must be finite and >= 0")?;
        Ok(Distribution::ChiSquared { df })
    }

    /// Noncentral chi-square distribution.
    pub fn noncentral_chi_squared(df: f64, ncp: f64) -> Result<Self, DistributionError> {
        check(df >= 0.0 && df.is_finite(), "nchisq", "df", df, "must be finite and >= 0")?;
        check(ncp >= 0.0 && ncp.is_finite(), "nchisq", "ncp", ncp, "must be finite and >= 0")?;
        Ok(Distribution::NoncentralChiSquared { df, ncp })
    }

    /// Student t distribution; `df = Inf` is the standard normal.
    pub fn student_t(df: f64) -> Result<Self, DistributionError> {
        check(df > 0.0, "t", "df", df, "must be > 0")?;
        Ok(Distribution::StudentT { df })
    }

    /// Cauchy distribution.
    pub fn cauchy(location: f64, scale: f64) -> Result<Self, DistributionError> {
        check(location.is_finite(), "cauchy", "location", location, "must be finite")?;
        check(scale > 0.0 && scale.is_finite(), "cauchy", "scale", scale, "must be finite and > 0")?;
        Ok(Distribution::Cauchy { location, scale })
    }

    /// Exponential distribution.
    pub fn exponential(rate: f64) -> Result<Self, DistributionError> {
        check(rate > 0.0 && rate.is_finite(), "exp", "rate", rate, "must be finite and > 0")?;
        Ok(Distribution::Exponential { rate })
    }

    /// Uniform distribution on `[min, max]`.
    pub fn uniform(min: f64, max: f64) -> Result<Self, DistributionError> {
        check(min.is_finite(), "unif", "min", min, "must be finite")?;
        check(max.is_finite() && max >= min, "unif", "max", max, "must be finite and >= min")?;
        Ok(Distribution::Uniform { min, max })
    }

    /// Bernoulli distribution.
    pub fn bernoulli(prob: f64) -> Result<Self, DistributionError> {
        check(is_prob(prob), "bernoulli", "prob", prob, "must lie in [0, 1]")?;
        Ok(Distribution::Bernoulli { prob })
    }

    /// Binomial distribution.
    pub fn binomial(size: f64, prob: f64) -> Result<Self, DistributionError> {
        check(is_count(size), "binom", "size", size, "must be a non-negative integer")?;
        check(is_prob(prob), "binom", "prob", prob, "must lie in [0, 1]")?;
        Ok(Distribution::Binomial { size, prob })
    }

    /// Poisson distribution.
    pub fn poisson(lambda: f64) -> Result<Self, DistributionError> {
        check(lambda >= 0.0 && lambda.is_finite(), "pois", "lambda", lambda, "must be finite and >= 0")?;
        Ok(Distribution::Poisson { lambda })
    }

    /// Geometric distribution.
    pub fn geometric(prob: f64) -> Result<Self, DistributionError> {
        check(prob > 0.0 && prob <= 1.0, "geom", "prob", prob, "must lie in (0, 1]")?;
        Ok(Distribution::Geometric { prob })
    }

    /// Negative binomial distribution.
    pub fn negative_binomial(size: f64, prob: f64) -> Result<Self, DistributionError> {
        check(size >= 0.0 && size.is_finite(), "nbinom", "size", size, "must be finite and >= 0")?;
        check(prob > 0.0 && prob <= 1.0, "nbinom", "prob", prob, "must lie in (0, 1]")?;
        Ok(Distribution::NegativeBinomial { size, prob })
    }

    /// Hypergeometric distribution.
    pub fn hypergeometric(red: f64, black: f64, drawn: f64) -> Result<Self, DistributionError> {
        check(is_count(red), "hyper", "red", red, "must be a non-negative integer")?;
        check(is_count(black), "hyper", "black", black, "must be a non-negative integer")?;
        check(
            is_count(drawn) && drawn <= red + black,
            "hyper",
            "drawn",
            drawn,
            "must be a non-negative integer <= red + black",
        )?;
        Ok(Distribution::Hypergeometric { red, black, drawn })
    }

    /// Build a distribution from its short name and positional parameters.
    ///
    /// ```
    /// use nmath_distributions::distribution::{Distribution, DistributionError};
    ///
    /// let d = Distribution::from_name("binom", &[10.0, 0.3]).unwrap();
    /// assert_eq!(d, Distribution::Binomial { size: 10.0, prob: 0.3 });
    /// assert!(matches!(
    ///     Distribution::from_name("norm", &[0.0]),
    ///     Err(DistributionError::Arity { expected: 2, got: 1, .. })
    /// ));
    /// ```
    pub fn from_name(name: &str, params: &[f64]) -> Result<Self, DistributionError> {
        let (canonical, expected) = Self::NAMES
            .iter()
            .copied()
            .find(|(n, _)| *n == name)
            .ok_or_else(|| DistributionError::Unknown(name.to_string()))?;
        if params.len() != expected {
            return Err(DistributionError::Arity {
                distribution: canonical,
                expected,
                got: params.len(),
            });
        }
        let p = params;
        match canonical {
            "norm" => Self::normal(p[0], p[1]),
            "lnorm" => Self::log_normal(p[0], p[1]),
            "gamma" => Self::gamma(p[0], p[1]),
            "beta" => Self::beta(p[0], p[1]),
            "chisq" => Self::chi_squared(p[0]),
            "nchisq" => Self::noncentral_chi_squared(p[0], p[1]),
            "t" => Self::student_t(p[0]),
            "cauchy" => Self::cauchy(p[0], p[1]),
            "exp" => Self::exponential(p[0]),
            "unif" => Self::uniform(p[0], p[1]),
            "bernoulli" => Self::bernoulli(p[0]),
            "binom" => Self::binomial(p[0], p[1]),
            "pois" => Self::poisson(p[0]),
            "geom" => Self::geometric(p[0]),
            "nbinom" => Self::negative_binomial(p[0], p[1]),
            "hyper" => Self::hypergeometric(p[0], p[1], p[2]),
            other => Err(DistributionError::Unknown(other.to_string())),
        }
    }

    /// Short name, as accepted by [`Distribution::from_name`].
    pub fn name(&self) -> &'static str {
        match self {
            Distribution::Normal { .. } => "norm",
            Distribution::LogNormal { .. } => "lnorm",
            Distribution::Gamma { .. } => "gamma",
            Distribution::Beta { .. } => "beta",
            Distribution::ChiSquared { .. } => "chisq",
            Distribution::NoncentralChiSquared { .. } => "nchisq",
            Distribution::StudentT { .. } => "t",
            Distribution::Cauchy { .. } => "cauchy",
            Distribution::Exponential { .. } => "exp",
            Distribution::Uniform { .. } => "unif",
            Distribution::Bernoulli { .. } => "bernoulli",
            Distribution::Binomial { .. } => "binom",
            Distribution::Poisson { .. } => "pois",
            Distribution::Geometric { .. } => "geom",
            Distribution::NegativeBinomial { .. } => "nbinom",
            Distribution::Hypergeometric { .. } => "hyper",
        }
    }

    /// `true` for distributions supported on the integers.
    pub fn is_discrete(&self) -> bool {
        matches!(
            self,
            Distribution::Bernoulli { .. }
                | Distribution::Binomial { .. }
                | Distribution::Poisson { .. }
                | Distribution::Geometric { .. }
                | Distribution::NegativeBinomial { .. }
                | Distribution::Hypergeometric { .. }
        )
    }

    /// Density (or probability mass) at `x`.
    pub fn density(&self, x: f64, log_p: bool) -> f64 {
        match *self {
            Distribution::Normal { mean, sd } => dnorm(x, mean, sd, log_p),
            Distribution::LogNormal { meanlog, sdlog } => dlnorm(x, meanlog, sdlog, log_p),
            Distribution::Gamma { shape, scale } => dgamma(x, shape, scale, log_p),
            Distribution::Beta { a, b } => dbeta(x, a, b, log_p),
            Distribution::ChiSquared { df } => dchisq(x, df, log_p),
            Distribution::NoncentralChiSquared { df, ncp } => dnchisq(x, df, ncp, log_p),
            Distribution::StudentT { df } => dt(x, df, log_p),
            Distribution::Cauchy { location, scale } => dcauchy(x, location, scale, log_p),
            Distribution::Exponential { rate } => dexp(x, 1.0 / rate, log_p),
            Distribution::Uniform { min, max } => dunif(x, min, max, log_p),
            Distribution::Bernoulli { prob } => dbinom(x, 1.0, prob, log_p),
            Distribution::Binomial { size, prob } => dbinom(x, size, prob, log_p),
            Distribution::Poisson { lambda } => dpois(x, lambda, log_p),
            Distribution::Geometric { prob } => dgeom(x, prob, log_p),
            Distribution::NegativeBinomial { size, prob } => dnbinom(x, size, prob, log_p),
            Distribution::Hypergeometric { red, black, drawn } => {
                dhyper(x, red, black, drawn, log_p)
            }
        }
    }

    /// Distribution function at `x`.
    pub fn cdf(&self, x: f64, lower_tail: bool, log_p: bool) -> f64 {
        let (lt, lg) = (lower_tail, log_p);
        match *self {
            Distribution::Normal { mean, sd } => pnorm(x, mean, sd, lt, lg),
            Distribution::LogNormal { meanlog, sdlog } => plnorm(x, meanlog, sdlog, lt, lg),
            Distribution::Gamma { shape, scale } => pgamma(x, shape, scale, lt, lg),
            Distribution::Beta { a, b } => pbeta(x, a, b, lt, lg),
            Distribution::ChiSquared { df } => pchisq(x, df, lt, lg),
            Distribution::NoncentralChiSquared { df, ncp } => pnchisq(x, df, ncp, lt, lg),
            Distribution::StudentT { df } => pt(x, df, lt, lg),
            Distribution::Cauchy { location, scale } => pcauchy(x, location, scale, lt, lg),
            Distribution::Exponential { rate } => pexp(x, 1.0 / rate, lt, lg),
            Distribution::Uniform { min, max } => punif(x, min, max, lt, lg),
            Distribution::Bernoulli { prob } => pbinom(x, 1.0, prob, lt, lg),
            Distribution::Binomial { size, prob } => pbinom(x, size, prob, lt, lg),
            Distribution::Poisson { lambda } => ppois(x, lambda, lt, lg),
            Distribution::Geometric { prob } => pgeom(x, prob, lt, lg),
            Distribution::NegativeBinomial { size, prob } => pnbinom(x, size, prob, lt, lg),
            Distribution::Hypergeometric { red, black, drawn } => {
                phyper(x, red, black, drawn, lt, lg)
            }
        }
    }

    /// Quantile function at `p`.
    pub fn quantile(&self, p: f64, lower_tail: bool, log_p: bool) -> f64 {
        let (lt, lg) = (lower_tail, log_p);
        match *self {
            Distribution::Normal { mean, sd } => qnorm(p, mean, sd, lt, lg),
            Distribution::LogNormal { meanlog, sdlog } => qlnorm(p, meanlog, sdlog, lt, lg),
            Distribution::Gamma { shape, scale } => qgamma(p, shape, scale, lt, lg),
            Distribution::Beta { a, b } => qbeta(p, a, b, lt, lg),
            Distribution::ChiSquared { df } => qchisq(p, df, lt, lg),
            Distribution::NoncentralChiSquared { df, ncp } => qnchisq(p, df, ncp, lt, lg),
            Distribution::StudentT { df } => qt(p, df, lt, lg),
            Distribution::Cauchy { location, scale } => qcauchy(p, location, scale, lt, lg),
            Distribution::Exponential { rate } => qexp(p, 1.0 / rate, lt, lg),
            Distribution::Uniform { min, max } => qunif(p, min, max, lt, lg),
            Distribution::Bernoulli { prob } => qbinom(p, 1.0, prob, lt, lg),
            Distribution::Binomial { size, prob } => qbinom(p, size, prob, lt, lg),
            Distribution::Poisson { lambda } => qpois(p, lambda, lt, lg),
            Distribution::Geometric { prob } => qgeom(p, prob, lt, lg),
            Distribution::NegativeBinomial { size, prob } => qnbinom(p, size, prob, lt, lg),
            Distribution::Hypergeometric { red, black, drawn } => {
                qhyper(p, red, black, drawn, lt, lg)
            }
        }
    }

    /// Mean, `NaN` where it does not exist.
    pub fn mean(&self) -> f64 {
        match *self {
            Distribution::Normal { mean, .. } => mean,
            Distribution::LogNormal { meanlog, sdlog } => (meanlog + 0.5 * sdlog * sdlog).exp(),
            Distribution::Gamma { shape, scale } => shape * scale,
            Distribution::Beta { a, b } => a / (a + b),
            Distribution::ChiSquared { df } => df,
            Distribution::NoncentralChiSquared { df, ncp } => df + ncp,
            Distribution::StudentT { df } => {
                if df > 1.0 {
                    0.0
                } else {
                    f64::NAN
                }
            }
            Distribution::Cauchy { .. } => f64::NAN,
            Distribution::Exponential { rate } => 1.0 / rate,
            Distribution::Uniform { min, max } => 0.5 * (min + max),
            Distribution::Bernoulli { prob } => prob,
            Distribution::Binomial { size, prob } => size * prob,
            Distribution::Poisson { lambda } => lambda,
            Distribution::Geometric { prob } => (1.0 - prob) / prob,
            Distribution::NegativeBinomial { size, prob } => size * (1.0 - prob) / prob,
            Distribution::Hypergeometric { red, black, drawn } => drawn * red / (red + black),
        }
    }

    /// Variance, `NaN` where it does not exist and `INFINITY` where it diverges.
    pub fn variance(&self) -> f64 {
        match *self {
            Distribution::Normal { sd, .. } => sd * sd,
            Distribution::LogNormal { meanlog, sdlog } => {
                let s2 = sdlog * sdlog;
                s2.exp_m1() * (2.0 * meanlog + s2).exp()
            }
            Distribution::Gamma { shape, scale } => shape * scale * scale,
            Distribution::Beta { a, b } => a * b / ((a + b) * (a + b) * (a + b + 1.0)),
            Distribution::ChiSquared { df } => 2.0 * df,
            Distribution::NoncentralChiSquared { df, ncp } => 2.0 * (df + 2.0 * ncp),
            Distribution::StudentT { df } => {
                if df > 2.0 {
                    df / (df - 2.0)
                } else if df > 1.0 {
                    f64::INFINITY
                } else {
                    f64::NAN
                }
            }
            Distribution::Cauchy { .. } => f64::NAN,
            Distribution::Exponential { rate } => 1.0 / (rate * rate),
            Distribution::Uniform { min, max } => (max - min) * (max - min) / 12.0,
            Distribution::Bernoulli { prob } => prob * (1.0 - prob),
            Distribution::Binomial { size, prob } => size * prob * (1.0 - prob),
            Distribution::Poisson { lambda } => lambda,
            Distribution::Geometric { prob } => (1.0 - prob) / (prob * prob),
            Distribution::NegativeBinomial { size, prob } => size * (1.0 - prob) / (prob * prob),
            Distribution::Hypergeometric { red, black, drawn } => {
                let total = red + black;
                let p = red / total;
                drawn * p * (1.0 - p) * (total - drawn) / (total - 1.0)
            }
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Distribution::Normal { mean, sd } => write!(f, "norm(mean = {mean}, sd = {sd})"),
            Distribution::LogNormal { meanlog, sdlog } => {
                write!(f, "lnorm(meanlog = {meanlog}, sdlog = {sdlog})")
            }
            Distribution::Gamma { shape, scale } => {
                write!(f, "gamma(shape = {shape}, scale = {scale})")
            }
            Distribution::Beta { a, b } => write!(f, "beta(a = {a}, b = {b})"),
            Distribution::ChiSquared { df } => write!(f, "chisq(df = {df})"),
            Distribution::NoncentralChiSquared { df, ncp } => {
                write!(f, "nchisq(df = {df}, ncp = {ncp})")
            }
            Distribution::StudentT { df } => write!(f, "t(df = {df})"),
            Distribution::Cauchy { location, scale } => {
                write!(f, "cauchy(location = {location}, scale = {scale})")
            }
            Distribution::Exponential { rate } => write!(f, "exp(rate = {rate})"),
            Distribution::Uniform { min, max } => write!(f, "unif(min = {min}, max = {max})"),
            Distribution::Bernoulli { prob } => write!(f, "bernoulli(prob = {prob})"),
            Distribution::Binomial { size, prob } => {
                write!(f, "binom(size = {size}, prob = {prob})")
            }
            Distribution::Poisson { lambda } => write!(f, "pois(lambda = {lambda})"),
            Distribution::Geometric { prob } => write!(f, "geom(prob = {prob})"),
            Distribution::NegativeBinomial { size, prob } => {
                write!(f, "nbinom(size = {size}, prob = {prob})")
            }
            Distribution::Hypergeometric { red, black, drawn } => {
                write!(f, "hyper(red = {red}, black = {black}, drawn = {drawn})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn all() -> Vec<Distribution> {
        vec![
            Distribution::normal(1.0, 2.0).unwrap(),
            Distribution::log_normal(0.0, 0.5).unwrap(),
            Distribution::gamma(2.5, 1.5).unwrap(),
            Distribution::beta(2.0, 5.0).unwrap(),
            Distribution::chi_squared(4.0).unwrap(),
            Distribution::noncentral_chi_squared(3.0, 2.0).unwrap(),
            Distribution::student_t(5.0).unwrap(),
            Distribution::cauchy(0.0, 1.0).unwrap(),
            Distribution::exponential(2.0).unwrap(),
            Distribution::uniform(-1.0, 3.0).unwrap(),
            Distribution::bernoulli(0.3).unwrap(),
            Distribution::binomial(12.0, 0.4).unwrap(),
            Distribution::poisson(3.5).unwrap(),
            Distribution::geometric(0.25).unwrap(),
            Distribution::negative_binomial(3.0, 0.4).unwrap(),
            Distribution::hypergeometric(10.0, 7.0, 8.0).unwrap(),
        ]
    }

    // ========================================
    // Construction
    // ========================================

    #[test]
    fn test_names_round_trip() {
        for d in all() {
            let (_, arity) = Distribution::NAMES
                .iter()
                .copied()
                .find(|(n, _)| *n == d.name())
                .unwrap();
            assert!(arity >= 1);
        }
        assert_eq!(all().len(), Distribution::NAMES.len());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            Distribution::gamma(-1.0, 1.0),
            Err(DistributionError::InvalidParameter { name: "shape", .. })
        ));
        assert!(Distribution::binomial(10.5, 0.3).is_err());
        assert!(Distribution::binomial(10.0, 1.3).is_err());
        assert!(Distribution::hypergeometric(3.0, 4.0, 8.0).is_err());
        assert!(Distribution::uniform(2.0, 1.0).is_err());
        assert!(Distribution::student_t(0.0).is_err());
        assert!(matches!(
            Distribution::from_name("weibull", &[1.0]),
            Err(DistributionError::Unknown(_))
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = Distribution::poisson(-2.0).unwrap_err();
        assert_eq!(
            format!("{err}"),
            "Invalid parameter lambda = -2 for pois: must be finite and >= 0"
        );
    }

    // ========================================
    // Dispatch
    // ========================================

    #[test]
    fn test_quantile_inverts_cdf() {
        for d in all() {
            for &p in &[0.1, 0.5, 0.9] {
                let x = d.quantile(p, true, false);
                let f = d.cdf(x, true, false);
                if d.is_discrete() {
                    assert!(f >= p - 1e-12, "{d}: F({x}) = {f} < {p}");
                } else {
                    assert_relative_eq!(f, p, max_relative = 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_dispatch_matches_free_functions() {
        let d = Distribution::normal(1.0, 2.0).unwrap();
        assert_eq!(d.density(0.3, false), dnorm(0.3, 1.0, 2.0, false));
        let d = Distribution::exponential(2.0).unwrap();
        assert_relative_eq!(d.cdf(1.0, true, false), 1.0 - (-2.0_f64).exp(), max_relative = 1e-15);
        let d = Distribution::bernoulli(0.3).unwrap();
        assert_relative_eq!(d.density(1.0, false), 0.3, max_relative = 1e-15);
        assert_eq!(d.quantile(0.8, true, false), 1.0);
    }

    #[test]
    fn test_moments() {
        let d = Distribution::binomial(12.0, 0.4).unwrap();
        assert_relative_eq!(d.mean(), 4.8);
        assert_relative_eq!(d.variance(), 2.88);
        assert!(Distribution::cauchy(0.0, 1.0).unwrap().mean().is_nan());
        assert_eq!(Distribution::student_t(1.5).unwrap().variance(), f64::INFINITY);
    }

    #[test]
    fn test_display() {
        let d = Distribution::hypergeometric(10.0, 7.0, 8.0).unwrap();
        assert_eq!(d.to_string(), "hyper(red = 10, black = 7, drawn = 8)");
    }
}
