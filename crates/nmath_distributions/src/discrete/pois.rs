//! Poisson distribution.

use super::search::DiscreteSearch;
use crate::continuous::gamma::pgamma;
use nmath_core::math::constants::DBL_EPSILON;
use nmath_core::math::dpq::{
    d_0, dt_0, dt_1, dt_qiv, force_int, is_nonint, q_p01_boundaries, Boundary,
};
use nmath_core::special::dpois_raw;
use nmath_core::types::warning::{domain_nan, warn_detail};

/// Poisson probability mass at `x`.
pub fn dpois(x: f64, lambda: f64, log_p: bool) -> f64 {
    if x.is_nan() || lambda.is_nan() {
        return x + lambda;
    }
    if lambda < 0.0 {
        return domain_nan("dpois");
    }
    if is_nonint(x) {
        warn_detail("dpois", format_args!("non-integer x = {x}"));
        return d_0(log_p);
    }
    if x < 0.0 || !x.is_finite() {
        return d_0(log_p);
    }
    dpois_raw(force_int(x), lambda, log_p)
}

/// Poisson distribution function, through the upper regularized gamma.
///
/// ```
/// use nmath_distributions::discrete::pois::ppois;
///
/// // P(X <= 0) = exp(-lambda)
/// assert!((ppois(0.0, 2.0, true, false) - (-2.0_f64).exp()).abs() < 1e-15);
/// ```
pub fn ppois(x: f64, lambda: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || lambda.is_nan() {
        return x + lambda;
    }
    if lambda < 0.0 {
        return domain_nan("ppois");
    }
    if x < 0.0 {
        return dt_0(lower_tail, log_p);
    }
    if lambda == 0.0 || !x.is_finite() {
        return dt_1(lower_tail, log_p);
    }
    let x = (x + 1e-7).floor();
    pgamma(lambda, x + 1.0, 1.0, !lower_tail, log_p)
}

/// Poisson quantile function.
pub fn qpois(p: f64, lambda: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || lambda.is_nan() {
        return p + lambda;
    }
    if !lambda.is_finite() || lambda < 0.0 {
        return domain_nan("qpois");
    }
    if let Boundary::Value(v) =
        q_p01_boundaries(p, 0.0, f64::INFINITY, lower_tail, log_p, "qpois")
    {
        return v;
    }
    if lambda == 0.0 {
        return 0.0;
    }

    let mu = lambda;
    let sigma = lambda.sqrt();
    let gamma = 1.0 / sigma;

    let mut p = p;
    if !lower_tail || log_p {
        p = dt_qiv(p, lower_tail, log_p);
        if p == 0.0 {
            return 0.0;
        }
        if p == 1.0 {
            return f64::INFINITY;
        }
    }
    if p + 1.01 * DBL_EPSILON >= 1.0 {
        return f64::INFINITY;
    }

    DiscreteSearch::new(|y| ppois(y, lambda, true, false), f64::INFINITY)
        .quantile(p, mu, sigma, gamma, lambda)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dpois() {
        assert_relative_eq!(dpois(3.0, 4.0, false), (-4.0_f64).exp() * 64.0 / 6.0, max_relative = 1e-14);
        assert_relative_eq!(dpois(1000.0, 1000.0, false), 0.012_614_611_348_721_5, max_relative = 1e-13);
        assert_eq!(dpois(0.0, 0.0, false), 1.0);
        assert_eq!(dpois(2.0, 0.0, false), 0.0);
        assert_eq!(dpois(2.5, 1.0, false), 0.0);
        assert_eq!(dpois(-1.0, 1.0, true), f64::NEG_INFINITY);
        assert!(dpois(1.0, -1.0, false).is_nan());
    }

    #[test]
    fn test_ppois() {
        assert_relative_eq!(ppois(3.0, 4.0, true, false), 0.433_470_120_366_708_9, max_relative = 1e-14);
        assert_relative_eq!(ppois(3.0, 4.0, false, false), 1.0 - 0.433_470_120_366_708_9, max_relative = 1e-14);
        // non-integer x floors
        assert_eq!(ppois(3.7, 4.0, true, false), ppois(3.0, 4.0, true, false));
        assert_eq!(ppois(5.0, 0.0, true, false), 1.0);
        assert_eq!(ppois(f64::INFINITY, 3.0, false, false), 0.0);
    }

    #[test]
    fn test_qpois() {
        assert_eq!(qpois(0.433, 4.0, true, false), 3.0);
        assert_eq!(qpois(0.434, 4.0, true, false), 4.0);
        assert_eq!(qpois(1.0 - 0.434, 4.0, false, false), 4.0);
        assert_eq!(qpois(0.0, 4.0, true, false), 0.0);
        assert_eq!(qpois(1.0, 4.0, true, false), f64::INFINITY);
        assert_eq!(qpois(0.5, 0.0, true, false), 0.0);
        assert!(qpois(0.5, f64::INFINITY, true, false).is_nan());
    }

    #[test]
    fn test_qpois_large_lambda() {
        let lambda = 1e6;
        for &p in &[0.01, 0.5, 0.99] {
            let q = qpois(p, lambda, true, false);
            assert!(ppois(q, lambda, true, false) >= p * (1.0 - 64.0 * DBL_EPSILON));
            assert!(ppois(q - 1.0, lambda, true, false) < p);
        }
    }
}
