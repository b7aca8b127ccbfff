//! Binomial distribution.
//!
//! The density uses Loader's saddle-point expansion, which stays accurate
//! for large `n` where a direct product of binomial coefficient and powers
//! would over- or underflow. The CDF is an incomplete beta ratio.

use super::search::DiscreteSearch;
use crate::continuous::beta::pbeta;
use nmath_core::math::constants::{DBL_EPSILON, M_LN_2PI};
use nmath_core::math::dpq::{
    d_0, d_1, d_exp, dt_0, dt_1, dt_qiv, force_int, is_neg_or_nonint, is_nonint,
    q_p01_boundaries, Boundary,
};
use nmath_core::special::{bd0, stirlerr};
use nmath_core::types::warning::{domain_nan, warn_detail};

/// Binomial density for integer `x` and `n`, with `q = 1 - p` supplied by the
/// caller so that it can be passed without cancellation.
///
/// No argument checking is done; this is the building block shared with the
/// beta, negative binomial, geometric and hypergeometric densities.
pub fn dbinom_raw(x: f64, n: f64, p: f64, q: f64, log_p: bool) -> f64 {
    if p == 0.0 {
        return if x == 0.0 { d_1(log_p) } else { d_0(log_p) };
    }
    if q == 0.0 {
        return if x == n { d_1(log_p) } else { d_0(log_p) };
    }

    if x == 0.0 {
        if n == 0.0 {
            return d_1(log_p);
        }
        let lc = if p < 0.1 {
            -bd0(n, n * q) - n * p
        } else {
            n * q.ln()
        };
        return d_exp(lc, log_p);
    }
    if x == n {
        let lc = if q < 0.1 {
            -bd0(n, n * p) - n * q
        } else {
            n * p.ln()
        };
        return d_exp(lc, log_p);
    }
    if x < 0.0 || x > n {
        return d_0(log_p);
    }

    let lc = stirlerr(n) - stirlerr(x) - stirlerr(n - x) - bd0(x, n * p) - bd0(n - x, n * q);
    // log(2 pi x (n - x) / n), arranged for x << n
    let lf = M_LN_2PI + x.ln() + (-x / n).ln_1p();

    d_exp(lc - 0.5 * lf, log_p)
}

/// Binomial density.
///
/// Non-integer `x` yields 0 with a warning.
///
/// ```
/// use nmath_distributions::discrete::binom::dbinom;
///
/// assert!((dbinom(2.0, 4.0, 0.5, false) - 0.375).abs() < 1e-15);
/// ```
pub fn dbinom(x: f64, n: f64, p: f64, log_p: bool) -> f64 {
    if x.is_nan() || n.is_nan() || p.is_nan() {
        return x + n + p;
    }
    if !(0.0..=1.0).contains(&p) || is_neg_or_nonint(n) {
        return domain_nan("dbinom");
    }
    if is_nonint(x) {
        warn_detail("dbinom", format_args!("non-integer x = {x}"));
        return d_0(log_p);
    }
    if x < 0.0 || !x.is_finite() {
        return d_0(log_p);
    }

    dbinom_raw(force_int(x), force_int(n), p, 1.0 - p, log_p)
}

/// Binomial distribution function.
pub fn pbinom(x: f64, n: f64, p: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || n.is_nan() || p.is_nan() {
        return x + n + p;
    }
    if !n.is_finite() || !p.is_finite() {
        return domain_nan("pbinom");
    }
    if is_nonint(n) {
        warn_detail("pbinom", format_args!("non-integer n = {n}"));
        return domain_nan("pbinom");
    }
    let n = force_int(n);
    // n = 0 is a valid point mass at zero
    if n < 0.0 || !(0.0..=1.0).contains(&p) {
        return domain_nan("pbinom");
    }

    if x < 0.0 {
        return dt_0(lower_tail, log_p);
    }
    let x = (x + 1e-7).floor();
    if n <= x {
        return dt_1(lower_tail, log_p);
    }
    pbeta(p, x + 1.0, n - x, !lower_tail, log_p)
}

/// Binomial quantile function.
pub fn qbinom(p: f64, n: f64, pr: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || n.is_nan() || pr.is_nan() {
        return p + n + pr;
    }
    if !n.is_finite() || !pr.is_finite() {
        return domain_nan("qbinom");
    }
    // p = -Inf is legitimate on the log scale
    if !p.is_finite() && !log_p {
        return domain_nan("qbinom");
    }
    if n != (n + 0.5).floor() {
        return domain_nan("qbinom");
    }
    if !(0.0..=1.0).contains(&pr) || n < 0.0 {
        return domain_nan("qbinom");
    }

    if let Boundary::Value(v) = q_p01_boundaries(p, 0.0, n, lower_tail, log_p, "qbinom") {
        return v;
    }
    if pr == 0.0 || n == 0.0 {
        return 0.0;
    }

    let q = 1.0 - pr;
    if q == 0.0 {
        return n;
    }
    let mu = n * pr;
    let sigma = (n * pr * q).sqrt();
    let gamma = (q - pr) / sigma;

    let mut p = p;
    if !lower_tail || log_p {
        // check again after the conversion (cancellation)
        p = dt_qiv(p, lower_tail, log_p);
        if p == 0.0 {
            return 0.0;
        }
        if p == 1.0 {
            return n;
        }
    }
    if p + 1.01 * DBL_EPSILON >= 1.0 {
        return n;
    }

    DiscreteSearch::new(|y| pbinom(y, n, pr, true, false), n).quantile(p, mu, sigma, gamma, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    // ========================================
    // Density
    // ========================================

    #[test]
    fn test_dbinom_exact_small_n() {
        // C(10, 3) 0.3^3 0.7^7
        let exact = 120.0 * 0.3_f64.powi(3) * 0.7_f64.powi(7);
        assert_relative_eq!(dbinom(3.0, 10.0, 0.3, false), exact, max_relative = 1e-14);
        assert_relative_eq!(dbinom(3.0, 10.0, 0.3, true), exact.ln(), max_relative = 1e-14);
        assert_relative_eq!(dbinom(0.0, 10.0, 0.3, false), 0.7_f64.powi(10), max_relative = 1e-14);
        assert_relative_eq!(dbinom(10.0, 10.0, 0.3, false), 0.3_f64.powi(10), max_relative = 1e-13);
    }

    #[test]
    fn test_dbinom_large_n() {
        // C(1e6, 5e5) / 2^1e6
        let d = dbinom(5e5, 1e6, 0.5, false);
        assert_relative_eq!(d, 7.978_843_613_317_501e-4, max_relative = 1e-12);
    }

    #[test]
    fn test_dbinom_edges() {
        assert_eq!(dbinom(0.0, 5.0, 0.0, false), 1.0);
        assert_eq!(dbinom(1.0, 5.0, 0.0, false), 0.0);
        assert_eq!(dbinom(5.0, 5.0, 1.0, false), 1.0);
        assert_eq!(dbinom(6.0, 5.0, 0.5, false), 0.0);
        assert_eq!(dbinom(-1.0, 5.0, 0.5, false), 0.0);
        assert_eq!(dbinom(1.5, 5.0, 0.5, false), 0.0);
        assert!(dbinom(1.0, 5.0, 1.5, false).is_nan());
        assert!(dbinom(1.0, 4.5, 0.5, false).is_nan());
    }

    // ========================================
    // Distribution function
    // ========================================

    #[test]
    fn test_pbinom_values() {
        // P(X <= 2), n = 4, p = 0.5: (1 + 4 + 6) / 16
        assert_relative_eq!(pbinom(2.0, 4.0, 0.5, true, false), 11.0 / 16.0, max_relative = 1e-14);
        assert_relative_eq!(pbinom(2.0, 4.0, 0.5, false, false), 5.0 / 16.0, max_relative = 1e-14);
        assert_relative_eq!(
            pbinom(2.0, 4.0, 0.5, true, true),
            (11.0_f64 / 16.0).ln(),
            max_relative = 1e-14
        );
        assert_eq!(pbinom(-0.5, 4.0, 0.5, true, false), 0.0);
        assert_eq!(pbinom(4.0, 4.0, 0.5, true, false), 1.0);
        assert_eq!(pbinom(0.0, 0.0, 0.5, true, false), 1.0);
        assert!(pbinom(1.0, 4.5, 0.5, true, false).is_nan());
    }

    // ========================================
    // Quantile
    // ========================================

    #[test]
    fn test_qbinom_inverts_pbinom() {
        for &(n, pr) in &[(10.0, 0.3), (100.0, 0.01), (1000.0, 0.9), (2e5, 0.4)] {
            for &p in &[0.001, 0.1, 0.5, 0.9, 0.999] {
                let q = qbinom(p, n, pr, true, false);
                assert!(pbinom(q, n, pr, true, false) >= p * (1.0 - 64.0 * DBL_EPSILON));
                if q > 0.0 {
                    assert!(pbinom(q - 1.0, n, pr, true, false) < p);
                }
            }
        }
    }

    #[test]
    fn test_qbinom_boundaries() {
        assert_eq!(qbinom(0.0, 10.0, 0.3, true, false), 0.0);
        assert_eq!(qbinom(1.0, 10.0, 0.3, true, false), 10.0);
        assert_eq!(qbinom(1.0, 10.0, 0.3, false, false), 0.0);
        assert_eq!(qbinom(f64::NEG_INFINITY, 10.0, 0.3, true, true), 0.0);
        assert_eq!(qbinom(0.5, 10.0, 0.0, true, false), 0.0);
        assert_eq!(qbinom(0.5, 10.0, 1.0, true, false), 10.0);
        assert!(qbinom(0.5, 10.5, 0.3, true, false).is_nan());
        assert!(qbinom(1.5, 10.0, 0.3, true, false).is_nan());
    }

    #[test]
    fn test_qbinom_upper_tail_and_log() {
        let lower = qbinom(0.25, 50.0, 0.2, true, false);
        assert_eq!(qbinom(0.75, 50.0, 0.2, false, false), lower);
        assert_eq!(qbinom(0.25_f64.ln(), 50.0, 0.2, true, true), lower);
    }

    proptest! {
        #[test]
        fn prop_pbinom_monotone(n in 1u32..200, pr in 0.01f64..0.99, x in 0u32..200) {
            let n = f64::from(n);
            let x = f64::from(x);
            prop_assert!(pbinom(x, n, pr, true, false) <= pbinom(x + 1.0, n, pr, true, false) + 1e-15);
        }
    }
}
