//! Negative binomial distribution: failures before the `size`-th success.
//!
//! Both the `(size, prob)` and the `(size, mu)` parametrisations are provided.
//! `size` need not be an integer, and `size = 0` is the point mass at zero.

use super::binom::dbinom_raw;
use super::search::DiscreteSearch;
use crate::continuous::beta::pbeta;
use crate::continuous::gamma::pgamma_raw;
use nmath_core::math::constants::{DBL_EPSILON, DBL_MAX};
use nmath_core::math::dpq::{
    d_0, d_1, d_exp, dt_0, dt_1, dt_qiv, force_int, is_nonint, q_p01_boundaries, Boundary,
};
use nmath_core::special::{bratio, dpois_raw, lgammafn};
use nmath_core::types::warning::{domain_nan, warn_detail};

fn nonint_x(routine: &'static str, x: f64) -> bool {
    if is_nonint(x) {
        warn_detail(routine, format_args!("non-integer x = {x}"));
        true
    } else {
        false
    }
}

/// Negative binomial density.
pub fn dnbinom(x: f64, size: f64, prob: f64, log_p: bool) -> f64 {
    if x.is_nan() || size.is_nan() || prob.is_nan() {
        return x + size + prob;
    }
    if prob <= 0.0 || prob > 1.0 || size < 0.0 {
        return domain_nan("dnbinom");
    }
    if nonint_x("dnbinom", x) || x < 0.0 || !x.is_finite() {
        return d_0(log_p);
    }
    // limit of size -> 0 is the point mass at zero
    if x == 0.0 && size == 0.0 {
        return d_1(log_p);
    }
    let x = force_int(x);
    let size = if size.is_finite() { size } else { DBL_MAX };

    let ans = dbinom_raw(size, x + size, prob, 1.0 - prob, log_p);
    let p = size / (size + x);
    if log_p {
        p.ln() + ans
    } else {
        p * ans
    }
}

/// Negative binomial density in the mean parametrisation.
pub fn dnbinom_mu(x: f64, size: f64, mu: f64, log_p: bool) -> f64 {
    if x.is_nan() || size.is_nan() || mu.is_nan() {
        return x + size + mu;
    }
    if mu < 0.0 || size < 0.0 {
        return domain_nan("dnbinom_mu");
    }
    if nonint_x("dnbinom_mu", x) || x < 0.0 || !x.is_finite() {
        return d_0(log_p);
    }
    if x == 0.0 && size == 0.0 {
        return d_1(log_p);
    }
    let x = force_int(x);
    if !size.is_finite() {
        // limit case: Poisson
        return dpois_raw(x, mu, log_p);
    }

    if x == 0.0 {
        let v = size
            * if size < mu {
                (size / (size + mu)).ln()
            } else {
                (-mu / (size + mu)).ln_1p()
            };
        return d_exp(v, log_p);
    }
    if x < 1e-10 * size {
        // x << size: avoid cancellation in dbinom_raw
        let p = if size < mu {
            (size / (1.0 + size / mu)).ln()
        } else {
            (mu / (1.0 + mu / size)).ln()
        };
        let v = x * p - mu - lgammafn(x + 1.0)
            + (x * (x - 1.0) / (2.0 * size)).ln_1p();
        return d_exp(v, log_p);
    }

    let p = size / (size + x);
    let ans = dbinom_raw(size, x + size, size / (size + mu), mu / (size + mu), log_p);
    if log_p {
        p.ln() + ans
    } else {
        p * ans
    }
}

/// Negative binomial distribution function.
///
/// ```
/// use nmath_distributions::discrete::nbinom::pnbinom;
///
/// // P(X = 0) = prob^size
/// assert!((pnbinom(0.0, 3.0, 0.4, true, false) - 0.064).abs() < 1e-15);
/// ```
pub fn pnbinom(x: f64, size: f64, prob: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || size.is_nan() || prob.is_nan() {
        return x + size + prob;
    }
    if !size.is_finite() || !prob.is_finite() {
        return domain_nan("pnbinom");
    }
    if size < 0.0 || prob <= 0.0 || prob > 1.0 {
        return domain_nan("pnbinom");
    }
    if size == 0.0 {
        return if x >= 0.0 {
            dt_1(lower_tail, log_p)
        } else {
            dt_0(lower_tail, log_p)
        };
    }
    if x < 0.0 {
        return dt_0(lower_tail, log_p);
    }
    if !x.is_finite() {
        return dt_1(lower_tail, log_p);
    }
    let x = (x + 1e-7).floor();
    pbeta(prob, size, x + 1.0, lower_tail, log_p)
}

/// Negative binomial distribution function in the mean parametrisation.
pub fn pnbinom_mu(x: f64, size: f64, mu: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || size.is_nan() || mu.is_nan() {
        return x + size + mu;
    }
    if !mu.is_finite() || size < 0.0 || mu < 0.0 {
        return domain_nan("pnbinom_mu");
    }
    if size == 0.0 {
        return if x >= 0.0 {
            dt_1(lower_tail, log_p)
        } else {
            dt_0(lower_tail, log_p)
        };
    }
    if x < 0.0 {
        return dt_0(lower_tail, log_p);
    }
    if !x.is_finite() {
        return dt_1(lower_tail, log_p);
    }
    let x = (x + 1e-7).floor();
    if !size.is_finite() {
        // Poisson limit
        return pgamma_raw(mu, x + 1.0, !lower_tail, log_p);
    }

    let r = bratio(size, x + 1.0, size / (size + mu), mu / (size + mu), log_p);
    if r.ierr != 0 {
        warn_detail("pnbinom_mu", format_args!("bratio() gave error code {}", r.ierr));
    }
    if lower_tail {
        r.w
    } else {
        r.w1
    }
}

/// Negative binomial quantile function.
pub fn qnbinom(p: f64, size: f64, prob: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || size.is_nan() || prob.is_nan() {
        return p + size + prob;
    }
    // both 0 is the point mass at zero
    if prob == 0.0 && size == 0.0 {
        return 0.0;
    }
    if prob <= 0.0 || prob > 1.0 || size < 0.0 {
        return domain_nan("qnbinom");
    }
    if prob == 1.0 || size == 0.0 {
        return 0.0;
    }
    if let Boundary::Value(v) =
        q_p01_boundaries(p, 0.0, f64::INFINITY, lower_tail, log_p, "qnbinom")
    {
        return v;
    }

    let q = 1.0 / prob;
    let pp = (1.0 - prob) * q;
    let mu = size * pp;
    let sigma = (size * pp * q).sqrt();
    let gamma = (q + pp) / sigma;

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

    DiscreteSearch::new(|y| pnbinom(y, size, prob, true, false), f64::INFINITY)
        .quantile(p, mu, sigma, gamma, mu)
}

/// Negative binomial quantile function in the mean parametrisation.
pub fn qnbinom_mu(p: f64, size: f64, mu: f64, lower_tail: bool, log_p: bool) -> f64 {
    if size == f64::INFINITY {
        return super::pois::qpois(p, mu, lower_tail, log_p);
    }
    qnbinom(p, size, size / (size + mu), lower_tail, log_p)
}
