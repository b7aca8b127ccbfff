//! Hypergeometric distribution.
//!
//! An urn holds `r` red and `b` black balls, `n` are drawn without
//! replacement and `x` counts the red ones drawn.

use super::binom::dbinom_raw;
use nmath_core::math::constants::DBL_EPSILON;
use nmath_core::math::dpq::{
    d_0, d_1, d_lval, dt_0, dt_1, dt_qiv, force_int, is_neg_or_nonint, is_nonint, log1_exp,
    q_p01_boundaries, Boundary,
};
use nmath_core::math::functions::{fmax2, fmin2};
use nmath_core::special::lbeta;
use nmath_core::types::warning::{domain_nan, warn_detail};

/// Below this urn size the search runs on the probability scale.
const SMALL_URN: f64 = 1000.0;

/// Hypergeometric density, as a ratio of three binomial densities.
pub fn dhyper(x: f64, r: f64, b: f64, n: f64, log_p: bool) -> f64 {
    if x.is_nan() || r.is_nan() || b.is_nan() || n.is_nan() {
        return x + r + b + n;
    }
    if is_neg_or_nonint(r) || is_neg_or_nonint(b) || is_neg_or_nonint(n) || n > r + b {
        return domain_nan("dhyper");
    }
    if x < 0.0 {
        return d_0(log_p);
    }
    if is_nonint(x) {
        warn_detail("dhyper", format_args!("non-integer x = {x}"));
        return d_0(log_p);
    }

    let x = force_int(x);
    let r = force_int(r);
    let b = force_int(b);
    let n = force_int(n);

    if n < x || r < x || n - x > b {
        return d_0(log_p);
    }
    if n == 0.0 {
        return if x == 0.0 { d_1(log_p) } else { d_0(log_p) };
    }

    let p = n / (r + b);
    let q = (r + b - n) / (r + b);

    let p1 = dbinom_raw(x, r, p, q, log_p);
    let p2 = dbinom_raw(n - x, b, p, q, log_p);
    let p3 = dbinom_raw(n, r + b, p, q, log_p);

    if log_p {
        p1 + p2 - p3
    } else {
        p1 * p2 / p3
    }
}

/// `phyper(x) / dhyper(x)` (or its log) for `x` at or left of the mode,
/// i.e. `x (r + b) <= n r`, summing the ratios of successive terms.
fn pdhyper(mut x: f64, r: f64, b: f64, n: f64, log_p: bool) -> f64 {
    let mut sum = 0.0;
    let mut term = 1.0;

    while x > 0.0 && term >= DBL_EPSILON * sum {
        term *= x * (b - n + x) / (n + 1.0 - x) / (r + 1.0 - x);
        sum += term;
        x -= 1.0;
    }

    if log_p {
        sum.ln_1p()
    } else {
        1.0 + sum
    }
}

/// Hypergeometric distribution function.
///
/// The sum runs over the shorter tail: when `x` lies right of the mode the
/// colours are exchanged and the complementary tail is summed instead.
pub fn phyper(x: f64, r: f64, b: f64, n: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || r.is_nan() || b.is_nan() || n.is_nan() {
        return x + r + b + n;
    }

    let mut x = (x + 1e-7).floor();
    let mut r = force_int(r);
    let mut b = force_int(b);
    let n = force_int(n);
    let mut lower_tail = lower_tail;

    if r < 0.0 || b < 0.0 || !(r + b).is_finite() || n < 0.0 || n > r + b {
        return domain_nan("phyper");
    }

    if x * (r + b) > n * r {
        std::mem::swap(&mut r, &mut b);
        x = n - x - 1.0;
        lower_tail = !lower_tail;
    }

    // support is max(0, n - b) ..= min(n, r)
    if x < 0.0 || x < n - b {
        return dt_0(lower_tail, log_p);
    }
    if x >= r || x >= n {
        return dt_1(lower_tail, log_p);
    }

    let d = dhyper(x, r, b, n, log_p);
    // positive in exact arithmetic, but it can underflow
    if (!log_p && d == 0.0) || (log_p && d == f64::NEG_INFINITY) {
        return dt_0(lower_tail, log_p);
    }
    let pd = pdhyper(x, r, b, n, log_p);

    if log_p {
        let lp = d + pd;
        if lower_tail {
            lp
        } else {
            log1_exp(lp)
        }
    } else {
        d_lval(d * pd, lower_tail)
    }
}

/// `log(choose(n, k))` without the integer checks.
fn lfastchoose(n: f64, k: f64) -> f64 {
    -(n + 1.0).ln() - lbeta(n - k + 1.0, k + 1.0)
}

/// Hypergeometric quantile function, by summing the density upwards from the
/// bottom of the support.
pub fn qhyper(p: f64, r: f64, b: f64, n: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || r.is_nan() || b.is_nan() || n.is_nan() {
        return p + r + b + n;
    }
    if !p.is_finite() || !r.is_finite() || !b.is_finite() || !n.is_finite() {
        return domain_nan("qhyper");
    }
    if r < 0.0 || b < 0.0 || n < 0.0 || n > r + b {
        return domain_nan("qhyper");
    }

    let mut r = force_int(r);
    let mut b = force_int(b);
    let total = r + b;
    let n = force_int(n);

    let x_start = fmax2(0.0, n - b);
    let x_end = fmin2(n, r);

    if let Boundary::Value(v) = q_p01_boundaries(p, x_start, x_end, lower_tail, log_p, "qhyper")
    {
        return v;
    }

    let mut xr = x_start;
    // black balls in the sample
    let mut xb = n - xr;

    // small urns work with the product of binomial coefficient ratios,
    // large ones on the log scale to avoid underflow
    let small = total < SMALL_URN;
    let mut term = lfastchoose(r, xr) + lfastchoose(b, xb) - lfastchoose(total, n);
    if small {
        term = term.exp();
    }
    r -= xr;
    b -= xb;

    let mut p = p;
    if !lower_tail || log_p {
        p = dt_qiv(p, lower_tail, log_p);
    }
    p *= 1.0 - 1000.0 * DBL_EPSILON;
    let mut sum = if small { term } else { term.exp() };

    while sum < p && xr < x_end {
        xr += 1.0;
        b += 1.0;
        if small {
            term *= (r / xr) * (xb / b);
        } else {
            term += (r / xr).ln() + (xb / b).ln();
        }
        sum += if small { term } else { term.exp() };
        xb -= 1.0;
        r -= 1.0;
    }
    xr
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dhyper() {
        assert_relative_eq!(dhyper(5.0, 10.0, 7.0, 8.0, false), 0.362_813_656_931_304, max_relative = 1e-13);
        assert_relative_eq!(
            dhyper(5.0, 10.0, 7.0, 8.0, true),
            0.362_813_656_931_304_f64.ln(),
            max_relative = 1e-13
        );
        // below the support
        assert_eq!(dhyper(0.0, 10.0, 7.0, 8.0, false), 0.0);
        assert_eq!(dhyper(0.0, 10.0, 7.0, 0.0, false), 1.0);
        assert!(dhyper(1.0, 10.0, 7.0, 18.0, false).is_nan());
        assert!(dhyper(1.0, 10.5, 7.0, 8.0, false).is_nan());
    }

    #[test]
    fn test_phyper_both_sides_of_mode() {
        assert_relative_eq!(phyper(5.0, 10.0, 7.0, 8.0, true, false), 0.782_188_399_835_458_7, max_relative = 1e-13);
        assert_relative_eq!(phyper(5.0, 10.0, 7.0, 8.0, false, false), 1.0 - 0.782_188_399_835_458_7, max_relative = 1e-12);
        // left of the mode, no swap
        assert_relative_eq!(phyper(20.0, 300.0, 700.0, 100.0, true, false), 0.012_444_265_273_186_703, max_relative = 1e-11);
        assert_relative_eq!(
            phyper(280.0, 3000.0, 7000.0, 1000.0, true, true),
            0.077_434_876_445_118_14_f64.ln(),
            max_relative = 1e-11
        );
        assert_eq!(phyper(0.0, 10.0, 7.0, 8.0, true, false), 0.0);
        assert_eq!(phyper(8.0, 10.0, 7.0, 8.0, true, false), 1.0);
    }

    #[test]
    fn test_qhyper() {
        assert_eq!(qhyper(0.78, 10.0, 7.0, 8.0, true, false), 5.0);
        assert_eq!(qhyper(0.79, 10.0, 7.0, 8.0, true, false), 6.0);
        assert_eq!(qhyper(0.21, 10.0, 7.0, 8.0, false, false), 6.0);
        assert_eq!(qhyper(0.0, 10.0, 7.0, 8.0, true, false), 1.0);
        assert_eq!(qhyper(1.0, 10.0, 7.0, 8.0, true, false), 8.0);
        // large urn goes through the log scale
        assert_eq!(qhyper(0.0125, 3000.0, 7000.0, 1000.0, true, false), 269.0);
        assert_eq!(qhyper(0.0775, 3000.0, 7000.0, 1000.0, true, false), 281.0);
    }
}
