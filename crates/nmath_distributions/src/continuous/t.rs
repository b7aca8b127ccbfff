//! Student's t distribution.
//!
//! The quantile splits on the degrees of freedom: bisection on [`pt`] for
//! `df < 1`, closed forms near `df = 1` (Cauchy) and `df = 2`, and Hill's
//! (1970) asymptotic expansion with up to ten two-term Taylor corrections
//! otherwise.

use super::beta::pbeta;
use super::cauchy::tanpi;
use super::normal::{dnorm, pnorm, qnorm};
use nmath_core::math::constants::{
    DBL_EPSILON, DBL_MANT_DIG, DBL_MAX, DBL_MIN, M_1_PI, M_1_SQRT_2PI, M_LN2, M_LN_SQRT_2PI, M_PI,
    M_PI_2,
};
use nmath_core::math::dpq::{
    d_0, d_cval, d_lexp, d_log, d_lval, d_qiv, dt_0, dt_1, dt_qiv, q_p01_boundaries, Boundary,
};
use nmath_core::math::functions::fmin2;
use nmath_core::special::{bd0, lbeta, stirlerr};
use nmath_core::types::warning::{domain_nan, warn, MathWarning};

/// t density, written with the saddle-point deviance so that it stays
/// accurate for large `n`.
pub fn dt(x: f64, n: f64, log_p: bool) -> f64 {
    if x.is_nan() || n.is_nan() {
        return x + n;
    }
    if n <= 0.0 {
        return domain_nan("dt");
    }
    if !x.is_finite() {
        return d_0(log_p);
    }
    if !n.is_finite() {
        return dnorm(x, 0.0, 1.0, log_p);
    }

    let t = -bd0(n / 2.0, (n + 1.0) / 2.0) + stirlerr((n + 1.0) / 2.0) - stirlerr(n / 2.0);
    let x2n = x * x / n;
    let large_x2n = x2n > 1.0 / DBL_EPSILON;
    let mut ax = 0.0;
    // l_x2n = log(1 + x2n) / 2
    let (l_x2n, u) = if large_x2n {
        ax = x.abs();
        let l_x2n = ax.ln() - n.ln() / 2.0;
        (l_x2n, n * l_x2n)
    } else if x2n > 0.2 {
        let l_x2n = (1.0 + x2n).ln() / 2.0;
        (l_x2n, n * l_x2n)
    } else {
        (x2n.ln_1p() / 2.0, -bd0(n / 2.0, (n + x * x) / 2.0) + x * x / 2.0)
    };

    if log_p {
        return t - u - (M_LN_SQRT_2PI + l_x2n);
    }
    let i_sqrt = if large_x2n { n.sqrt() / ax } else { (-l_x2n).exp() };
    (t - u).exp() * M_1_SQRT_2PI * i_sqrt
}

/// t distribution function, via the incomplete beta ratio.
///
/// ```
/// use nmath_distributions::continuous::t::pt;
///
/// // df = 1 is the Cauchy distribution
/// assert!((pt(1.0, 1.0, true, false) - 0.75).abs() < 1e-15);
/// ```
pub fn pt(x: f64, n: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || n.is_nan() {
        return x + n;
    }
    if n <= 0.0 {
        return domain_nan("pt");
    }
    if !x.is_finite() {
        return if x < 0.0 {
            dt_0(lower_tail, log_p)
        } else {
            dt_1(lower_tail, log_p)
        };
    }
    if !n.is_finite() {
        return pnorm(x, 0.0, 1.0, lower_tail, log_p);
    }

    let nx = 1.0 + (x / n) * x;
    let val = if nx > 1e100 {
        let lval = -0.5 * n * (2.0 * x.abs().ln() - n.ln()) - lbeta(0.5 * n, 0.5) - (0.5 * n).ln();
        if log_p {
            lval
        } else {
            lval.exp()
        }
    } else if n > x * x {
        pbeta(x * x / (n + x * x), 0.5, n / 2.0, false, log_p)
    } else {
        pbeta(1.0 / nx, n / 2.0, 0.5, true, log_p)
    };

    // val is P(|T| > |x|); take half of it, or its complement
    let lower_tail = if x <= 0.0 { !lower_tail } else { lower_tail };
    if log_p {
        if lower_tail {
            (-0.5 * val.exp()).ln_1p()
        } else {
            val - M_LN2
        }
    } else {
        d_cval(val / 2.0, lower_tail)
    }
}

/// Closeness to `df = 1` and `df = 2` for the closed forms.
const DF_EPS: f64 = 1e-12;

/// t quantile function.
///
/// ```
/// use nmath_distributions::continuous::t::qt;
///
/// assert_eq!(qt(0.5, 7.3, true, false), 0.0);
/// assert!((qt(0.975, 10.0, true, false) - 2.228138851986274).abs() < 1e-12);
/// ```
pub fn qt(p: f64, ndf: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || ndf.is_nan() {
        return p + ndf;
    }
    if let Boundary::Value(v) =
        q_p01_boundaries(p, f64::NEG_INFINITY, f64::INFINITY, lower_tail, log_p, "qt")
    {
        return v;
    }
    if ndf <= 0.0 {
        return domain_nan("qt");
    }

    if ndf < 1.0 {
        return qt_bisect(dt_qiv(p, lower_tail, log_p), ndf);
    }

    if ndf > 1e20 {
        return qnorm(p, 0.0, 1.0, lower_tail, log_p);
    }

    // may underflow; handled below
    let p_lin = d_qiv(p, log_p);

    let neg = (!lower_tail || p_lin < 0.5) && (lower_tail || p_lin > 0.5);
    let is_neg_lower = lower_tail == neg;
    // two-sided tail probability 2 min(P, 1 - P)
    let pp = if neg {
        2.0 * if log_p {
            if lower_tail {
                p_lin
            } else {
                -p.exp_m1()
            }
        } else {
            d_lval(p, lower_tail)
        }
    } else {
        2.0 * if log_p {
            if lower_tail {
                -p.exp_m1()
            } else {
                p_lin
            }
        } else {
            d_cval(p, lower_tail)
        }
    };

    let q = if (ndf - 2.0).abs() < DF_EPS {
        if pp > DBL_MIN {
            if 3.0 * pp < DBL_EPSILON {
                1.0 / pp.sqrt()
            } else if pp > 0.9 {
                (1.0 - pp) * (2.0 / (pp * (2.0 - pp))).sqrt()
            } else {
                (2.0 / (pp * (2.0 - pp)) - 2.0).sqrt()
            }
        } else if log_p {
            if is_neg_lower {
                (-p / 2.0).exp() / std::f64::consts::SQRT_2
            } else {
                1.0 / (-p.exp_m1()).sqrt()
            }
        } else {
            f64::INFINITY
        }
    } else if ndf < 1.0 + DF_EPS {
        // Cauchy
        if pp == 1.0 {
            0.0
        } else if pp > 0.0 {
            1.0 / tanpi(pp / 2.0)
        } else if log_p {
            // 1 / tan(e) ~ 1 / e
            if is_neg_lower {
                M_1_PI * (-p).exp()
            } else {
                -1.0 / (M_PI * p.exp_m1())
            }
        } else {
            f64::INFINITY
        }
    } else {
        qt_hill(p, pp, ndf, log_p, lower_tail, is_neg_lower)
    };

    if neg {
        -q
    } else {
        q
    }
}

/// Bracket and bisect [`pt`] for `df < 1`, where the expansions fail.
fn qt_bisect(p: f64, ndf: f64) -> f64 {
    const ACCU: f64 = 1e-13;
    // must exceed ACCU
    const EPS: f64 = 1e-11;

    if p > 1.0 - DBL_EPSILON {
        return f64::INFINITY;
    }
    if p == 0.5 {
        // the median; bisection would only approach it
        return 0.0;
    }

    let mut pp = fmin2(1.0 - DBL_EPSILON, p * (1.0 + EPS));
    let mut ux = 1.0;
    while ux < DBL_MAX && pt(ux, ndf, true, false) < pp {
        ux *= 2.0;
    }
    pp = p * (1.0 - EPS);
    let mut lx = -1.0;
    while lx > -DBL_MAX && pt(lx, ndf, true, false) > pp {
        lx *= 2.0;
    }

    let mut iter = 0;
    loop {
        let nx = 0.5 * (lx + ux);
        if pt(nx, ndf, true, false) > p {
            ux = nx;
        } else {
            lx = nx;
        }
        iter += 1;
        if (ux - lx) / nx.abs() <= ACCU || iter >= 1000 {
            break;
        }
    }
    if iter >= 1000 {
        warn(MathWarning::Precision, "qt");
    }
    0.5 * (lx + ux)
}

/// Hill's algorithm 396 for `|q|`, given the two-sided probability `pp`.
fn qt_hill(p: f64, pp: f64, ndf: f64, log_p: bool, lower_tail: bool, is_neg_lower: bool) -> f64 {
    let a = 1.0 / (ndf - 0.5);
    let b = 48.0 / (a * a);
    let mut c = ((20700.0 * a / b - 98.0) * a - 16.0) * a + 96.36;
    let d = ((94.5 / (b + c) - 3.0) / b + 1.0) * (a * M_PI_2).sqrt() * ndf;

    let p_ok1 = pp > DBL_MIN || !log_p;
    let mut p_ok = p_ok1;
    let mut x = 0.0;
    let mut y = 0.0;
    let mut log_p2 = 0.0;
    if p_ok1 {
        y = (d * pp).powf(2.0 / ndf);
        p_ok = y >= DBL_EPSILON;
    }
    if !p_ok {
        // log(pp / 2)
        log_p2 = if is_neg_lower { d_log(p, log_p) } else { d_lexp(p, log_p) };
        x = (d.ln() + M_LN2 + log_p2) / ndf;
        y = (2.0 * x).exp();
    }

    let mut q = if (ndf < 2.1 && pp > 0.5) || y > 0.05 + a {
        // asymptotic inverse expansion about the normal
        x = if p_ok {
            qnorm(0.5 * pp, 0.0, 1.0, true, false)
        } else {
            qnorm(log_p2, 0.0, 1.0, lower_tail, true)
        };
        let y = x * x;
        if ndf < 5.0 {
            c += 0.3 * (ndf - 4.5) * (x + 0.6);
        }
        c = (((0.05 * d * x - 5.0) * x - 7.0) * x - 2.0) * x + b + c;
        let y = (((((0.4 * y + 6.3) * y + 36.0) * y + 94.5) / c - y - 3.0) / b + 1.0) * x;
        let y = (a * y * y).exp_m1();
        (ndf * y).sqrt()
    } else if !p_ok && x < -M_LN2 * DBL_MANT_DIG as f64 {
        // y above might underflow
        ndf.sqrt() * (-x).exp()
    } else {
        let y = ((1.0 / (((ndf + 6.0) / (ndf * y) - 0.089 * d - 0.822) * (ndf + 2.0) * 3.0)
            + 0.5 / (ndf + 4.0))
            * y
            - 1.0)
            * (ndf + 1.0)
            / (ndf + 2.0)
            + 1.0 / y;
        (ndf * y).sqrt()
    };

    if p_ok1 {
        // two-term Taylor expansion (Hill 1981); one term would be Newton
        for _ in 0..10 {
            let y = dt(q, ndf, false);
            if y <= 0.0 {
                break;
            }
            let x = (pt(q, ndf, false, false) - pp / 2.0) / y;
            if !x.is_finite() || x.abs() <= 1e-14 * q.abs() {
                break;
            }
            q += x * (1.0 + x * q * (ndf + 1.0) / (2.0 * (q * q + ndf)));
        }
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_dt_matches_closed_forms() {
        // df = 1: Cauchy density
        assert_relative_eq!(dt(0.7, 1.0, false), 1.0 / (M_PI * 1.49), max_relative = 1e-14);
        // df = 2: (2 + x^2)^(-3/2)
        let x: f64 = 1.3;
        assert_relative_eq!(dt(x, 2.0, false), (2.0 + x * x).powf(-1.5), max_relative = 1e-14);
        assert_relative_eq!(dt(x, 2.0, true), -1.5 * (2.0 + x * x).ln(), max_relative = 1e-14);
        // huge x: the density underflows but its log does not
        assert_eq!(dt(1e200, 2.0, false), 0.0);
        assert_relative_eq!(dt(1e200, 2.0, true), -600.0 * std::f64::consts::LN_10, max_relative = 1e-12);
        assert_eq!(dt(f64::INFINITY, 3.0, false), 0.0);
        assert_relative_eq!(dt(0.4, f64::INFINITY, false), dnorm(0.4, 0.0, 1.0, false));
    }

    #[test]
    fn test_pt_values() {
        assert_eq!(pt(0.0, 3.0, true, false), 0.5);
        // df = 2: 1/2 + x / (2 sqrt(2 + x^2))
        let x: f64 = 1.7;
        assert_relative_eq!(pt(x, 2.0, true, false), 0.5 + x / (2.0 * (2.0 + x * x).sqrt()), max_relative = 1e-14);
        assert_relative_eq!(pt(-x, 2.0, true, false), 0.5 - x / (2.0 * (2.0 + x * x).sqrt()), max_relative = 1e-13);
        assert_relative_eq!(pt(x, 2.0, false, true), (0.5 - x / (2.0 * (2.0 + x * x).sqrt())).ln(), max_relative = 1e-13);
        assert_eq!(pt(f64::NEG_INFINITY, 3.0, true, false), 0.0);
        assert!(pt(1.0, 0.0, true, false).is_nan());
    }

    #[test]
    fn test_qt_each_branch() {
        // df = 1 and df = 2 closed forms
        assert_relative_eq!(qt(0.75, 1.0, true, false), 1.0, max_relative = 1e-14);
        let q = qt(0.9, 2.0, true, false);
        assert_relative_eq!(pt(q, 2.0, true, false), 0.9, max_relative = 1e-14);
        // Hill's expansion, both sub-branches
        for &(p, df) in &[(0.975, 10.0), (0.6, 3.5), (1e-8, 4.0), (0.999999, 1.3)] {
            let q = qt(p, df, true, false);
            assert_relative_eq!(pt(q, df, true, false), p, max_relative = 1e-10);
        }
        // bisection for df < 1
        let q = qt(0.9, 0.4, true, false);
        assert_relative_eq!(pt(q, 0.4, true, false), 0.9, max_relative = 1e-10);
    }

    #[test]
    fn test_qt_symmetry_and_tails() {
        assert_relative_eq!(qt(0.1, 5.0, true, false), -qt(0.9, 5.0, true, false), max_relative = 1e-13);
        assert_relative_eq!(qt(0.1, 5.0, false, false), qt(0.9, 5.0, true, false), max_relative = 1e-13);
        let lq = qt(-30.0, 6.0, true, true);
        assert_relative_eq!(pt(lq, 6.0, true, true), -30.0, max_relative = 1e-8);
        assert_eq!(qt(0.0, 5.0, true, false), f64::NEG_INFINITY);
        assert_eq!(qt(1.0, 5.0, true, false), f64::INFINITY);
        assert!(qt(0.5, -1.0, true, false).is_nan());
    }

    #[test]
    fn test_qt_large_df_is_normal() {
        assert_eq!(qt(0.3, 1e25, true, false), qnorm(0.3, 0.0, 1.0, true, false));
    }

    proptest! {
        #[test]
        fn prop_qt_median_is_zero(df in 0.05f64..1e6) {
            prop_assert_eq!(qt(0.5, df, true, false), 0.0);
            prop_assert_eq!(qt(0.5, df, false, false), 0.0);
        }
    }
}
