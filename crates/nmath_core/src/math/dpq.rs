//! Probability-scale helpers.
//!
//! Every distribution function takes two flags: `lower_tail` selects
//! `P[X <= x]` over `P[X > x]`, and `log_p` selects log probabilities over
//! linear ones. The helpers here convert between the four representations
//! without losing precision near 0 or 1, so each algorithm can be written
//! once for a single canonical scale.
//!
//! Naming follows a small grammar: `d_*` depend on `log_p` only, `dt_*` depend
//! on both flags, and a `c` marks the complementary probability.
//!
//! Boundary handling for quantile functions returns a [`Boundary`] instead of
//! returning early from deep inside a helper.

use super::constants::M_LN2;
use crate::types::warning::domain_nan;

/// Zero probability on the `log_p` scale.
#[inline]
pub fn d_0(log_p: bool) -> f64 {
    if log_p {
        f64::NEG_INFINITY
    } else {
        0.0
    }
}

/// Unit probability on the `log_p` scale.
#[inline]
pub fn d_1(log_p: bool) -> f64 {
    if log_p {
        0.0
    } else {
        1.0
    }
}

/// One half on the `log_p` scale.
#[inline]
pub fn d_half(log_p: bool) -> f64 {
    if log_p {
        -M_LN2
    } else {
        0.5
    }
}

/// Zero probability for the requested tail.
#[inline]
pub fn dt_0(lower_tail: bool, log_p: bool) -> f64 {
    if lower_tail {
        d_0(log_p)
    } else {
        d_1(log_p)
    }
}

/// Unit probability for the requested tail.
#[inline]
pub fn dt_1(lower_tail: bool, log_p: bool) -> f64 {
    if lower_tail {
        d_1(log_p)
    } else {
        d_0(log_p)
    }
}

/// `p` if lower tail, else `1 - p` (linear scale).
#[inline]
pub fn d_lval(p: f64, lower_tail: bool) -> f64 {
    if lower_tail {
        p
    } else {
        0.5 - p + 0.5
    }
}

/// `1 - p` if lower tail, else `p` (linear scale).
#[inline]
pub fn d_cval(p: f64, lower_tail: bool) -> f64 {
    if lower_tail {
        0.5 - p + 0.5
    } else {
        p
    }
}

/// Linear probability `x` expressed on the `log_p` scale.
#[inline]
pub fn d_val(x: f64, log_p: bool) -> f64 {
    if log_p {
        x.ln()
    } else {
        x
    }
}

/// `p` given on the `log_p` scale, returned on the linear scale.
#[inline]
pub fn d_qiv(p: f64, log_p: bool) -> f64 {
    if log_p {
        p.exp()
    } else {
        p
    }
}

/// `exp(x)` on the `log_p` scale, i.e. `x` itself when `log_p`.
#[inline]
pub fn d_exp(x: f64, log_p: bool) -> f64 {
    if log_p {
        x
    } else {
        x.exp()
    }
}

/// `log(p)` for `p` given on the `log_p` scale.
#[inline]
pub fn d_log(p: f64, log_p: bool) -> f64 {
    if log_p {
        p
    } else {
        p.ln()
    }
}

/// `1 - p` on the `log_p` scale for a linear `p`.
#[inline]
pub fn d_clog(p: f64, log_p: bool) -> f64 {
    if log_p {
        (-p).ln_1p()
    } else {
        0.5 - p + 0.5
    }
}

/// `log(1 - exp(x))` for `x <= 0`, accurate over the whole range.
#[inline]
pub fn log1_exp(x: f64) -> f64 {
    if x > -M_LN2 {
        (-x.exp_m1()).ln()
    } else {
        (-x.exp()).ln_1p()
    }
}

/// `log(1 - p)` for `p` given on the `log_p` scale.
#[inline]
pub fn d_lexp(x: f64, log_p: bool) -> f64 {
    if log_p {
        log1_exp(x)
    } else {
        (-x).ln_1p()
    }
}

/// Lower-tail linear probability `x` converted to the requested tail and scale.
#[inline]
pub fn dt_val(x: f64, lower_tail: bool, log_p: bool) -> f64 {
    if lower_tail {
        d_val(x, log_p)
    } else {
        d_clog(x, log_p)
    }
}

/// Complement of [`dt_val`].
#[inline]
pub fn dt_cval(x: f64, lower_tail: bool, log_p: bool) -> f64 {
    if lower_tail {
        d_clog(x, log_p)
    } else {
        d_val(x, log_p)
    }
}

/// Lower-tail linear probability for `p` given in any tail and scale.
#[inline]
pub fn dt_qiv(p: f64, lower_tail: bool, log_p: bool) -> f64 {
    if log_p {
        if lower_tail {
            p.exp()
        } else {
            -p.exp_m1()
        }
    } else {
        d_lval(p, lower_tail)
    }
}

/// Upper-tail linear probability for `p` given in any tail and scale.
#[inline]
pub fn dt_civ(p: f64, lower_tail: bool, log_p: bool) -> f64 {
    if log_p {
        if lower_tail {
            -p.exp_m1()
        } else {
            p.exp()
        }
    } else {
        d_cval(p, lower_tail)
    }
}

/// Lower-tail probability on the `log_p` scale for a linear `x` in the requested tail.
#[inline]
pub fn dt_exp(x: f64, lower_tail: bool, log_p: bool) -> f64 {
    d_exp(d_lval(x, lower_tail), log_p)
}

/// Log of the lower-tail probability for `p` given in any tail and scale.
#[inline]
pub fn dt_log(p: f64, lower_tail: bool, log_p: bool) -> f64 {
    if lower_tail {
        d_log(p, log_p)
    } else {
        d_lexp(p, log_p)
    }
}

/// Log of the upper-tail probability for `p` given in any tail and scale.
#[inline]
pub fn dt_clog(p: f64, lower_tail: bool, log_p: bool) -> f64 {
    if lower_tail {
        d_lexp(p, log_p)
    } else {
        d_log(p, log_p)
    }
}

/// Log of the lower-tail probability for a log-scale `p`.
#[inline]
pub fn dt_log_lower(p: f64, lower_tail: bool) -> f64 {
    if lower_tail {
        p
    } else {
        log1_exp(p)
    }
}

/// `exp(x) / sqrt(f)` on the `log_p` scale.
#[inline]
pub fn d_fexp(f: f64, x: f64, log_p: bool) -> f64 {
    if log_p {
        -0.5 * f.ln() + x
    } else {
        x.exp() / f.sqrt()
    }
}

/// Round to the nearest integer, ties to even.
#[inline]
pub fn force_int(x: f64) -> f64 {
    x.round_ties_even()
}

/// `true` when `x` is not within `1e-7` (relative) of an integer.
#[inline]
pub fn is_nonint(x: f64) -> bool {
    (x - force_int(x)).abs() > 1e-7 * 1.0_f64.max(x.abs())
}

/// `true` when `x` is negative or not an integer.
#[inline]
pub fn is_neg_or_nonint(x: f64) -> bool {
    x < 0.0 || is_nonint(x)
}

/// Outcome of a quantile boundary check.
///
/// Quantile functions first resolve the probabilities at the ends of the
/// support, and only fall through to the numerical algorithm for interior
/// probabilities.
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub enum Boundary {
    /// The answer is known; no further work is needed.
    Value(f64),
    /// `p` is strictly inside the unit interval; continue with the algorithm.
    Continue,
}

impl Boundary {
    /// The resolved value, if any.
    pub fn resolved(self) -> Option<f64> {
        match self {
            Boundary::Value(v) => Some(v),
            Boundary::Continue => None,
        }
    }
}

/// Validate `p` as a probability on the `log_p` scale.
///
/// Returns `Value(NaN)` (after a domain warning) for probabilities outside
/// `[0, 1]` (or `[-Inf, 0]` on the log scale).
pub fn q_p01_check(p: f64, log_p: bool, routine: &'static str) -> Boundary {
    if (log_p && p > 0.0) || (!log_p && !(0.0..=1.0).contains(&p)) {
        Boundary::Value(domain_nan(routine))
    } else {
        Boundary::Continue
    }
}

/// Resolve `p` at the ends of the unit interval.
///
/// `left` is the quantile of lower-tail probability 0, `right` that of 1.
///
/// ```
/// use nmath_core::math::dpq::{q_p01_boundaries, Boundary};
///
/// let b = q_p01_boundaries(0.0, 0.0, f64::INFINITY, true, false, "qgamma");
/// assert_eq!(b, Boundary::Value(0.0));
/// let b = q_p01_boundaries(0.3, 0.0, f64::INFINITY, true, false, "qgamma");
/// assert_eq!(b, Boundary::Continue);
/// ```
pub fn q_p01_boundaries(
    p: f64,
    left: f64,
    right: f64,
    lower_tail: bool,
    log_p: bool,
    routine: &'static str,
) -> Boundary {
    if log_p {
        if p > 0.0 {
            return Boundary::Value(domain_nan(routine));
        }
        if p == 0.0 {
            return Boundary::Value(if lower_tail { right } else { left });
        }
        if p == f64::NEG_INFINITY {
            return Boundary::Value(if lower_tail { left } else { right });
        }
    } else {
        if !(0.0..=1.0).contains(&p) {
            return Boundary::Value(domain_nan(routine));
        }
        if p == 0.0 {
            return Boundary::Value(if lower_tail { left } else { right });
        }
        if p == 1.0 {
            return Boundary::Value(if lower_tail { right } else { left });
        }
    }
    Boundary::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tail_constants() {
        assert_eq!(dt_0(true, false), 0.0);
        assert_eq!(dt_0(false, false), 1.0);
        assert_eq!(dt_1(true, true), 0.0);
        assert_eq!(dt_1(false, true), f64::NEG_INFINITY);
        assert_relative_eq!(d_half(true), -M_LN2);
    }

    #[test]
    fn test_log1_exp_branches() {
        // Both sides of the -log(2) switch agree with the naive formula.
        for &x in &[-1e-10, -0.1, -0.69, -0.7, -5.0, -50.0] {
            let naive = (1.0 - f64::exp(x)).ln();
            assert_relative_eq!(log1_exp(x), naive, max_relative = 1e-6);
        }
        // Where the naive formula loses everything.
        assert_relative_eq!(log1_exp(-1e-20), (1e-20_f64).ln(), max_relative = 1e-12);
    }

    #[test]
    fn test_qiv_civ_are_complementary() {
        for &(lower, log_p, p) in &[
            (true, false, 0.3),
            (false, false, 0.3),
            (true, true, -1.2),
            (false, true, -1.2),
        ] {
            let sum = dt_qiv(p, lower, log_p) + dt_civ(p, lower, log_p);
            assert_relative_eq!(sum, 1.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_dt_log_and_clog() {
        assert_relative_eq!(dt_log(0.25, true, false), 0.25_f64.ln());
        assert_relative_eq!(dt_log(0.25, false, false), 0.75_f64.ln());
        assert_relative_eq!(dt_clog(0.25, true, false), 0.75_f64.ln());
        assert_relative_eq!(dt_clog(0.25_f64.ln(), false, true), 0.25_f64.ln());
    }

    #[test]
    fn test_dt_val_round_trip() {
        let x = 0.2;
        assert_relative_eq!(dt_val(x, false, false), 0.8);
        assert_relative_eq!(dt_val(x, true, true), x.ln());
        assert_relative_eq!(dt_cval(x, true, true), 0.8_f64.ln(), epsilon = 1e-15);
    }

    #[test]
    fn test_force_int_ties_to_even() {
        assert_eq!(force_int(2.5), 2.0);
        assert_eq!(force_int(3.5), 4.0);
        assert_eq!(force_int(-2.5), -2.0);
        assert_eq!(force_int(2.4), 2.0);
        assert_eq!(force_int(-2.6), -3.0);
    }

    #[test]
    fn test_nonint() {
        assert!(!is_nonint(3.0));
        assert!(!is_nonint(3.0 + 1e-9));
        assert!(is_nonint(3.1));
        assert!(is_neg_or_nonint(-1.0));
        assert!(!is_neg_or_nonint(0.0));
    }

    #[test]
    fn test_boundaries() {
        let inf = f64::INFINITY;
        assert_eq!(
            q_p01_boundaries(1.0, 0.0, inf, true, false, "t"),
            Boundary::Value(inf)
        );
        assert_eq!(
            q_p01_boundaries(1.0, 0.0, inf, false, false, "t"),
            Boundary::Value(0.0)
        );
        assert_eq!(
            q_p01_boundaries(0.0, 0.0, inf, true, true, "t"),
            Boundary::Value(inf)
        );
        assert_eq!(
            q_p01_boundaries(f64::NEG_INFINITY, 0.0, inf, true, true, "t"),
            Boundary::Value(0.0)
        );
        assert!(q_p01_boundaries(1.5, 0.0, inf, true, false, "t")
            .resolved()
            .unwrap()
            .is_nan());
        assert!(q_p01_boundaries(0.1, 0.0, inf, true, true, "t")
            .resolved()
            .unwrap()
            .is_nan());
    }

    #[test]
    fn test_p01_check() {
        assert_eq!(q_p01_check(0.5, false, "t"), Boundary::Continue);
        assert!(q_p01_check(-0.1, false, "t").resolved().unwrap().is_nan());
    }
}
