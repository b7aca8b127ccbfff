//! Exponential distribution, parametrised by `scale = 1 / rate`.

use nmath_core::math::dpq::{d_0, d_exp, dt_0, dt_clog, log1_exp, q_p01_check, Boundary};
use nmath_core::types::warning::domain_nan;

/// Exponential density.
pub fn dexp(x: f64, scale: f64, log_p: bool) -> f64 {
    if x.is_nan() || scale.is_nan() {
        return x + scale;
    }
    if scale <= 0.0 {
        return domain_nan("dexp");
    }
    if x < 0.0 {
        return d_0(log_p);
    }
    if log_p {
        (-x / scale) - scale.ln()
    } else {
        (-x / scale).exp() / scale
    }
}

/// Exponential distribution function.
///
/// ```
/// use nmath_distributions::continuous::exp::pexp;
///
/// assert!((pexp(1.0, 1.0, false, true) + 1.0).abs() < 1e-15);
/// ```
pub fn pexp(x: f64, scale: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || scale.is_nan() {
        return x + scale;
    }
    if scale < 0.0 {
        return domain_nan("pexp");
    }
    if x <= 0.0 {
        return dt_0(lower_tail, log_p);
    }
    let x = -(x / scale);
    if lower_tail {
        if log_p {
            log1_exp(x)
        } else {
            -x.exp_m1()
        }
    } else {
        d_exp(x, log_p)
    }
}

/// Exponential quantile function.
pub fn qexp(p: f64, scale: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || scale.is_nan() {
        return p + scale;
    }
    if scale < 0.0 {
        return domain_nan("qexp");
    }
    if let Boundary::Value(v) = q_p01_check(p, log_p, "qexp") {
        return v;
    }
    if p == dt_0(lower_tail, log_p) {
        return 0.0;
    }
    -scale * dt_clog(p, lower_tail, log_p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exp_functions() {
        assert_relative_eq!(dexp(2.0, 0.5, false), 2.0 * (-4.0_f64).exp(), max_relative = 1e-15);
        assert_relative_eq!(dexp(2.0, 0.5, true), 2.0_f64.ln() - 4.0, max_relative = 1e-15);
        assert_relative_eq!(pexp(1e-20, 1.0, true, false), 1e-20, max_relative = 1e-15);
        assert_relative_eq!(pexp(3.0, 2.0, false, false), (-1.5_f64).exp(), max_relative = 1e-15);
        assert_relative_eq!(qexp(pexp(0.7, 3.0, true, false), 3.0, true, false), 0.7, max_relative = 1e-14);
        assert_relative_eq!(qexp(-50.0, 1.0, false, true), 50.0, max_relative = 1e-15);
    }

    #[test]
    fn test_exp_edges() {
        assert_eq!(dexp(-1.0, 1.0, false), 0.0);
        assert_eq!(pexp(-1.0, 1.0, false, false), 1.0);
        assert_eq!(qexp(0.0, 1.0, true, false), 0.0);
        assert_eq!(qexp(1.0, 1.0, true, false), f64::INFINITY);
        assert!(qexp(1.5, 1.0, true, false).is_nan());
        assert!(dexp(1.0, 0.0, false).is_nan());
    }
}
