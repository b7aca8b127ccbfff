//! Cauchy distribution.

use nmath_core::math::constants::M_PI;
use nmath_core::math::dpq::{d_clog, d_val, dt_0, dt_1, q_p01_check, Boundary};
use nmath_core::types::warning::domain_nan;

/// Cauchy density.
pub fn dcauchy(x: f64, location: f64, scale: f64, log_p: bool) -> f64 {
    if x.is_nan() || location.is_nan() || scale.is_nan() {
        return x + location + scale;
    }
    if scale <= 0.0 {
        return domain_nan("dcauchy");
    }
    let y = (x - location) / scale;
    if log_p {
        -(M_PI * scale * (1.0 + y * y)).ln()
    } else {
        1.0 / (M_PI * scale * (1.0 + y * y))
    }
}

/// Cauchy distribution function.
///
/// Far in the tails `atan(1 / x) / π` is used instead of `1/2 + atan(x) / π`.
pub fn pcauchy(x: f64, location: f64, scale: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || location.is_nan() || scale.is_nan() {
        return x + location + scale;
    }
    if scale <= 0.0 {
        return domain_nan("pcauchy");
    }
    let mut x = (x - location) / scale;
    if x.is_nan() {
        return domain_nan("pcauchy");
    }
    if !x.is_finite() {
        return if x < 0.0 {
            dt_0(lower_tail, log_p)
        } else {
            dt_1(lower_tail, log_p)
        };
    }
    if !lower_tail {
        x = -x;
    }
    if x.abs() > 1.0 {
        let y = (1.0 / x).atan() / M_PI;
        if x > 0.0 {
            d_clog(y, log_p)
        } else {
            d_val(-y, log_p)
        }
    } else {
        d_val(0.5 + x.atan() / M_PI, log_p)
    }
}

/// Cauchy quantile function.
pub fn qcauchy(p: f64, location: f64, scale: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || location.is_nan() || scale.is_nan() {
        return p + location + scale;
    }
    if let Boundary::Value(v) = q_p01_check(p, log_p, "qcauchy") {
        return v;
    }
    if scale <= 0.0 || !scale.is_finite() {
        if scale == 0.0 {
            return location;
        }
        return domain_nan("qcauchy");
    }

    let mut p = p;
    let mut lower_tail = lower_tail;
    if log_p {
        if p > -1.0 {
            // 1 / tan(-0) is -Inf
            if p == 0.0 {
                return location + (if lower_tail { scale } else { -scale }) * f64::INFINITY;
            }
            lower_tail = !lower_tail;
            p = -p.exp_m1();
        } else {
            p = p.exp();
        }
    } else if p > 0.5 {
        if p == 1.0 {
            return location + (if lower_tail { scale } else { -scale }) * f64::INFINITY;
        }
        p = 1.0 - p;
        lower_tail = !lower_tail;
    }

    if p == 0.5 {
        return location;
    }
    if p == 0.0 {
        return location + (if lower_tail { scale } else { -scale }) * f64::NEG_INFINITY;
    }
    location + (if lower_tail { -scale } else { scale }) / tanpi(p)
}

/// `tan(π x)`, exact at multiples of 1/4.
pub(crate) fn tanpi(x: f64) -> f64 {
    if x.is_nan() || !x.is_finite() {
        return f64::NAN;
    }
    // tan has period 1 in units of π
    let mut x = x % 1.0;
    if x <= -0.5 {
        x += 1.0;
    } else if x > 0.5 {
        x -= 1.0;
    }
    if x == 0.0 {
        0.0
    } else if x == 0.5 {
        f64::NAN
    } else if x == 0.25 {
        1.0
    } else if x == -0.25 {
        -1.0
    } else {
        (M_PI * x).tan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cauchy_cdf_and_quantile() {
        assert_eq!(pcauchy(0.0, 0.0, 1.0, true, false), 0.5);
        assert_relative_eq!(pcauchy(1.0, 0.0, 1.0, true, false), 0.75, max_relative = 1e-15);
        // far tail keeps relative accuracy
        assert_relative_eq!(pcauchy(1e10, 0.0, 1.0, false, false), 1.0 / (M_PI * 1e10), max_relative = 1e-12);
        assert_relative_eq!(qcauchy(0.75, 0.0, 1.0, true, false), 1.0, max_relative = 1e-15);
        assert_relative_eq!(qcauchy(0.25, 2.0, 3.0, true, false), -1.0, max_relative = 1e-15);
        assert_relative_eq!(qcauchy(0.75_f64.ln(), 0.0, 1.0, true, true), 1.0, max_relative = 1e-14);
        assert_eq!(qcauchy(0.5, 3.0, 2.0, true, false), 3.0);
        assert_eq!(qcauchy(1.0, 0.0, 1.0, true, false), f64::INFINITY);
        assert_eq!(qcauchy(0.0, 0.0, 1.0, true, false), f64::NEG_INFINITY);
    }

    #[test]
    fn test_dcauchy() {
        assert_relative_eq!(dcauchy(0.0, 0.0, 1.0, false), 1.0 / M_PI);
        assert_relative_eq!(dcauchy(1.0, 0.0, 2.0, true), -(M_PI * 2.0 * 1.25).ln());
        assert!(dcauchy(1.0, 0.0, -1.0, false).is_nan());
    }

    #[test]
    fn test_tanpi() {
        assert_eq!(tanpi(0.25), 1.0);
        assert_eq!(tanpi(-0.75), 1.0);
        assert_eq!(tanpi(1.0), 0.0);
        assert_relative_eq!(tanpi(0.1), (M_PI * 0.1).tan());
    }
}
