//! Uniform distribution on `[a, b]`.

use nmath_core::math::dpq::{d_0, d_val, dt_0, dt_1, dt_qiv, q_p01_check, Boundary};
use nmath_core::types::warning::domain_nan;

/// Uniform density.
pub fn dunif(x: f64, a: f64, b: f64, log_p: bool) -> f64 {
    if x.is_nan() || a.is_nan() || b.is_nan() {
        return x + a + b;
    }
    if b <= a {
        return domain_nan("dunif");
    }
    if a <= x && x <= b {
        if log_p {
            -(b - a).ln()
        } else {
            1.0 / (b - a)
        }
    } else {
        d_0(log_p)
    }
}

/// Uniform distribution function.
pub fn punif(x: f64, a: f64, b: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || a.is_nan() || b.is_nan() {
        return x + a + b;
    }
    if b < a || !a.is_finite() || !b.is_finite() {
        return domain_nan("punif");
    }
    if x >= b {
        return dt_1(lower_tail, log_p);
    }
    if x <= a {
        return dt_0(lower_tail, log_p);
    }
    if lower_tail {
        d_val((x - a) / (b - a), log_p)
    } else {
        d_val((b - x) / (b - a), log_p)
    }
}

/// Uniform quantile function.
pub fn qunif(p: f64, a: f64, b: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || a.is_nan() || b.is_nan() {
        return p + a + b;
    }
    if let Boundary::Value(v) = q_p01_check(p, log_p, "qunif") {
        return v;
    }
    if b < a || !a.is_finite() || !b.is_finite() {
        return domain_nan("qunif");
    }
    if b == a {
        return a;
    }
    a + dt_qiv(p, lower_tail, log_p) * (b - a)
}
