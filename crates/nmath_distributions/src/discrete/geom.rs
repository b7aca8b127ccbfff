//! Geometric distribution: failures before the first success.

use super::binom::dbinom_raw;
use nmath_core::math::dpq::{
    d_0, dt_0, dt_1, dt_clog, force_int, is_nonint, log1_exp, q_p01_boundaries, q_p01_check,
    Boundary,
};
use nmath_core::math::functions::fmax2;
use nmath_core::types::warning::{domain_nan, warn_detail};

/// Geometric density.
pub fn dgeom(x: f64, p: f64, log_p: bool) -> f64 {
    if x.is_nan() || p.is_nan() {
        return x + p;
    }
    if p <= 0.0 || p > 1.0 {
        return domain_nan("dgeom");
    }
    if is_nonint(x) {
        warn_detail("dgeom", format_args!("non-integer x = {x}"));
        return d_0(log_p);
    }
    if x < 0.0 || !x.is_finite() {
        return d_0(log_p);
    }
    let x = force_int(x);

    // (1 - p)^x, stable for small p
    let prob = dbinom_raw(0.0, x, p, 1.0 - p, log_p);
    if log_p {
        p.ln() + prob
    } else {
        p * prob
    }
}

/// Geometric distribution function.
///
/// ```
/// use nmath_distributions::discrete::geom::pgeom;
///
/// assert!((pgeom(1.0, 0.5, true, false) - 0.75).abs() < 1e-15);
/// ```
pub fn pgeom(x: f64, p: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || p.is_nan() {
        return x + p;
    }
    if p <= 0.0 || p > 1.0 {
        return domain_nan("pgeom");
    }
    if x < 0.0 {
        return dt_0(lower_tail, log_p);
    }
    if !x.is_finite() {
        return dt_1(lower_tail, log_p);
    }
    let x = (x + 1e-7).floor();
    if p == 1.0 {
        return dt_1(lower_tail, log_p);
    }

    // log of the upper tail (1 - p)^(x + 1)
    let lq = (-p).ln_1p() * (x + 1.0);
    match (log_p, lower_tail) {
        (true, true) => log1_exp(lq),
        (true, false) => lq,
        (false, true) => -lq.exp_m1(),
        (false, false) => lq.exp(),
    }
}

/// Geometric quantile function.
pub fn qgeom(p: f64, prob: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || prob.is_nan() {
        return p + prob;
    }
    if prob <= 0.0 || prob > 1.0 {
        return domain_nan("qgeom");
    }
    if let Boundary::Value(v) = q_p01_check(p, log_p, "qgeom") {
        return v;
    }
    if prob == 1.0 {
        return 0.0;
    }
    if let Boundary::Value(v) =
        q_p01_boundaries(p, 0.0, f64::INFINITY, lower_tail, log_p, "qgeom")
    {
        return v;
    }

    // fuzz for left continuity, but the value must stay >= 0
    fmax2(0.0, (dt_clog(p, lower_tail, log_p) / (-prob).ln_1p() - 1.0 - 1e-12).ceil())
}
