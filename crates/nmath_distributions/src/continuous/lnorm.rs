//! Log-normal distribution: `log(X)` is normal with mean `meanlog` and
//! standard deviation `sdlog`.

use super::normal::{pnorm, qnorm};
use nmath_core::math::constants::{M_1_SQRT_2PI, M_LN_SQRT_2PI};
use nmath_core::math::dpq::{d_0, dt_0, q_p01_boundaries, Boundary};
use nmath_core::types::warning::domain_nan;

/// Log-normal density.
pub fn dlnorm(x: f64, meanlog: f64, sdlog: f64, log_p: bool) -> f64 {
    if x.is_nan() || meanlog.is_nan() || sdlog.is_nan() {
        return x + meanlog + sdlog;
    }
    if sdlog < 0.0 {
        return domain_nan("dlnorm");
    }
    if sdlog == 0.0 {
        return if x.ln() == meanlog {
            f64::INFINITY
        } else {
            d_0(log_p)
        };
    }
    if x <= 0.0 {
        return d_0(log_p);
    }

    let y = (x.ln() - meanlog) / sdlog;
    if log_p {
        -(M_LN_SQRT_2PI + 0.5 * y * y + (x * sdlog).ln())
    } else {
        M_1_SQRT_2PI * (-0.5 * y * y).exp() / (x * sdlog)
    }
}

/// Log-normal distribution function.
pub fn plnorm(x: f64, meanlog: f64, sdlog: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || meanlog.is_nan() || sdlog.is_nan() {
        return x + meanlog + sdlog;
    }
    if sdlog < 0.0 {
        return domain_nan("plnorm");
    }
    if x > 0.0 {
        return pnorm(x.ln(), meanlog, sdlog, lower_tail, log_p);
    }
    dt_0(lower_tail, log_p)
}

/// Log-normal quantile function.
pub fn qlnorm(p: f64, meanlog: f64, sdlog: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || meanlog.is_nan() || sdlog.is_nan() {
        return p + meanlog + sdlog;
    }
    if let Boundary::Value(v) = q_p01_boundaries(p, 0.0, f64::INFINITY, lower_tail, log_p, "qlnorm") {
        return v;
    }
    qnorm(p, meanlog, sdlog, lower_tail, log_p).exp()
}
