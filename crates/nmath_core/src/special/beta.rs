//! Beta function and its logarithm.

use super::gamma::{gammafn, lgammacor, lgammafn};
use crate::math::constants::M_LN_SQRT_2PI;
use crate::types::warning::domain_nan;

/// Above this `a + b`, `Γ(a + b)` overflows and `beta` goes through `lbeta`.
const BETA_XMAX: f64 = 171.61447887182298;

/// `B(a, b) = Γ(a) Γ(b) / Γ(a + b)`.
///
/// ```
/// use nmath_core::special::beta;
///
/// assert!((beta(2.0, 3.0) - 1.0 / 12.0).abs() < 1e-15);
/// ```
pub fn beta(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        return a + b;
    }
    if a < 0.0 || b < 0.0 {
        return domain_nan("beta");
    }
    if a == 0.0 || b == 0.0 {
        return f64::INFINITY;
    }
    if !a.is_finite() || !b.is_finite() {
        return 0.0;
    }

    if a + b < BETA_XMAX {
        (1.0 / gammafn(a + b)) * (gammafn(a) * gammafn(b))
    } else {
        lbeta(a, b).exp()
    }
}

/// `log B(a, b)`.
///
/// Splits on the smaller (`p`) and larger (`q`) argument so that the Stirling
/// corrections from [`lgammacor`] cancel instead of the full log-gammas.
pub fn lbeta(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        return a + b;
    }
    let p = a.min(b);
    let q = a.max(b);

    if p < 0.0 {
        return domain_nan("lbeta");
    }
    if p == 0.0 {
        return f64::INFINITY;
    }
    if !q.is_finite() {
        return f64::NEG_INFINITY;
    }

    if p >= 10.0 {
        let corr = lgammacor(p) + lgammacor(q) - lgammacor(p + q);
        q.ln() * -0.5
            + M_LN_SQRT_2PI
            + corr
            + (p - 0.5) * (p / (p + q)).ln()
            + q * (-p / (p + q)).ln_1p()
    } else if q >= 10.0 {
        let corr = lgammacor(q) - lgammacor(p + q);
        lgammafn(p) + corr + p - p * (p + q).ln() + (q - 0.5) * (-p / (p + q)).ln_1p()
    } else if p < 1e-306 {
        lgammafn(p) + (lgammafn(q) - lgammafn(p + q))
    } else {
        (gammafn(p) * (gammafn(q) / gammafn(p + q))).ln()
    }
}
