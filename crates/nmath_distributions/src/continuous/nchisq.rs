//! Noncentral chi-square distribution.
//!
//! For noncentrality below 80 the CDF is a Poisson mixture of central
//! chi-square CDFs, summed on the log scale when every term would underflow.
//! Larger noncentralities use the series of Ding (1992), AS 275, switching
//! between log and linear accumulation as the leading factors leave the
//! underflow range.

use super::chisq::{dchisq, pchisq, qchisq};
use nmath_core::math::constants::{
    DBL_EPSILON, DBL_MAX, DBL_MIN, DBL_MIN_EXP, M_LN10, M_LN2, M_LN_SQRT_2PI,
};
use nmath_core::math::dpq::{
    d_0, d_1, d_exp, d_qiv, d_val, dt_0, dt_1, dt_val, log1_exp, q_p01_boundaries, Boundary,
};
use nmath_core::math::functions::{fmax2, fmin2, logspace_add};
use nmath_core::special::{dpois_raw, lgammafn};
use nmath_core::types::warning::{domain_nan, warn, warn_detail, MathWarning};

/// `log(DBL_MIN)`, the underflow threshold on the log scale.
const DBL_MIN_EXP_LN: f64 = M_LN2 * DBL_MIN_EXP as f64;

/// Noncentrality from which the AS 275 series is used.
const LARGE_NCP: f64 = 80.0;

/// Poisson terms in the mixture; `ppois(110, 40, lower = FALSE)` is about 2e-20.
const MIXTURE_TERMS: u32 = 110;

/// Noncentral chi-square distribution function.
///
/// ```
/// use nmath_distributions::continuous::chisq::pchisq;
/// use nmath_distributions::continuous::nchisq::pnchisq;
///
/// // ncp = 0 is the central distribution
/// let p = pnchisq(3.0, 4.0, 0.0, true, false);
/// assert!((p - pchisq(3.0, 4.0, true, false)).abs() < 1e-14);
/// ```
pub fn pnchisq(x: f64, df: f64, ncp: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || df.is_nan() || ncp.is_nan() {
        return x + df + ncp;
    }
    if !df.is_finite() || !ncp.is_finite() || df < 0.0 || ncp < 0.0 {
        return domain_nan("pnchisq");
    }

    let mut ans = pnchisq_raw(x, df, ncp, 1e-12, 8.0 * DBL_EPSILON, 1_000_000, lower_tail, log_p);
    if x <= 0.0 || x == f64::INFINITY {
        return ans;
    }
    if ncp >= LARGE_NCP {
        if lower_tail {
            ans = fmin2(ans, d_1(log_p));
        } else {
            // the other tail was computed, so cancellation is likely
            if ans < (if log_p { -10.0 * M_LN10 } else { 1e-10 }) {
                warn(MathWarning::Precision, "pnchisq");
            }
            if !log_p {
                ans = fmax2(ans, 0.0);
            }
        }
    }
    if !log_p || ans < -1e-8 {
        return ans;
    }
    // exp(ans) is close to one: the other tail is more accurate
    let other = pnchisq_raw(x, df, ncp, 1e-12, 8.0 * DBL_EPSILON, 1_000_000, !lower_tail, false);
    (-other).ln_1p()
}

/// Noncentral chi-square CDF with explicit convergence controls.
///
/// `errmax` bounds the absolute truncation error and `reltol` the relative
/// size of the last term of the AS 275 series; `itrmax` caps its length.
#[allow(clippy::too_many_arguments)]
pub fn pnchisq_raw(
    x: f64,
    f: f64,
    theta: f64,
    errmax: f64,
    reltol: f64,
    itrmax: u32,
    lower_tail: bool,
    log_p: bool,
) -> f64 {
    if x <= 0.0 {
        if x == 0.0 && f == 0.0 {
            // point mass exp(-theta / 2) at zero
            let minus_lambda = -0.5 * theta;
            return if lower_tail {
                d_exp(minus_lambda, log_p)
            } else if log_p {
                log1_exp(minus_lambda)
            } else {
                -minus_lambda.exp_m1()
            };
        }
        return dt_0(lower_tail, log_p);
    }
    if !x.is_finite() {
        return dt_1(lower_tail, log_p);
    }

    if theta < LARGE_NCP {
        return poisson_mixture(x, f, theta, lower_tail, log_p);
    }

    let lam = 0.5 * theta;
    let mut lam_sml = -lam < DBL_MIN_EXP_LN;
    let mut l_lam = -1.0;
    let mut lu = -1.0;
    let mut u;
    if lam_sml {
        u = 0.0;
        lu = -lam;
        l_lam = lam.ln();
    } else {
        u = (-lam).exp();
    }

    let mut v = u;
    let x2 = 0.5 * x;
    let f2 = 0.5 * f;
    let mut fx2n = f - x;

    let mut t = x2 - f2;
    let mut lt = if f2 * DBL_EPSILON > 0.125 && t.abs() < DBL_EPSILON.sqrt() * f2 {
        // very large f with x close to f: evade cancellation
        (1.0 - t) * (2.0 - t / (f2 + 1.0)) - M_LN_SQRT_2PI - 0.5 * (f2 + 1.0).ln()
    } else {
        f2 * x2.ln() - x2 - lgammafn(f2 + 1.0)
    };

    let mut t_sml = lt < DBL_MIN_EXP_LN;
    let mut l_x = -1.0;
    let mut term;
    let mut ans;
    if t_sml {
        if x > f + theta + 5.0 * (2.0 * (f + 2.0 * theta)).sqrt() {
            // x > E[X] + 5 sd(X)
            return dt_1(lower_tail, log_p);
        }
        l_x = x.ln();
        ans = 0.0;
        term = 0.0;
        t = 0.0;
    } else {
        t = lt.exp();
        ans = v * t;
        term = ans;
    }

    let mut n: u32 = 1;
    let mut f2n = f + 2.0;
    fx2n += 2.0;
    let mut hit_itrmax = false;
    loop {
        // fx2n = f - x + 2n > 0 <=> f + 2n > x
        if fx2n > 0.0 {
            let bound = t * x / fx2n;
            // converged only if both the absolute and relative errors are small
            if bound <= errmax && term <= reltol * ans {
                break;
            }
            if n > itrmax {
                hit_itrmax = true;
                break;
            }
        }

        if lam_sml {
            lu += l_lam - (n as f64).ln();
            if lu >= DBL_MIN_EXP_LN {
                // u no longer underflows
                u = lu.exp();
                v = u;
                lam_sml = false;
            }
        } else {
            u *= lam / n as f64;
            v += u;
        }
        if t_sml {
            lt += l_x - f2n.ln();
            if lt >= DBL_MIN_EXP_LN {
                t = lt.exp();
                t_sml = false;
            }
        } else {
            t *= x / f2n;
        }
        if !lam_sml && !t_sml {
            term = v * t;
            ans += term;
        }

        n += 1;
        f2n += 2.0;
        fx2n += 2.0;
    }

    if hit_itrmax {
        warn_detail(
            "pnchisq",
            format_args!("pnchisq(x={x}, ..): not converged in {itrmax} iter."),
        );
    }
    dt_val(ans, lower_tail, log_p)
}

/// `sum_i dpois(i, theta / 2) pchisq(x, f + 2i)`, renormalised by the
/// Poisson mass actually summed.
fn poisson_mixture(x: f64, f: f64, theta: f64, lower_tail: bool, log_p: bool) -> f64 {
    let lambda = 0.5 * theta;

    // pchisq(x, f + 2i) < (x/2)^(f/2) / Gamma(f/2 + 1); below the underflow
    // threshold for every i, work on the log scale
    if lower_tail && f > 0.0 && x.ln() < M_LN2 + 2.0 / f * (lgammafn(f / 2.0 + 1.0) + DBL_MIN_EXP_LN) {
        let mut sum = f64::NEG_INFINITY;
        let mut sum2 = f64::NEG_INFINITY;
        let mut pr = -lambda;
        for i in 0..MIXTURE_TERMS {
            let i = f64::from(i);
            if i > 0.0 {
                pr += lambda.ln() - i.ln();
            }
            sum2 = logspace_add(sum2, pr);
            sum = logspace_add(sum, pr + pchisq(x, f + 2.0 * i, lower_tail, true));
            if sum2 >= -1e-15 {
                break;
            }
        }
        let ans = sum - sum2;
        return if log_p { ans } else { ans.exp() };
    }

    let mut sum = 0.0;
    let mut sum2 = 0.0;
    let mut pr = (-lambda).exp();
    for i in 0..MIXTURE_TERMS {
        let i = f64::from(i);
        if i > 0.0 {
            pr *= lambda / i;
        }
        // pr = dpois(i, lambda)
        sum2 += pr;
        sum += pr * pchisq(x, f + 2.0 * i, lower_tail, false);
        if sum2 >= 1.0 - 1e-15 {
            break;
        }
    }
    let ans = sum / sum2;
    if log_p {
        ans.ln()
    } else {
        ans
    }
}

/// Noncentral chi-square density, summed outwards from its largest term.
pub fn dnchisq(x: f64, df: f64, ncp: f64, log_p: bool) -> f64 {
    const EPS: f64 = 5e-15;

    if x.is_nan() || df.is_nan() || ncp.is_nan() {
        return x + df + ncp;
    }
    if !df.is_finite() || !ncp.is_finite() || ncp < 0.0 || df < 0.0 {
        return domain_nan("dnchisq");
    }
    if x < 0.0 {
        return d_0(log_p);
    }
    if x == 0.0 && df < 2.0 {
        return f64::INFINITY;
    }
    if ncp == 0.0 {
        return if df > 0.0 { dchisq(x, df, log_p) } else { d_0(log_p) };
    }
    if x == f64::INFINITY {
        return d_0(log_p);
    }

    let ncp2 = 0.5 * ncp;

    // index of the largest term
    let imax = ((-(2.0 + df) + ((2.0 - df) * (2.0 - df) + 4.0 * ncp * x).sqrt()) / 4.0).ceil();
    let imax = if imax < 0.0 { 0.0 } else { imax };
    let (dfmid, mid) = if imax.is_finite() {
        let dfmid = df + 2.0 * imax;
        (dfmid, dpois_raw(imax, ncp2, false) * dchisq(x, dfmid, false))
    } else {
        (df, 0.0)
    };

    if mid == 0.0 {
        // underflow; fall back to the central approximation when it helps
        if log_p || ncp > 1000.0 {
            let nl = df + ncp;
            let ic = nl / (nl + ncp);
            return dchisq(x * ic, nl * ic, log_p);
        }
        return d_0(log_p);
    }

    let mut sum = mid;
    let x2 = x * ncp2;

    // upper terms
    let mut term = mid;
    let mut d = dfmid;
    let mut i = imax;
    loop {
        i += 1.0;
        let q = x2 / i / d;
        d += 2.0;
        term *= q;
        sum += term;
        if !(q >= 1.0 || term * q > (1.0 - q) * EPS || term > 1e-10 * sum) {
            break;
        }
    }

    // lower terms
    let mut term = mid;
    let mut d = dfmid;
    let mut i = imax;
    while i != 0.0 {
        d -= 2.0;
        let q = i * d / x2;
        i -= 1.0;
        term *= q;
        sum += term;
        if q < 1.0 && term * q <= (1.0 - q) * EPS {
            break;
        }
    }
    d_val(sum, log_p)
}

/// Noncentral chi-square quantile, by bisection on [`pnchisq_raw`] from a
/// Pearson (1959) starting bracket.
pub fn qnchisq(p: f64, df: f64, ncp: f64, lower_tail: bool, log_p: bool) -> f64 {
    const ACCU: f64 = 1e-13;
    const RACC: f64 = 4.0 * DBL_EPSILON;
    // bracket search tolerances, looser than ACCU
    const EPS: f64 = 1e-11;
    const R_EPS: f64 = 1e-10;

    if p.is_nan() || df.is_nan() || ncp.is_nan() {
        return p + df + ncp;
    }
    if !df.is_finite() || df < 0.0 || ncp < 0.0 {
        return domain_nan("qnchisq");
    }
    if let Boundary::Value(v) = q_p01_boundaries(p, 0.0, f64::INFINITY, lower_tail, log_p, "qnchisq") {
        return v;
    }

    let pp = d_qiv(p, log_p);
    if pp > 1.0 - DBL_EPSILON {
        return if lower_tail { f64::INFINITY } else { 0.0 };
    }

    // Pearson's approximation, usually good to about 4 figures
    let mut ux = {
        let b = (ncp * ncp) / (df + 3.0 * ncp);
        let c = (df + 3.0 * ncp) / (df + 2.0 * ncp);
        let ff = (df + 2.0 * ncp) / (c * c);
        let ux = b + c * qchisq(p, ff, lower_tail, log_p);
        if ux < 0.0 {
            1.0
        } else {
            ux
        }
    };
    let ux0 = ux;

    let (p, lower_tail) = if !lower_tail && ncp >= LARGE_NCP {
        // pnchisq works through the lower tail here
        if pp < 1e-10 {
            warn(MathWarning::Precision, "qnchisq");
        }
        (if log_p { -p.exp_m1() } else { 0.5 - p + 0.5 }, true)
    } else {
        (pp, lower_tail)
    };

    // P(X <= x) or P(X > x) as a function increasing in x
    let below = |x: f64, errmax: f64, reltol: f64, itrmax: u32| {
        let v = pnchisq_raw(x, df, ncp, errmax, reltol, itrmax, lower_tail, false);
        if lower_tail {
            v
        } else {
            -v
        }
    };
    let target = if lower_tail { p } else { -p };

    let pp = fmin2(1.0 - DBL_EPSILON, p * (1.0 + EPS));
    let upper_target = if lower_tail { pp } else { -pp };
    while ux < DBL_MAX && below(ux, EPS, R_EPS, 10_000) < upper_target {
        ux *= 2.0;
    }
    let pp = p * (1.0 - EPS);
    let lower_target = if lower_tail { pp } else { -pp };
    let mut lx = fmin2(ux0, DBL_MAX);
    while lx > DBL_MIN && below(lx, EPS, R_EPS, 10_000) > lower_target {
        lx *= 0.5;
    }

    loop {
        let nx = 0.5 * (lx + ux);
        if below(nx, ACCU, RACC, 100_000) > target {
            ux = nx;
        } else {
            lx = nx;
        }
        if (ux - lx) / nx <= ACCU {
            break;
        }
    }
    0.5 * (ux + lx)
}
