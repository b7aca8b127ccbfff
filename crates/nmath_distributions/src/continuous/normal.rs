//! Normal distribution.
//!
//! The CDF uses Cody's rational Chebyshev approximations on three ranges of
//! `|z|`; the quantile uses Wichura's AS 241 (PPND16), accurate to about one
//! part in 10^16.

use nmath_core::math::constants::{M_1_SQRT_2PI, M_LN_SQRT_2PI, M_SQRT_32};
use nmath_core::math::dpq::{d_0, d_1, dt_0, dt_1, dt_civ, dt_qiv, q_p01_boundaries, Boundary};
use nmath_core::types::warning::domain_nan;

/// Which tails [`pnorm_both`] should compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalTail {
    /// Only `P[X <= x]`.
    Lower,
    /// Only `P[X > x]`.
    Upper,
    /// Both tails.
    Both,
}

impl NormalTail {
    fn lower(self) -> bool {
        self != NormalTail::Upper
    }

    fn upper(self) -> bool {
        self != NormalTail::Lower
    }
}

const A: [f64; 5] = [
    2.2352520354606839287,
    161.02823106855587881,
    1067.6894854603709582,
    18154.981253343561249,
    0.065682337918207449113,
];
const B: [f64; 4] = [
    47.20258190468824187,
    976.09855173777669322,
    10260.932208618978205,
    45507.789335026729956,
];
const C: [f64; 9] = [
    0.39894151208813466764,
    8.8831497943883759412,
    93.506656132177855979,
    597.27027639480026226,
    2494.5375852903726711,
    6848.1904505362823326,
    11602.651437647350124,
    9842.7148383839780218,
    1.0765576773720192317e-8,
];
const D: [f64; 8] = [
    22.266688044328115691,
    235.38790178262499861,
    1519.377599407554805,
    6485.558298266760755,
    18615.571640885098091,
    34900.952721145977266,
    38912.003286093271411,
    19685.429676859990727,
];
const P: [f64; 6] = [
    0.21589853405795699,
    0.1274011611602473639,
    0.022235277870649807,
    0.001421619193227893466,
    2.9112874951168792e-5,
    0.02307344176494017303,
];
const Q: [f64; 5] = [
    1.28426009614491121,
    0.468238212480865118,
    0.0659881378689285515,
    0.00378239633202758244,
    7.29751555083966205e-5,
];

/// Cutoff allowing exact `*` and `/`.
const SIXTEEN: f64 = 16.0;

/// Normal density with mean `mu` and standard deviation `sigma`.
///
/// ```
/// use nmath_distributions::continuous::normal::dnorm;
///
/// assert!((dnorm(0.0, 0.0, 1.0, false) - 0.3989422804014327).abs() < 1e-16);
/// ```
pub fn dnorm(x: f64, mu: f64, sigma: f64, log_p: bool) -> f64 {
    if x.is_nan() || mu.is_nan() || sigma.is_nan() {
        return x + mu + sigma;
    }
    if !sigma.is_finite() {
        return d_0(log_p);
    }
    if !x.is_finite() && mu == x {
        return f64::NAN;
    }
    if sigma <= 0.0 {
        if sigma < 0.0 {
            return domain_nan("dnorm");
        }
        return if x == mu { f64::INFINITY } else { d_0(log_p) };
    }
    let z = (x - mu) / sigma;
    if !z.is_finite() {
        return d_0(log_p);
    }
    if log_p {
        -(M_LN_SQRT_2PI + 0.5 * z * z + sigma.ln())
    } else {
        M_1_SQRT_2PI * (-0.5 * z * z).exp() / sigma
    }
}

/// Normal distribution function.
///
/// ```
/// use nmath_distributions::continuous::normal::pnorm;
///
/// assert_eq!(pnorm(0.0, 0.0, 1.0, true, false), 0.5);
/// assert!((pnorm(1.96, 0.0, 1.0, true, false) - 0.9750021048517795).abs() < 1e-15);
/// ```
pub fn pnorm(x: f64, mu: f64, sigma: f64, lower_tail: bool, log_p: bool) -> f64 {
    if x.is_nan() || mu.is_nan() || sigma.is_nan() {
        return x + mu + sigma;
    }
    if !x.is_finite() && mu == x {
        return f64::NAN;
    }
    if sigma <= 0.0 {
        if sigma < 0.0 {
            return domain_nan("pnorm");
        }
        return if x < mu {
            dt_0(lower_tail, log_p)
        } else {
            dt_1(lower_tail, log_p)
        };
    }
    let z = (x - mu) / sigma;
    if !z.is_finite() {
        return if x < mu {
            dt_0(lower_tail, log_p)
        } else {
            dt_1(lower_tail, log_p)
        };
    }

    let tail = if lower_tail {
        NormalTail::Lower
    } else {
        NormalTail::Upper
    };
    let (cum, ccum) = pnorm_both(z, tail, log_p);
    if lower_tail {
        cum
    } else {
        ccum
    }
}

/// Standard normal `(P[X <= x], P[X > x])`.
///
/// Only the tails requested by `tail` are guaranteed; the other slot may hold
/// a placeholder.
pub fn pnorm_both(x: f64, tail: NormalTail, log_p: bool) -> (f64, f64) {
    if x.is_nan() {
        return (x, x);
    }

    let eps = f64::EPSILON * 0.5;
    let lower = tail.lower();
    let upper = tail.upper();
    let mut cum = 0.0;
    let mut ccum = 0.0;

    let y = x.abs();
    if y <= 0.67448975 {
        // |x| <= qnorm(3/4)
        let (xnum, xden) = if y > eps {
            let xsq = x * x;
            let mut xnum = A[4] * xsq;
            let mut xden = xsq;
            for i in 0..3 {
                xnum = (xnum + A[i]) * xsq;
                xden = (xden + B[i]) * xsq;
            }
            (xnum, xden)
        } else {
            (0.0, 0.0)
        };

        let temp = x * (xnum + A[3]) / (xden + B[3]);
        if lower {
            cum = 0.5 + temp;
        }
        if upper {
            ccum = 0.5 - temp;
        }
        if log_p {
            if lower {
                cum = cum.ln();
            }
            if upper {
                ccum = ccum.ln();
            }
        }
    } else if y <= M_SQRT_32 {
        // qnorm(3/4) < |x| <= sqrt(32)
        let mut xnum = C[8] * y;
        let mut xden = y;
        for i in 0..7 {
            xnum = (xnum + C[i]) * y;
            xden = (xden + D[i]) * y;
        }
        let temp = (xnum + C[7]) / (xden + D[7]);

        (cum, ccum) = tail_with_del(y, x, temp, lower, upper, log_p, ccum);
        (cum, ccum) = swap_tail(x, cum, ccum, lower);
    } else if (log_p && y < 1e170)
        || (lower && -37.5193 < x && x < 8.2924)
        || (upper && -8.2924 < x && x < 37.5193)
    {
        // sqrt(32) < |x|, but not so large that both tails saturate
        let xsq = 1.0 / (x * x);
        let mut xnum = P[5] * xsq;
        let mut xden = xsq;
        for i in 0..4 {
            xnum = (xnum + P[i]) * xsq;
            xden = (xden + Q[i]) * xsq;
        }
        let mut temp = xsq * (xnum + P[4]) / (xden + Q[4]);
        temp = (M_1_SQRT_2PI - temp) / y;

        (cum, ccum) = tail_with_del(x, x, temp, lower, upper, log_p, ccum);
        (cum, ccum) = swap_tail(x, cum, ccum, lower);
    } else if x > 0.0 {
        cum = d_1(log_p);
        ccum = d_0(log_p);
    } else {
        cum = d_0(log_p);
        ccum = d_1(log_p);
    }

    (cum, ccum)
}

/// `exp(-x²/2) * temp` for the tail holding `temp`, splitting `x²` so that the
/// leading part is exact.
fn tail_with_del(
    xpar: f64,
    x: f64,
    temp: f64,
    lower: bool,
    upper: bool,
    log_p: bool,
    ccum: f64,
) -> (f64, f64) {
    let xsq = (xpar * SIXTEEN).trunc() / SIXTEEN;
    let del = (xpar - xsq) * (xpar + xsq);
    if log_p {
        let cum = (-xsq * xsq * 0.5) - del * 0.5 + temp.ln();
        let ccum = if (lower && x > 0.0) || (upper && x <= 0.0) {
            (-(-xsq * xsq * 0.5).exp() * (-del * 0.5).exp() * temp).ln_1p()
        } else {
            ccum
        };
        (cum, ccum)
    } else {
        let cum = (-xsq * xsq * 0.5).exp() * (-del * 0.5).exp() * temp;
        (cum, 1.0 - cum)
    }
}

/// Up to here `cum` holds the tail beyond `|x|`; for positive `x` that is the
/// upper tail.
fn swap_tail(x: f64, cum: f64, ccum: f64, lower: bool) -> (f64, f64) {
    if x > 0.0 {
        let temp = cum;
        let cum = if lower { ccum } else { cum };
        (cum, temp)
    } else {
        (cum, ccum)
    }
}

/// Normal quantile function (AS 241).
///
/// ```
/// use nmath_distributions::continuous::normal::qnorm;
///
/// assert!((qnorm(0.975, 0.0, 1.0, true, false) - 1.959963984540054).abs() < 1e-14);
/// assert_eq!(qnorm(0.0, 0.0, 1.0, true, false), f64::NEG_INFINITY);
/// ```
pub fn qnorm(p: f64, mu: f64, sigma: f64, lower_tail: bool, log_p: bool) -> f64 {
    if p.is_nan() || mu.is_nan() || sigma.is_nan() {
        return p + mu + sigma;
    }
    if let Boundary::Value(v) = q_p01_boundaries(
        p,
        f64::NEG_INFINITY,
        f64::INFINITY,
        lower_tail,
        log_p,
        "qnorm",
    ) {
        return v;
    }

    if sigma < 0.0 {
        return domain_nan("qnorm");
    }
    if sigma == 0.0 {
        return mu;
    }

    let p_ = dt_qiv(p, lower_tail, log_p);
    let q = p_ - 0.5;

    let val = if q.abs() <= 0.425 {
        let r = 0.180625 - q * q;
        q * (((((((r * 2509.0809287301226727 + 33430.575583588128105) * r
            + 67265.770927008700853)
            * r
            + 45921.953931549871457)
            * r
            + 13731.693765509461125)
            * r
            + 1971.5909503065514427)
            * r
            + 133.14166789178437745)
            * r
            + 3.387132872796366608)
            / (((((((r * 5226.495278852545925 + 28729.085735721942674) * r
                + 39307.89580009271061)
                * r
                + 21213.794301586595867)
                * r
                + 5394.1960214247511077)
                * r
                + 687.1870074920579083)
                * r
                + 42.313330701600911252)
                * r
                + 1.0)
    } else {
        // r = min(p, 1 - p) < 0.075
        let r = if q > 0.0 {
            dt_civ(p, lower_tail, log_p)
        } else {
            p_
        };
        let use_p = log_p && ((lower_tail && q <= 0.0) || (!lower_tail && q > 0.0));
        let mut r = (-(if use_p { p } else { r.ln() })).sqrt();

        let mut val = if r <= 5.0 {
            // min(p, 1 - p) >= exp(-25)
            r -= 1.6;
            (((((((r * 7.7454501427834140764e-4 + 0.0227238449892691845833) * r
                + 0.24178072517745061177)
                * r
                + 1.27045825245236838258)
                * r
                + 3.64784832476320460504)
                * r
                + 5.7694972214606914055)
                * r
                + 4.6303378461565452959)
                * r
                + 1.42343711074968357734)
                / (((((((r * 1.05075007164441684324e-9 + 5.475938084995344946e-4) * r
                    + 0.0151986665636164571966)
                    * r
                    + 0.14810397642748007459)
                    * r
                    + 0.68976733498510000455)
                    * r
                    + 1.6763848301838038494)
                    * r
                    + 2.05319162663775882187)
                    * r
                    + 1.0)
        } else {
            r -= 5.0;
            (((((((r * 2.01033439929228813265e-7 + 2.71155556874348757815e-5) * r
                + 0.0012426609473880784386)
                * r
                + 0.026532189526576123093)
                * r
                + 0.29656057182850489123)
                * r
                + 1.7848265399172913358)
                * r
                + 5.4637849111641143699)
                * r
                + 6.6579046435011037772)
                / (((((((r * 2.04426310338993978564e-15 + 1.4215117583164458887e-7) * r
                    + 1.8463183175100546818e-5)
                    * r
                    + 7.868691311456132591e-4)
                    * r
                    + 0.0148753612908506148525)
                    * r
                    + 0.13692988092273580531)
                    * r
                    + 0.59983220655588793769)
                    * r
                    + 1.0)
        };
        if q < 0.0 {
            val = -val;
        }
        val
    };

    mu + sigma * val
}
