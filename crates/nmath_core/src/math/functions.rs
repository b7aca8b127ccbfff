//! Small NaN-aware numeric helpers.

/// Maximum of two values, propagating `NaN`.
///
/// Unlike [`f64::max`], a `NaN` in either argument yields `NaN`.
#[inline]
pub fn fmax2(x: f64, y: f64) -> f64 {
    if x.is_nan() || y.is_nan() {
        return x + y;
    }
    if x < y {
        y
    } else {
        x
    }
}

/// Minimum of two values, propagating `NaN`.
#[inline]
pub fn fmin2(x: f64, y: f64) -> f64 {
    if x.is_nan() || y.is_nan() {
        return x + y;
    }
    if x < y {
        x
    } else {
        y
    }
}

/// `|x|` with the sign of `y`.
#[inline]
pub fn fsign(x: f64, y: f64) -> f64 {
    if x.is_nan() || y.is_nan() {
        return x + y;
    }
    if y >= 0.0 {
        x.abs()
    } else {
        -x.abs()
    }
}

/// `x^n` for integer `n` by repeated squaring.
#[inline]
pub fn pow_di(x: f64, n: i32) -> f64 {
    if x.is_nan() {
        return x;
    }
    if n == 0 {
        return 1.0;
    }
    if !x.is_finite() {
        return x.powi(n);
    }
    let mut n = n;
    let mut x = x;
    if n < 0 {
        n = -n;
        x = 1.0 / x;
    }
    let mut pow = 1.0;
    loop {
        if n & 1 != 0 {
            pow *= x;
        }
        n >>= 1;
        if n == 0 {
            break;
        }
        x *= x;
    }
    pow
}

/// `log(exp(logx) + exp(logy))` without overflow.
#[inline]
pub fn logspace_add(logx: f64, logy: f64) -> f64 {
    fmax2(logx, logy) + (-(logx - logy).abs()).exp().ln_1p()
}

/// `log(exp(logx) - exp(logy))` for `logx >= logy`.
#[inline]
pub fn logspace_sub(logx: f64, logy: f64) -> f64 {
    logx + super::dpq::log1_exp(logy - logx)
}

/// `log(sum(exp(logx)))` over a slice.
pub fn logspace_sum(logx: &[f64]) -> f64 {
    match logx.len() {
        0 => f64::NEG_INFINITY,
        1 => logx[0],
        2 => logspace_add(logx[0], logx[1]),
        _ => {
            let mx = logx.iter().copied().fold(f64::NEG_INFINITY, fmax2);
            if !mx.is_finite() {
                return mx;
            }
            let s: f64 = logx.iter().map(|&l| (l - mx).exp()).sum();
            mx + s.ln()
        }
    }
}
