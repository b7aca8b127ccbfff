//! Chebyshev series evaluation.
//!
//! Several special functions are tabulated as Chebyshev expansions on
//! `[-1, 1]`. The tables are longer than double precision needs; callers keep
//! only the leading terms returned by [`chebyshev_terms`].

use crate::types::warning::domain_nan;

/// Number of leading terms of `coefs` needed for accuracy `eta`.
///
/// Terms are dropped from the tail while their accumulated absolute value
/// stays within `eta`; the term that pushes the sum past `eta` is dropped as
/// well, which is the convention the tabulated term counts were derived with.
pub fn chebyshev_terms(coefs: &[f64], eta: f64) -> usize {
    let mut err = 0.0;
    for i in (0..coefs.len()).rev() {
        err += coefs[i].abs();
        if err > eta {
            return i;
        }
    }
    0
}

/// Evaluate the Chebyshev series `coefs` at `x` in `[-1.1, 1.1]`.
///
/// Uses the Clenshaw recurrence with the convention that the first coefficient
/// is halved.
///
/// ```
/// use nmath_core::math::chebyshev::chebyshev_eval;
///
/// // T0/2 + T1 at x = 0.5 gives 0.5 + 0.5
/// assert!((chebyshev_eval(0.5, &[1.0, 1.0]) - 1.0).abs() < 1e-15);
/// ```
pub fn chebyshev_eval(x: f64, coefs: &[f64]) -> f64 {
    let n = coefs.len();
    if !(1..=1000).contains(&n) || !(-1.1..=1.1).contains(&x) {
        return domain_nan("chebyshev_eval");
    }

    let twox = x * 2.0;
    let mut b0 = 0.0;
    let mut b1 = 0.0;
    let mut b2 = 0.0;
    for &c in coefs.iter().rev() {
        b2 = b1;
        b1 = b0;
        b0 = twox * b1 - b2 + c;
    }
    (b0 - b2) * 0.5
}
