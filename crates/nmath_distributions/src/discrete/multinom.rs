//! Multinomial probability mass.

use nmath_core::math::dpq::{d_0, d_exp, is_nonint};
use nmath_core::special::lgammafn;
use nmath_core::types::warning::domain_nan;

/// Multinomial density of the count vector `x` for cell probabilities `prob`.
///
/// `prob` must be non-negative and finite with a positive total; it is
/// normalised internally. `size` is implied by `sum(x)`. Cells with zero
/// probability must have zero counts, otherwise the mass is 0.
///
/// ```
/// use nmath_distributions::discrete::multinom::dmultinom;
///
/// // two cells reduce to the binomial
/// let d = dmultinom(&[1.0, 3.0], &[0.5, 0.5], false);
/// assert!((d - 0.25).abs() < 1e-15);
/// ```
pub fn dmultinom(x: &[f64], prob: &[f64], log_p: bool) -> f64 {
    if x.len() != prob.len() || x.is_empty() {
        return domain_nan("dmultinom");
    }
    if x.iter().chain(prob).any(|v| v.is_nan()) {
        return f64::NAN;
    }
    if prob.iter().any(|&p| p < 0.0 || !p.is_finite()) {
        return domain_nan("dmultinom");
    }
    let total: f64 = prob.iter().sum();
    if total <= 0.0 {
        return domain_nan("dmultinom");
    }
    if x.iter().any(|&v| v < 0.0 || !v.is_finite() || is_nonint(v)) {
        return domain_nan("dmultinom");
    }

    let mut size = 0.0;
    let mut r = 0.0;
    for (&xi, &pi) in x.iter().zip(prob) {
        size += xi;
        if pi == 0.0 {
            if xi != 0.0 {
                return d_0(log_p);
            }
            continue;
        }
        r += xi * (pi / total).ln() - lgammafn(xi + 1.0);
    }
    d_exp(lgammafn(size + 1.0) + r, log_p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discrete::binom::dbinom;
    use approx::assert_relative_eq;

    #[test]
    fn test_dmultinom_values() {
        // 6! / (1! 2! 3!) (1/6) (2/6)^2 (3/6)^3
        assert_relative_eq!(
            dmultinom(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], false),
            0.138_888_888_888_888_9,
            max_relative = 1e-13
        );
        assert_relative_eq!(
            dmultinom(&[4.0, 6.0], &[0.3, 0.7], true),
            dbinom(4.0, 10.0, 0.3, true),
            max_relative = 1e-13
        );
    }

    #[test]
    fn test_dmultinom_zero_cells() {
        assert_relative_eq!(dmultinom(&[2.0, 0.0], &[1.0, 0.0], false), 1.0, max_relative = 1e-15);
        assert_eq!(dmultinom(&[1.0, 1.0], &[1.0, 0.0], false), 0.0);
    }

    #[test]
    fn test_dmultinom_invalid() {
        assert!(dmultinom(&[1.0], &[0.5, 0.5], false).is_nan());
        assert!(dmultinom(&[1.0, 1.0], &[-0.5, 0.5], false).is_nan());
        assert!(dmultinom(&[1.5, 1.0], &[0.5, 0.5], false).is_nan());
        assert!(dmultinom(&[1.0, 1.0], &[0.0, 0.0], false).is_nan());
    }
}
