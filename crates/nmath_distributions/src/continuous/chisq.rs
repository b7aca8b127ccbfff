//! Central chi-square distribution, a gamma with shape `df / 2` and scale 2.

use super::gamma::{dgamma, pgamma, qgamma};

/// Chi-square density.
pub fn dchisq(x: f64, df: f64, log_p: bool) -> f64 {
    dgamma(x, df / 2.0, 2.0, log_p)
}

/// Chi-square distribution function.
///
/// ```
/// use nmath_distributions::continuous::chisq::pchisq;
///
/// // 95th percentile of chi-square(1) is 3.841459
/// assert!((pchisq(3.841458820694124, 1.0, true, false) - 0.95).abs() < 1e-14);
/// ```
pub fn pchisq(x: f64, df: f64, lower_tail: bool, log_p: bool) -> f64 {
    pgamma(x, df / 2.0, 2.0, lower_tail, log_p)
}

/// Chi-square quantile function.
pub fn qchisq(p: f64, df: f64, lower_tail: bool, log_p: bool) -> f64 {
    qgamma(p, 0.5 * df, 2.0, lower_tail, log_p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_chisq() {
        assert_relative_eq!(pchisq(2.0, 2.0, false, false), (-1.0_f64).exp(), max_relative = 1e-14);
        assert_relative_eq!(dchisq(2.0, 2.0, false), 0.5 * (-1.0_f64).exp(), max_relative = 1e-14);
        assert_relative_eq!(qchisq(0.95, 1.0, true, false), 3.841458820694124, max_relative = 1e-12);
        assert_relative_eq!(qchisq(0.05, 10.0, false, false), 18.307038053275146, max_relative = 1e-12);
    }
}
