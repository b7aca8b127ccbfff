//! Integration tests for module exports.
//!
//! Verify that the distribution functions are reachable both through their
//! own modules and through the re-exports of `continuous` and `discrete`.

use approx::assert_relative_eq;

#[test]
fn test_continuous_exports() {
    use nmath_distributions::continuous::gamma::qgamma as qgamma_direct;
    use nmath_distributions::continuous::{
        dbeta, dcauchy, dchisq, dexp, dlnorm, dnorm, dt, dunif, pnorm_both, qgamma, NormalTail,
    };

    assert_eq!(qgamma(0.3, 2.0, 1.0, true, false), qgamma_direct(0.3, 2.0, 1.0, true, false));
    assert_relative_eq!(dnorm(0.0, 0.0, 1.0, false), 0.398_942_280_401_432_7, max_relative = 1e-15);
    assert_relative_eq!(dunif(0.5, 0.0, 2.0, false), 0.5);
    assert_relative_eq!(dexp(0.0, 2.0, false), 0.5);
    assert_relative_eq!(dbeta(0.5, 1.0, 1.0, false), 1.0);
    assert_relative_eq!(dcauchy(0.0, 0.0, 1.0, false), dt(0.0, 1.0, false), max_relative = 1e-14);
    assert!(dchisq(1.0, 3.0, false) > 0.0);
    assert!(dlnorm(1.0, 0.0, 1.0, false) > 0.0);

    let (cum, ccum) = pnorm_both(1.5, NormalTail::Both, false);
    assert_relative_eq!(cum + ccum, 1.0, epsilon = 1e-15);
}

#[test]
fn test_discrete_exports() {
    use nmath_distributions::discrete::{
        dbinom_raw, dgeom, dhyper, dmultinom, dnbinom, dpois, WilcoxCounts,
    };

    assert_relative_eq!(dbinom_raw(1.0, 2.0, 0.5, 0.5, false), 0.5, max_relative = 1e-15);
    assert_relative_eq!(dgeom(0.0, 0.3, false), 0.3, max_relative = 1e-15);
    assert_relative_eq!(dpois(0.0, 1.0, false), (-1.0_f64).exp(), max_relative = 1e-15);
    assert_relative_eq!(dnbinom(0.0, 2.0, 0.5, false), 0.25, max_relative = 1e-15);
    assert_relative_eq!(dhyper(1.0, 1.0, 1.0, 1.0, false), 0.5, max_relative = 1e-15);
    assert_relative_eq!(dmultinom(&[1.0, 1.0], &[1.0, 1.0], false), 0.5, max_relative = 1e-15);

    let mut counts = WilcoxCounts::new();
    assert_relative_eq!(counts.dwilcox(0.0, 1.0, 1.0, false), 0.5, max_relative = 1e-15);
}

#[test]
fn test_distribution_enum_export() {
    use nmath_distributions::distribution::{Distribution, DistributionError};

    let d = Distribution::from_name("pois", &[2.0]).unwrap();
    assert!(d.is_discrete());
    let err: DistributionError = Distribution::from_name("pois", &[-2.0]).unwrap_err();
    assert!(err.to_string().contains("lambda"));
}
