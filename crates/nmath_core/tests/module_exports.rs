//! Integration tests for module exports.
//!
//! Verify that the public modules and types are reachable via absolute paths
//! and behave consistently across module boundaries.

use approx::assert_relative_eq;

/// Special functions are reachable from both the module and its re-exports.
#[test]
fn test_special_module_exports() {
    use nmath_core::special::gamma::lgammafn as lgamma_direct;
    use nmath_core::special::{
        bd0, beta, dpois_raw, gammafn, lbeta, lgammafn, lgammafn_sign, log1pmx, stirlerr,
    };

    assert_eq!(lgammafn(7.5), lgamma_direct(7.5));
    assert_relative_eq!(gammafn(5.0), 24.0, max_relative = 1e-14);
    assert_relative_eq!(beta(2.0, 2.0), 1.0 / 6.0, max_relative = 1e-14);
    assert_relative_eq!(lbeta(2.0, 2.0), (1.0_f64 / 6.0).ln(), max_relative = 1e-14);
    assert_eq!(lgammafn_sign(-0.5).1, -1);
    assert_eq!(bd0(3.0, 3.0), 0.0);
    assert!(stirlerr(10.0) > 0.0);
    assert!(log1pmx(0.1) < 0.0);
    assert_relative_eq!(dpois_raw(0.0, 2.0, false), (-2.0_f64).exp());
}

/// Incomplete beta result type is exported with its fields.
#[test]
fn test_toms708_exports() {
    use nmath_core::special::{bratio, IncompleteBeta};

    let r: IncompleteBeta = bratio(1.0, 1.0, 0.3, 0.7, false);
    assert!(r.is_ok());
    assert_relative_eq!(r.w, 0.3, max_relative = 1e-14);
    assert_relative_eq!(r.w1, 0.7, max_relative = 1e-14);
}

/// Solvers and their configuration are exported at `math::solvers`.
#[test]
fn test_solvers_module_exports() {
    use nmath_core::math::solvers::{BrentMinimizer, BrentSolver, Minimum, RootResult, SolverConfig};

    let config: SolverConfig<f64> = SolverConfig::new(1e-12, 200);
    let root: RootResult<f64> = BrentSolver::new(config)
        .find_root_detailed(|x| x.exp() - 2.0, 0.0, 1.0)
        .unwrap();
    assert!(root.converged);
    assert_relative_eq!(root.root, std::f64::consts::LN_2, epsilon = 1e-11);

    let min: Minimum<f64> = BrentMinimizer::new(config)
        .minimize_detailed(|x| x * x.ln(), 0.05, 1.0)
        .unwrap();
    assert_relative_eq!(min.x, (-1.0_f64).exp(), epsilon = 1e-6);
}

/// Scale helpers and boundary resolution compose.
#[test]
fn test_dpq_module_exports() {
    use nmath_core::math::dpq::{dt_0, dt_1, q_p01_boundaries, Boundary};

    let b = q_p01_boundaries(0.0, f64::NEG_INFINITY, f64::INFINITY, false, true, "q");
    assert_eq!(b.resolved(), Some(f64::NEG_INFINITY));
    assert_eq!(
        q_p01_boundaries(2.0, 0.0, 1.0, true, false, "q").resolved().map(f64::is_nan),
        Some(true)
    );
    assert_eq!(q_p01_boundaries(0.5, 0.0, 1.0, true, false, "q"), Boundary::Continue);
    assert_eq!(dt_0(false, true), 0.0);
    assert_eq!(dt_1(false, false), 0.0);
}

/// Error and warning types are exported at `types`.
#[test]
fn test_types_module_exports() {
    use nmath_core::types::warning::{domain_nan, warn};
    use nmath_core::types::{MathWarning, SamplingError, SolverError};

    warn(MathWarning::Precision, "module_exports");
    assert!(domain_nan("module_exports").is_nan());
    let err = SolverError::NoBracket { a: 0.0, b: 1.0 };
    assert!(err.to_string().contains("same sign"));
    assert_eq!(SamplingError::EmptyProbabilities.to_string(), "At least one category is required");
}
