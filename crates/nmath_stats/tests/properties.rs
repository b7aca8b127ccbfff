//! Property tests for the vector utilities.
//!
//! Checks shape invariants that hold for arbitrary data: interpolants stay
//! between neighbouring knots, splines reproduce their knots, distances are
//! metrics and correlations lie in `[-1, 1]`.

use approx::assert_relative_eq;
use nmath_stats::{
    approx, cor, cov, dist, Approx, ApproxOptions, CubicSpline, DistanceMethod, Matrix,
    MissingPolicy, SplineMethod,
};
use proptest::prelude::*;

/// Strictly increasing abscissae built from positive gaps.
fn increasing(gaps: &[f64]) -> Vec<f64> {
    gaps.iter()
        .scan(0.0, |acc, g| {
            *acc += g;
            Some(*acc)
        })
        .collect()
}

// ========================================
// Interpolation
// ========================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_linear_between_neighbours(
        gaps in prop::collection::vec(0.01f64..5.0, 2..20),
        ys in prop::collection::vec(-100.0f64..100.0, 20),
        t in 0.0f64..1.0,
    ) {
        let x = increasing(&gaps);
        let y = &ys[..x.len()];
        let a = Approx::new(&x, y, &ApproxOptions::default()).unwrap();
        let v = x[0] + t * (x[x.len() - 1] - x[0]);
        let i = x.partition_point(|&k| k <= v).clamp(1, x.len() - 1);
        let (lo, hi) = (y[i - 1].min(y[i]), y[i - 1].max(y[i]));
        let out = a.eval(v);
        prop_assert!(out >= lo - 1e-9 && out <= hi + 1e-9);
    }

    #[test]
    fn prop_splines_reproduce_knots(
        gaps in prop::collection::vec(0.05f64..3.0, 2..15),
        ys in prop::collection::vec(-10.0f64..10.0, 15),
    ) {
        let x = increasing(&gaps);
        let y = &ys[..x.len()];
        for method in [SplineMethod::Natural, SplineMethod::Fmm] {
            let s = CubicSpline::from_sorted(method, &x, y).unwrap();
            for (xi, yi) in x.iter().zip(y) {
                prop_assert!((s.eval(*xi) - yi).abs() <= 1e-8 * (1.0 + yi.abs()));
            }
        }
    }
}

// ========================================
// Distances and correlation
// ========================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_euclidean_is_a_metric(
        data in prop::collection::vec(-50.0f64..50.0, 5 * 3),
    ) {
        let x = Matrix::new(data, 5, 3).unwrap();
        let d = dist(&x, DistanceMethod::Euclidean).unwrap();
        for i in 0..5 {
            for j in 0..5 {
                prop_assert_eq!(d.get(i, j), d.get(j, i));
                prop_assert!(d.get(i, j) >= 0.0);
                for k in 0..5 {
                    prop_assert!(d.get(i, k) <= d.get(i, j) + d.get(j, k) + 1e-9);
                }
            }
        }
    }

    #[test]
    fn prop_correlation_bounded(
        data in prop::collection::vec(-10.0f64..10.0, 8 * 3),
    ) {
        let x = Matrix::new(data, 8, 3).unwrap();
        let r = cor(&x, None, MissingPolicy::Everything).unwrap();
        for v in r.as_slice() {
            prop_assert!(v.is_nan() || (*v >= -1.0 - 1e-12 && *v <= 1.0));
        }
    }
}

#[test]
fn test_approx_matches_spline_on_lines() {
    // on collinear knots every method collapses to the line
    let x = [0.0, 1.0, 2.5, 4.0, 7.0];
    let y: Vec<f64> = x.iter().map(|v| 2.0 * v - 1.0).collect();
    let xout = [0.3, 1.7, 3.9, 6.5];
    let lin = approx(&x, &y, &xout, &ApproxOptions::default()).unwrap();
    for method in [SplineMethod::Natural, SplineMethod::Fmm] {
        let s = CubicSpline::new(method, &x, &y).unwrap();
        for (u, l) in xout.iter().zip(&lin) {
            assert_relative_eq!(s.eval(*u), *l, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_covariance_diagonal_matches_distance_spread() {
    // squared pairwise differences sum to n (n - 1) times the variance
    let values = [1.0, 4.0, 2.0, 8.0, 5.0];
    let n = values.len() as f64;
    let x = Matrix::column_vector(&values);
    let var = cov(&x, None, MissingPolicy::Everything).unwrap().get(0, 0);
    let d = dist(&x, DistanceMethod::Euclidean).unwrap();
    let sum_sq: f64 = d.as_slice().iter().map(|v| v * v).sum();
    assert_relative_eq!(sum_sq, n * (n - 1.0) * var, max_relative = 1e-13);
}
