//! # nmath_stats: Vector-Level Numeric Utilities
//!
//! ## Layer 4 (Vector Utilities) Role
//!
//! nmath_stats works on whole vectors and matrices rather than scalars:
//! - Piecewise-linear and piecewise-constant interpolation (`interpolate`)
//! - Interpolating cubic splines with periodic, natural and fmm end
//!   conditions (`spline`)
//! - Pairwise distances between observations (`distance`)
//! - Covariance and correlation under several missing-value policies (`covcor`)
//! - A column-major [`Matrix`] of observations
//!
//! ## Missing Values
//!
//! `NaN` marks a missing value throughout. Structural problems (mismatched
//! lengths, too few knots, a forbidden missing value) are returned as
//! errors from `nmath_core::types`; numerical degeneracies such as a zero
//! standard deviation produce `NaN` entries and a `tracing` warning.
//!
//! ## Usage Examples
//!
//! ```rust
//! use nmath_stats::covcor::{cor, MissingPolicy};
//! use nmath_stats::distance::{dist, DistanceMethod};
//! use nmath_stats::interpolate::{approx, ApproxOptions};
//! use nmath_stats::spline::{CubicSpline, SplineMethod};
//! use nmath_stats::Matrix;
//!
//! let y = approx(&[0.0, 2.0], &[0.0, 4.0], &[0.5], &ApproxOptions::default()).unwrap();
//! assert_eq!(y, vec![1.0]);
//!
//! let s = CubicSpline::new(SplineMethod::Natural, &[0.0, 1.0, 2.0], &[1.0, 3.0, 2.0]).unwrap();
//! assert!((s.eval(1.0) - 3.0).abs() < 1e-12);
//!
//! let x = Matrix::from_rows(&[vec![0.0, 1.0], vec![1.0, 3.0], vec![2.0, 2.0]]).unwrap();
//! let d = dist(&x, DistanceMethod::Manhattan).unwrap();
//! assert_eq!(d.get(0, 1), 3.0);
//!
//! let r = cor(&x, None, MissingPolicy::Everything).unwrap();
//! assert_eq!((r.nrow(), r.ncol()), (2, 2));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod covcor;
pub mod distance;
pub mod interpolate;
mod knots;
pub mod matrix;
pub mod spline;

pub use covcor::{cor, cov, MissingPolicy};
pub use distance::{dist, DistanceMatrix, DistanceMethod};
pub use interpolate::{approx, Approx, ApproxMethod, ApproxOptions, Extrapolation};
pub use knots::Ties;
pub use matrix::Matrix;
pub use spline::{spline, CubicSpline, SplineMethod};
