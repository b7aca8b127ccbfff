//! Scalar root finding and minimisation on a bracket.
//!
//! ## Available Solvers
//!
//! - [`BrentSolver`]: Brent's zero-in method (bisection, secant and inverse
//!   quadratic interpolation) on a sign-changing bracket
//! - [`BrentMinimizer`]: Golden-section search with parabolic interpolation
//!
//! ## Configuration
//!
//! Both solvers use [`SolverConfig`] for configuring:
//! - `tolerance`: Absolute tolerance on the argument (default: 1e-10)
//! - `max_iterations`: Evaluation cap (default: 1000)
//!
//! Hitting the cap is not an error. The best estimate is returned, the
//! detailed result records `converged == false` and a warning is logged.
//!
//! ## Examples
//!
//! ```
//! use nmath_core::math::solvers::{BrentMinimizer, BrentSolver, SolverConfig};
//!
//! // Solve x² - 2 = 0 (find √2)
//! let solver = BrentSolver::new(SolverConfig::default());
//! let root = solver.find_root(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
//! assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
//!
//! // Minimise (x - 1)² + 3
//! let min = BrentMinimizer::new(SolverConfig::default());
//! let r = min.minimize_detailed(|x: f64| (x - 1.0).powi(2) + 3.0, -4.0, 4.0).unwrap();
//! assert!(r.converged);
//! assert!((r.fx - 3.0).abs() < 1e-12);
//! ```

mod brent;
mod config;
mod fmin;

// Re-export public types at module level
pub use brent::{BrentSolver, RootResult};
pub use config::SolverConfig;
pub use fmin::{BrentMinimizer, Minimum};
