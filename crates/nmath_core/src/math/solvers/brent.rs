//! Brent's bracketed root finder.

use super::SolverConfig;
use crate::types::warning::warn_detail;
use crate::types::SolverError;
use num_traits::Float;

/// Outcome of [`BrentSolver::find_root_detailed`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootResult<T> {
    /// Root estimate.
    pub root: T,
    /// Objective value at `root`.
    pub f_root: T,
    /// Number of objective evaluations after the two endpoints.
    pub iterations: usize,
    /// Width of the final bracket, an upper bound on the error of `root`.
    pub estim_prec: T,
    /// `false` if the evaluation cap was reached first.
    pub converged: bool,
}

/// Brent's method root finder.
///
/// Combines bisection, secant and inverse quadratic interpolation; the
/// interpolated step is accepted only while it stays inside the bracket and
/// shrinks fast enough. Guaranteed to converge for continuous functions with
/// a sign change over the bracket.
///
/// # Example
///
/// ```
/// use nmath_core::math::solvers::{BrentSolver, SolverConfig};
///
/// let solver = BrentSolver::new(SolverConfig::default());
///
/// // Solve x³ - x - 2 = 0 in bracket [1, 2]
/// let f = |x: f64| x * x * x - x - 2.0;
///
/// let root = solver.find_root(f, 1.0, 2.0).unwrap();
/// assert!((f(root)).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct BrentSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> BrentSolver<T> {
    /// Create a new Brent solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Find a root of `f` in the bracket `[a, b]`.
    ///
    /// Returns the root estimate; if the evaluation cap is hit, the current
    /// estimate is returned and a warning is logged.
    ///
    /// # Errors
    ///
    /// * `SolverError::InvalidInterval` - an endpoint is not finite or `a == b`
    /// * `SolverError::NonFiniteValue` - `f` is `NaN` at an evaluated point
    /// * `SolverError::NoBracket` - `f(a)` and `f(b)` have the same sign
    /// * `SolverError::InvalidTolerance` - the configured tolerance is not positive
    ///
    /// # Example
    ///
    /// ```
    /// use nmath_core::math::solvers::{BrentSolver, SolverConfig};
    ///
    /// let solver = BrentSolver::new(SolverConfig::default());
    /// let root = solver.find_root(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
    /// assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
    /// ```
    pub fn find_root<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        self.find_root_detailed(f, a, b).map(|r| r.root)
    }

    /// Like [`find_root`](Self::find_root), reporting iterations and precision.
    pub fn find_root_detailed<F>(&self, f: F, a: T, b: T) -> Result<RootResult<T>, SolverError>
    where
        F: Fn(T) -> T,
    {
        self.config.validate()?;
        if !a.is_finite() || !b.is_finite() || a == b {
            return Err(SolverError::InvalidInterval {
                lower: to_f64(a),
                upper: to_f64(b),
            });
        }

        let fa = checked(&f, a)?;
        let fb = checked(&f, b)?;
        if fa * fb > T::zero() {
            return Err(SolverError::NoBracket {
                a: to_f64(a),
                b: to_f64(b),
            });
        }
        self.zeroin(&f, a, b, fa, fb)
    }

    /// Brent's iteration on a bracket with known endpoint values.
    fn zeroin<F>(&self, f: &F, ax: T, bx: T, fax: T, fbx: T) -> Result<RootResult<T>, SolverError>
    where
        F: Fn(T) -> T,
    {
        let two = T::one() + T::one();
        let half = T::one() / two;
        let three_quarters = T::from(0.75).unwrap_or(half);
        let tol = self.config.tolerance;

        let (mut a, mut b) = (ax, bx);
        let (mut fa, mut fb) = (fax, fbx);
        let mut c = a;
        let mut fc = fa;

        let done = |root: T, f_root: T, iterations: usize, estim_prec: T| RootResult {
            root,
            f_root,
            iterations,
            estim_prec,
            converged: true,
        };

        if fa == T::zero() {
            return Ok(done(a, fa, 0, T::zero()));
        }
        if fb == T::zero() {
            return Ok(done(b, fb, 0, T::zero()));
        }

        for iteration in 0..=self.config.max_iterations {
            let prev_step = b - a;

            // b is the best estimate: |f(b)| <= |f(c)|
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }
            let tol_act = two * T::epsilon() * b.abs() + tol * half;
            let mut new_step = (c - b) * half;

            if new_step.abs() <= tol_act || fb == T::zero() {
                return Ok(done(b, fb, iteration, (c - b).abs()));
            }

            // Try interpolation if the previous step was large enough and in
            // the right direction.
            if prev_step.abs() >= tol_act && fa.abs() > fb.abs() {
                let cb = c - b;
                let (mut p, mut q);
                if a == c {
                    // linear
                    let t1 = fb / fa;
                    p = cb * t1;
                    q = T::one() - t1;
                } else {
                    // inverse quadratic
                    let qq = fa / fc;
                    let t1 = fb / fc;
                    let t2 = fb / fa;
                    p = t2 * (cb * qq * (qq - t1) - (b - a) * (t1 - T::one()));
                    q = (qq - T::one()) * (t1 - T::one()) * (t2 - T::one());
                }
                if p > T::zero() {
                    q = -q;
                } else {
                    p = -p;
                }

                if p < (three_quarters * cb * q - (tol_act * q).abs() * half)
                    && p < (prev_step * q * half).abs()
                {
                    new_step = p / q;
                }
            }

            if new_step.abs() < tol_act {
                new_step = if new_step > T::zero() { tol_act } else { -tol_act };
            }

            a = b;
            fa = fb;
            b = b + new_step;
            fb = checked(f, b)?;

            if (fb > T::zero() && fc > T::zero()) || (fb < T::zero() && fc < T::zero()) {
                c = a;
                fc = fa;
            }
        }

        warn_detail(
            "zeroin",
            format_args!(
                "root finder reached {} iterations without converging; |bracket| = {}",
                self.config.max_iterations,
                to_f64((c - b).abs())
            ),
        );
        Ok(RootResult {
            root: b,
            f_root: fb,
            iterations: self.config.max_iterations,
            estim_prec: (c - b).abs(),
            converged: false,
        })
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }
}

/// Evaluate `f`, mapping `±Inf` to `±MAX` and rejecting `NaN`.
fn checked<T: Float, F: Fn(T) -> T>(f: &F, x: T) -> Result<T, SolverError> {
    let fx = f(x);
    if fx.is_nan() {
        return Err(SolverError::NonFiniteValue { x: to_f64(x) });
    }
    if fx.is_infinite() {
        warn_detail(
            "zeroin",
            format_args!("objective is infinite at x = {}, replaced by a finite bound", to_f64(x)),
        );
        return Ok(if fx > T::zero() {
            T::max_value()
        } else {
            T::min_value()
        });
    }
    Ok(fx)
}

fn to_f64<T: Float>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ========================================
    // Basic Functionality Tests
    // ========================================

    #[test]
    fn test_find_sqrt_2() {
        let solver = BrentSolver::new(SolverConfig::default());
        let root = solver.find_root(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
        assert_relative_eq!(root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_find_sin_root() {
        let solver = BrentSolver::new(SolverConfig::default());
        let root = solver.find_root(|x: f64| x.sin(), 3.0, 4.0).unwrap();
        assert_relative_eq!(root, std::f64::consts::PI, epsilon = 1e-10);
    }

    #[test]
    fn test_bracket_reversed() {
        let solver = BrentSolver::new(SolverConfig::default());
        let root = solver.find_root(|x: f64| x * x - 2.0, 2.0, 0.0).unwrap();
        assert_relative_eq!(root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_root_at_bracket_endpoint() {
        let solver = BrentSolver::new(SolverConfig::default());
        let result = solver.find_root_detailed(|x: f64| x - 1.0, 0.0, 1.0).unwrap();
        assert_eq!(result.root, 1.0);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.estim_prec, 0.0);
    }

    #[test]
    fn test_f32_support() {
        let solver: BrentSolver<f32> = BrentSolver::new(SolverConfig::new(1e-5, 100));
        let root = solver.find_root(|x: f32| x * x - 2.0, 0.0, 2.0).unwrap();
        assert!((root - std::f32::consts::SQRT_2).abs() < 1e-4);
    }

    #[test]
    fn test_estimated_precision_bounds_error() {
        let solver = BrentSolver::new(SolverConfig::new(1e-6, 100));
        let r = solver
            .find_root_detailed(|x: f64| x.exp() - 2.0, 0.0, 1.0)
            .unwrap();
        assert!(r.converged);
        assert!((r.root - 2.0_f64.ln()).abs() <= r.estim_prec + 1e-15);
        assert!(r.estim_prec <= 1e-6);
    }

    // ========================================
    // Error Handling Tests
    // ========================================

    #[test]
    fn test_no_bracket_same_sign() {
        let solver = BrentSolver::new(SolverConfig::default());
        match solver.find_root(|x: f64| x * x + 1.0, -1.0, 1.0) {
            Err(SolverError::NoBracket { a, b }) => {
                assert_eq!(a, -1.0);
                assert_eq!(b, 1.0);
            }
            other => panic!("Expected NoBracket error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_interval() {
        let solver = BrentSolver::new(SolverConfig::default());
        assert!(matches!(
            solver.find_root(|x: f64| x, 1.0, 1.0),
            Err(SolverError::InvalidInterval { .. })
        ));
        assert!(matches!(
            solver.find_root(|x: f64| x, f64::NEG_INFINITY, 1.0),
            Err(SolverError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn test_nan_objective_rejected() {
        let solver = BrentSolver::new(SolverConfig::default());
        let result = solver.find_root(|x: f64| if x > 0.5 { f64::NAN } else { x - 0.7 }, 0.0, 1.0);
        assert!(matches!(result, Err(SolverError::NonFiniteValue { .. })));
    }

    #[test]
    fn test_infinite_endpoint_value_is_clamped() {
        let solver = BrentSolver::new(SolverConfig::default());
        // f(0) = -Inf
        let root = solver.find_root(|x: f64| x.ln() + 1.0, 0.0, 1.0).unwrap();
        assert_relative_eq!(root, (-1.0_f64).exp(), epsilon = 1e-9);
    }

    #[test]
    fn test_iteration_cap_is_not_an_error() {
        let solver = BrentSolver::new(SolverConfig::new(1e-300, 3));
        let r = solver
            .find_root_detailed(|x: f64| x * x - 2.0, 0.0, 2.0)
            .unwrap();
        assert!(!r.converged);
        assert_eq!(r.iterations, 3);
        assert!(r.root > 0.0 && r.root < 2.0);
    }

    #[test]
    fn test_invalid_tolerance_rejected() {
        let solver = BrentSolver::new(SolverConfig {
            tolerance: 0.0,
            max_iterations: 10,
        });
        assert_eq!(
            solver.find_root(|x: f64| x, -1.0, 1.0),
            Err(SolverError::InvalidTolerance(0.0))
        );
    }

    // ========================================
    // Convergence Tests
    // ========================================

    #[test]
    fn test_difficult_function() {
        // Steep near the root, flat elsewhere
        let solver = BrentSolver::new(SolverConfig::default());
        let f = |x: f64| (x - 1.0).powi(3) * 1e6 - 1e-3;
        let root = solver.find_root(f, 0.0, 3.0).unwrap();
        assert_relative_eq!(root, 1.0 + 1e-3, epsilon = 1e-8);
    }
}
