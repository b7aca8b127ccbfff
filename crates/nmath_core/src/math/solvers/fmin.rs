//! Brent's derivative-free minimiser on an interval.

use super::SolverConfig;
use crate::types::warning::warn_detail;
use crate::types::SolverError;
use num_traits::Float;

/// Outcome of [`BrentMinimizer::minimize_detailed`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum<T> {
    /// Location of the minimum.
    pub x: T,
    /// Objective value at `x`.
    pub fx: T,
    /// Objective evaluations performed.
    pub evaluations: usize,
    /// `false` if the evaluation cap was reached first.
    pub converged: bool,
}

/// Golden-section search with parabolic interpolation.
///
/// Finds a local minimum of a unimodal (or at least continuous) function on
/// `[a, b]`. The first probe is at the golden-section point, so endpoints are
/// never evaluated.
///
/// ```
/// use nmath_core::math::solvers::{BrentMinimizer, SolverConfig};
///
/// let min = BrentMinimizer::new(SolverConfig::new(1e-10, 200));
/// let x = min.minimize(|x: f64| (x - 1.0 / 3.0).powi(2), 0.0, 1.0).unwrap();
/// assert!((x - 1.0 / 3.0).abs() < 1e-8);
/// ```
#[derive(Debug, Clone)]
pub struct BrentMinimizer<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> BrentMinimizer<T> {
    /// Create a minimiser with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a minimiser with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Location of the minimum of `f` on `[a, b]`.
    ///
    /// # Errors
    ///
    /// * `SolverError::InvalidInterval` - `a >= b` or an endpoint is not finite
    /// * `SolverError::InvalidTolerance` - the configured tolerance is not positive
    pub fn minimize<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        self.minimize_detailed(f, a, b).map(|m| m.x)
    }

    /// Like [`minimize`](Self::minimize), also returning `f(x)` and counts.
    pub fn minimize_detailed<F>(&self, f: F, ax: T, bx: T) -> Result<Minimum<T>, SolverError>
    where
        F: Fn(T) -> T,
    {
        self.config.validate()?;
        if !ax.is_finite() || !bx.is_finite() || !(ax < bx) {
            return Err(SolverError::InvalidInterval {
                lower: ax.to_f64().unwrap_or(f64::NAN),
                upper: bx.to_f64().unwrap_or(f64::NAN),
            });
        }

        let one = T::one();
        let two = one + one;
        let half = one / two;
        let three = two + one;
        let five = three + two;
        // squared inverse of the golden ratio
        let c = (three - five.sqrt()) * half;

        let eps = T::epsilon().sqrt();
        let tol3 = self.config.tolerance / three;

        let mut a = ax;
        let mut b = bx;
        let mut v = a + c * (b - a);
        let mut w = v;
        let mut x = v;

        let mut d = T::zero();
        let mut e = T::zero();

        let mut fx = f(x);
        let mut fv = fx;
        let mut fw = fx;
        let mut evaluations = 1;
        let mut converged = false;

        while evaluations <= self.config.max_iterations {
            let xm = (a + b) * half;
            let tol1 = eps * x.abs() + tol3;
            let t2 = tol1 * two;

            if (x - xm).abs() <= t2 - (b - a) * half {
                converged = true;
                break;
            }

            let mut p = T::zero();
            let mut q = T::zero();
            let mut r = T::zero();
            if e.abs() > tol1 {
                // fit parabola
                r = (x - w) * (fx - fv);
                q = (x - v) * (fx - fw);
                p = (x - v) * q - (x - w) * r;
                q = (q - r) * two;
                if q > T::zero() {
                    p = -p;
                } else {
                    q = -q;
                }
                r = e;
                e = d;
            }

            if p.abs() >= (q * half * r).abs() || p <= q * (a - x) || p >= q * (b - x) {
                // golden-section step
                e = if x < xm { b - x } else { a - x };
                d = c * e;
            } else {
                // parabolic step
                d = p / q;
                let u = x + d;
                // f must not be evaluated too close to a or b
                if u - a < t2 || b - u < t2 {
                    d = if x < xm { tol1 } else { -tol1 };
                }
            }

            // f must not be evaluated too close to x
            let u = if d.abs() >= tol1 {
                x + d
            } else if d > T::zero() {
                x + tol1
            } else {
                x - tol1
            };

            let fu = f(u);
            evaluations += 1;

            if fu <= fx {
                if u < x {
                    b = x;
                } else {
                    a = x;
                }
                v = w;
                w = x;
                x = u;
                fv = fw;
                fw = fx;
                fx = fu;
            } else {
                if u < x {
                    a = u;
                } else {
                    b = u;
                }
                if fu <= fw || w == x {
                    v = w;
                    fv = fw;
                    w = u;
                    fw = fu;
                } else if fu <= fv || v == x || v == w {
                    v = u;
                    fv = fu;
                }
            }
        }

        if !converged {
            warn_detail(
                "fmin",
                format_args!(
                    "minimiser reached {} evaluations without converging",
                    self.config.max_iterations
                ),
            );
        }
        Ok(Minimum {
            x,
            fx,
            evaluations,
            converged,
        })
    }

    /// Returns a reference to the minimiser configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }
}
