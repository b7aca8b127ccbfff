//! Solver configuration types.

use crate::types::SolverError;
use num_traits::Float;

/// Configuration for the bracketed root finder and the minimiser.
///
/// # Type Parameters
///
/// * `T` - Floating-point type for tolerance (e.g., `f64`)
///
/// # Example
///
/// ```
/// use nmath_core::math::solvers::SolverConfig;
///
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert!(config.tolerance < 1e-8);
/// assert_eq!(config.max_iterations, 1000);
///
/// let custom = SolverConfig {
///     tolerance: 1e-12,
///     max_iterations: 200,
/// };
/// assert!(custom.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig<T: Float> {
    /// Absolute tolerance on the argument.
    ///
    /// The root finder stops once the bracket is narrower than about
    /// `2 ε |x| + tolerance / 2`; the minimiser uses `ε^(1/2) |x| + tolerance / 3`.
    pub tolerance: T,

    /// Maximum number of objective evaluations after the initial ones.
    ///
    /// Reaching the cap is not an error: the best estimate is returned with
    /// `converged == false` and a warning is logged.
    pub max_iterations: usize,
}

impl<T: Float> Default for SolverConfig<T> {
    /// Default values:
    /// - `tolerance`: 1e-10
    /// - `max_iterations`: 1000
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-10).unwrap_or_else(T::epsilon),
            max_iterations: 1000,
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Create a new configuration with specified values.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance <= 0` or `max_iterations == 0`.
    ///
    /// # Example
    ///
    /// ```
    /// use nmath_core::math::solvers::SolverConfig;
    ///
    /// let config = SolverConfig::new(1e-12, 200);
    /// assert_eq!(config.max_iterations, 200);
    /// ```
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        assert!(tolerance > T::zero(), "tolerance must be positive");
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Tight tolerance (1e-14) with a generous cap (5000).
    pub fn high_precision() -> Self {
        Self {
            tolerance: T::from(1e-14).unwrap_or_else(T::epsilon),
            max_iterations: 5000,
        }
    }

    /// Relaxed tolerance (`ε^(1/4)`, about 1.2e-4) with a cap of 100.
    pub fn fast() -> Self {
        Self {
            tolerance: T::epsilon().sqrt().sqrt(),
            max_iterations: 100,
        }
    }

    /// Check a configuration built from a struct literal or deserialised.
    pub fn validate(&self) -> Result<(), SolverError> {
        if !(self.tolerance > T::zero()) || !self.tolerance.is_finite() {
            return Err(SolverError::InvalidTolerance(
                self.tolerance.to_f64().unwrap_or(f64::NAN),
            ));
        }
        Ok(())
    }
}
