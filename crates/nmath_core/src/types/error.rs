//! Error types for structured error handling.
//!
//! Scalar distribution functions never return these: they report bad input
//! through `NaN` and a warning (see [`super::warning`]). The errors below belong
//! to the operations whose inputs are structured (brackets, vectors, matrices,
//! probability vectors) and can be rejected as a whole.
//!
//! This module provides:
//! - `SolverError`: Errors from the root finder and minimiser
//! - `InterpolationError`: Errors from `approx` and spline construction
//! - `StatsError`: Errors from covariance, correlation and distance computations
//! - `SamplingError`: Errors from vector-valued samplers such as the multinomial

use thiserror::Error;

/// Root-finding and minimisation errors.
///
/// # Examples
/// ```
/// use nmath_core::types::SolverError;
///
/// let err = SolverError::NoBracket { a: 1.0, b: 2.0 };
/// assert!(format!("{}", err).contains("same sign"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// No valid bracket (function values at endpoints have same sign).
    #[error("No bracket: f({a}) and f({b}) have same sign")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// The search interval is empty, reversed, or not finite.
    #[error("Invalid interval [{lower}, {upper}]")]
    InvalidInterval {
        /// Lower end of the interval
        lower: f64,
        /// Upper end of the interval
        upper: f64,
    },

    /// The objective returned a non-finite value where a finite one is required.
    #[error("Objective is not finite at x = {x}")]
    NonFiniteValue {
        /// Argument at which the objective was evaluated
        x: f64,
    },

    /// Tolerance is not a positive finite number.
    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(f64),
}

/// Interpolation-related errors.
///
/// # Examples
/// ```
/// use nmath_core::types::InterpolationError;
///
/// let err = InterpolationError::InsufficientData { got: 1, need: 2 };
/// assert!(format!("{}", err).contains("need at least 2"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationError {
    /// Insufficient data points for interpolation.
    #[error("Insufficient data points: got {got}, need at least {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// Abscissae are not sorted in increasing order.
    #[error("Data is not monotonic at index {index}")]
    NonMonotonicData {
        /// Index where monotonicity violation was detected
        index: usize,
    },

    /// `x` and `y` have different lengths.
    #[error("Length mismatch: x has {x_len} values, y has {y_len}")]
    LengthMismatch {
        /// Length of the abscissae
        x_len: usize,
        /// Length of the ordinates
        y_len: usize,
    },

    /// A knot contains a missing value.
    #[error("Missing value at index {index}")]
    MissingValue {
        /// Index of the offending knot
        index: usize,
    },

    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Covariance, correlation and distance errors.
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatsError {
    /// Matrices or vectors do not have compatible shapes.
    #[error("Incompatible dimensions: {0}")]
    DimensionMismatch(String),

    /// A missing value was found while the policy forbids them.
    #[error("Missing observations in cov/cor")]
    MissingObservations,

    /// No row is free of missing values.
    #[error("No complete element pairs")]
    NoCompleteCases,

    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors from vector-valued samplers.
///
/// # Examples
/// ```
/// use nmath_core::types::SamplingError;
///
/// let err = SamplingError::InvalidProbability { index: 2, value: -0.5 };
/// assert!(format!("{}", err).contains("index 2"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SamplingError {
    /// A category probability is negative or not finite.
    #[error("Invalid probability {value} at index {index}")]
    InvalidProbability {
        /// Category index
        index: usize,
        /// Offending probability
        value: f64,
    },

    /// The probabilities do not sum to a positive value.
    #[error("Probabilities sum to {0}, expected a positive total")]
    NonPositiveTotal(f64),

    /// There are no categories to draw into.
    #[error("At least one category is required")]
    EmptyProbabilities,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_error_display() {
        let err = SolverError::InvalidInterval {
            lower: 2.0,
            upper: 1.0,
        };
        assert_eq!(format!("{}", err), "Invalid interval [2, 1]");
    }

    #[test]
    fn test_interpolation_error_display() {
        let err = InterpolationError::LengthMismatch { x_len: 3, y_len: 4 };
        assert!(format!("{}", err).contains("x has 3 values"));
    }

    #[test]
    fn test_stats_error_display() {
        assert_eq!(
            format!("{}", StatsError::NoCompleteCases),
            "No complete element pairs"
        );
    }

    #[test]
    fn test_errors_are_cloneable() {
        let err = SamplingError::NonPositiveTotal(0.0);
        assert_eq!(err.clone(), err);
    }
}
