//! Piecewise-linear and piecewise-constant interpolation.
//!
//! # Example
//!
//! ```
//! use nmath_stats::interpolate::{approx, ApproxMethod, ApproxOptions};
//!
//! let x = [1.0, 2.0, 4.0];
//! let y = [10.0, 20.0, 0.0];
//!
//! let lin = approx(&x, &y, &[1.5, 3.0, 5.0], &ApproxOptions::default()).unwrap();
//! assert_eq!(lin[0], 15.0);
//! assert_eq!(lin[1], 10.0);
//! assert!(lin[2].is_nan());
//!
//! let step = ApproxOptions {
//!     method: ApproxMethod::Constant { f: 0.0 },
//!     ..ApproxOptions::default()
//! };
//! assert_eq!(approx(&x, &y, &[3.0], &step).unwrap(), vec![20.0]);
//! ```

use crate::knots::{regularize, Ties};
use nmath_core::types::InterpolationError;

/// Interpolation between neighbouring knots.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApproxMethod {
    /// Straight line between the neighbouring knots.
    #[default]
    Linear,
    /// Step function: `(1 - f) * y[i] + f * y[i + 1]` inside `(x[i], x[i + 1])`.
    ///
    /// `f = 0` is right-continuous, `f = 1` left-continuous.
    Constant {
        /// Weight of the right-hand knot, in `[0, 1]`.
        f: f64,
    },
}

/// Value returned outside `[min(x), max(x)]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extrapolation {
    /// `NaN`.
    #[default]
    Missing,
    /// The ordinate of the nearest end knot.
    Nearest,
    /// A fixed value.
    Value(f64),
}

/// Options for [`Approx::new`] and [`approx`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApproxOptions {
    /// Interpolation method.
    pub method: ApproxMethod,
    /// Behaviour left of the first knot.
    pub left: Extrapolation,
    /// Behaviour right of the last knot.
    pub right: Extrapolation,
    /// Combination rule for tied abscissae.
    pub ties: Ties,
    /// Drop pairs with a missing coordinate instead of rejecting them.
    pub na_rm: bool,
}

impl Default for ApproxOptions {
    fn default() -> Self {
        Self {
            method: ApproxMethod::Linear,
            left: Extrapolation::Missing,
            right: Extrapolation::Missing,
            ties: Ties::Mean,
            na_rm: true,
        }
    }
}

impl ApproxOptions {
    /// Options with the same extrapolation rule on both sides.
    pub fn with_rule(mut self, rule: Extrapolation) -> Self {
        self.left = rule;
        self.right = rule;
        self
    }
}

/// Interpolating function built from knots.
#[derive(Debug, Clone, PartialEq)]
pub struct Approx {
    x: Vec<f64>,
    y: Vec<f64>,
    kind: ApproxMethod,
    ylow: f64,
    yhigh: f64,
}

impl Approx {
    /// Prepares the knots `(x, y)` for interpolation.
    ///
    /// # Errors
    ///
    /// - [`InterpolationError::LengthMismatch`] if `x` and `y` differ in length
    /// - [`InterpolationError::MissingValue`] for a `NaN` abscissa when `na_rm` is off
    /// - [`InterpolationError::InsufficientData`] with fewer than two knots
    ///   (linear) or no knot (constant) left after cleaning
    /// - [`InterpolationError::InvalidInput`] if `f` lies outside `[0, 1]`
    pub fn new(x: &[f64], y: &[f64], options: &ApproxOptions) -> Result<Self, InterpolationError> {
        let need = match options.method {
            ApproxMethod::Linear => 2,
            ApproxMethod::Constant { f } => {
                if !(0.0..=1.0).contains(&f) {
                    return Err(InterpolationError::InvalidInput(format!(
                        "approx(): invalid f value {f}"
                    )));
                }
                1
            }
        };
        let knots = regularize(x, y, options.ties, options.na_rm)?;
        if knots.x.len() < need {
            return Err(InterpolationError::InsufficientData {
                got: knots.x.len(),
                need,
            });
        }
        let end = |rule: Extrapolation, knot: f64| match rule {
            Extrapolation::Missing => f64::NAN,
            Extrapolation::Nearest => knot,
            Extrapolation::Value(v) => v,
        };
        let ylow = end(options.left, knots.y[0]);
        let yhigh = end(options.right, knots.y[knots.y.len() - 1]);
        Ok(Self {
            x: knots.x,
            y: knots.y,
            kind: options.method,
            ylow,
            yhigh,
        })
    }

    /// Sorted distinct abscissae.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Ordinates matching [`Approx::x`].
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Interpolated value at `v`. A `NaN` argument is returned unchanged.
    pub fn eval(&self, v: f64) -> f64 {
        if v.is_nan() {
            return v;
        }
        let x = &self.x;
        let y = &self.y;
        let mut i = 0;
        let mut j = x.len() - 1;
        if v < x[i] {
            return self.ylow;
        }
        if v > x[j] {
            return self.yhigh;
        }

        // bisection keeps x[i] <= v <= x[j]
        while i + 1 < j {
            let ij = (i + j) / 2;
            if v < x[ij] {
                j = ij;
            } else {
                i = ij;
            }
        }

        if v == x[j] {
            return y[j];
        }
        if v == x[i] {
            return y[i];
        }
        match self.kind {
            ApproxMethod::Linear => y[i] + (y[j] - y[i]) * ((v - x[i]) / (x[j] - x[i])),
            ApproxMethod::Constant { f } => {
                let f1 = 1.0 - f;
                let left = if f1 != 0.0 { y[i] * f1 } else { 0.0 };
                let right = if f != 0.0 { y[j] * f } else { 0.0 };
                left + right
            }
        }
    }

    /// Interpolated values at every point of `xout`.
    pub fn eval_many(&self, xout: &[f64]) -> Vec<f64> {
        xout.iter().map(|&v| self.eval(v)).collect()
    }
}

/// Interpolates the knots `(x, y)` at `xout`.
///
/// Convenience wrapper over [`Approx::new`] and [`Approx::eval_many`].
pub fn approx(
    x: &[f64],
    y: &[f64],
    xout: &[f64],
    options: &ApproxOptions,
) -> Result<Vec<f64>, InterpolationError> {
    Ok(Approx::new(x, y, options)?.eval_many(xout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn constant(f: f64) -> ApproxOptions {
        ApproxOptions {
            method: ApproxMethod::Constant { f },
            ..ApproxOptions::default()
        }
    }

    // ========================================
    // Linear
    // ========================================

    #[test]
    fn test_linear_hits_knots_and_midpoints() {
        let a = Approx::new(&[0.0, 1.0, 3.0], &[0.0, 2.0, -2.0], &ApproxOptions::default()).unwrap();
        assert_eq!(a.eval(0.0), 0.0);
        assert_eq!(a.eval(1.0), 2.0);
        assert_eq!(a.eval(3.0), -2.0);
        assert_relative_eq!(a.eval(0.25), 0.5);
        assert_relative_eq!(a.eval(2.0), 0.0);
    }

    #[test]
    fn test_extrapolation_rules() {
        let x = [1.0, 2.0];
        let y = [5.0, 7.0];
        let missing = Approx::new(&x, &y, &ApproxOptions::default()).unwrap();
        assert!(missing.eval(0.0).is_nan());
        assert!(missing.eval(3.0).is_nan());

        let nearest =
            Approx::new(&x, &y, &ApproxOptions::default().with_rule(Extrapolation::Nearest))
                .unwrap();
        assert_eq!(nearest.eval(-10.0), 5.0);
        assert_eq!(nearest.eval(10.0), 7.0);

        let fixed = ApproxOptions {
            left: Extrapolation::Value(-1.0),
            right: Extrapolation::Nearest,
            ..ApproxOptions::default()
        };
        let fixed = Approx::new(&x, &y, &fixed).unwrap();
        assert_eq!(fixed.eval(0.0), -1.0);
        assert_eq!(fixed.eval(2.5), 7.0);
    }

    #[test]
    fn test_nan_argument_passes_through() {
        let a = Approx::new(&[0.0, 1.0], &[0.0, 1.0], &ApproxOptions::default()).unwrap();
        assert!(a.eval(f64::NAN).is_nan());
    }

    #[test]
    fn test_unsorted_knots_with_ties() {
        let out = approx(
            &[2.0, 0.0, 2.0, 1.0],
            &[4.0, 0.0, 6.0, 1.0],
            &[1.5, 2.0],
            &ApproxOptions::default(),
        )
        .unwrap();
        // tie at x = 2 averages to 5
        assert_relative_eq!(out[0], 3.0);
        assert_eq!(out[1], 5.0);
    }

    // ========================================
    // Constant
    // ========================================

    #[test]
    fn test_constant_continuity() {
        let x = [0.0, 1.0, 2.0];
        let y = [1.0, 3.0, f64::INFINITY];
        let right = Approx::new(&x, &y, &constant(0.0)).unwrap();
        assert_eq!(right.eval(0.5), 1.0);
        // f = 0 must not form 0 * inf
        assert_eq!(right.eval(1.5), 3.0);

        let left = Approx::new(&x, &y, &constant(1.0)).unwrap();
        assert_eq!(left.eval(0.5), 3.0);

        let mid = Approx::new(&x, &[1.0, 3.0, 5.0], &constant(0.25)).unwrap();
        assert_relative_eq!(mid.eval(0.5), 1.5);
    }

    #[test]
    fn test_constant_single_knot() {
        let a = Approx::new(&[1.0], &[4.0], &constant(0.5)).unwrap();
        assert_eq!(a.eval(1.0), 4.0);
        assert!(a.eval(1.5).is_nan());
    }

    // ========================================
    // Errors
    // ========================================

    #[test]
    fn test_errors() {
        assert_eq!(
            Approx::new(&[1.0], &[1.0], &ApproxOptions::default()),
            Err(InterpolationError::InsufficientData { got: 1, need: 2 })
        );
        assert_eq!(
            Approx::new(&[f64::NAN, 1.0], &[0.0, f64::NAN], &constant(0.0)),
            Err(InterpolationError::InsufficientData { got: 0, need: 1 })
        );
        assert!(matches!(
            Approx::new(&[0.0, 1.0], &[0.0, 1.0], &constant(1.5)),
            Err(InterpolationError::InvalidInput(_))
        ));
        assert_eq!(
            Approx::new(&[0.0, 1.0], &[0.0], &ApproxOptions::default()),
            Err(InterpolationError::LengthMismatch { x_len: 2, y_len: 1 })
        );
    }
}
