//! Interpolating cubic splines.
//!
//! On the interval `[x[i], x[i + 1]]` the spline is
//! `y[i] + b[i] t + c[i] t^2 + d[i] t^3` with `t = u - x[i]`. Three end
//! conditions are available:
//!
//! - [`SplineMethod::Periodic`]: value and first two derivatives match at both ends
//! - [`SplineMethod::Natural`]: zero second derivative at both ends, linear
//!   extrapolation outside the knots
//! - [`SplineMethod::Fmm`]: Forsythe, Malcolm and Moler; the third derivative
//!   at each end matches the cubic through the four nearest knots
//!
//! # Example
//!
//! ```
//! use nmath_stats::spline::{CubicSpline, SplineMethod};
//!
//! let x = [0.0, 1.0, 2.0, 3.0];
//! let y = [0.0, 1.0, 8.0, 27.0];
//!
//! // four points determine the cubic exactly under fmm end conditions
//! let s = CubicSpline::new(SplineMethod::Fmm, &x, &y).unwrap();
//! assert!((s.eval(1.5) - 3.375).abs() < 1e-12);
//! ```

use crate::knots::{regularize, Ties};
use nmath_core::types::warning::warn_detail;
use nmath_core::types::InterpolationError;

/// End conditions of a cubic spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SplineMethod {
    /// Periodic with period `x[n-1] - x[0]`.
    Periodic,
    /// Natural spline.
    Natural,
    /// Forsythe, Malcolm and Moler end conditions.
    #[default]
    Fmm,
}

/// Cubic spline coefficients at each knot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicSpline {
    method: SplineMethod,
    x: Vec<f64>,
    y: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
}

impl CubicSpline {
    /// Fits an interpolating spline through `(x, y)`.
    ///
    /// Knots are sorted, tied abscissae are averaged, and pairs with a
    /// missing coordinate are dropped. For a periodic spline whose end
    /// ordinates differ, a warning is logged and `y[0]` is used for both.
    ///
    /// # Errors
    ///
    /// - [`InterpolationError::LengthMismatch`] if `x` and `y` differ in length
    /// - [`InterpolationError::InsufficientData`] with fewer than two knots
    pub fn new(method: SplineMethod, x: &[f64], y: &[f64]) -> Result<Self, InterpolationError> {
        let knots = regularize(x, y, Ties::Mean, true)?;
        let mut y = knots.y;
        let n = knots.x.len();
        if n < 2 {
            return Err(InterpolationError::InsufficientData { got: n, need: 2 });
        }
        if method == SplineMethod::Periodic && y[0] != y[n - 1] {
            warn_detail(
                "spline",
                format_args!("first and last y values differ, using y[0] for both"),
            );
            y[n - 1] = y[0];
        }
        Ok(Self::from_knots(method, knots.x, y))
    }

    /// Fits a spline through knots that are already strictly increasing.
    ///
    /// # Errors
    ///
    /// As [`CubicSpline::new`], plus
    /// [`InterpolationError::NonMonotonicData`] at the first index where
    /// `x` fails to increase, [`InterpolationError::MissingValue`] for a `NaN`
    /// knot, and [`InterpolationError::InvalidInput`] for a periodic spline
    /// with `y[0] != y[n-1]`.
    pub fn from_sorted(
        method: SplineMethod,
        x: &[f64],
        y: &[f64],
    ) -> Result<Self, InterpolationError> {
        if x.len() != y.len() {
            return Err(InterpolationError::LengthMismatch {
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        let n = x.len();
        if n < 2 {
            return Err(InterpolationError::InsufficientData { got: n, need: 2 });
        }
        if let Some(index) = x.iter().zip(y).position(|(a, b)| a.is_nan() || b.is_nan()) {
            return Err(InterpolationError::MissingValue { index });
        }
        if let Some(index) = x.windows(2).position(|w| w[1] <= w[0]) {
            return Err(InterpolationError::NonMonotonicData { index: index + 1 });
        }
        if method == SplineMethod::Periodic && y[0] != y[n - 1] {
            return Err(InterpolationError::InvalidInput(
                "periodic spline needs y[0] == y[n-1]".to_string(),
            ));
        }
        Ok(Self::from_knots(method, x.to_vec(), y.to_vec()))
    }

    fn from_knots(method: SplineMethod, x: Vec<f64>, y: Vec<f64>) -> Self {
        let n = x.len();
        let mut spline = Self {
            method,
            x,
            y,
            b: vec![0.0; n],
            c: vec![0.0; n],
            d: vec![0.0; n],
        };
        match method {
            SplineMethod::Periodic => spline.periodic(),
            SplineMethod::Natural => spline.natural(),
            SplineMethod::Fmm => spline.fmm(),
        }
        spline
    }

    /// End conditions used by this spline.
    pub fn method(&self) -> SplineMethod {
        self.method
    }

    /// Knot abscissae.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Knot ordinates.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Linear coefficients.
    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Quadratic coefficients.
    pub fn c(&self) -> &[f64] {
        &self.c
    }

    /// Cubic coefficients.
    pub fn d(&self) -> &[f64] {
        &self.d
    }

    fn periodic(&mut self) {
        let n = self.x.len();
        let (x, y) = (&self.x, &self.y);
        let (b, c, d) = (&mut self.b, &mut self.c, &mut self.d);

        if n == 2 {
            return;
        }
        if n == 3 {
            let r = -(y[0] - y[1]) * (x[0] - 2.0 * x[1] + x[2]) / (x[2] - x[1]) / (x[1] - x[0]);
            b.fill(r);
            c[0] = -3.0 * (y[0] - y[1]) / (x[2] - x[1]) / (x[1] - x[0]);
            c[1] = -c[0];
            c[2] = c[0];
            d[0] = -2.0 * c[0] / 3.0 / (x[1] - x[0]);
            d[1] = -d[0] * (x[1] - x[0]) / (x[2] - x[1]);
            d[2] = d[0];
            return;
        }

        let nm2 = n - 2;
        let mut e = vec![0.0; n];

        // b: diagonal, d: off-diagonal, c: right-hand side
        d[0] = x[1] - x[0];
        d[nm2] = x[n - 1] - x[nm2];
        b[0] = 2.0 * (d[0] + d[nm2]);
        c[0] = (y[1] - y[0]) / d[0] - (y[n - 1] - y[nm2]) / d[nm2];
        for i in 1..n - 1 {
            d[i] = x[i + 1] - x[i];
            b[i] = 2.0 * (d[i] + d[i - 1]);
            c[i] = (y[i + 1] - y[i]) / d[i] - (y[i] - y[i - 1]) / d[i - 1];
        }

        // Cholesky factor of the cyclic tridiagonal system, in place
        b[0] = b[0].sqrt();
        e[0] = (x[n - 1] - x[nm2]) / b[0];
        let mut s = 0.0;
        for i in 0..=nm2 - 2 {
            d[i] /= b[i];
            if i != 0 {
                e[i] = -e[i - 1] * d[i - 1] / b[i];
            }
            b[i + 1] = (b[i + 1] - d[i] * d[i]).sqrt();
            s += e[i] * e[i];
        }
        d[nm2 - 1] = (d[nm2 - 1] - e[nm2 - 2] * d[nm2 - 2]) / b[nm2 - 1];
        b[nm2] = (b[nm2] - d[nm2 - 1] * d[nm2 - 1] - s).sqrt();

        // forward elimination
        c[0] /= b[0];
        s = 0.0;
        for i in 1..nm2 {
            c[i] = (c[i] - d[i - 1] * c[i - 1]) / b[i];
            s += e[i - 1] * c[i - 1];
        }
        c[nm2] = (c[nm2] - d[nm2 - 1] * c[nm2 - 1] - s) / b[nm2];

        // back substitution
        c[nm2] /= b[nm2];
        c[nm2 - 1] = (c[nm2 - 1] - d[nm2 - 1] * c[nm2]) / b[nm2 - 1];
        for i in (0..=nm2 - 2).rev() {
            c[i] = (c[i] - d[i] * c[i + 1] - e[i] * c[nm2]) / b[i];
        }
        c[n - 1] = c[0];

        for i in 0..=nm2 {
            let s = x[i + 1] - x[i];
            b[i] = (y[i + 1] - y[i]) / s - s * (c[i + 1] + 2.0 * c[i]);
            d[i] = (c[i + 1] - c[i]) / s;
            c[i] *= 3.0;
        }
        b[n - 1] = b[0];
        c[n - 1] = c[0];
        d[n - 1] = d[0];
    }

    fn natural(&mut self) {
        let n = self.x.len();
        let (x, y) = (&self.x, &self.y);
        let (b, c, d) = (&mut self.b, &mut self.c, &mut self.d);

        if n < 3 {
            b[0] = (y[1] - y[0]) / (x[1] - x[0]);
            b[1] = b[0];
            return;
        }

        let nm2 = n - 2;

        // b: diagonal, d: off-diagonal, c: right-hand side
        d[0] = x[1] - x[0];
        c[1] = (y[1] - y[0]) / d[0];
        for i in 1..n - 1 {
            d[i] = x[i + 1] - x[i];
            b[i] = 2.0 * (d[i - 1] + d[i]);
            c[i + 1] = (y[i + 1] - y[i]) / d[i];
            c[i] = c[i + 1] - c[i];
        }

        for i in 2..n - 1 {
            let t = d[i - 1] / b[i - 1];
            b[i] -= t * d[i - 1];
            c[i] -= t * c[i - 1];
        }

        c[nm2] /= b[nm2];
        for i in (1..n - 2).rev() {
            c[i] = (c[i] - d[i] * c[i + 1]) / b[i];
        }

        c[0] = 0.0;
        c[n - 1] = 0.0;

        b[0] = (y[1] - y[0]) / d[0] - d[0] * c[1];
        d[0] = c[1] / d[0];
        b[n - 1] = (y[n - 1] - y[nm2]) / d[nm2] + d[nm2] * c[nm2];
        for i in 1..n - 1 {
            b[i] = (y[i + 1] - y[i]) / d[i] - d[i] * (c[i + 1] + 2.0 * c[i]);
            d[i] = (c[i + 1] - c[i]) / d[i];
            c[i] *= 3.0;
        }
        c[n - 1] = 0.0;
        d[n - 1] = 0.0;
    }

    fn fmm(&mut self) {
        let n = self.x.len();
        let (x, y) = (&self.x, &self.y);
        let (b, c, d) = (&mut self.b, &mut self.c, &mut self.d);

        if n < 3 {
            b[0] = (y[1] - y[0]) / (x[1] - x[0]);
            b[1] = b[0];
            return;
        }

        let nm2 = n - 2;

        d[0] = x[1] - x[0];
        c[1] = (y[1] - y[0]) / d[0];
        for i in 1..n - 1 {
            d[i] = x[i + 1] - x[i];
            b[i] = 2.0 * (d[i - 1] + d[i]);
            c[i + 1] = (y[i + 1] - y[i]) / d[i];
            c[i] = c[i + 1] - c[i];
        }

        // third derivatives at the ends from divided differences
        b[0] = -d[0];
        b[n - 1] = -d[nm2];
        c[0] = 0.0;
        c[n - 1] = 0.0;
        if n > 3 {
            c[0] = c[2] / (x[3] - x[1]) - c[1] / (x[2] - x[0]);
            c[n - 1] = c[nm2] / (x[n - 1] - x[n - 3]) - c[n - 3] / (x[nm2] - x[n - 4]);
            c[0] = c[0] * d[0] * d[0] / (x[3] - x[0]);
            c[n - 1] = -c[n - 1] * d[nm2] * d[nm2] / (x[n - 1] - x[n - 4]);
        }

        for i in 1..n {
            let t = d[i - 1] / b[i - 1];
            b[i] -= t * d[i - 1];
            c[i] -= t * c[i - 1];
        }

        c[n - 1] /= b[n - 1];
        for i in (0..=nm2).rev() {
            c[i] = (c[i] - d[i] * c[i + 1]) / b[i];
        }

        b[n - 1] = (y[n - 1] - y[n - 2]) / d[n - 2] + d[n - 2] * (c[n - 2] + 2.0 * c[n - 1]);
        for i in 0..=nm2 {
            b[i] = (y[i + 1] - y[i]) / d[i] - d[i] * (c[i + 1] + 2.0 * c[i]);
            d[i] = (c[i + 1] - c[i]) / d[i];
            c[i] *= 3.0;
        }
        c[n - 1] *= 3.0;
        d[n - 1] = d[nm2];
    }

    /// Maps `u` into the base period for periodic splines.
    fn wrap(&self, u: f64) -> f64 {
        let n = self.x.len();
        if self.method != SplineMethod::Periodic || n < 2 {
            return u;
        }
        let period = self.x[n - 1] - self.x[0];
        let mut v = (u - self.x[0]) % period;
        if v < 0.0 {
            v += period;
        }
        v + self.x[0]
    }

    /// Index `i` with `x[i] <= u <= x[i + 1]`, starting from the hint `i`.
    fn locate(&self, u: f64, mut i: usize) -> usize {
        let x = &self.x;
        let n = x.len();
        if u < x[i] || (i + 1 < n && x[i + 1] < u) {
            i = 0;
            let mut j = n;
            loop {
                let k = (i + j) / 2;
                if u < x[k] {
                    j = k;
                } else {
                    i = k;
                }
                if j <= i + 1 {
                    break;
                }
            }
        }
        i
    }

    fn value_at(&self, u: f64, i: usize) -> f64 {
        let dx = u - self.x[i];
        // natural splines extrapolate linearly to the left
        let cubic = if self.method == SplineMethod::Natural && u < self.x[0] {
            0.0
        } else {
            self.d[i]
        };
        self.y[i] + dx * (self.b[i] + dx * (self.c[i] + dx * cubic))
    }

    /// Spline value at `u`.
    pub fn eval(&self, u: f64) -> f64 {
        let u = self.wrap(u);
        self.value_at(u, self.locate(u, 0))
    }

    /// Spline values at every point of `xout`.
    ///
    /// The interval search restarts from the previous interval, so sorted
    /// input is evaluated in linear time.
    pub fn eval_many(&self, xout: &[f64]) -> Vec<f64> {
        let mut i = 0;
        xout.iter()
            .map(|&u| {
                let u = self.wrap(u);
                if u.is_nan() {
                    return u;
                }
                i = self.locate(u, i);
                self.value_at(u, i)
            })
            .collect()
    }

    /// Derivative of order `deriv` (1, 2 or 3) at `u`.
    ///
    /// Orders above 3 are identically zero.
    pub fn derivative(&self, u: f64, deriv: u32) -> f64 {
        if deriv == 0 {
            return self.eval(u);
        }
        let u = self.wrap(u);
        if u.is_nan() {
            return u;
        }
        let i = self.locate(u, 0);
        let dx = u - self.x[i];
        let (b, c) = (self.b[i], self.c[i]);
        let d = if self.method == SplineMethod::Natural && u < self.x[0] {
            0.0
        } else {
            self.d[i]
        };
        match deriv {
            1 => b + dx * (2.0 * c + 3.0 * d * dx),
            2 => 2.0 * c + 6.0 * d * dx,
            3 => 6.0 * d,
            _ => 0.0,
        }
    }
}

/// Convenience: fits a spline through `(x, y)` and evaluates it at `xout`.
pub fn spline(
    method: SplineMethod,
    x: &[f64],
    y: &[f64],
    xout: &[f64],
) -> Result<Vec<f64>, InterpolationError> {
    Ok(CubicSpline::new(method, x, y)?.eval_many(xout))
}
