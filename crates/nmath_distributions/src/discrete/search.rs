//! Quantile search shared by the integer-valued distributions.
//!
//! A Cornish-Fisher expansion gives a starting point close to the answer,
//! after which the lower-tail CDF is stepped left or right until the smallest
//! `y` with `F(y) >= p` is found. Large supports are searched with coarse
//! increments first, shrinking by a factor 100 per pass.

use crate::continuous::normal::qnorm;
use nmath_core::math::constants::DBL_EPSILON;
use nmath_core::math::functions::{fmax2, fmin2};

/// Below this scale a unit-step search from the starting point is cheap.
const COARSE_SEARCH_SCALE: f64 = 1e5;

/// Lower-tail CDF of a distribution on `0, 1, ..., max_y`.
pub(crate) struct DiscreteSearch<F> {
    cdf: F,
    max_y: f64,
}

impl<F> DiscreteSearch<F>
where
    F: Fn(f64) -> f64,
{
    /// `max_y` is the largest support point, `INFINITY` when unbounded.
    pub(crate) fn new(cdf: F, max_y: f64) -> Self {
        Self { cdf, max_y }
    }

    /// Smallest support point `y` with `F(y) >= p` for a lower-tail,
    /// non-log probability `p` strictly inside `(0, 1)`.
    ///
    /// `mu`, `sigma` and `gamma` are the mean, standard deviation and
    /// skewness driving the Cornish-Fisher start. `scale` controls the
    /// increment schedule.
    pub(crate) fn quantile(&self, p: f64, mu: f64, sigma: f64, gamma: f64, scale: f64) -> f64 {
        let z = qnorm(p, 0.0, 1.0, true, false);
        let mut y = (mu + sigma * (z + gamma * (z * z - 1.0) / 6.0) + 0.5).floor();
        y = fmin2(fmax2(y, 0.0), self.max_y);
        let mut z = (self.cdf)(y);

        // fuzz to ensure left continuity
        let p = p * (1.0 - 64.0 * DBL_EPSILON);

        if scale < COARSE_SEARCH_SCALE {
            return self.search(y, &mut z, p, 1.0);
        }

        let mut incr = (scale * 0.001).floor();
        loop {
            let old_incr = incr;
            y = self.search(y, &mut z, p, incr);
            incr = fmax2(1.0, (incr / 100.0).floor());
            if !(old_incr > 1.0 && incr > scale * 1e-15) {
                return y;
            }
        }
    }

    /// Walk from `y` in steps of `incr`; `z` holds `F(y)` on entry and exit.
    fn search(&self, mut y: f64, z: &mut f64, p: f64, incr: f64) -> f64 {
        if *z >= p {
            loop {
                if y == 0.0 {
                    return y;
                }
                let new_z = (self.cdf)(y - incr);
                if new_z.is_nan() || new_z < p {
                    return y;
                }
                y = fmax2(0.0, y - incr);
                *z = new_z;
            }
        }
        loop {
            y = fmin2(y + incr, self.max_y);
            if y == self.max_y {
                return y;
            }
            *z = (self.cdf)(y);
            if z.is_nan() || *z >= p {
                return y;
            }
        }
    }
}
