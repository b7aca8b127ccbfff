//! Beta variates by Cheng's (1978) algorithms BB and BC.
//!
//! BB covers `min(a, b) > 1`, BC the rest. Both compute constants that depend
//! only on the parameter pair, cached in [`BetaSampler`].

use crate::source::RandomSource;
use nmath_core::math::constants::{DBL_MAX, DBL_MAX_EXP, M_LN2};
use nmath_core::math::functions::{fmax2, fmin2};
use nmath_core::types::warning::domain_nan;

/// log(DBL_MAX)
const EXPMAX: f64 = DBL_MAX_EXP as f64 * M_LN2;
const LN_4: f64 = 1.3862944;

/// Cached constants of algorithms BB and BC.
#[derive(Debug, Clone, Default)]
pub struct BetaSampler {
    /// Parameter pair the constants belong to.
    params: Option<(f64, f64)>,
    beta: f64,
    gamma: f64,
    delta: f64,
    k1: f64,
    k2: f64,
}

impl BetaSampler {
    /// Creates a sampler with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws from Beta(`aa`, `bb`).
    ///
    /// Zero and infinite shapes are allowed and give the limiting point masses.
    pub fn sample<S: RandomSource + ?Sized>(&mut self, rng: &mut S, aa: f64, bb: f64) -> f64 {
        if aa.is_nan() || bb.is_nan() || aa < 0.0 || bb < 0.0 {
            return domain_nan("rbeta");
        }
        if aa.is_infinite() && bb.is_infinite() {
            return 0.5;
        }
        if aa == 0.0 && bb == 0.0 {
            return if rng.unif_rand() < 0.5 { 0.0 } else { 1.0 };
        }
        if aa.is_infinite() || bb == 0.0 {
            return 1.0;
        }
        if bb.is_infinite() || aa == 0.0 {
            return 0.0;
        }

        let same = self.params == Some((aa, bb));
        if !same {
            self.params = Some((aa, bb));
        }

        let a = fmin2(aa, bb);
        let b = fmax2(aa, bb);
        let alpha = a + b;

        if a <= 1.0 {
            // Algorithm BC
            if !same {
                self.beta = 1.0 / a;
                self.delta = 1.0 + b - a;
                self.k1 = self.delta * (0.0138889 + 0.0416667 * a) / (b * self.beta - 0.777778);
                self.k2 = 0.25 + (0.5 + 0.25 / self.delta) * a;
            }
            let w = loop {
                let u1 = rng.unif_rand();
                let u2 = rng.unif_rand();
                let z;
                if u1 < 0.5 {
                    let y = u1 * u2;
                    z = u1 * y;
                    if 0.25 * u2 + z - y >= self.k1 {
                        continue;
                    }
                } else {
                    z = u1 * u1 * u2;
                    if z <= 0.25 {
                        break self.v_w(u1, b).1;
                    }
                    if z >= self.k2 {
                        continue;
                    }
                }
                let (v, w) = self.v_w(u1, b);
                if alpha * ((alpha / (a + w)).ln() + v) - LN_4 >= z.ln() {
                    break w;
                }
            };
            if aa == a {
                a / (a + w)
            } else {
                w / (a + w)
            }
        } else {
            // Algorithm BB
            if !same {
                self.beta = ((alpha - 2.0) / (2.0 * a * b - alpha)).sqrt();
                self.gamma = a + 1.0 / self.beta;
            }
            let w = loop {
                let u1 = rng.unif_rand();
                let u2 = rng.unif_rand();
                let (v, w) = self.v_w(u1, a);
                let z = u1 * u1 * u2;
                let r = self.gamma * v - LN_4;
                let s = a + r - w;
                if s + 2.609438 >= 5.0 * z {
                    break w;
                }
                let t = z.ln();
                if s > t {
                    break w;
                }
                if r + alpha * (alpha / (b + w)).ln() >= t {
                    break w;
                }
            };
            if aa != a {
                b / (b + w)
            } else {
                w / (b + w)
            }
        }
    }

    /// `v = beta * logit(u1)` and `w = factor * exp(v)`, capped at `DBL_MAX`.
    fn v_w(&self, u1: f64, factor: f64) -> (f64, f64) {
        let v = self.beta * (u1 / (1.0 - u1)).ln();
        let w = if v <= EXPMAX {
            let w = factor * v.exp();
            if w.is_infinite() {
                DBL_MAX
            } else {
                w
            }
        } else {
            DBL_MAX
        };
        (v, w)
    }
}
