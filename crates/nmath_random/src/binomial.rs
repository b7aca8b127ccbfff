//! Binomial variates by algorithm BTPE of Kachitvichyanukul and Schmeiser (1988).
//!
//! When `n * min(p, 1 - p) < 30` the variate comes from sequential inversion
//! instead. Draws are made for `min(p, 1 - p)` and reflected at the end.

use crate::source::RandomSource;
use nmath_core::math::constants::INT_MAX;
use nmath_core::math::dpq::force_int;
use nmath_core::types::warning::domain_nan;
use nmath_distributions::discrete::qbinom;

/// Cached setup of BTPE and of the inversion start value.
#[derive(Debug, Clone, Default)]
pub struct BinomialSampler {
    /// `(n, p)` the setup belongs to.
    params: Option<(i64, f64)>,
    /// `q^n`, the inversion start value.
    qn: f64,
    m: i64,
    c: f64,
    fm: f64,
    npq: f64,
    p1: f64,
    p2: f64,
    p3: f64,
    p4: f64,
    xl: f64,
    xll: f64,
    xlr: f64,
    xm: f64,
    xr: f64,
}

impl BinomialSampler {
    /// Creates a sampler with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws from Binomial(`nin`, `pp`).
    ///
    /// `nin` must be a non-negative integer value.
    pub fn sample<S: RandomSource + ?Sized>(&mut self, rng: &mut S, nin: f64, pp: f64) -> f64 {
        if !nin.is_finite() {
            return domain_nan("rbinom");
        }
        let r = force_int(nin);
        if r != nin {
            return domain_nan("rbinom");
        }
        if !pp.is_finite() || r < 0.0 || !(0.0..=1.0).contains(&pp) {
            return domain_nan("rbinom");
        }
        if r == 0.0 || pp == 0.0 {
            return 0.0;
        }
        if pp == 1.0 {
            return r;
        }
        if r >= INT_MAX {
            return qbinom(rng.unif_rand(), r, pp, false, false);
        }
        let n = r as i64;

        let p = pp.min(1.0 - pp);
        let q = 1.0 - p;
        let np = n as f64 * p;
        let r = p / q;
        let g = r * (n as f64 + 1.0);

        if self.params != Some((n, pp)) {
            self.params = Some((n, pp));
            if np < 30.0 {
                self.qn = q.powf(n as f64);
            } else {
                self.setup_btpe(p, q, np);
            }
        }

        let ix = if np < 30.0 {
            self.invert(rng, g, r)
        } else {
            self.btpe(rng, n, p, q, g, r)
        };
        let ix = if pp > 0.5 { n - ix } else { ix };
        ix as f64
    }

    fn setup_btpe(&mut self, p: f64, q: f64, np: f64) {
        self.fm = np + p;
        self.m = self.fm as i64;
        self.npq = np * q;
        self.p1 = (2.195 * self.npq.sqrt() - 4.6 * q).trunc() + 0.5;
        self.xm = self.m as f64 + 0.5;
        self.xl = self.xm - self.p1;
        self.xr = self.xm + self.p1;
        self.c = 0.134 + 20.5 / (15.3 + self.m as f64);
        let al = (self.fm - self.xl) / (self.fm - self.xl * p);
        self.xll = al * (1.0 + 0.5 * al);
        let al = (self.xr - self.fm) / (self.xr * q);
        self.xlr = al * (1.0 + 0.5 * al);
        self.p2 = self.p1 * (1.0 + self.c + self.c);
        self.p3 = self.p2 + self.c / self.xll;
        self.p4 = self.p3 + self.c / self.xlr;
    }

    /// Sequential search from 0, restarting after 110 steps.
    fn invert<S: RandomSource + ?Sized>(&self, rng: &mut S, g: f64, r: f64) -> i64 {
        loop {
            let mut ix = 0_i64;
            let mut f = self.qn;
            let mut u = rng.unif_rand();
            loop {
                if u < f {
                    return ix;
                }
                if ix > 110 {
                    break;
                }
                u -= f;
                ix += 1;
                f *= g / ix as f64 - r;
            }
        }
    }

    fn btpe<S: RandomSource + ?Sized>(
        &self,
        rng: &mut S,
        n: i64,
        p: f64,
        q: f64,
        g: f64,
        r: f64,
    ) -> i64 {
        let nf = n as f64;
        loop {
            let u = rng.unif_rand() * self.p4;
            let mut v = rng.unif_rand();

            // Triangular region
            if u <= self.p1 {
                return (self.xm - self.p1 * v + u) as i64;
            }

            let ix: i64;
            if u <= self.p2 {
                // Parallelogram region
                let x = self.xl + (u - self.p1) / self.c;
                v = v * self.c + 1.0 - (self.xm - x).abs() / self.p1;
                if v > 1.0 || v <= 0.0 {
                    continue;
                }
                ix = x as i64;
            } else if u > self.p3 {
                // Right tail
                ix = (self.xr - v.ln() / self.xlr) as i64;
                if ix > n {
                    continue;
                }
                v *= (u - self.p3) * self.xlr;
            } else {
                // Left tail
                ix = (self.xl + v.ln() / self.xll) as i64;
                if ix < 0 {
                    continue;
                }
                v *= (u - self.p2) * self.xll;
            }

            let k = (ix - self.m).abs();
            if k <= 20 || k as f64 >= self.npq / 2.0 - 1.0 {
                // Explicit evaluation of f(ix) / f(m)
                let mut f = 1.0;
                if self.m < ix {
                    for i in (self.m + 1)..=ix {
                        f *= g / i as f64 - r;
                    }
                } else if self.m > ix {
                    for i in (ix + 1)..=self.m {
                        f /= g / i as f64 - r;
                    }
                }
                if v <= f {
                    return ix;
                }
            } else {
                // Squeeze on log f(ix)
                let kf = k as f64;
                let amaxp =
                    (kf / self.npq) * ((kf * (kf / 3.0 + 0.625) + 0.1666666666666) / self.npq + 0.5);
                let ynorm = -kf * kf / (2.0 * self.npq);
                let alv = v.ln();
                if alv < ynorm - amaxp {
                    return ix;
                }
                if alv <= ynorm + amaxp {
                    // Stirling's formula to machine accuracy
                    let x1 = ix as f64 + 1.0;
                    let f1 = self.fm + 1.0;
                    let z = nf + 1.0 - self.fm;
                    let w = nf - ix as f64 + 1.0;
                    let bound = self.xm * (f1 / x1).ln()
                        + (nf - self.m as f64 + 0.5) * (z / w).ln()
                        + (ix - self.m) as f64 * (w * p / (x1 * q)).ln()
                        + stirling_tail(f1)
                        + stirling_tail(z)
                        + stirling_tail(x1)
                        + stirling_tail(w);
                    if alv <= bound {
                        return ix;
                    }
                }
            }
        }
    }
}

/// Series correction `(13860 - (462 - (132 - (99 - 140/y^2)/y^2)/y^2)/y^2) / y / 166320`.
fn stirling_tail(y: f64) -> f64 {
    let y2 = y * y;
    (13860.0 - (462.0 - (132.0 - (99.0 - 140.0 / y2) / y2) / y2) / y2) / y / 166320.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::NmathRng;

    fn check_moments(n: f64, p: f64, seed: u64) {
        let draws_n = 20_000;
        let mut rng = NmathRng::from_seed(seed);
        let mut sampler = BinomialSampler::new();
        let draws: Vec<f64> = (0..draws_n).map(|_| sampler.sample(&mut rng, n, p)).collect();
        assert!(draws.iter().all(|&k| (0.0..=n).contains(&k) && k == k.floor()));
        let mean = draws.iter().sum::<f64>() / draws_n as f64;
        let sd = (n * p * (1.0 - p)).sqrt();
        assert!(
            (mean - n * p).abs() < 5.0 * sd / (draws_n as f64).sqrt(),
            "Binomial({}, {}) mean {}",
            n,
            p,
            mean
        );
    }

    #[test]
    fn test_inversion_regime() {
        check_moments(10.0, 0.3, 1);
        check_moments(50.0, 0.9, 2);
        check_moments(1000.0, 0.01, 3);
    }

    #[test]
    fn test_btpe_regime() {
        check_moments(100.0, 0.4, 4);
        check_moments(5000.0, 0.75, 5);
        check_moments(1e6, 0.5, 6);
    }

    #[test]
    fn test_degenerate_and_domain() {
        let mut rng = NmathRng::from_seed(7);
        let mut s = BinomialSampler::new();
        assert_eq!(s.sample(&mut rng, 0.0, 0.5), 0.0);
        assert_eq!(s.sample(&mut rng, 12.0, 0.0), 0.0);
        assert_eq!(s.sample(&mut rng, 12.0, 1.0), 12.0);
        assert!(s.sample(&mut rng, 2.5, 0.5).is_nan());
        assert!(s.sample(&mut rng, 10.0, 1.5).is_nan());
        assert!(s.sample(&mut rng, -3.0, 0.5).is_nan());
    }

    #[test]
    fn test_stirling_tail_matches_series() {
        // 1/(12 y) to leading order
        let y = 50.0;
        assert!((stirling_tail(y) - 1.0 / (12.0 * y)).abs() < 1e-7);
    }
}
