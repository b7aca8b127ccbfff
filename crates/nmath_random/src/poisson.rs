//! Poisson variates by algorithm PD of Ahrens and Dieter (1982).
//!
//! Means below 10 use table-lookup inversion; the cumulative table is grown
//! lazily and kept in [`PoissonSampler`] for as long as the mean is unchanged.
//! Larger means use a normal proposal with squeeze, quotient and hat tests.

use crate::source::RandomSource;
use nmath_core::math::constants::M_1_SQRT_2PI;
use nmath_core::math::functions::fsign;
use nmath_core::types::warning::domain_nan;

const A0: f64 = -0.5;
const A1: f64 = 0.3333333;
const A2: f64 = -0.2500068;
const A3: f64 = 0.2000118;
const A4: f64 = -0.1661269;
const A5: f64 = 0.1421878;
const A6: f64 = -0.1384794;
const A7: f64 = 0.1250060;

const ONE_7: f64 = 0.142_857_142_857_142_857_1;
const ONE_12: f64 = 0.083_333_333_333_333_333_3;
const ONE_24: f64 = 0.041_666_666_666_666_666_7;

const FACT: [f64; 10] = [
    1., 1., 2., 6., 24., 120., 720., 5040., 40320., 362880.,
];

/// Largest index of the cumulative inversion table.
const TABLE_END: usize = 35;

/// Cached state of algorithm PD.
#[derive(Debug, Clone)]
pub struct PoissonSampler {
    /// Mean the table or the case-A constants belong to.
    muprev: Option<f64>,
    /// Mean the step-P constants belong to.
    muprev2: Option<f64>,
    // Inversion table (mu < 10)
    l: usize,
    m: usize,
    pp: [f64; TABLE_END + 1],
    p0: f64,
    p: f64,
    q: f64,
    // Normal approximation (mu >= 10)
    s: f64,
    d: f64,
    big_l: f64,
    omega: f64,
    b1: f64,
    b2: f64,
    c: f64,
    c0: f64,
    c1: f64,
    c2: f64,
    c3: f64,
}

impl Default for PoissonSampler {
    fn default() -> Self {
        Self {
            muprev: None,
            muprev2: None,
            l: 0,
            m: 0,
            pp: [0.0; TABLE_END + 1],
            p0: 0.0,
            p: 0.0,
            q: 0.0,
            s: 0.0,
            d: 0.0,
            big_l: 0.0,
            omega: 0.0,
            b1: 0.0,
            b2: 0.0,
            c: 0.0,
            c0: 0.0,
            c1: 0.0,
            c2: 0.0,
            c3: 0.0,
        }
    }
}

/// Terms of the discrete normal and Poisson comparison for one candidate.
struct HatTerms {
    px: f64,
    py: f64,
    fx: f64,
    fy: f64,
}

impl PoissonSampler {
    /// Creates a sampler with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws from Poisson(`mu`).
    pub fn sample<S: RandomSource + ?Sized>(&mut self, rng: &mut S, mu: f64) -> f64 {
        if !mu.is_finite() || mu < 0.0 {
            return domain_nan("rpois");
        }
        if mu <= 0.0 {
            return 0.0;
        }

        let big_mu = mu >= 10.0;
        let mut new_big_mu = false;

        if !(big_mu && self.muprev == Some(mu)) {
            if big_mu {
                // Case A: the Poisson probabilities exceed the discrete
                // normal ones whenever k >= big_l.
                new_big_mu = true;
                self.muprev = Some(mu);
                self.s = mu.sqrt();
                self.d = 6.0 * mu * mu;
                self.big_l = (mu - 1.1484).floor();
            } else {
                return self.sample_table(rng, mu);
            }
        }

        // Step N: normal sample.
        let g = mu + self.s * rng.norm_rand();

        let mut pois = -1.0;
        let mut fk = 0.0;
        let mut difmuk = 0.0;
        let mut u = 0.0;
        if g >= 0.0 {
            pois = g.floor();
            // Step I: immediate acceptance.
            if pois >= self.big_l {
                return pois;
            }
            // Step S: squeeze acceptance.
            fk = pois;
            difmuk = mu - fk;
            u = rng.unif_rand();
            if self.d * u >= difmuk * difmuk * difmuk {
                return pois;
            }
        }

        // Step P: the exits above can leave muprev2 behind muprev.
        if new_big_mu || self.muprev2 != Some(mu) {
            self.muprev2 = Some(mu);
            self.omega = M_1_SQRT_2PI / self.s;
            self.b1 = ONE_24 / mu;
            self.b2 = 0.3 * self.b1 * self.b1;
            self.c3 = ONE_7 * self.b1 * self.b2;
            self.c2 = self.b2 - 15.0 * self.c3;
            self.c1 = self.b1 - 6.0 * self.b2 + 45.0 * self.c3;
            self.c0 = 1.0 - self.b1 + 3.0 * self.b2 - 15.0 * self.c3;
            self.c = 0.1069 / mu;
        }

        if g >= 0.0 {
            // Step Q: quotient acceptance.
            let h = self.hat_terms(mu, pois, fk, difmuk);
            if h.fy - u * h.fy <= h.py * (h.px - h.fx).exp() {
                return pois;
            }
        }

        loop {
            // Step E: double-exponential sample; t <= -0.6744 has pk < fk.
            let e = rng.exp_rand();
            let u = 2.0 * rng.unif_rand() - 1.0;
            let t = 1.8 + fsign(e, u);
            if t > -0.6744 {
                pois = (mu + self.s * t).floor();
                fk = pois;
                difmuk = mu - fk;

                // Step H: hat acceptance.
                let h = self.hat_terms(mu, pois, fk, difmuk);
                if self.c * u.abs() <= h.py * (h.px + e).exp() - h.fy * (h.fx + e).exp() {
                    return pois;
                }
            }
        }
    }

    /// Inversion by the lazily grown cumulative table, `mu < 10`.
    fn sample_table<S: RandomSource + ?Sized>(&mut self, rng: &mut S, mu: f64) -> f64 {
        if self.muprev != Some(mu) {
            self.muprev = Some(mu);
            self.m = (mu as usize).max(1);
            self.l = 0;
            self.p0 = (-mu).exp();
            self.p = self.p0;
            self.q = self.p0;
        }

        loop {
            // Step U
            let u = rng.unif_rand();
            if u <= self.p0 {
                return 0.0;
            }

            // Step T: 0.458 is about pp[9] at mu = 10.
            if self.l > 0 {
                let j = if u > 0.458 { self.l.min(self.m) } else { 1 };
                if let Some(k) = (j..=self.l).find(|&k| u <= self.pp[k]) {
                    return k as f64;
                }
                if self.l == TABLE_END {
                    continue;
                }
            }

            // Step C: extend the table.
            for k in (self.l + 1)..=TABLE_END {
                self.p *= mu / k as f64;
                self.q += self.p;
                self.pp[k] = self.q;
                if u <= self.q {
                    self.l = k;
                    return k as f64;
                }
            }
            self.l = TABLE_END;
        }
    }

    fn hat_terms(&self, mu: f64, pois: f64, fk: f64, difmuk: f64) -> HatTerms {
        let (px, py) = if pois < 10.0 {
            (-mu, mu.powf(pois) / FACT[pois as usize])
        } else {
            let del = ONE_12 / fk;
            let del = del * (1.0 - 4.8 * del * del);
            let v = difmuk / fk;
            let px = if v.abs() <= 0.25 {
                fk * v * v
                    * (((((((A7 * v + A6) * v + A5) * v + A4) * v + A3) * v + A2) * v + A1) * v + A0)
                    - del
            } else {
                fk * v.ln_1p() - difmuk - del
            };
            (px, M_1_SQRT_2PI / fk.sqrt())
        };
        let x = (0.5 - difmuk) / self.s;
        let xx = x * x;
        HatTerms {
            px,
            py,
            fx: -0.5 * xx,
            fy: self.omega * (((self.c3 * xx + self.c2) * xx + self.c1) * xx + self.c0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::NmathRng;

    fn check_mean(mu: f64, seed: u64) {
        let n = 20_000;
        let mut rng = NmathRng::from_seed(seed);
        let mut sampler = PoissonSampler::new();
        let draws: Vec<f64> = (0..n).map(|_| sampler.sample(&mut rng, mu)).collect();
        assert!(draws.iter().all(|&k| k >= 0.0 && k == k.floor()));
        let mean = draws.iter().sum::<f64>() / n as f64;
        assert!(
            (mean - mu).abs() < 5.0 * (mu / n as f64).sqrt(),
            "mu {} mean {}",
            mu,
            mean
        );
    }

    #[test]
    fn test_table_means() {
        check_mean(0.7, 1);
        check_mean(4.0, 2);
        check_mean(9.5, 3);
    }

    #[test]
    fn test_normal_means() {
        check_mean(10.0, 4);
        check_mean(55.0, 5);
        check_mean(1e4, 6);
    }

    #[test]
    fn test_domain() {
        let mut rng = NmathRng::from_seed(7);
        let mut s = PoissonSampler::new();
        assert_eq!(s.sample(&mut rng, 0.0), 0.0);
        assert!(s.sample(&mut rng, -1.0).is_nan());
        assert!(s.sample(&mut rng, f64::INFINITY).is_nan());
    }

    #[test]
    fn test_table_survives_same_mean() {
        let mut rng = NmathRng::from_seed(8);
        let mut s = PoissonSampler::new();
        for _ in 0..200 {
            s.sample(&mut rng, 3.0);
        }
        assert!(s.l > 0);
        let l = s.l;
        s.sample(&mut rng, 3.0);
        assert!(s.l >= l);
        s.sample(&mut rng, 2.0);
        assert_eq!(s.muprev, Some(2.0));
    }

    #[test]
    fn test_alternating_means_share_one_sampler() {
        let mut rng = NmathRng::from_seed(9);
        let mut s = PoissonSampler::new();
        let n = 10_000;
        let (mut small, mut large) = (0.0, 0.0);
        for _ in 0..n {
            small += s.sample(&mut rng, 2.0);
            large += s.sample(&mut rng, 30.0);
        }
        let n = n as f64;
        assert!((small / n - 2.0).abs() < 5.0 * (2.0 / n).sqrt());
        assert!((large / n - 30.0).abs() < 5.0 * (30.0 / n).sqrt());
    }
}
