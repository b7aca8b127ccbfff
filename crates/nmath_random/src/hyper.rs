//! Hypergeometric variates.
//!
//! Three cases, chosen from the mode `m` and the support `[minjx, maxjx]`:
//!
//! - I: a single support point
//! - II: `m - minjx < 10`, scaled inversion (algorithm HIN)
//! - III: otherwise, the patchwork rejection of Kachitvichyanukul and
//!   Schmeiser (1985), algorithm H2PE
//!
//! Draws are made for the smaller colour and `min(k, N - k)` draws; the result
//! is mapped back to the caller's parameters at the end.

use crate::binomial::BinomialSampler;
use crate::source::RandomSource;
use nmath_core::math::constants::{INT_MAX, M_LN_SQRT_2PI};
use nmath_core::math::dpq::force_int;
use nmath_core::types::warning::{domain_nan, warn_detail};
use nmath_distributions::discrete::qhyper;

/// `ln(i!)` for `i = 0..=7`.
const AL: [f64; 8] = [
    0.0,
    0.0,
    0.693_147_180_559_945_309_417_232_121_458_17,
    1.791_759_469_228_055_000_812_477_358_380_70,
    3.178_053_830_347_945_619_646_941_601_297_05,
    4.787_491_742_782_045_994_247_700_934_523_24,
    6.579_251_212_010_100_995_060_178_292_903_94,
    8.525_161_361_065_414_300_165_531_036_347_12,
];

/// Scaling factor of HIN against early underflow, and its logarithm.
const SCALE: f64 = 1e25;
const CON: f64 = 57.564_627_324_851_142_1;

const DELTAL: f64 = 0.0078;
const DELTAU: f64 = 0.0034;

/// Rejection cap of H2PE; exceeding it gives `NaN` and a warning.
const MAX_REJECTIONS: u32 = 10_000;

/// `ln(i!)`, exact for `i <= 7` and Stirling beyond.
fn afc(i: i64) -> f64 {
    if i < 0 {
        warn_detail("rhyper", format_args!("afc(i), i = {} < 0", i));
        return -1.0;
    }
    if i <= 7 {
        return AL[i as usize];
    }
    let di = i as f64;
    let i2 = di * di;
    (di + 0.5) * di.ln() - di + M_LN_SQRT_2PI + (0.0833333333333333 - 0.00277777777777778 / i2) / di
}

/// Setup that depends on the colour counts only.
#[derive(Debug, Clone, Copy)]
struct UrnSetup {
    n1s: i64,
    n2s: i64,
    tn: f64,
    /// Smaller colour count
    n1: i64,
    /// Larger colour count
    n2: i64,
}

/// Setup that also depends on the number of draws.
#[derive(Debug, Clone, Copy, Default)]
struct DrawSetup {
    ks: i64,
    k: i64,
    m: i64,
    minjx: i64,
    maxjx: i64,
    /// Scaled mass at `minjx`, case II
    w: f64,
    // Case III
    a: f64,
    xl: f64,
    xr: f64,
    lamdl: f64,
    lamdr: f64,
    p1: f64,
    p2: f64,
    p3: f64,
}

/// Cached state of the hypergeometric generator.
#[derive(Debug, Clone, Default)]
pub struct HypergeometricSampler {
    urn: Option<UrnSetup>,
    draw: Option<DrawSetup>,
    /// Used for the Bernoulli branch of huge urns.
    binomial: BinomialSampler,
}

impl HypergeometricSampler {
    /// Creates a sampler with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of red balls among `kk` drawn from `nn1` red and `nn2` black.
    pub fn sample<S: RandomSource + ?Sized>(
        &mut self,
        rng: &mut S,
        nn1in: f64,
        nn2in: f64,
        kkin: f64,
    ) -> f64 {
        if !nn1in.is_finite() || !nn2in.is_finite() || !kkin.is_finite() {
            return domain_nan("rhyper");
        }
        let nn1f = force_int(nn1in);
        let nn2f = force_int(nn2in);
        let kkf = force_int(kkin);
        if nn1f < 0.0 || nn2f < 0.0 || kkf < 0.0 || kkf > nn1f + nn2f {
            return domain_nan("rhyper");
        }
        if nn1f >= INT_MAX || nn2f >= INT_MAX || kkf >= INT_MAX {
            if kkf == 1.0 {
                return self.binomial.sample(rng, kkf, nn1f / (nn1f + nn2f));
            }
            return qhyper(rng.unif_rand(), nn1f, nn2f, kkf, false, false);
        }
        let (nn1, nn2, kk) = (nn1f as i64, nn2f as i64, kkf as i64);

        let new_urn = !matches!(self.urn, Some(u) if u.n1s == nn1 && u.n2s == nn2);
        let new_draw = new_urn || !matches!(self.draw, Some(d) if d.ks == kk);

        let urn = match self.urn {
            Some(u) if !new_urn => u,
            _ => {
                let (n1, n2) = if nn1 <= nn2 { (nn1, nn2) } else { (nn2, nn1) };
                let u = UrnSetup {
                    n1s: nn1,
                    n2s: nn2,
                    tn: (nn1 + nn2) as f64,
                    n1,
                    n2,
                };
                self.urn = Some(u);
                u
            }
        };

        let draw = match self.draw {
            Some(d) if !new_draw => d,
            _ => {
                let d = Self::setup_draw(&urn, kk);
                self.draw = Some(d);
                d
            }
        };

        let ix = if draw.minjx == draw.maxjx {
            draw.maxjx
        } else if draw.m - draw.minjx < 10 {
            hin(rng, &urn, &draw)
        } else {
            match h2pe(rng, &urn, &draw) {
                Some(ix) => ix,
                None => return f64::NAN,
            }
        };

        let ix = ix as f64;
        let (nn1, nn2, kk) = (nn1 as f64, nn2 as f64, kk as f64);
        if kk + kk >= urn.tn {
            if nn1 > nn2 {
                kk - nn2 + ix
            } else {
                nn1 - ix
            }
        } else if nn1 > nn2 {
            kk - ix
        } else {
            ix
        }
    }

    fn setup_draw(urn: &UrnSetup, kk: i64) -> DrawSetup {
        let (n1, n2, tn) = (urn.n1, urn.n2, urn.tn);
        let k = if (kk + kk) as f64 >= tn {
            (tn - kk as f64) as i64
        } else {
            kk
        };
        let m = ((k as f64 + 1.0) * (n1 as f64 + 1.0) / (tn + 2.0)) as i64;
        let minjx = (k - n2).max(0);
        let maxjx = n1.min(k);
        let mut d = DrawSetup {
            ks: kk,
            k,
            m,
            minjx,
            maxjx,
            ..DrawSetup::default()
        };

        if minjx == maxjx {
            return d;
        }
        if m - minjx < 10 {
            let lw = if k < n2 {
                afc(n2) + afc(n1 + n2 - k) - afc(n2 - k) - afc(n1 + n2)
            } else {
                afc(n1) + afc(k) - afc(k - n2) - afc(n1 + n2)
            };
            d.w = (lw + CON).exp();
            return d;
        }

        let (n1f, n2f, kf, mf) = (n1 as f64, n2 as f64, k as f64, m as f64);
        let s = ((tn - kf) * kf * n1f * n2f / (tn - 1.0) / tn / tn).sqrt();
        // Truncation keeps the region boundaries on half-integers.
        let dd = (1.5 * s).trunc() + 0.5;
        let xl = mf - dd + 0.5;
        let xr = mf + dd + 0.5;
        let a = afc(m) + afc(n1 - m) + afc(k - m) + afc(n2 - k + m);
        let kl = (a
            - afc(xl as i64)
            - afc((n1f - xl) as i64)
            - afc((kf - xl) as i64)
            - afc((n2f - kf + xl) as i64))
            .exp();
        let kr = (a
            - afc((xr - 1.0) as i64)
            - afc((n1f - xr + 1.0) as i64)
            - afc((kf - xr + 1.0) as i64)
            - afc((n2f - kf + xr - 1.0) as i64))
            .exp();
        let lamdl = -(xl * (n2f - kf + xl) / (n1f - xl + 1.0) / (kf - xl + 1.0)).ln();
        let lamdr = -((n1f - xr + 1.0) * (kf - xr + 1.0) / xr / (n2f - kf + xr)).ln();
        d.a = a;
        d.xl = xl;
        d.xr = xr;
        d.lamdl = lamdl;
        d.lamdr = lamdr;
        d.p1 = dd + dd;
        d.p2 = d.p1 + kl / lamdl;
        d.p3 = d.p2 + kr / lamdr;
        d
    }
}

/// Case II: inversion from `minjx`, restarting when the walk passes `maxjx`.
fn hin<S: RandomSource + ?Sized>(rng: &mut S, urn: &UrnSetup, d: &DrawSetup) -> i64 {
    let (n1, n2, k) = (urn.n1 as f64, urn.n2 as f64, d.k as f64);
    'restart: loop {
        let mut p = d.w;
        let mut ix = d.minjx;
        let mut u = rng.unif_rand() * SCALE;
        while u > p {
            u -= p;
            p *= (n1 - ix as f64) * (k - ix as f64);
            ix += 1;
            p = p / ix as f64 / (n2 - k + ix as f64);
            if ix > d.maxjx {
                continue 'restart;
            }
        }
        return ix;
    }
}

/// Case III outcome of one candidate.
enum Candidate {
    Accept(i64),
    Reject,
}

/// Case III: triangle-parallelogram-exponential rejection.
///
/// Returns `None` after [`MAX_REJECTIONS`] candidates.
fn h2pe<S: RandomSource + ?Sized>(rng: &mut S, urn: &UrnSetup, d: &DrawSetup) -> Option<i64> {
    let mut n_uv = 0;
    loop {
        let u = rng.unif_rand() * d.p3;
        let mut v = rng.unif_rand();
        n_uv += 1;
        if n_uv >= MAX_REJECTIONS {
            warn_detail(
                "rhyper",
                format_args!("branch III: giving up after {} rejections", n_uv),
            );
            return None;
        }

        let ix = if u < d.p1 {
            // Rectangular region
            (d.xl + u) as i64
        } else if u <= d.p2 {
            // Left tail
            let ix = (d.xl + v.ln() / d.lamdl) as i64;
            if ix < d.minjx {
                continue;
            }
            v *= (u - d.p1) * d.lamdl;
            ix
        } else {
            // Right tail
            let ix = (d.xr - v.ln() / d.lamdr) as i64;
            if ix > d.maxjx {
                continue;
            }
            v *= (u - d.p2) * d.lamdr;
            ix
        };

        let outcome = if d.m < 100 || ix <= 50 {
            explicit_test(urn, d, ix, v)
        } else {
            squeeze_test(urn, d, ix, v)
        };
        if let Candidate::Accept(ix) = outcome {
            return Some(ix);
        }
    }
}

/// Accept when `v <= f(ix) / f(m)`, the ratio built by recurrence.
fn explicit_test(urn: &UrnSetup, d: &DrawSetup, ix: i64, v: f64) -> Candidate {
    let (n1, n2, k) = (urn.n1 as f64, urn.n2 as f64, d.k as f64);
    let mut f = 1.0;
    if d.m < ix {
        for i in (d.m + 1)..=ix {
            let i = i as f64;
            f = f * (n1 - i + 1.0) * (k - i + 1.0) / (n2 - k + i) / i;
        }
    } else if d.m > ix {
        for i in (ix + 1)..=d.m {
            let i = i as f64;
            f = f * i * (n2 - k + i) / (n1 - i + 1.0) / (k - i + 1.0);
        }
    }
    if v <= f {
        Candidate::Accept(ix)
    } else {
        Candidate::Reject
    }
}

/// Squeeze by upper and lower bounds on `log f(ix)`, then the Stirling check.
fn squeeze_test(urn: &UrnSetup, d: &DrawSetup, ix: i64, v: f64) -> Candidate {
    let (n1, n2, k, m) = (urn.n1 as f64, urn.n2 as f64, d.k as f64, d.m as f64);
    let y = ix as f64;
    let y1 = y + 1.0;
    let ym = y - m;
    let yn = n1 - y + 1.0;
    let yk = k - y + 1.0;
    let nk = n2 - k + y1;
    let r = -ym / y1;
    let s = ym / yn;
    let t = ym / yk;
    let e = -ym / nk;
    let g = yn * yk / (y1 * nk) - 1.0;
    let dg = if g < 0.0 { 1.0 + g } else { 1.0 };
    let gu = g * (1.0 + g * (-0.5 + g / 3.0));
    let gl = gu - 0.25 * (g * g * g * g) / dg;
    let xm = m + 0.5;
    let xn = n1 - m + 0.5;
    let xk = k - m + 0.5;
    let nm = n2 - k + xm;
    let cubic = |z: f64| z * (1.0 + z * (-0.5 + z / 3.0));
    let ub = y * gu - m * gl + DELTAU + xm * cubic(r) + xn * cubic(s) + xk * cubic(t) + nm * cubic(e);

    let alv = v.ln();
    if alv > ub {
        return Candidate::Reject;
    }

    let quartic = |weight: f64, z: f64| {
        let q = weight * (z * z * z * z);
        if z < 0.0 {
            q / (1.0 + z)
        } else {
            q
        }
    };
    let dr = quartic(xm, r);
    let ds = quartic(xn, s);
    let dt = quartic(xk, t);
    let de = quartic(nm, e);
    if alv < ub - 0.25 * (dr + ds + dt + de) + (y + m) * (gl - gu) - DELTAL {
        return Candidate::Accept(ix);
    }

    let (n1i, n2i, ki) = (urn.n1, urn.n2, d.k);
    if alv <= d.a - afc(ix) - afc(n1i - ix) - afc(ki - ix) - afc(n2i - ki + ix) {
        Candidate::Accept(ix)
    } else {
        Candidate::Reject
    }
}
