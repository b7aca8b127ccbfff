//! Sources of uniform, normal and exponential variates.
//!
//! Every sampler in this crate draws its randomness through [`RandomSource`].
//! Only [`RandomSource::unif_rand`] is required; the normal and exponential
//! draws default to inversion and to the Ahrens-Dieter (1972) algorithm SA
//! built on top of it, so any uniform stream yields a complete source.
//!
//! [`NmathRng`] is the seeded generator used by the command-line front end.
//! It overrides the defaults with the Ziggurat samplers of `rand_distr`.

use nmath_distributions::continuous::qnorm;
use rand::distributions::Open01;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp1, StandardNormal};

/// 2^27, the resolution multiplier of the inversion normal draw.
const BIG: f64 = 134_217_728.0;

/// `Q[k - 1] = sum_{i = 1}^{k} ln(2)^i / i!`
const EXP_Q: [f64; 16] = [
    0.6931471805599453,
    0.9333736875190459,
    0.9888777961838675,
    0.9984959252914960040,
    0.9998292811061389,
    0.9999833164100727,
    0.9999985508193484,
    0.9999998906925558,
    0.9999999924734159,
    0.9999999995283275,
    0.9999999999728814,
    0.9999999999985598,
    0.9999999999999289,
    0.9999999999999968,
    0.9999999999999999,
    1.0000000000000000,
];

/// A stream of random variates.
///
/// Implementations must return uniforms strictly inside `(0, 1)`.
pub trait RandomSource {
    /// Uniform variate on the open unit interval.
    fn unif_rand(&mut self) -> f64;

    /// Standard normal variate.
    ///
    /// The default inverts a 2^27-refined uniform through `qnorm`.
    fn norm_rand(&mut self) -> f64 {
        let u = self.unif_rand();
        let u = (BIG * u).trunc() + self.unif_rand();
        qnorm(u / BIG, 0.0, 1.0, true, false)
    }

    /// Standard exponential variate.
    ///
    /// The default is algorithm SA of Ahrens and Dieter (1972).
    fn exp_rand(&mut self) -> f64 {
        let mut a = 0.0;
        let mut u = self.unif_rand();
        while u <= 0.0 || u >= 1.0 {
            u = self.unif_rand();
        }
        loop {
            u += u;
            if u > 1.0 {
                break;
            }
            a += EXP_Q[0];
        }
        u -= 1.0;

        if u <= EXP_Q[0] {
            return a + u;
        }

        let mut i = 0;
        let mut umin = self.unif_rand();
        loop {
            let ustar = self.unif_rand();
            if umin > ustar {
                umin = ustar;
            }
            i += 1;
            if u <= EXP_Q[i] {
                break;
            }
        }
        a + umin * EXP_Q[0]
    }
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn unif_rand(&mut self) -> f64 {
        (**self).unif_rand()
    }

    fn norm_rand(&mut self) -> f64 {
        (**self).norm_rand()
    }

    fn exp_rand(&mut self) -> f64 {
        (**self).exp_rand()
    }
}

/// Seeded random source.
///
/// The same seed always reproduces the same stream of variates.
///
/// # Examples
///
/// ```rust
/// use nmath_random::{NmathRng, RandomSource};
///
/// let mut a = NmathRng::from_seed(7);
/// let mut b = NmathRng::from_seed(7);
/// assert_eq!(a.unif_rand(), b.unif_rand());
/// assert_eq!(a.seed(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct NmathRng {
    /// The underlying PRNG instance.
    inner: StdRng,
    /// Seed used for initialisation.
    seed: u64,
}

impl NmathRng {
    /// Creates a generator initialised with `seed`.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates a generator from a seed drawn from the operating system.
    ///
    /// The drawn seed is reported by [`NmathRng::seed`] so a run can be replayed.
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::thread_rng().gen())
    }

    /// Returns the seed used for initialisation.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fills the buffer with uniforms on `(0, 1)`.
    pub fn fill_uniform(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = Open01.sample(&mut self.inner);
        }
    }

    /// Fills the buffer with standard normal variates.
    pub fn fill_normal(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = StandardNormal.sample(&mut self.inner);
        }
    }
}

impl RandomSource for NmathRng {
    #[inline]
    fn unif_rand(&mut self) -> f64 {
        self.inner.sample(Open01)
    }

    /// Ziggurat normal draw (Marsaglia and Tsang, 2000).
    #[inline]
    fn norm_rand(&mut self) -> f64 {
        StandardNormal.sample(&mut self.inner)
    }

    /// Ziggurat exponential draw.
    #[inline]
    fn exp_rand(&mut self) -> f64 {
        Exp1.sample(&mut self.inner)
    }
}

/// Test source replaying a fixed cycle of uniforms through the default
/// normal and exponential draws.
#[cfg(test)]
pub(crate) struct CycleSource {
    values: Vec<f64>,
    next: usize,
}

#[cfg(test)]
impl CycleSource {
    pub(crate) fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }
}

#[cfg(test)]
impl RandomSource for CycleSource {
    fn unif_rand(&mut self) -> f64 {
        let u = self.values[self.next % self.values.len()];
        self.next += 1;
        u
    }
}
