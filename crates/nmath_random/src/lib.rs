//! # nmath_random: Random Variate Generation
//!
//! ## Layer 3 (Random Variates) Role
//!
//! nmath_random draws variates for the distributions of `nmath_distributions`:
//! - A pluggable source of uniform, normal and exponential draws (`source`)
//! - Rejection and inversion samplers with caller-owned caches
//!   (`gamma`, `beta`, `poisson`, `binomial`, `hyper`)
//! - Stateless generators (`simple`) and the multinomial (`multinom`)
//! - [`Sampler`], bundling every cache behind one value, with dispatch over
//!   the [`Distribution`](nmath_distributions::distribution::Distribution) enum
//!
//! ## Sampler State
//!
//! Several algorithms precompute constants that depend only on the
//! distribution parameters. Those constants live in the sampler value the
//! caller owns, never in globals: two samplers never interfere, and a cache
//! built for one parameter set is recomputed as soon as the parameters change.
//!
//! ## Usage Examples
//!
//! ```rust
//! use nmath_random::{rnorm, NmathRng, Sampler};
//!
//! let mut rng = NmathRng::from_seed(2718);
//! let mut sampler = Sampler::new();
//!
//! let z = rnorm(&mut rng, 0.0, 1.0);
//! assert!(z.is_finite());
//!
//! let k = sampler.poisson(&mut rng, 4.5);
//! assert_eq!(k, k.floor());
//!
//! let counts = sampler.multinomial(&mut rng, 10, &[0.2, 0.3, 0.5]).unwrap();
//! assert_eq!(counts.iter().sum::<u64>(), 10);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod beta;
pub mod binomial;
pub mod gamma;
pub mod hyper;
mod multinom;
pub mod poisson;
pub mod sampler;
pub mod simple;
pub mod source;

pub use beta::BetaSampler;
pub use binomial::BinomialSampler;
pub use gamma::GammaSampler;
pub use hyper::HypergeometricSampler;
pub use poisson::PoissonSampler;
pub use sampler::Sampler;
pub use simple::{rcauchy, rexp, rlnorm, rnorm, rsignrank, runif, rwilcox};
pub use source::{NmathRng, RandomSource};
