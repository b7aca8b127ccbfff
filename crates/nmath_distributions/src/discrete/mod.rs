//! Discrete distributions on the non-negative integers.
//!
//! The `d`/`p`/`q` naming scheme matches [`crate::continuous`]. Densities
//! warn and return 0 for non-integer `x`; distribution functions floor `x`
//! (with a `1e-7` fuzz). Quantiles return the smallest support point `y`
//! with `P[X <= y] >= p`.
//!
//! ## Example
//!
//! ```
//! use nmath_distributions::discrete::{dbinom, pbinom, qbinom};
//!
//! assert!((dbinom(1.0, 2.0, 0.5, false) - 0.5).abs() < 1e-15);
//! assert_eq!(qbinom(pbinom(3.0, 10.0, 0.3, true, false), 10.0, 0.3, true, false), 3.0);
//! ```

pub mod binom;
pub mod geom;
pub mod hyper;
pub mod multinom;
pub mod nbinom;
pub mod pois;
mod search;
pub mod wilcox;

pub use binom::{dbinom, dbinom_raw, pbinom, qbinom};
pub use geom::{dgeom, pgeom, qgeom};
pub use hyper::{dhyper, phyper, qhyper};
pub use multinom::dmultinom;
pub use nbinom::{dnbinom, dnbinom_mu, pnbinom, pnbinom_mu, qnbinom, qnbinom_mu};
pub use pois::{dpois, ppois, qpois};
// Rank sum counts are memoised per caller
pub use wilcox::WilcoxCounts;
