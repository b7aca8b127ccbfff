//! # nmath_distributions: Density, Distribution and Quantile Functions
//!
//! ## Layer 2 (Distributions) Role
//!
//! nmath_distributions sits on top of nmath_core and provides:
//! - Continuous distributions: normal, log-normal, gamma, chi-square,
//!   noncentral chi-square, beta, Student t, Cauchy, exponential, uniform
//!   (`continuous`)
//! - Discrete distributions: binomial, Poisson, negative binomial, geometric,
//!   hypergeometric, multinomial and the Wilcoxon rank sum (`discrete`)
//! - A closed [`distribution::Distribution`] enum with validated parameters
//!   for run-time selection
//!
//! ## Conventions
//!
//! All functions take plain `f64` arguments and follow IEEE semantics: a
//! `NaN` argument yields `NaN` without a warning. Every distribution and
//! quantile function takes `lower_tail` and `log_p` flags, so tail
//! probabilities far below `DBL_MIN` remain representable on the log scale.
//!
//! ## Usage Examples
//!
//! ```rust
//! use nmath_distributions::continuous::{pnorm, qbeta, pbeta};
//! use nmath_distributions::discrete::ppois;
//!
//! // the far upper tail on the log scale
//! let lp = pnorm(40.0, 0.0, 1.0, false, true);
//! assert!((lp + 804.608_442_013_753_8).abs() < 1e-9);
//!
//! let x = qbeta(0.3, 2.0, 5.0, true, false);
//! assert!((pbeta(x, 2.0, 5.0, true, false) - 0.3).abs() < 1e-14);
//!
//! assert!(ppois(2.0, 1.0, true, false) > 0.9);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod continuous;
pub mod discrete;
pub mod distribution;
