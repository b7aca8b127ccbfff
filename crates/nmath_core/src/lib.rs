//! # nmath_core: Numerical Foundation for Distribution Functions
//!
//! ## Layer 1 (Foundation) Role
//!
//! nmath_core is the bottom layer of the workspace, providing:
//! - Probability-scale helpers for lower/upper tails and log probabilities (`math::dpq`)
//! - Chebyshev series evaluation and numeric constants (`math::chebyshev`, `math::constants`)
//! - Log-gamma, Stirling error, `log1p(x) - x` and friends (`special::gamma`)
//! - Log-beta and the TOMS 708 incomplete beta ratio (`special::beta`, `special::toms708`)
//! - Brent root finder and Brent minimiser (`math::solvers`)
//! - Warning reporting and structured error types (`types`)
//!
//! ## Minimal Dependency Principle
//!
//! Layer 1 has no dependencies on other nmath_* crates:
//! - num-traits: Generic floating-point bounds for the solvers
//! - thiserror: Error derivation
//! - tracing: Non-fatal domain and precision warnings
//! - serde: Serialisation of result records (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use nmath_core::special::{lgammafn, lbeta};
//! use nmath_core::special::toms708::bratio;
//!
//! // log Gamma(5) = log(24)
//! assert!((lgammafn(5.0) - 24.0_f64.ln()).abs() < 1e-14);
//!
//! // I_x(a, b) and its complement in one call
//! let r = bratio(2.0, 3.0, 0.4, 0.6, false);
//! assert!((r.w + r.w1 - 1.0).abs() < 1e-15);
//! # assert!(lbeta(1.0, 1.0).abs() < 1e-15);
//! ```
//!
//! ## Warnings
//!
//! Nothing in this crate panics on bad numeric input. Domain violations return
//! `NaN`, and precision or convergence problems return the best estimate.
//! Both are reported through [`types::warning`] as `tracing` events under the
//! `nmath` target.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod special;
pub mod types;
