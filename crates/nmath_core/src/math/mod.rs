//! Mathematical building blocks.
//!
//! - `constants`: Floating-point constants used throughout the workspace
//! - `dpq`: Conversions between linear/log probabilities and lower/upper tails
//! - `chebyshev`: Chebyshev series evaluation
//! - `functions`: Small NaN-aware helpers (`fmax2`, `logspace_add`, ...)
//! - `solvers`: Brent root finder and Brent minimiser

pub mod chebyshev;
pub mod constants;
pub mod dpq;
pub mod functions;
pub mod solvers;
