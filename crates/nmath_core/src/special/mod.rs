//! Special functions.
//!
//! - `gamma`: Gamma and log-gamma, Stirling error, `lgamma(1 + a)`, `log(1 + x) - x`,
//!   the saddle-point deviance `bd0` and the raw Poisson density used by every
//!   gamma-family density and CDF
//! - `beta`: Beta and log-beta
//! - `toms708`: The incomplete beta ratio `I_x(a, b)` (ACM TOMS algorithm 708)

pub mod beta;
pub mod gamma;
pub mod toms708;

pub use beta::{beta, lbeta};
pub use gamma::{
    bd0, dpois_raw, dpois_wrap, gammafn, lgamma1p, lgammacor, lgammafn, lgammafn_sign, log1pmx,
    logcf, stirlerr,
};
pub use toms708::{bratio, IncompleteBeta};
