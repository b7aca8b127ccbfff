//! Continuous distributions.
//!
//! Every distribution exposes free functions following one naming scheme:
//! - `dxxx(x, params.., log_p)`: density
//! - `pxxx(x, params.., lower_tail, log_p)`: distribution function
//! - `qxxx(p, params.., lower_tail, log_p)`: quantile function
//!
//! `lower_tail` selects `P[X <= x]` (or its complement) and `log_p` puts
//! probabilities on the natural-log scale.
//!
//! ## Example
//!
//! ```
//! use nmath_distributions::continuous::{pgamma, qgamma, pnorm};
//!
//! assert_eq!(pnorm(0.0, 0.0, 1.0, true, false), 0.5);
//!
//! let x = qgamma(0.95, 3.0, 2.0, true, false);
//! assert!((pgamma(x, 3.0, 2.0, true, false) - 0.95).abs() < 1e-14);
//! ```

pub mod beta;
pub mod cauchy;
pub mod chisq;
pub mod exp;
pub mod gamma;
pub mod lnorm;
pub mod nchisq;
pub mod normal;
pub mod t;
pub mod unif;

pub use beta::{dbeta, pbeta, pbeta_raw, qbeta, qbeta_pair};
pub use cauchy::{dcauchy, pcauchy, qcauchy};
pub use chisq::{dchisq, pchisq, qchisq};
pub use exp::{dexp, pexp, qexp};
pub use gamma::{dgamma, pgamma, pgamma_raw, qgamma};
pub use lnorm::{dlnorm, plnorm, qlnorm};
pub use nchisq::{dnchisq, pnchisq, pnchisq_raw, qnchisq};
pub use normal::{dnorm, pnorm, pnorm_both, qnorm, NormalTail};
pub use t::{dt, pt, qt};
pub use unif::{dunif, punif, qunif};
