//! CLI command implementations
//!
//! Each command builds a [`Report`] from pure library calls and hands it to
//! [`Context::emit`] for printing in the configured format.

pub mod check;
pub mod evaluate;
pub mod sample;
pub mod solve;
pub mod stats;

use clap::Args;
use nmath_distributions::distribution::Distribution;
use tracing::debug;

use crate::config::CliConfig;
use crate::output::Report;
use crate::Result;

/// Distribution selection shared by several commands.
#[derive(Args, Debug, Clone)]
pub struct DistArgs {
    /// Distribution name: norm, lnorm, gamma, beta, chisq, nchisq, t, cauchy,
    /// exp, unif, bernoulli, binom, pois, geom, nbinom or hyper
    pub dist: String,

    /// Comma-separated parameters in conventional order, e.g. `0,1` for norm
    #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
    pub params: Vec<f64>,
}

impl DistArgs {
    /// Validates the name and parameters.
    pub fn distribution(&self) -> Result<Distribution> {
        let dist = Distribution::from_name(&self.dist, &self.params)?;
        debug!(%dist, "parsed distribution");
        Ok(dist)
    }
}

/// Effective configuration handed to every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Merged settings.
    pub config: CliConfig,
}

impl Context {
    /// Prints `report` to standard output.
    pub fn emit(&self, report: &Report) -> Result<()> {
        let text = report.render(self.config.format, self.config.precision)?;
        println!("{}", text.trim_end());
        Ok(())
    }
}
