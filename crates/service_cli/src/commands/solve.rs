//! Numerical inversion and mode finding with the Brent solvers.

use nmath_core::math::solvers::{BrentMinimizer, BrentSolver, SolverConfig};
use nmath_distributions::distribution::Distribution;
use tracing::{info, warn};

use super::{Context, DistArgs};
use crate::config::SolverSettings;
use crate::output::{Cell, Report};
use crate::Result;

fn solver_config(settings: &SolverSettings) -> SolverConfig<f64> {
    SolverConfig::new(settings.tolerance, settings.max_iterations)
}

/// Solves `cdf(x) = p` on `[lower, upper]` and compares with the closed-form quantile.
pub fn invert_cdf(
    dist: &Distribution,
    p: f64,
    lower: f64,
    upper: f64,
    upper_tail: bool,
    settings: &SolverSettings,
) -> Result<Report> {
    if dist.is_discrete() {
        warn!(%dist, "the distribution function is a step function; the root is any point of the step");
    }
    let lower_tail = !upper_tail;
    let solver = BrentSolver::new(solver_config(settings));
    let result = solver.find_root_detailed(|x| dist.cdf(x, lower_tail, false) - p, lower, upper)?;
    let quantile = dist.quantile(p, lower_tail, false);

    let mut report = Report::new(format!("root of p{dist} = {p}"), ["quantity", "value"]);
    report.push(vec![Cell::from("root"), Cell::from(result.root)]);
    report.push(vec![Cell::from("residual"), Cell::from(result.f_root)]);
    report.push(vec![Cell::from("precision"), Cell::from(result.estim_prec)]);
    report.push(vec![Cell::from("iterations"), Cell::from(result.iterations)]);
    report.push(vec![Cell::from("converged"), Cell::from(result.converged)]);
    report.push(vec![Cell::from("quantile"), Cell::from(quantile)]);
    report.push(vec![Cell::from("difference"), Cell::from(result.root - quantile)]);
    Ok(report)
}

/// Maximises the density of `dist` on `[lower, upper]`.
pub fn mode(dist: &Distribution, lower: f64, upper: f64, settings: &SolverSettings) -> Result<Report> {
    let minimizer = BrentMinimizer::new(solver_config(settings));
    let min = minimizer.minimize_detailed(|x| -dist.density(x, true), lower, upper)?;

    let mut report = Report::new(format!("mode of d{dist}"), ["quantity", "value"]);
    report.push(vec![Cell::from("mode"), Cell::from(min.x)]);
    report.push(vec![Cell::from("density"), Cell::from((-min.fx).exp())]);
    report.push(vec![Cell::from("evaluations"), Cell::from(min.evaluations)]);
    report.push(vec![Cell::from("converged"), Cell::from(min.converged)]);
    Ok(report)
}

/// Run the `solve` command
pub fn run(
    ctx: &Context,
    args: &DistArgs,
    p: f64,
    lower: f64,
    upper: f64,
    upper_tail: bool,
) -> Result<()> {
    let dist = args.distribution()?;
    info!(%dist, p, lower, upper, "inverting distribution function");
    ctx.emit(&invert_cdf(&dist, p, lower, upper, upper_tail, &ctx.config.solver)?)
}

/// Run the `mode` command
pub fn run_mode(ctx: &Context, args: &DistArgs, lower: f64, upper: f64) -> Result<()> {
    let dist = args.distribution()?;
    info!(%dist, lower, upper, "searching for the mode");
    ctx.emit(&mode(&dist, lower, upper, &ctx.config.solver)?)
}
