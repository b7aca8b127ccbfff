//! Density, distribution and quantile evaluation.

use nmath_distributions::distribution::Distribution;
use tracing::info;

use super::{Context, DistArgs};
use crate::output::{Cell, Report};
use crate::Result;

/// Which of the three functions to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// Density or probability mass.
    Density,
    /// Cumulative probability.
    Cdf,
    /// Inverse of the cumulative probability.
    Quantile,
}

impl Function {
    fn prefix(self) -> char {
        match self {
            Function::Density => 'd',
            Function::Cdf => 'p',
            Function::Quantile => 'q',
        }
    }

    fn columns(self) -> [&'static str; 2] {
        match self {
            Function::Density => ["x", "density"],
            Function::Cdf => ["q", "p"],
            Function::Quantile => ["p", "q"],
        }
    }
}

/// Evaluates `function` of `dist` at each of `values`.
///
/// `upper` selects the upper tail for [`Function::Cdf`] and
/// [`Function::Quantile`]; `log` reads or writes probabilities on the log scale.
pub fn evaluate(
    dist: &Distribution,
    function: Function,
    values: &[f64],
    upper: bool,
    log: bool,
) -> Report {
    let lower_tail = !upper;
    let mut report = Report::new(
        format!("{}{}", function.prefix(), dist),
        function.columns(),
    );
    for &v in values {
        let out = match function {
            Function::Density => dist.density(v, log),
            Function::Cdf => dist.cdf(v, lower_tail, log),
            Function::Quantile => dist.quantile(v, lower_tail, log),
        };
        report.push(vec![Cell::from(v), Cell::from(out)]);
    }
    report
}

/// Mean, variance and support of `dist`.
pub fn describe(dist: &Distribution) -> Report {
    let mut report = Report::new(dist.to_string(), ["property", "value"]);
    report.push(vec![Cell::from("name"), Cell::from(dist.name())]);
    report.push(vec![Cell::from("discrete"), Cell::from(dist.is_discrete())]);
    report.push(vec![Cell::from("mean"), Cell::from(dist.mean())]);
    report.push(vec![Cell::from("variance"), Cell::from(dist.variance())]);
    report
}

/// Run a `density`, `cdf` or `quantile` command
pub fn run(
    ctx: &Context,
    function: Function,
    args: &DistArgs,
    values: &[f64],
    upper: bool,
    log: bool,
) -> Result<()> {
    let dist = args.distribution()?;
    info!(%dist, count = values.len(), ?function, "evaluating");
    ctx.emit(&evaluate(&dist, function, values, upper, log))
}

/// Run the `describe` command
pub fn run_describe(ctx: &Context, args: &DistArgs) -> Result<()> {
    let dist = args.distribution()?;
    ctx.emit(&describe(&dist))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn number(cell: &Cell) -> f64 {
        match cell {
            Cell::Number(v) => *v,
            other => panic!("expected a number, got {other:?}"),
        }
    }

    #[test]
    fn test_cdf_and_quantile_are_inverse() {
        let dist = Distribution::normal(0.0, 1.0).unwrap();
        let p = evaluate(&dist, Function::Cdf, &[1.96], false, false);
        assert_eq!(p.title, "pnorm(mean = 0, sd = 1)");
        assert_eq!(p.columns, ["q", "p"]);
        assert_relative_eq!(number(&p.rows[0][1]), 0.9750021048517795, max_relative = 1e-14);

        let q = evaluate(&dist, Function::Quantile, &[0.025], true, false);
        assert_relative_eq!(number(&q.rows[0][1]), 1.959963984540054, max_relative = 1e-14);
    }

    #[test]
    fn test_log_density() {
        let dist = Distribution::exponential(2.0).unwrap();
        let d = evaluate(&dist, Function::Density, &[0.5, -1.0], false, true);
        assert_relative_eq!(number(&d.rows[0][1]), 2.0_f64.ln() - 1.0, max_relative = 1e-14);
        assert_eq!(number(&d.rows[1][1]), f64::NEG_INFINITY);
    }

    #[test]
    fn test_describe() {
        let dist = Distribution::binomial(10.0, 0.3).unwrap();
        let report = describe(&dist);
        assert_eq!(report.rows[1][1], Cell::Flag(true));
        assert_relative_eq!(number(&report.rows[2][1]), 3.0, max_relative = 1e-14);
        assert_relative_eq!(number(&report.rows[3][1]), 2.1, max_relative = 1e-14);
    }
}
