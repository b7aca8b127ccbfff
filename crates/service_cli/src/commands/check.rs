//! Self-check against published reference values.

use nmath_core::math::solvers::BrentSolver;
use nmath_distributions::distribution::Distribution;
use nmath_stats::{spline, SplineMethod};
use tracing::{info, warn};

use super::Context;
use crate::output::{Cell, Report};
use crate::{CliError, Result};

struct Case {
    label: &'static str,
    expected: f64,
    tolerance: f64,
    compute: fn() -> Result<f64>,
}

fn cases() -> Vec<Case> {
    vec![
        Case {
            label: "pnorm(1.96)",
            expected: 0.9750021048517795,
            tolerance: 1e-14,
            compute: || Ok(Distribution::normal(0.0, 1.0)?.cdf(1.96, true, false)),
        },
        Case {
            label: "qnorm(0.975)",
            expected: 1.959963984540054,
            tolerance: 1e-14,
            compute: || Ok(Distribution::normal(0.0, 1.0)?.quantile(0.975, true, false)),
        },
        Case {
            label: "pt(2, 5)",
            expected: 0.9490302605850709,
            tolerance: 1e-13,
            compute: || Ok(Distribution::student_t(5.0)?.cdf(2.0, true, false)),
        },
        Case {
            label: "qt(0.975, 10)",
            expected: 2.2281388519862747,
            tolerance: 1e-10,
            compute: || Ok(Distribution::student_t(10.0)?.quantile(0.975, true, false)),
        },
        Case {
            label: "pchisq(3, 2, ncp = 1)",
            expected: 0.6206436532195436,
            tolerance: 1e-9,
            compute: || Ok(Distribution::noncentral_chi_squared(2.0, 1.0)?.cdf(3.0, true, false)),
        },
        Case {
            label: "dbinom(3, 10, 0.3)",
            expected: 0.266827932,
            tolerance: 1e-13,
            compute: || Ok(Distribution::binomial(10.0, 0.3)?.density(3.0, false)),
        },
        Case {
            label: "qgamma(0.5, 2)",
            expected: 1.6783469900166607,
            tolerance: 1e-10,
            compute: || Ok(Distribution::gamma(2.0, 1.0)?.quantile(0.5, true, false)),
        },
        Case {
            label: "pbeta(0.3, 2, 3)",
            expected: 0.3483,
            tolerance: 1e-13,
            compute: || Ok(Distribution::beta(2.0, 3.0)?.cdf(0.3, true, false)),
        },
        Case {
            label: "zeroin(cos(x) - x)",
            expected: 0.7390851332151607,
            tolerance: 1e-9,
            compute: || Ok(BrentSolver::with_defaults().find_root(|x: f64| x.cos() - x, 0.0, 1.0)?),
        },
        Case {
            label: "spline fmm x^3 at 1.5",
            expected: 3.375,
            tolerance: 1e-13,
            compute: || {
                let x = [0.0, 1.0, 2.0, 3.0];
                let y = [0.0, 1.0, 8.0, 27.0];
                Ok(spline(SplineMethod::Fmm, &x, &y, &[1.5])?[0])
            },
        },
    ]
}

/// Evaluates every reference case; the second value counts the failures.
pub fn self_check() -> Result<(Report, usize)> {
    let mut report = Report::new("reference values", ["case", "computed", "expected", "ok"]);
    let mut failures = 0;
    for case in cases() {
        let computed = (case.compute)()?;
        let ok = (computed - case.expected).abs() <= case.tolerance * case.expected.abs().max(1.0);
        if !ok {
            warn!(case = case.label, computed, expected = case.expected, "reference check failed");
            failures += 1;
        }
        report.push(vec![
            Cell::from(case.label),
            Cell::from(computed),
            Cell::from(case.expected),
            Cell::from(ok),
        ]);
    }
    Ok((report, failures))
}

/// Run the `check` command
pub fn run(ctx: &Context) -> Result<()> {
    info!("Running self-check");
    let (report, failures) = self_check()?;
    ctx.emit(&report)?;
    if failures > 0 {
        return Err(CliError::CheckFailed(failures));
    }
    info!("All reference values reproduced");
    Ok(())
}
