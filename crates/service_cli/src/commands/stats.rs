//! Interpolation, distance and correlation commands.

use std::path::Path;

use clap::ValueEnum;
use nmath_stats::{
    cor, cov, dist, Approx, ApproxMethod, ApproxOptions, CubicSpline, DistanceMethod,
    Extrapolation, Matrix, MissingPolicy, SplineMethod, Ties,
};
use tracing::{debug, info};

use super::Context;
use crate::output::{Cell, Report};
use crate::{CliError, Result};

/// Spline end conditions accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SplineKind {
    /// Forsythe, Malcolm and Moler
    Fmm,
    /// Zero second derivative at the ends
    Natural,
    /// Periodic over the knot range
    Periodic,
}

impl From<SplineKind> for SplineMethod {
    fn from(kind: SplineKind) -> Self {
        match kind {
            SplineKind::Fmm => SplineMethod::Fmm,
            SplineKind::Natural => SplineMethod::Natural,
            SplineKind::Periodic => SplineMethod::Periodic,
        }
    }
}

/// Tie rules accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TieRule {
    /// Average the ordinates
    Mean,
    /// Keep the first ordinate
    First,
    /// Keep the last ordinate
    Last,
    /// Keep the smallest ordinate
    Min,
    /// Keep the largest ordinate
    Max,
}

impl From<TieRule> for Ties {
    fn from(rule: TieRule) -> Self {
        match rule {
            TieRule::Mean => Ties::Mean,
            TieRule::First => Ties::First,
            TieRule::Last => Ties::Last,
            TieRule::Min => Ties::Min,
            TieRule::Max => Ties::Max,
        }
    }
}

/// Options of the `approx` command.
#[derive(Debug, Clone, Copy)]
pub struct ApproxRequest {
    /// Step function instead of straight lines.
    pub constant: bool,
    /// Right-knot weight of the step function.
    pub f: f64,
    /// Use the end ordinates outside the knot range instead of `NaN`.
    pub nearest: bool,
    /// Tie rule.
    pub ties: TieRule,
}

/// Evaluates the spline through `(x, y)`, or its `deriv`-th derivative, at `at`.
pub fn spline_report(
    kind: SplineKind,
    x: &[f64],
    y: &[f64],
    at: &[f64],
    deriv: u32,
) -> Result<Report> {
    let spline = CubicSpline::new(kind.into(), x, y)?;
    debug!(knots = spline.x().len(), ?kind, "spline fitted");
    let column = if deriv == 0 {
        "value".to_string()
    } else {
        format!("derivative {deriv}")
    };
    let mut report = Report::new(format!("{kind:?} spline"), ["x".to_string(), column]);
    for &u in at {
        report.push(vec![Cell::from(u), Cell::from(spline.derivative(u, deriv))]);
    }
    Ok(report)
}

/// Interpolates `(x, y)` at `at`.
pub fn approx_report(x: &[f64], y: &[f64], at: &[f64], request: &ApproxRequest) -> Result<Report> {
    let method = if request.constant {
        ApproxMethod::Constant { f: request.f }
    } else {
        ApproxMethod::Linear
    };
    let rule = if request.nearest {
        Extrapolation::Nearest
    } else {
        Extrapolation::Missing
    };
    let options = ApproxOptions {
        method,
        ties: request.ties.into(),
        ..ApproxOptions::default()
    }
    .with_rule(rule);
    let interpolant = Approx::new(x, y, &options)?;

    let mut report = Report::new(
        if request.constant { "constant interpolation" } else { "linear interpolation" },
        ["x", "y"],
    );
    for (u, v) in at.iter().zip(interpolant.eval_many(at)) {
        report.push(vec![Cell::from(*u), Cell::from(v)]);
    }
    Ok(report)
}

/// Parses a numeric table, one observation per line.
///
/// Fields are separated by commas or whitespace. `NA` and `NaN` are missing
/// values. Blank lines and lines starting with `#` are skipped.
pub fn parse_matrix(text: &str) -> Result<Matrix> {
    let mut rows = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|field| !field.is_empty())
            .map(|field| parse_field(field, line_no + 1))
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }
    Ok(Matrix::from_rows(&rows)?)
}

fn parse_field(field: &str, line: usize) -> Result<f64> {
    if field.eq_ignore_ascii_case("na") {
        return Ok(f64::NAN);
    }
    field
        .parse::<f64>()
        .map_err(|_| CliError::InvalidArgument(format!("line {line}: '{field}' is not a number")))
}

/// Reads a table with [`parse_matrix`].
pub fn read_matrix(path: &Path) -> Result<Matrix> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let matrix = parse_matrix(&std::fs::read_to_string(path)?)?;
    info!(path = %path.display(), rows = matrix.nrow(), cols = matrix.ncol(), "matrix loaded");
    Ok(matrix)
}

/// Pairwise row distances, one line per pair.
pub fn dist_report(x: &Matrix, method_name: &str, p: f64) -> Result<Report> {
    let method = DistanceMethod::from_name(method_name, p)
        .ok_or_else(|| CliError::InvalidArgument(format!("unknown distance method '{method_name}'")))?;
    let d = dist(x, method)?;
    let mut report = Report::new(format!("{method} distance"), ["i", "j", "distance"]);
    for j in 0..d.size() {
        for i in j + 1..d.size() {
            report.push(vec![Cell::from(i + 1), Cell::from(j + 1), Cell::from(d.get(i, j))]);
        }
    }
    Ok(report)
}

/// Covariance or correlation matrix of the columns of `x`.
pub fn covcor_report(x: &Matrix, policy_name: &str, correlation: bool) -> Result<Report> {
    let policy = MissingPolicy::from_name(policy_name)
        .ok_or_else(|| CliError::InvalidArgument(format!("unknown missing-value policy '{policy_name}'")))?;
    let (title, m) = if correlation {
        ("correlation", cor(x, None, policy)?)
    } else {
        ("covariance", cov(x, None, policy)?)
    };
    let columns = std::iter::once(String::new()).chain((1..=m.ncol()).map(|j| format!("V{j}")));
    let mut report = Report::new(format!("{title} ({policy_name})"), columns);
    for i in 0..m.nrow() {
        let mut row = vec![Cell::from(format!("V{}", i + 1))];
        row.extend((0..m.ncol()).map(|j| Cell::from(m.get(i, j))));
        report.push(row);
    }
    Ok(report)
}

/// Run the `spline` command
pub fn run_spline(
    ctx: &Context,
    kind: SplineKind,
    x: &[f64],
    y: &[f64],
    at: &[f64],
    deriv: u32,
) -> Result<()> {
    ctx.emit(&spline_report(kind, x, y, at, deriv)?)
}

/// Run the `approx` command
pub fn run_approx(
    ctx: &Context,
    x: &[f64],
    y: &[f64],
    at: &[f64],
    request: &ApproxRequest,
) -> Result<()> {
    ctx.emit(&approx_report(x, y, at, request)?)
}

/// Run the `dist` command
pub fn run_dist(ctx: &Context, path: &Path, method: &str, p: f64) -> Result<()> {
    let x = read_matrix(path)?;
    ctx.emit(&dist_report(&x, method, p)?)
}

/// Run the `cor` and `cov` commands
pub fn run_covcor(ctx: &Context, path: &Path, policy: &str, correlation: bool) -> Result<()> {
    let x = read_matrix(path)?;
    ctx.emit(&covcor_report(&x, policy, correlation)?)
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
    fn test_parse_matrix() {
        let m = parse_matrix("# header\n1, 2 ,3\n\n4 NA 6\n7\t8\t9\n").unwrap();
        assert_eq!((m.nrow(), m.ncol()), (3, 3));
        assert_eq!(m.get(0, 2), 3.0);
        assert!(m.get(1, 1).is_nan());
        assert_eq!(m.column(0), &[1.0, 4.0, 7.0]);
    }

    #[test]
    fn test_parse_matrix_errors() {
        assert!(matches!(
            parse_matrix("1,2\n3,x\n"),
            Err(CliError::InvalidArgument(msg)) if msg.starts_with("line 2")
        ));
        assert!(matches!(parse_matrix("1,2\n3\n"), Err(CliError::Stats(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = read_matrix(Path::new("/nonexistent/data.csv")).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_spline_derivative_column() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 8.0, 27.0];
        let report = spline_report(SplineKind::Fmm, &x, &y, &[1.5], 1).unwrap();
        assert_eq!(report.columns[1], "derivative 1");
        // fmm reproduces cubics, so the slope of x^3 at 1.5 is exact
        assert_relative_eq!(number(&report.rows[0][1]), 6.75, max_relative = 1e-12);
    }

    #[test]
    fn test_approx_rules() {
        let x = [1.0, 2.0, 3.0];
        let y = [10.0, 20.0, 40.0];
        let linear = ApproxRequest {
            constant: false,
            f: 0.0,
            nearest: false,
            ties: TieRule::Mean,
        };
        let report = approx_report(&x, &y, &[2.5, 5.0], &linear).unwrap();
        assert_relative_eq!(number(&report.rows[0][1]), 30.0);
        assert!(number(&report.rows[1][1]).is_nan());

        let step = ApproxRequest {
            constant: true,
            nearest: true,
            ..linear
        };
        let report = approx_report(&x, &y, &[2.5, 5.0], &step).unwrap();
        assert_eq!(number(&report.rows[0][1]), 20.0);
        assert_eq!(number(&report.rows[1][1]), 40.0);
    }

    #[test]
    fn test_dist_and_cor_reports() {
        let x = parse_matrix("0 0\n3 4\n6 8\n").unwrap();
        let d = dist_report(&x, "euclidean", 2.0).unwrap();
        assert_eq!(d.rows.len(), 3);
        assert_relative_eq!(number(&d.rows[0][2]), 5.0);
        assert_relative_eq!(number(&d.rows[1][2]), 10.0);
        assert!(dist_report(&x, "cosine", 2.0).is_err());

        let r = covcor_report(&x, "everything", true).unwrap();
        assert_eq!(r.columns, ["", "V1", "V2"]);
        assert_relative_eq!(number(&r.rows[0][2]), 1.0, max_relative = 1e-12);
        assert!(covcor_report(&x, "kendall", true).is_err());
    }
}
