//! Pearson covariance and correlation matrices.
//!
//! Columns are variables, rows are observations. For a single matrix the
//! result is the symmetric `ncol x ncol` matrix; for `x` and `y` it is the
//! `ncol(x) x ncol(y)` cross matrix. Means use a second correction pass and
//! every estimate divides by `n - 1`.
//!
//! # Example
//!
//! ```
//! use nmath_stats::covcor::{cor, cov, MissingPolicy};
//! use nmath_stats::Matrix;
//!
//! let x = Matrix::from_columns(&[vec![1.0, 2.0, 3.0, 4.0], vec![2.0, 4.0, 6.0, 8.5]]).unwrap();
//! let v = cov(&x, None, MissingPolicy::Everything).unwrap();
//! assert!((v.get(0, 0) - 5.0 / 3.0).abs() < 1e-15);
//!
//! let r = cor(&x, None, MissingPolicy::Everything).unwrap();
//! assert_eq!(r.get(1, 1), 1.0);
//! assert!(r.get(0, 1) > 0.99);
//! ```

use crate::matrix::Matrix;
use nmath_core::types::warning::warn_detail;
use nmath_core::types::StatsError;

/// Treatment of missing (`NaN`) observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MissingPolicy {
    /// Missing values propagate: any entry involving such a column is `NaN`.
    #[default]
    Everything,
    /// A missing value is an error.
    AllObs,
    /// Only rows complete across every column are used; an error if none is.
    CompleteObs,
    /// As [`MissingPolicy::CompleteObs`], but `NaN` entries when no row is complete.
    NaOrComplete,
    /// Each pair of columns uses the rows complete in both.
    PairwiseComplete,
}

impl MissingPolicy {
    /// Looks a policy up by its conventional name, such as "complete.obs".
    pub fn from_name(name: &str) -> Option<Self> {
        let policy = match name {
            "everything" => MissingPolicy::Everything,
            "all.obs" => MissingPolicy::AllObs,
            "complete.obs" => MissingPolicy::CompleteObs,
            "na.or.complete" => MissingPolicy::NaOrComplete,
            "pairwise.complete.obs" => MissingPolicy::PairwiseComplete,
            _ => return None,
        };
        Some(policy)
    }
}

/// Covariance matrix of the columns of `x`, or between `x` and `y`.
///
/// # Errors
///
/// - [`StatsError::DimensionMismatch`] if `x` and `y` have different row counts
/// - [`StatsError::InvalidInput`] for an empty `x` under a policy that forbids it
/// - [`StatsError::MissingObservations`] for a missing value under [`MissingPolicy::AllObs`]
/// - [`StatsError::NoCompleteCases`] when [`MissingPolicy::CompleteObs`] finds no complete row
pub fn cov(x: &Matrix, y: Option<&Matrix>, policy: MissingPolicy) -> Result<Matrix, StatsError> {
    covcor(x, y, policy, false)
}

/// Correlation matrix of the columns of `x`, or between `x` and `y`.
///
/// A column with zero standard deviation yields `NaN` correlations and a
/// logged warning. Results are capped at 1.
///
/// # Errors
///
/// As [`cov`].
pub fn cor(x: &Matrix, y: Option<&Matrix>, policy: MissingPolicy) -> Result<Matrix, StatsError> {
    covcor(x, y, policy, true)
}

fn covcor(
    x: &Matrix,
    y: Option<&Matrix>,
    policy: MissingPolicy,
    want_cor: bool,
) -> Result<Matrix, StatsError> {
    let n = x.nrow();
    if let Some(y) = y {
        if y.nrow() != n {
            return Err(StatsError::DimensionMismatch(format!(
                "x has {} rows, y has {}",
                n,
                y.nrow()
            )));
        }
    }
    let others = y.unwrap_or(x);

    let empty_err = matches!(
        policy,
        MissingPolicy::AllObs | MissingPolicy::CompleteObs | MissingPolicy::PairwiseComplete
    );
    if empty_err && x.is_empty() {
        return Err(StatsError::InvalidInput("'x' is empty".to_string()));
    }

    let (ans, sd_zero) = match policy {
        MissingPolicy::Everything => propagate_missing(x, others, want_cor),
        MissingPolicy::PairwiseComplete => pairwise(x, others, want_cor),
        MissingPolicy::AllObs | MissingPolicy::CompleteObs | MissingPolicy::NaOrComplete => {
            let mask = complete_rows(x, y, policy == MissingPolicy::AllObs)?;
            if policy == MissingPolicy::CompleteObs && !mask.iter().any(|&keep| keep) {
                return Err(StatsError::NoCompleteCases);
            }
            complete_cases(x, others, &mask, want_cor)
        }
    };
    if sd_zero {
        warn_detail("cor", format_args!("the standard deviation is zero"));
    }
    Ok(ans)
}

/// Row mask of observations without a missing value in any column.
fn complete_rows(x: &Matrix, y: Option<&Matrix>, fail: bool) -> Result<Vec<bool>, StatsError> {
    let mut mask = vec![true; x.nrow()];
    for m in std::iter::once(x).chain(y) {
        for j in 0..m.ncol() {
            for (keep, v) in mask.iter_mut().zip(m.column(j)) {
                if v.is_nan() {
                    if fail {
                        return Err(StatsError::MissingObservations);
                    }
                    *keep = false;
                }
            }
        }
    }
    Ok(mask)
}

/// Two-pass mean of the selected observations.
fn mean_of<'a>(values: impl Iterator<Item = &'a f64> + Clone, nobs: usize) -> f64 {
    let nobs = nobs as f64;
    let mut tmp = values.clone().sum::<f64>() / nobs;
    if tmp.is_finite() {
        let correction: f64 = values.map(|v| v - tmp).sum();
        tmp += correction / nobs;
    }
    tmp
}

/// Scales a covariance to a correlation, returning `None` for a zero sd.
fn scale(cov: f64, sx: f64, sy: f64) -> Option<f64> {
    if sx == 0.0 || sy == 0.0 {
        return None;
    }
    Some((cov / (sx * sy)).min(1.0))
}

/// Whether `others` is the same matrix as `x`, giving a symmetric result.
fn symmetric(x: &Matrix, others: &Matrix) -> bool {
    std::ptr::eq(x, others)
}

fn propagate_missing(x: &Matrix, y: &Matrix, want_cor: bool) -> (Matrix, bool) {
    let n = x.nrow();
    let (ncx, ncy) = (x.ncol(), y.ncol());
    let mut ans = Matrix::filled(ncx, ncy, f64::NAN);
    if n <= 1 {
        return (ans, false);
    }
    let n1 = (n - 1) as f64;

    let column_mean = |m: &Matrix, j: usize| {
        let col = m.column(j);
        if col.iter().any(|v| v.is_nan()) {
            f64::NAN
        } else {
            mean_of(col.iter(), n)
        }
    };
    let xm: Vec<f64> = (0..ncx).map(|j| column_mean(x, j)).collect();
    let ym: Vec<f64> = (0..ncy).map(|j| column_mean(y, j)).collect();
    let cross = |a: &[f64], am: f64, b: &[f64], bm: f64| {
        if am.is_nan() || bm.is_nan() {
            return f64::NAN;
        }
        a.iter().zip(b).map(|(u, v)| (u - am) * (v - bm)).sum::<f64>() / n1
    };

    let sym = symmetric(x, y);
    for i in 0..ncx {
        let upper = if sym { i + 1 } else { ncy };
        for j in 0..upper {
            let r = cross(x.column(i), xm[i], y.column(j), ym[j]);
            ans.set(i, j, r);
            if sym {
                ans.set(j, i, r);
            }
        }
    }
    if !want_cor {
        return (ans, false);
    }

    let sdev = |m: &Matrix, means: &[f64], j: usize| {
        cross(m.column(j), means[j], m.column(j), means[j]).sqrt()
    };
    let xs: Vec<f64> = (0..ncx).map(|j| sdev(x, &xm, j)).collect();
    let ys: Vec<f64> = if sym {
        xs.clone()
    } else {
        (0..ncy).map(|j| sdev(y, &ym, j)).collect()
    };
    let mut sd_zero = false;
    for i in 0..ncx {
        if xm[i].is_nan() {
            if sym {
                ans.set(i, i, 1.0);
            }
            continue;
        }
        for j in 0..ncy {
            if sym && j >= i {
                break;
            }
            if ym[j].is_nan() {
                continue;
            }
            let r = match scale(ans.get(i, j), xs[i], ys[j]) {
                Some(r) => r,
                None => {
                    sd_zero = true;
                    f64::NAN
                }
            };
            ans.set(i, j, r);
            if sym {
                ans.set(j, i, r);
            }
        }
        if sym {
            ans.set(i, i, 1.0);
        }
    }
    (ans, sd_zero)
}

fn complete_cases(x: &Matrix, y: &Matrix, mask: &[bool], want_cor: bool) -> (Matrix, bool) {
    let (ncx, ncy) = (x.ncol(), y.ncol());
    let mut ans = Matrix::filled(ncx, ncy, f64::NAN);
    let nobs = mask.iter().filter(|&&keep| keep).count();
    if nobs <= 1 {
        return (ans, false);
    }
    let n1 = (nobs - 1) as f64;

    let selected = |col: &[f64]| -> Vec<f64> {
        col.iter()
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|(v, _)| *v)
            .collect()
    };
    let xc: Vec<Vec<f64>> = (0..ncx).map(|j| selected(x.column(j))).collect();
    let yc: Vec<Vec<f64>> = (0..ncy).map(|j| selected(y.column(j))).collect();
    let xm: Vec<f64> = xc.iter().map(|c| mean_of(c.iter(), nobs)).collect();
    let ym: Vec<f64> = yc.iter().map(|c| mean_of(c.iter(), nobs)).collect();
    let cross = |a: &[f64], am: f64, b: &[f64], bm: f64| {
        a.iter().zip(b).map(|(u, v)| (u - am) * (v - bm)).sum::<f64>() / n1
    };

    let sym = symmetric(x, y);
    for i in 0..ncx {
        let upper = if sym { i + 1 } else { ncy };
        for j in 0..upper {
            let r = cross(&xc[i], xm[i], &yc[j], ym[j]);
            ans.set(i, j, r);
            if sym {
                ans.set(j, i, r);
            }
        }
    }
    if !want_cor {
        return (ans, false);
    }

    let xs: Vec<f64> = (0..ncx).map(|j| cross(&xc[j], xm[j], &xc[j], xm[j]).sqrt()).collect();
    let ys: Vec<f64> = (0..ncy).map(|j| cross(&yc[j], ym[j], &yc[j], ym[j]).sqrt()).collect();
    let mut sd_zero = false;
    for i in 0..ncx {
        let upper = if sym { i } else { ncy };
        for j in 0..upper {
            let r = match scale(ans.get(i, j), xs[i], ys[j]) {
                Some(r) => r,
                None => {
                    sd_zero = true;
                    f64::NAN
                }
            };
            ans.set(i, j, r);
            if sym {
                ans.set(j, i, r);
            }
        }
        if sym {
            ans.set(i, i, 1.0);
        }
    }
    (ans, sd_zero)
}

fn pairwise(x: &Matrix, y: &Matrix, want_cor: bool) -> (Matrix, bool) {
    let (ncx, ncy) = (x.ncol(), y.ncol());
    let mut ans = Matrix::filled(ncx, ncy, f64::NAN);
    let sym = symmetric(x, y);
    let mut sd_zero = false;

    for i in 0..ncx {
        let upper = if sym { i + 1 } else { ncy };
        for j in 0..upper {
            let (a, b): (Vec<f64>, Vec<f64>) = x
                .column(i)
                .iter()
                .zip(y.column(j))
                .filter(|(u, v)| !u.is_nan() && !v.is_nan())
                .map(|(u, v)| (*u, *v))
                .unzip();
            let nobs = a.len();
            let r = if nobs < 2 {
                f64::NAN
            } else {
                let n1 = (nobs - 1) as f64;
                let am = mean_of(a.iter(), nobs);
                let bm = mean_of(b.iter(), nobs);
                let c = a.iter().zip(&b).map(|(u, v)| (u - am) * (v - bm)).sum::<f64>() / n1;
                if want_cor {
                    let sa = (a.iter().map(|u| (u - am) * (u - am)).sum::<f64>() / n1).sqrt();
                    let sb = (b.iter().map(|v| (v - bm) * (v - bm)).sum::<f64>() / n1).sqrt();
                    match scale(c, sa, sb) {
                        Some(r) => r,
                        None => {
                            sd_zero = true;
                            f64::NAN
                        }
                    }
                } else {
                    c
                }
            };
            ans.set(i, j, r);
            if sym {
                ans.set(j, i, r);
            }
        }
    }
    (ans, sd_zero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cols(data: &[&[f64]]) -> Matrix {
        Matrix::from_columns(&data.iter().map(|c| c.to_vec()).collect::<Vec<_>>()).unwrap()
    }

    const NA: f64 = f64::NAN;

    // ========================================
    // Complete data
    // ========================================

    #[test]
    fn test_covariance_of_complete_data() {
        let x = cols(&[&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 1.0, 4.0, 3.0, 6.0]]);
        let v = cov(&x, None, MissingPolicy::Everything).unwrap();
        assert_relative_eq!(v.get(0, 0), 2.5);
        assert_relative_eq!(v.get(1, 1), 3.7);
        assert_relative_eq!(v.get(0, 1), 2.5);
        assert_eq!(v.get(0, 1), v.get(1, 0));

        let r = cor(&x, None, MissingPolicy::Everything).unwrap();
        assert_relative_eq!(r.get(0, 1), 2.5 / (2.5_f64 * 3.7).sqrt(), max_relative = 1e-14);
        assert_eq!(r.get(0, 0), 1.0);
    }

    #[test]
    fn test_policies_agree_without_missing_values() {
        let x = cols(&[&[0.5, 1.5, -2.0, 4.0], &[3.0, 1.0, 0.0, 2.0], &[1.0, 1.0, 2.0, 5.0]]);
        let base = cor(&x, None, MissingPolicy::Everything).unwrap();
        for policy in [
            MissingPolicy::AllObs,
            MissingPolicy::CompleteObs,
            MissingPolicy::NaOrComplete,
            MissingPolicy::PairwiseComplete,
        ] {
            let r = cor(&x, None, policy).unwrap();
            for (a, b) in r.as_slice().iter().zip(base.as_slice()) {
                assert_relative_eq!(a, b, max_relative = 1e-14);
            }
        }
    }

    #[test]
    fn test_cross_matrix() {
        let x = cols(&[&[1.0, 2.0, 3.0]]);
        let y = cols(&[&[3.0, 2.0, 1.0], &[1.0, 2.0, 4.0]]);
        let r = cor(&x, Some(&y), MissingPolicy::Everything).unwrap();
        assert_eq!((r.nrow(), r.ncol()), (1, 2));
        assert_relative_eq!(r.get(0, 0), -1.0, max_relative = 1e-14);
        let v = cov(&x, Some(&y), MissingPolicy::Everything).unwrap();
        assert_relative_eq!(v.get(0, 1), 1.5);
    }

    #[test]
    fn test_correlation_capped_at_one() {
        let x = cols(&[&[0.1, 0.2, 0.3], &[0.1, 0.2, 0.3]]);
        let r = cor(&x, None, MissingPolicy::Everything).unwrap();
        assert!(r.get(0, 1) <= 1.0);
        assert_relative_eq!(r.get(0, 1), 1.0);
    }

    #[test]
    fn test_zero_sd_gives_nan() {
        let x = cols(&[&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]]);
        let r = cor(&x, None, MissingPolicy::Everything).unwrap();
        assert!(r.get(0, 1).is_nan());
        assert_eq!(r.get(1, 1), 1.0);
        let r = cor(&x, None, MissingPolicy::PairwiseComplete).unwrap();
        assert!(r.get(1, 0).is_nan());
    }

    // ========================================
    // Missing values
    // ========================================

    #[test]
    fn test_everything_propagates() {
        let x = cols(&[&[1.0, 2.0, 3.0], &[1.0, NA, 2.0], &[2.0, 0.0, 1.0]]);
        let v = cov(&x, None, MissingPolicy::Everything).unwrap();
        assert!(v.get(0, 1).is_nan());
        assert!(v.get(1, 1).is_nan());
        assert_relative_eq!(v.get(0, 2), -0.5);
        let r = cor(&x, None, MissingPolicy::Everything).unwrap();
        assert_eq!(r.get(1, 1), 1.0);
        assert!(r.get(2, 1).is_nan());
    }

    #[test]
    fn test_complete_and_pairwise() {
        let x = cols(&[&[1.0, 2.0, 3.0, 4.0], &[2.0, NA, 3.0, 7.0], &[NA, 1.0, 1.0, 3.0]]);

        // only rows 2 and 3 are complete
        let v = cov(&x, None, MissingPolicy::CompleteObs).unwrap();
        assert_relative_eq!(v.get(0, 0), 0.5);
        assert_relative_eq!(v.get(0, 1), 2.0);

        // columns 0 and 1 share rows 0, 2, 3
        let p = cov(&x, None, MissingPolicy::PairwiseComplete).unwrap();
        let a = [1.0, 3.0, 4.0];
        let b = [2.0, 3.0, 7.0];
        let (am, bm) = (8.0 / 3.0, 4.0);
        let expected = a.iter().zip(&b).map(|(u, v)| (u - am) * (v - bm)).sum::<f64>() / 2.0;
        assert_relative_eq!(p.get(0, 1), expected, max_relative = 1e-14);
        assert_relative_eq!(p.get(0, 0), 5.0 / 3.0, max_relative = 1e-14);
    }

    #[test]
    fn test_policy_errors() {
        let x = cols(&[&[1.0, NA], &[NA, 2.0]]);
        assert_eq!(
            cov(&x, None, MissingPolicy::AllObs),
            Err(StatsError::MissingObservations)
        );
        assert_eq!(
            cov(&x, None, MissingPolicy::CompleteObs),
            Err(StatsError::NoCompleteCases)
        );
        let v = cov(&x, None, MissingPolicy::NaOrComplete).unwrap();
        assert!(v.as_slice().iter().all(|r| r.is_nan()));

        let y = cols(&[&[1.0, 2.0, 3.0]]);
        assert!(matches!(
            cov(&x, Some(&y), MissingPolicy::Everything),
            Err(StatsError::DimensionMismatch(_))
        ));
        let empty = Matrix::from_columns(&[]).unwrap();
        assert!(matches!(
            cov(&empty, None, MissingPolicy::AllObs),
            Err(StatsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_single_observation_is_nan() {
        let x = cols(&[&[1.0], &[2.0]]);
        let v = cov(&x, None, MissingPolicy::Everything).unwrap();
        assert!(v.as_slice().iter().all(|r| r.is_nan()));
    }

    #[test]
    fn test_policy_names() {
        assert_eq!(
            MissingPolicy::from_name("pairwise.complete.obs"),
            Some(MissingPolicy::PairwiseComplete)
        );
        assert_eq!(MissingPolicy::from_name("sometimes"), None);
    }
}
