//! Pairwise distances between the rows of a matrix.
//!
//! Coordinates that are `NaN` in either row are skipped. For the summing
//! metrics the partial sum is scaled up by `ncol / used` so that rows with
//! missing coordinates stay comparable; a pair with no usable coordinate
//! has a `NaN` distance.
//!
//! # Example
//!
//! ```
//! use nmath_stats::distance::{dist, DistanceMethod};
//! use nmath_stats::Matrix;
//!
//! let x = Matrix::from_rows(&[vec![0.0, 0.0], vec![3.0, 4.0], vec![6.0, 8.0]]).unwrap();
//! let d = dist(&x, DistanceMethod::Euclidean).unwrap();
//! assert_eq!(d.get(0, 1), 5.0);
//! assert_eq!(d.get(2, 0), 10.0);
//! assert_eq!(d.as_slice(), &[5.0, 10.0, 5.0]);
//! ```

use crate::matrix::Matrix;
use nmath_core::math::constants::DBL_MIN;
use nmath_core::types::warning::warn_detail;
use nmath_core::types::StatsError;
use rayon::prelude::*;
use std::fmt;

/// Distance metric between two rows.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistanceMethod {
    /// `sqrt(sum (x_k - y_k)^2)`.
    Euclidean,
    /// `max |x_k - y_k|`.
    Maximum,
    /// `sum |x_k - y_k|`.
    Manhattan,
    /// `sum |x_k - y_k| / |x_k + y_k|`, skipping terms where both vanish.
    Canberra,
    /// Share of the coordinates non-zero in at least one row that are
    /// non-zero in exactly one.
    Binary,
    /// `(sum |x_k - y_k|^p)^(1/p)`.
    Minkowski(f64),
}

impl DistanceMethod {
    /// Looks a metric up by name, "minkowski" taking the exponent `p`.
    pub fn from_name(name: &str, p: f64) -> Option<Self> {
        let method = match name.to_ascii_lowercase().as_str() {
            "euclidean" => DistanceMethod::Euclidean,
            "maximum" => DistanceMethod::Maximum,
            "manhattan" => DistanceMethod::Manhattan,
            "canberra" => DistanceMethod::Canberra,
            "binary" => DistanceMethod::Binary,
            "minkowski" => DistanceMethod::Minkowski(p),
            _ => return None,
        };
        Some(method)
    }
}

impl fmt::Display for DistanceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMethod::Euclidean => f.write_str("euclidean"),
            DistanceMethod::Maximum => f.write_str("maximum"),
            DistanceMethod::Manhattan => f.write_str("manhattan"),
            DistanceMethod::Canberra => f.write_str("canberra"),
            DistanceMethod::Binary => f.write_str("binary"),
            DistanceMethod::Minkowski(p) => write!(f, "minkowski(p = {p})"),
        }
    }
}

/// Lower triangle of a symmetric distance matrix, stored by columns.
///
/// For `n` rows the entries are `d(1,0), d(2,0), ..., d(n-1,0), d(2,1), ...`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Number of observations.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Packed lower triangle.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Distance between observations `i` and `j`; zero on the diagonal.
    ///
    /// # Panics
    ///
    /// If either index is out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.size && j < self.size, "index ({i}, {j}) out of range");
        if i == j {
            return 0.0;
        }
        let (i, j) = if i > j { (i, j) } else { (j, i) };
        // entries before column j, then the offset inside it
        let start = j * (2 * self.size - j - 1) / 2;
        self.values[start + i - j - 1]
    }

    /// Full symmetric `size x size` matrix with a zero diagonal.
    pub fn to_matrix(&self) -> Matrix {
        let mut full = Matrix::filled(self.size, self.size, 0.0);
        let mut k = 0;
        for j in 0..self.size {
            for i in j + 1..self.size {
                full.set(i, j, self.values[k]);
                full.set(j, i, self.values[k]);
                k += 1;
            }
        }
        full
    }
}

/// Distance between rows `i1` and `i2` of `x`.
///
/// The flag reports whether a binary comparison met a non-finite value.
fn row_distance(x: &Matrix, i1: usize, i2: usize, method: DistanceMethod) -> (f64, bool) {
    let nc = x.ncol();
    let pairs = (0..nc)
        .map(|j| (x.get(i1, j), x.get(i2, j)))
        .filter(|(a, b)| !a.is_nan() && !b.is_nan());

    // Averaging metrics rescale partial sums to the full column count.
    let scaled = |dist: f64, count: usize| {
        if count == 0 {
            f64::NAN
        } else if count != nc {
            dist / (count as f64 / nc as f64)
        } else {
            dist
        }
    };

    match method {
        DistanceMethod::Euclidean => {
            let (dist, count) = pairs
                .map(|(a, b)| a - b)
                .filter(|dev| !dev.is_nan())
                .fold((0.0, 0), |(s, n), dev| (s + dev * dev, n + 1));
            (scaled(dist, count).sqrt(), false)
        }
        DistanceMethod::Maximum => {
            let (dist, count) = pairs
                .map(|(a, b)| (a - b).abs())
                .filter(|dev| !dev.is_nan())
                .fold((-f64::MAX, 0), |(m, n), dev| (if dev > m { dev } else { m }, n + 1));
            (if count == 0 { f64::NAN } else { dist }, false)
        }
        DistanceMethod::Manhattan => {
            let (dist, count) = pairs
                .map(|(a, b)| (a - b).abs())
                .filter(|dev| !dev.is_nan())
                .fold((0.0, 0), |(s, n), dev| (s + dev, n + 1));
            (scaled(dist, count), false)
        }
        DistanceMethod::Canberra => {
            let (dist, count) = pairs
                .filter_map(|(a, b)| {
                    let sum = (a + b).abs();
                    let diff = (a - b).abs();
                    if !(sum > DBL_MIN || diff > DBL_MIN) {
                        return None;
                    }
                    let dev = diff / sum;
                    if !dev.is_nan() {
                        Some(dev)
                    } else if diff.is_infinite() && diff == sum {
                        // inf / inf taken as its limit
                        Some(1.0)
                    } else {
                        None
                    }
                })
                .fold((0.0, 0), |(s, n), dev| (s + dev, n + 1));
            (scaled(dist, count), false)
        }
        DistanceMethod::Binary => {
            let mut total = 0_usize;
            let mut count = 0_usize;
            let mut dist = 0_usize;
            let mut non_finite = false;
            for (a, b) in pairs {
                if !a.is_finite() || !b.is_finite() {
                    non_finite = true;
                    continue;
                }
                if a != 0.0 || b != 0.0 {
                    count += 1;
                    if !(a != 0.0 && b != 0.0) {
                        dist += 1;
                    }
                }
                total += 1;
            }
            let d = if total == 0 {
                f64::NAN
            } else if count == 0 {
                0.0
            } else {
                dist as f64 / count as f64
            };
            (d, non_finite)
        }
        DistanceMethod::Minkowski(p) => {
            let (dist, count) = pairs
                .map(|(a, b)| a - b)
                .filter(|dev| !dev.is_nan())
                .fold((0.0, 0), |(s, n), dev| (s + dev.abs().powf(p), n + 1));
            (scaled(dist, count).powf(1.0 / p), false)
        }
    }
}

/// Distances between every pair of rows of `x`.
///
/// Columns of the packed triangle are computed in parallel.
///
/// # Errors
///
/// [`StatsError::InvalidInput`] for a Minkowski exponent that is not a
/// positive finite number.
pub fn dist(x: &Matrix, method: DistanceMethod) -> Result<DistanceMatrix, StatsError> {
    if let DistanceMethod::Minkowski(p) = method {
        if !p.is_finite() || p <= 0.0 {
            return Err(StatsError::InvalidInput(format!(
                "distance(): invalid p = {p}"
            )));
        }
    }

    let nr = x.nrow();
    let column_results: Vec<Vec<(f64, bool)>> = (0..nr)
        .into_par_iter()
        .map(|j| {
            (j + 1..nr)
                .map(|i| row_distance(x, i, j, method))
                .collect()
        })
        .collect();

    let mut non_finite = false;
    let values = column_results
        .into_iter()
        .flatten()
        .map(|(d, flag)| {
            non_finite |= flag;
            d
        })
        .collect();
    if non_finite {
        warn_detail("dist", format_args!("treating non-finite values as NA"));
    }
    tracing::debug!(target: "nmath", rows = nr, method = %method, "computed distance matrix");

    Ok(DistanceMatrix { size: nr, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rows(data: &[&[f64]]) -> Matrix {
        Matrix::from_rows(&data.iter().map(|r| r.to_vec()).collect::<Vec<_>>()).unwrap()
    }

    // ========================================
    // Metrics
    // ========================================

    #[test]
    fn test_metrics_on_two_rows() {
        let x = rows(&[&[1.0, 2.0, 3.0], &[4.0, 0.0, 3.5]]);
        let d = |m| dist(&x, m).unwrap().get(0, 1);
        assert_relative_eq!(d(DistanceMethod::Euclidean), (9.0_f64 + 4.0 + 0.25).sqrt());
        assert_eq!(d(DistanceMethod::Maximum), 3.0);
        assert_eq!(d(DistanceMethod::Manhattan), 5.5);
        assert_relative_eq!(
            d(DistanceMethod::Canberra),
            3.0 / 5.0 + 2.0 / 2.0 + 0.5 / 6.5,
            max_relative = 1e-15
        );
        assert_relative_eq!(
            d(DistanceMethod::Minkowski(3.0)),
            (27.0_f64 + 8.0 + 0.125).powf(1.0 / 3.0),
            max_relative = 1e-15
        );
        // Minkowski with p = 2 is Euclidean
        assert_relative_eq!(
            d(DistanceMethod::Minkowski(2.0)),
            d(DistanceMethod::Euclidean),
            max_relative = 1e-15
        );
    }

    #[test]
    fn test_binary() {
        let x = rows(&[&[1.0, 0.0, 2.0, 0.0], &[1.0, 3.0, 0.0, 0.0], &[0.0, 0.0, 0.0, 0.0]]);
        let d = dist(&x, DistanceMethod::Binary).unwrap();
        // three coordinates are "on" somewhere, two are on in one row only
        assert_relative_eq!(d.get(0, 1), 2.0 / 3.0);
        assert_eq!(d.get(0, 2), 1.0);
        let zeros = rows(&[&[0.0, 0.0], &[0.0, 0.0]]);
        assert_eq!(dist(&zeros, DistanceMethod::Binary).unwrap().get(0, 1), 0.0);
    }

    #[test]
    fn test_binary_non_finite_treated_as_missing() {
        let x = rows(&[&[f64::INFINITY, 1.0], &[1.0, 0.0]]);
        assert_eq!(dist(&x, DistanceMethod::Binary).unwrap().get(0, 1), 1.0);
        let x = rows(&[&[f64::INFINITY], &[1.0]]);
        assert!(dist(&x, DistanceMethod::Binary).unwrap().get(0, 1).is_nan());
    }

    #[test]
    fn test_canberra_edge_terms() {
        // both zero: term skipped and the sum rescaled
        let x = rows(&[&[0.0, 1.0], &[0.0, 3.0]]);
        assert_relative_eq!(dist(&x, DistanceMethod::Canberra).unwrap().get(0, 1), 2.0 * 0.5);
        // infinite with finite: inf / inf counts as 1
        let x = rows(&[&[f64::INFINITY, 1.0], &[2.0, 1.0]]);
        assert_eq!(dist(&x, DistanceMethod::Canberra).unwrap().get(0, 1), 1.0);
    }

    // ========================================
    // Missing values and layout
    // ========================================

    #[test]
    fn test_missing_coordinates_rescale() {
        let x = rows(&[&[1.0, f64::NAN, 5.0], &[2.0, 7.0, 3.0]]);
        let d = dist(&x, DistanceMethod::Manhattan).unwrap();
        assert_relative_eq!(d.get(0, 1), 3.0 * 3.0 / 2.0);
        let d = dist(&x, DistanceMethod::Maximum).unwrap();
        assert_eq!(d.get(0, 1), 2.0);

        let x = rows(&[&[f64::NAN, 1.0], &[2.0, f64::NAN]]);
        assert!(dist(&x, DistanceMethod::Euclidean).unwrap().get(0, 1).is_nan());
    }

    #[test]
    fn test_packed_order_and_full_matrix() {
        let x = rows(&[&[0.0], &[1.0], &[3.0], &[6.0]]);
        let d = dist(&x, DistanceMethod::Manhattan).unwrap();
        assert_eq!(d.size(), 4);
        assert_eq!(d.as_slice(), &[1.0, 3.0, 6.0, 2.0, 5.0, 3.0]);
        assert_eq!(d.get(3, 1), 5.0);
        assert_eq!(d.get(1, 3), 5.0);
        assert_eq!(d.get(2, 2), 0.0);

        let full = d.to_matrix();
        assert_eq!(full.get(3, 2), 3.0);
        assert_eq!(full.get(2, 3), 3.0);
        assert_eq!(full.get(0, 0), 0.0);
    }

    #[test]
    fn test_degenerate_sizes() {
        let one = rows(&[&[1.0, 2.0]]);
        assert!(dist(&one, DistanceMethod::Euclidean).unwrap().as_slice().is_empty());
    }

    #[test]
    fn test_invalid_minkowski_exponent() {
        let x = rows(&[&[1.0], &[2.0]]);
        for p in [0.0, -1.0, f64::INFINITY, f64::NAN] {
            assert!(matches!(
                dist(&x, DistanceMethod::Minkowski(p)),
                Err(StatsError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_method_names() {
        assert_eq!(
            DistanceMethod::from_name("Manhattan", 2.0),
            Some(DistanceMethod::Manhattan)
        );
        assert_eq!(
            DistanceMethod::from_name("minkowski", 1.5),
            Some(DistanceMethod::Minkowski(1.5))
        );
        assert_eq!(DistanceMethod::from_name("cosine", 2.0), None);
        assert_eq!(DistanceMethod::Minkowski(3.0).to_string(), "minkowski(p = 3)");
    }
}
