//! Dense column-major matrix of observations.
//!
//! Rows are observations and columns are variables. Storage is column-major,
//! so a column is a contiguous slice.

use nmath_core::types::StatsError;

/// Column-major `nrow x ncol` matrix of `f64`.
///
/// # Example
///
/// ```
/// use nmath_stats::Matrix;
///
/// let m = Matrix::from_columns(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
/// assert_eq!(m.nrow(), 3);
/// assert_eq!(m.ncol(), 2);
/// assert_eq!(m.get(2, 1), 6.0);
/// assert_eq!(m.column(0), &[1.0, 2.0, 3.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix {
    data: Vec<f64>,
    nrow: usize,
    ncol: usize,
}

impl Matrix {
    /// Wraps column-major `data` as an `nrow x ncol` matrix.
    ///
    /// # Errors
    ///
    /// [`StatsError::DimensionMismatch`] if `data.len() != nrow * ncol`.
    pub fn new(data: Vec<f64>, nrow: usize, ncol: usize) -> Result<Self, StatsError> {
        if nrow.checked_mul(ncol) != Some(data.len()) {
            return Err(StatsError::DimensionMismatch(format!(
                "{} values do not fill a {}x{} matrix",
                data.len(),
                nrow,
                ncol
            )));
        }
        Ok(Self { data, nrow, ncol })
    }

    /// Builds a matrix from equally long columns.
    pub fn from_columns(columns: &[Vec<f64>]) -> Result<Self, StatsError> {
        let nrow = columns.first().map_or(0, Vec::len);
        if let Some(bad) = columns.iter().position(|c| c.len() != nrow) {
            return Err(StatsError::DimensionMismatch(format!(
                "column {} has {} rows, expected {}",
                bad,
                columns[bad].len(),
                nrow
            )));
        }
        let data = columns.iter().flatten().copied().collect();
        Ok(Self {
            data,
            nrow,
            ncol: columns.len(),
        })
    }

    /// Builds a matrix from equally long rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, StatsError> {
        let ncol = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|r| r.len() != ncol) {
            return Err(StatsError::DimensionMismatch(format!(
                "row {} has {} columns, expected {}",
                bad,
                rows[bad].len(),
                ncol
            )));
        }
        let nrow = rows.len();
        let mut data = Vec::with_capacity(nrow * ncol);
        for j in 0..ncol {
            data.extend(rows.iter().map(|r| r[j]));
        }
        Ok(Self { data, nrow, ncol })
    }

    /// Single-column matrix holding `values`.
    pub fn column_vector(values: &[f64]) -> Self {
        Self {
            data: values.to_vec(),
            nrow: values.len(),
            ncol: 1,
        }
    }

    /// `nrow x ncol` matrix filled with `value`.
    pub fn filled(nrow: usize, ncol: usize, value: f64) -> Self {
        Self {
            data: vec![value; nrow * ncol],
            nrow,
            ncol,
        }
    }

    /// Number of rows (observations).
    #[inline]
    pub fn nrow(&self) -> usize {
        self.nrow
    }

    /// Number of columns (variables).
    #[inline]
    pub fn ncol(&self) -> usize {
        self.ncol
    }

    /// Element at row `i`, column `j`.
    ///
    /// # Panics
    ///
    /// If `i` or `j` is out of range.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.nrow && j < self.ncol, "index ({i}, {j}) out of range");
        self.data[i + j * self.nrow]
    }

    #[inline]
    pub(crate) fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i + j * self.nrow] = value;
    }

    /// Column `j` as a contiguous slice.
    #[inline]
    pub fn column(&self, j: usize) -> &[f64] {
        &self.data[j * self.nrow..(j + 1) * self.nrow]
    }

    /// Column-major backing storage.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consumes the matrix, returning its column-major storage.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Whether the matrix holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_shape() {
        assert!(Matrix::new(vec![1.0; 6], 2, 3).is_ok());
        assert!(matches!(
            Matrix::new(vec![1.0; 5], 2, 3),
            Err(StatsError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_rows_and_columns_agree() {
        let by_rows = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        let by_cols = Matrix::from_columns(&[vec![1.0, 3.0, 5.0], vec![2.0, 4.0, 6.0]]).unwrap();
        assert_eq!(by_rows, by_cols);
        assert_eq!(by_rows.as_slice(), &[1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
        assert_eq!(by_rows.get(1, 1), 4.0);
    }

    #[test]
    fn test_ragged_input_rejected() {
        assert!(Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
        assert!(Matrix::from_columns(&[vec![1.0], vec![3.0, 4.0]]).is_err());
    }

    #[test]
    fn test_empty() {
        let m = Matrix::from_columns(&[]).unwrap();
        assert!(m.is_empty());
        assert_eq!((m.nrow(), m.ncol()), (0, 0));
    }
}
