//! Knot preparation shared by `approx` and the cubic splines.
//!
//! Pairs with a missing coordinate are dropped (or rejected), the remainder
//! is sorted by abscissa, and runs of equal abscissae are collapsed to one
//! knot whose ordinate is chosen by a [`Ties`] rule.

use nmath_core::types::InterpolationError;

/// How the ordinates of knots sharing an abscissa are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ties {
    /// Arithmetic mean of the tied ordinates.
    #[default]
    Mean,
    /// Ordinate of the first tied pair in input order.
    First,
    /// Ordinate of the last tied pair in input order.
    Last,
    /// Smallest tied ordinate.
    Min,
    /// Largest tied ordinate.
    Max,
}

impl Ties {
    fn collapse(self, ys: &[f64]) -> f64 {
        match self {
            Ties::Mean => ys.iter().sum::<f64>() / ys.len() as f64,
            Ties::First => ys[0],
            Ties::Last => ys[ys.len() - 1],
            Ties::Min => ys.iter().copied().fold(f64::INFINITY, f64::min),
            Ties::Max => ys.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Sorted knots with distinct abscissae.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Knots {
    pub(crate) x: Vec<f64>,
    pub(crate) y: Vec<f64>,
}

/// Cleans `(x, y)` into strictly increasing knots.
///
/// With `na_rm`, pairs where either coordinate is `NaN` are dropped.
/// Otherwise a `NaN` abscissa is an error and `NaN` ordinates are kept.
pub(crate) fn regularize(
    x: &[f64],
    y: &[f64],
    ties: Ties,
    na_rm: bool,
) -> Result<Knots, InterpolationError> {
    if x.len() != y.len() {
        return Err(InterpolationError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }

    let mut pairs = Vec::with_capacity(x.len());
    for (index, (&xi, &yi)) in x.iter().zip(y).enumerate() {
        if xi.is_nan() {
            if na_rm {
                continue;
            }
            return Err(InterpolationError::MissingValue { index });
        }
        if na_rm && yi.is_nan() {
            continue;
        }
        pairs.push((xi, yi));
    }
    // Stable, so First/Last refer to input order within a tie.
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut knots = Knots {
        x: Vec::with_capacity(pairs.len()),
        y: Vec::with_capacity(pairs.len()),
    };
    let mut start = 0;
    while start < pairs.len() {
        let xi = pairs[start].0;
        let end = start + pairs[start..].iter().take_while(|p| p.0 == xi).count();
        if end - start == 1 {
            knots.y.push(pairs[start].1);
        } else {
            let tied: Vec<f64> = pairs[start..end].iter().map(|p| p.1).collect();
            knots.y.push(ties.collapse(&tied));
        }
        knots.x.push(xi);
        start = end;
    }
    Ok(knots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorts_and_collapses_ties() {
        let k = regularize(&[3.0, 1.0, 2.0, 1.0], &[30.0, 10.0, 20.0, 14.0], Ties::Mean, true)
            .unwrap();
        assert_eq!(k.x, vec![1.0, 2.0, 3.0]);
        assert_eq!(k.y, vec![12.0, 20.0, 30.0]);
    }

    #[test]
    fn test_tie_rules() {
        let x = [1.0, 1.0, 1.0];
        let y = [5.0, 2.0, 8.0];
        let pick = |t| regularize(&x, &y, t, true).unwrap().y[0];
        assert_eq!(pick(Ties::First), 5.0);
        assert_eq!(pick(Ties::Last), 8.0);
        assert_eq!(pick(Ties::Min), 2.0);
        assert_eq!(pick(Ties::Max), 8.0);
        assert_eq!(pick(Ties::Mean), 5.0);
    }

    #[test]
    fn test_missing_values() {
        let k = regularize(&[1.0, f64::NAN, 3.0], &[1.0, 2.0, f64::NAN], Ties::Mean, true).unwrap();
        assert_eq!(k.x, vec![1.0]);

        assert_eq!(
            regularize(&[1.0, f64::NAN], &[1.0, 2.0], Ties::Mean, false),
            Err(InterpolationError::MissingValue { index: 1 })
        );
        let k = regularize(&[1.0, 2.0], &[f64::NAN, 2.0], Ties::Mean, false).unwrap();
        assert!(k.y[0].is_nan());
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(
            regularize(&[1.0, 2.0], &[1.0], Ties::Mean, true),
            Err(InterpolationError::LengthMismatch { x_len: 2, y_len: 1 })
        );
    }
}
