//! Multinomial variates by conditional binomials.
//!
//! Category `k` receives `Binomial(n_left, prob[k] / sum(prob[k..]))`. The
//! remaining probability mass is carried as an exact sum of the inputs, so
//! the last non-empty category always sees a conditional probability of
//! exactly one and absorbs the remainder.

use crate::binomial::BinomialSampler;
use crate::source::RandomSource;
use nmath_core::types::SamplingError;

/// Exact running sum of `f64` values as non-overlapping partials.
///
/// Addition is error-free (Shewchuk, 1997); [`ExactSum::value`] rounds the
/// exact total once.
#[derive(Debug, Clone, Default)]
pub(crate) struct ExactSum {
    partials: Vec<f64>,
}

impl ExactSum {
    pub(crate) fn add(&mut self, value: f64) {
        let mut x = value;
        let mut i = 0;
        for j in 0..self.partials.len() {
            let mut y = self.partials[j];
            if x.abs() < y.abs() {
                std::mem::swap(&mut x, &mut y);
            }
            let hi = x + y;
            let lo = y - (hi - x);
            if lo != 0.0 {
                self.partials[i] = lo;
                i += 1;
            }
            x = hi;
        }
        self.partials.truncate(i);
        self.partials.push(x);
    }

    /// Correctly rounded total.
    pub(crate) fn value(&self) -> f64 {
        let Some((&last, rest)) = self.partials.split_last() else {
            return 0.0;
        };
        let mut hi = last;
        let mut lo = 0.0;
        let mut n = rest.len();
        while n > 0 {
            let x = hi;
            n -= 1;
            let y = rest[n];
            hi = x + y;
            lo = y - (hi - x);
            if lo != 0.0 {
                break;
            }
        }
        // Round half-way cases by the sign of the next partial.
        if n > 0 && ((lo < 0.0 && rest[n - 1] < 0.0) || (lo > 0.0 && rest[n - 1] > 0.0)) {
            let y = lo * 2.0;
            let x = hi + y;
            if y == x - hi {
                hi = x;
            }
        }
        hi
    }
}

/// Checks a probability vector and returns its exact total.
fn validate(prob: &[f64]) -> Result<ExactSum, SamplingError> {
    if prob.is_empty() {
        return Err(SamplingError::EmptyProbabilities);
    }
    let mut total = ExactSum::default();
    for (index, &value) in prob.iter().enumerate() {
        if !value.is_finite() || value < 0.0 {
            return Err(SamplingError::InvalidProbability { index, value });
        }
        total.add(value);
    }
    let sum = total.value();
    if sum <= 0.0 {
        return Err(SamplingError::NonPositiveTotal(sum));
    }
    Ok(total)
}

/// Draws counts for `size` trials over categories weighted by `prob`.
///
/// The weights need not sum to one. The returned counts sum to `size`.
pub(crate) fn rmultinom<S: RandomSource + ?Sized>(
    binomial: &mut BinomialSampler,
    rng: &mut S,
    size: u64,
    prob: &[f64],
) -> Result<Vec<u64>, SamplingError> {
    let mut tail = validate(prob)?;
    let mut counts = vec![0_u64; prob.len()];
    let mut left = size;
    let Some((last, head)) = counts.split_last_mut() else {
        return Err(SamplingError::EmptyProbabilities);
    };

    for (count, &p) in head.iter_mut().zip(prob) {
        if left == 0 {
            break;
        }
        if p > 0.0 {
            let pp = p / tail.value();
            let drawn = if pp < 1.0 {
                binomial.sample(rng, left as f64, pp) as u64
            } else {
                left
            };
            *count = drawn.min(left);
            left -= *count;
        }
        tail.add(-p);
    }
    *last = left;
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::NmathRng;

    #[test]
    fn test_exact_sum_cancellation() {
        let mut s = ExactSum::default();
        for v in [1e16, 1.0, -1e16] {
            s.add(v);
        }
        assert_eq!(s.value(), 1.0);

        let mut s = ExactSum::default();
        for _ in 0..10 {
            s.add(0.1);
        }
        assert_eq!(s.value(), 1.0);
        for _ in 0..10 {
            s.add(-0.1);
        }
        assert_eq!(s.value(), 0.0);
    }

    #[test]
    fn test_counts_sum_to_size() {
        let mut rng = NmathRng::from_seed(1);
        let mut b = BinomialSampler::new();
        let prob = [0.1, 0.2, 0.3, 0.4];
        for _ in 0..200 {
            let counts = rmultinom(&mut b, &mut rng, 57, &prob).unwrap();
            assert_eq!(counts.iter().sum::<u64>(), 57);
        }
    }

    #[test]
    fn test_unnormalised_weights_and_means() {
        let mut rng = NmathRng::from_seed(2);
        let mut b = BinomialSampler::new();
        let weights = [1.0, 0.0, 3.0];
        let reps = 5_000;
        let size = 40;
        let mut totals = [0_u64; 3];
        for _ in 0..reps {
            let counts = rmultinom(&mut b, &mut rng, size, &weights).unwrap();
            assert_eq!(counts[1], 0);
            for (t, c) in totals.iter_mut().zip(&counts) {
                *t += c;
            }
        }
        let mean0 = totals[0] as f64 / reps as f64;
        // Binomial(40, 0.25): sd 2.7386
        assert!((mean0 - 10.0).abs() < 5.0 * 2.7386 / (reps as f64).sqrt());
    }

    #[test]
    fn test_trailing_zero_category() {
        let mut rng = NmathRng::from_seed(3);
        let mut b = BinomialSampler::new();
        let counts = rmultinom(&mut b, &mut rng, 25, &[0.3, 0.7, 0.0]).unwrap();
        assert_eq!(counts[2], 0);
        assert_eq!(counts[0] + counts[1], 25);
    }

    #[test]
    fn test_invalid_inputs() {
        let mut rng = NmathRng::from_seed(4);
        let mut b = BinomialSampler::new();
        assert_eq!(
            rmultinom(&mut b, &mut rng, 5, &[]),
            Err(SamplingError::EmptyProbabilities)
        );
        assert_eq!(
            rmultinom(&mut b, &mut rng, 5, &[0.5, -0.1]),
            Err(SamplingError::InvalidProbability {
                index: 1,
                value: -0.1
            })
        );
        assert_eq!(
            rmultinom(&mut b, &mut rng, 5, &[0.0, 0.0]),
            Err(SamplingError::NonPositiveTotal(0.0))
        );
        assert!(matches!(
            rmultinom(&mut b, &mut rng, 5, &[f64::NAN]),
            Err(SamplingError::InvalidProbability { index: 0, .. })
        ));
    }

    #[test]
    fn test_zero_trials() {
        let mut rng = NmathRng::from_seed(5);
        let mut b = BinomialSampler::new();
        assert_eq!(rmultinom(&mut b, &mut rng, 0, &[0.5, 0.5]).unwrap(), vec![0, 0]);
    }
}
