//! Distribution of the Wilcoxon rank sum statistic.
//!
//! The counts `c(k; m, n)` of rank configurations with statistic `k` obey
//! `c(k; m, n) = c(k - n; m - 1, n) + c(k; m, n - 1)`. They are memoised in a
//! [`WilcoxCounts`] table owned by the caller, so repeated evaluation for the
//! same sample sizes reuses earlier work and no state is shared between
//! independent tables.

use std::collections::HashMap;

use nmath_core::math::constants::DBL_EPSILON;
use nmath_core::math::dpq::{d_0, dt_0, dt_1, dt_qiv, dt_val, force_int, q_p01_check, Boundary};
use nmath_core::special::lbeta;
use nmath_core::types::warning::{domain_nan, warn_detail};

/// Largest sample size for which a table is built.
pub const WILCOX_MAX_SIZE: f64 = 10000.0;

fn lchoose(n: f64, k: f64) -> f64 {
    -(n + 1.0).ln() - lbeta(n - k + 1.0, k + 1.0)
}

fn choose(n: f64, k: f64) -> f64 {
    lchoose(n, k).exp().round()
}

/// Memo table of rank sum counts, keyed by the ordered sample sizes.
#[derive(Debug, Default, Clone)]
pub struct WilcoxCounts {
    counts: HashMap<(usize, usize), Vec<f64>>,
}

impl WilcoxCounts {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all memoised counts.
    pub fn clear(&mut self) {
        self.counts.clear();
    }

    /// Number of `(m, n)` pairs currently memoised.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// `true` when nothing has been memoised yet.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    fn count(&mut self, k: i64, m: usize, n: usize) -> f64 {
        let u = (m * n) as i64;
        if k < 0 || k > u {
            return 0.0;
        }
        let c = u / 2;
        let k = if k > c { u - k } else { k };
        let (i, j) = if m < n { (m, n) } else { (n, m) };

        if j == 0 {
            return if k == 0 { 1.0 } else { 0.0 };
        }
        // with statistic k only the first k of the larger sample matter
        if (k as usize) < j {
            return self.count(k, i, k as usize);
        }

        let slot = k as usize;
        if let Some(row) = self.counts.get(&(i, j)) {
            if row[slot] >= 0.0 {
                return row[slot];
            }
        }
        let value = self.count(k - j as i64, i - 1, j) + self.count(k, i, j - 1);
        let row = self
            .counts
            .entry((i, j))
            .or_insert_with(|| vec![-1.0; c as usize + 1]);
        row[slot] = value;
        value
    }

    /// Density of the rank sum statistic.
    pub fn dwilcox(&mut self, x: f64, m: f64, n: f64, log_p: bool) -> f64 {
        if x.is_nan() || m.is_nan() || n.is_nan() {
            return x + m + n;
        }
        if !m.is_finite() || !n.is_finite() {
            return domain_nan("dwilcox");
        }
        let m = force_int(m);
        let n = force_int(n);
        if m <= 0.0 || n <= 0.0 {
            return domain_nan("dwilcox");
        }
        if (x - force_int(x)).abs() > 1e-7 {
            return d_0(log_p);
        }
        let x = force_int(x);
        if x < 0.0 || x > m * n {
            return d_0(log_p);
        }
        if !size_ok("dwilcox", m, n) {
            return f64::NAN;
        }

        let c = self.count(x as i64, m as usize, n as usize);
        if log_p {
            c.ln() - lchoose(m + n, n)
        } else {
            c / choose(m + n, n)
        }
    }

    /// Distribution function, summing over the shorter tail.
    pub fn pwilcox(&mut self, q: f64, m: f64, n: f64, lower_tail: bool, log_p: bool) -> f64 {
        if q.is_nan() || m.is_nan() || n.is_nan() {
            return q + m + n;
        }
        if !m.is_finite() || !n.is_finite() {
            return domain_nan("pwilcox");
        }
        let m = force_int(m);
        let n = force_int(n);
        if m <= 0.0 || n <= 0.0 {
            return domain_nan("pwilcox");
        }

        let q = (q + 1e-7).floor();
        if q < 0.0 {
            return dt_0(lower_tail, log_p);
        }
        if q >= m * n {
            return dt_1(lower_tail, log_p);
        }
        if !size_ok("pwilcox", m, n) {
            return f64::NAN;
        }

        let (mm, nn) = (m as usize, n as usize);
        let c = choose(m + n, n);
        let mut p = 0.0;
        if q <= m * n / 2.0 {
            for i in 0..=(q as i64) {
                p += self.count(i, mm, nn) / c;
            }
            dt_val(p, lower_tail, log_p)
        } else {
            let q = m * n - q;
            for i in 0..(q as i64) {
                p += self.count(i, mm, nn) / c;
            }
            dt_val(p, !lower_tail, log_p)
        }
    }

    /// Quantile function.
    pub fn qwilcox(&mut self, x: f64, m: f64, n: f64, lower_tail: bool, log_p: bool) -> f64 {
        if x.is_nan() || m.is_nan() || n.is_nan() {
            return x + m + n;
        }
        if !x.is_finite() || !m.is_finite() || !n.is_finite() {
            return domain_nan("qwilcox");
        }
        if let Boundary::Value(v) = q_p01_check(x, log_p, "qwilcox") {
            return v;
        }
        if !size_ok("qwilcox", m, n) {
            return f64::NAN;
        }
        let m = force_int(m);
        let n = force_int(n);
        if m <= 0.0 || n <= 0.0 {
            return domain_nan("qwilcox");
        }

        if x == dt_0(lower_tail, log_p) {
            return 0.0;
        }
        if x == dt_1(lower_tail, log_p) {
            return m * n;
        }

        let x = if !log_p && lower_tail {
            x
        } else {
            dt_qiv(x, lower_tail, log_p)
        };
        let (mm, nn) = (m as usize, n as usize);
        let c = choose(m + n, n);
        let mut p = 0.0;
        let mut q: i64 = 0;
        if x <= 0.5 {
            let x = x - 10.0 * DBL_EPSILON;
            loop {
                p += self.count(q, mm, nn) / c;
                if p >= x {
                    return q as f64;
                }
                q += 1;
            }
        }
        let x = 1.0 - x + 10.0 * DBL_EPSILON;
        loop {
            p += self.count(q, mm, nn) / c;
            if p > x {
                return m * n - q as f64;
            }
            q += 1;
        }
    }
}

fn size_ok(routine: &'static str, m: f64, n: f64) -> bool {
    if m > WILCOX_MAX_SIZE || n > WILCOX_MAX_SIZE {
        warn_detail(
            routine,
            format_args!("arguments m = {m} and n = {n} need too much memory"),
        );
        return false;
    }
    true
}
