//! Incomplete beta ratio `I_x(a, b)`.
//!
//! Didonato & Morris, "Significant Digit Computation of the Incomplete Beta
//! Function Ratios", ACM TOMS 18 (1992), algorithm 708, with the log-scale
//! extensions needed for `pbeta(..., log_p = true)`.
//!
//! [`bratio`] dispatches between power series, continued fraction and
//! asymptotic expansions. The dispatch is an explicit state machine; the
//! order of the regime tests matches the published algorithm.

#![allow(clippy::excessive_precision)]

use crate::math::constants::{DBL_EPSILON, DBL_MIN, M_LN_SQRT_2PI, M_SQRT_PI};
use crate::math::dpq::{d_0, d_1, d_exp, log1_exp};
use crate::math::functions::logspace_add;
use crate::types::warning::warn_detail;

const INV_SQRT_2_PI: f64 = 0.398942280401433;

/// Result of [`bratio`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncompleteBeta {
    /// `I_x(a, b)`, or its log.
    pub w: f64,
    /// `1 - I_x(a, b)`, or its log.
    pub w1: f64,
    /// Status code.
    ///
    /// - `0`: success
    /// - `1`: `a` or `b` negative
    /// - `2`: `a = b = 0`
    /// - `3`: `x` outside `[0, 1]`
    /// - `4`: `y` outside `[0, 1]`
    /// - `5`: `x + y != 1`
    /// - `6`: `x = a = 0`
    /// - `7`: `y = b = 0`
    /// - `9`: `NaN` argument
    /// - `11..=14`: the large-`a` asymptotic expansion failed with code `1..=4`
    pub ierr: i32,
}

impl IncompleteBeta {
    fn new(w: f64, w1: f64, ierr: i32) -> Self {
        Self { w, w1, ierr }
    }

    /// `true` if the result is usable (no input error).
    pub fn is_ok(&self) -> bool {
        self.ierr == 0 || self.ierr > 10
    }
}

/// Dispatch states of [`bratio`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    /// Shift `b0` up by `BUP_TERMS` with `bup`, then run `bgrat`.
    ShiftThenGrat,
    /// Large-`b0` asymptotic expansion for `w1`; `shifted` tells whether
    /// `b0` was raised by `bup` first.
    Grat { shifted: bool },
    /// Reduce `b0` to its fractional part and sum the `bup` terms.
    ReduceB,
    WBpser,
    W1Bpser,
    Bfrac,
    Basym,
    FromW,
    FromW1,
    FromW1Log,
    Done,
}

const BUP_TERMS: i32 = 20;

/// Incomplete beta ratio `I_x(a, b)` and its complement.
///
/// `y` must equal `1 - x`; passing both keeps full precision when `x` is
/// close to 1. With `log_p`, both `w` and `w1` are returned as natural logs.
///
/// ```
/// use nmath_core::special::toms708::bratio;
///
/// let r = bratio(2.0, 3.0, 0.4, 0.6, false);
/// assert_eq!(r.ierr, 0);
/// assert!((r.w - 0.5248).abs() < 1e-14);
/// assert!((r.w + r.w1 - 1.0).abs() < 1e-15);
/// ```
pub fn bratio(a: f64, b: f64, x: f64, y: f64, log_p: bool) -> IncompleteBeta {
    if x.is_nan() || y.is_nan() || a.is_nan() || b.is_nan() {
        return IncompleteBeta::new(f64::NAN, f64::NAN, 9);
    }

    let zero = d_0(log_p);
    let one = d_1(log_p);

    if a < 0.0 || b < 0.0 {
        return IncompleteBeta::new(zero, zero, 1);
    }
    if a == 0.0 && b == 0.0 {
        return IncompleteBeta::new(zero, zero, 2);
    }
    if !(0.0..=1.0).contains(&x) {
        return IncompleteBeta::new(zero, zero, 3);
    }
    if !(0.0..=1.0).contains(&y) {
        return IncompleteBeta::new(zero, zero, 4);
    }

    let mut eps = DBL_EPSILON;
    if (x + y - 0.5 - 0.5).abs() > eps * 3.0 {
        return IncompleteBeta::new(zero, zero, 5);
    }

    if x == 0.0 {
        if a == 0.0 {
            return IncompleteBeta::new(zero, zero, 6);
        }
        return IncompleteBeta::new(zero, one, 0);
    }
    if y == 0.0 {
        if b == 0.0 {
            return IncompleteBeta::new(zero, zero, 7);
        }
        return IncompleteBeta::new(one, zero, 0);
    }
    if a == 0.0 {
        return IncompleteBeta::new(one, zero, 0);
    }
    if b == 0.0 {
        return IncompleteBeta::new(zero, one, 0);
    }

    eps = eps.max(1e-15);
    let a_lt_b = a < b;
    if (if a_lt_b { b } else { a }) < eps * 0.001 {
        // Both shape parameters negligible: the ratio no longer depends on x.
        let (w, w1) = if log_p {
            if a_lt_b {
                ((-a / (a + b)).ln_1p(), (a / (a + b)).ln())
            } else {
                ((b / (a + b)).ln(), (-b / (a + b)).ln_1p())
            }
        } else {
            (b / (a + b), a / (a + b))
        };
        return IncompleteBeta::new(w, w1, 0);
    }

    let mut w = zero;
    let mut w1 = zero;
    let mut ierr = 0;
    let mut do_swap = false;
    let (mut a0, mut b0, mut x0, mut y0) = (a, b, x, y);
    let mut lambda = 0.0;

    let mut state = State::Start;
    while state != State::Done {
        state = match state {
            State::Start => {
                if a.min(b) <= 1.0 {
                    do_swap = x > 0.5;
                    if do_swap {
                        (a0, b0, x0, y0) = (b, a, y, x);
                    }
                    // now x0 <= 1/2 <= y0

                    if b0 < eps.min(eps * a0) {
                        w = fpser(a0, b0, x0, eps, log_p);
                        w1 = if log_p { log1_exp(w) } else { 0.5 - w + 0.5 };
                        State::Done
                    } else if a0 < eps.min(eps * b0) && b0 * x0 <= 1.0 {
                        w1 = apser(a0, b0, x0, eps);
                        State::FromW1
                    } else if a0.max(b0) > 1.0 {
                        // min(a, b) <= 1 < max(a, b)
                        if b0 <= 1.0 {
                            State::WBpser
                        } else if x0 >= 0.29 {
                            State::W1Bpser
                        } else if x0 < 0.1 && (x0 * b0).powf(a0) <= 0.7 {
                            State::WBpser
                        } else if b0 > 15.0 {
                            w1 = 0.0;
                            State::Grat { shifted: false }
                        } else {
                            State::ShiftThenGrat
                        }
                    } else if a0 >= 0.2_f64.min(b0) || x0.powf(a0) <= 0.9 {
                        State::WBpser
                    } else if x0 >= 0.3 {
                        State::W1Bpser
                    } else {
                        State::ShiftThenGrat
                    }
                } else {
                    // a, b > 1
                    lambda = if a > b {
                        (a + b) * y - b
                    } else {
                        a - (a + b) * x
                    };
                    do_swap = lambda < 0.0;
                    if do_swap {
                        lambda = -lambda;
                        (a0, b0, x0, y0) = (b, a, y, x);
                    }

                    if b0 < 40.0 {
                        if b0 * x0 <= 0.7 || (log_p && lambda > 650.0) {
                            State::WBpser
                        } else {
                            State::ReduceB
                        }
                    } else if a0 > b0 {
                        if b0 <= 100.0 || lambda > b0 * 0.03 {
                            State::Bfrac
                        } else {
                            State::Basym
                        }
                    } else if a0 <= 100.0 || lambda > a0 * 0.03 {
                        State::Bfrac
                    } else {
                        State::Basym
                    }
                }
            }

            State::ShiftThenGrat => {
                w1 = bup(b0, a0, y0, x0, BUP_TERMS, eps, false);
                b0 += BUP_TERMS as f64;
                State::Grat { shifted: true }
            }

            State::Grat { shifted } => {
                let (grat, code) = bgrat(b0, a0, y0, x0, w1, 15.0 * eps, false);
                w1 = grat;
                if w1 == 0.0 || (0.0 < w1 && w1 < 1e-310) {
                    // Underflow: redo on the log scale.
                    w1 = if shifted {
                        let n = BUP_TERMS;
                        bup(b0 - n as f64, a0, y0, x0, n, eps, true)
                    } else {
                        f64::NEG_INFINITY
                    };
                    let (grat, code) = bgrat(b0, a0, y0, x0, w1, 15.0 * eps, true);
                    w1 = grat;
                    if code != 0 {
                        ierr = 10 + code;
                    }
                    State::FromW1Log
                } else {
                    if code != 0 {
                        ierr = 10 + code;
                    }
                    if w1 < 0.0 {
                        warn_detail(
                            "bratio",
                            format_args!("bratio(a={a}, b={b}, x={x}): bgrat() -> w1 = {w1}"),
                        );
                    }
                    State::FromW1
                }
            }

            State::ReduceB => {
                // b0 := fractional part of b0, in (0, 1]
                let mut n = b0 as i32;
                b0 -= n as f64;
                if b0 == 0.0 {
                    n -= 1;
                    b0 = 1.0;
                }

                w = bup(b0, a0, y0, x0, n, eps, false);

                if w < DBL_MIN && log_p {
                    // bup underflowed; bpser is valid since b0 * x0 <= 0.7 or b0 <= 1 held
                    b0 += n as f64;
                    State::WBpser
                } else if x0 <= 0.7 {
                    w += bpser(a0, b0, x0, eps, false);
                    State::FromW
                } else {
                    if a0 <= 15.0 {
                        w += bup(a0, b0, x0, y0, BUP_TERMS, eps, false);
                        a0 += BUP_TERMS as f64;
                    }
                    let (grat, code) = bgrat(a0, b0, x0, y0, w, 15.0 * eps, false);
                    w = grat;
                    if code != 0 {
                        ierr = 10 + code;
                    }
                    State::FromW
                }
            }

            State::WBpser => {
                w = bpser(a0, b0, x0, eps, log_p);
                w1 = if log_p { log1_exp(w) } else { 0.5 - w + 0.5 };
                State::Done
            }

            State::W1Bpser => {
                w1 = bpser(b0, a0, y0, eps, log_p);
                w = if log_p { log1_exp(w1) } else { 0.5 - w1 + 0.5 };
                State::Done
            }

            State::Bfrac => {
                w = bfrac(a0, b0, x0, y0, lambda, eps * 15.0, log_p);
                w1 = if log_p { log1_exp(w) } else { 0.5 - w + 0.5 };
                State::Done
            }

            State::Basym => {
                w = basym(a0, b0, lambda, eps * 100.0, log_p);
                w1 = if log_p { log1_exp(w) } else { 0.5 - w + 0.5 };
                State::Done
            }

            State::FromW => {
                if log_p {
                    w1 = (-w).ln_1p();
                    w = w.ln();
                } else {
                    w1 = 0.5 - w + 0.5;
                }
                State::Done
            }

            State::FromW1 => {
                if log_p {
                    w = (-w1).ln_1p();
                    w1 = w1.ln();
                } else {
                    w = 0.5 - w1 + 0.5;
                }
                State::Done
            }

            State::FromW1Log => {
                // w1 is already log(1 - I)
                if log_p {
                    w = log1_exp(w1);
                } else {
                    w = -w1.exp_m1();
                    w1 = w1.exp();
                }
                State::Done
            }

            State::Done => State::Done,
        };
    }

    if do_swap {
        std::mem::swap(&mut w, &mut w1);
    }
    IncompleteBeta::new(w, w1, ierr)
}

// =============================================================================
// Series and continued fractions
// =============================================================================

/// `I_x(a, b)` for `b < min(eps, eps * a)` and `x <= 0.5`.
fn fpser(a: f64, b: f64, x: f64, eps: f64, log_p: bool) -> f64 {
    let mut ans = if log_p {
        a * x.ln()
    } else if a > eps * 0.001 {
        let t = a * x.ln();
        if t < exparg(true) {
            return 0.0;
        }
        t.exp()
    } else {
        1.0
    };

    // 1/B(a, b) ≈ b
    if log_p {
        ans += b.ln() - a.ln();
    } else {
        ans *= b / a;
    }

    let tol = eps / a;
    let mut an = a + 1.0;
    let mut t = x;
    let mut s = t / an;
    loop {
        an += 1.0;
        t *= x;
        let c = t / an;
        s += c;
        if c.abs() <= tol {
            break;
        }
    }

    if log_p {
        ans + (a * s).ln_1p()
    } else {
        ans * (a * s + 1.0)
    }
}

/// `I_{1-x}(b, a)` for `a <= min(eps, eps * b)`, `b x <= 1` and `x <= 0.5`.
fn apser(a: f64, b: f64, x: f64, eps: f64) -> f64 {
    const G: f64 = 0.577215664901533;

    let bx = b * x;
    let mut t = x - bx;
    let c = if b * eps <= 0.02 {
        x.ln() + psi(b) + G + t
    } else {
        bx.ln() + G + t
    };

    let tol = eps * 5.0 * c.abs();
    let mut j = 1.0;
    let mut s = 0.0;
    loop {
        j += 1.0;
        t *= x - bx / j;
        let aj = t / j;
        s += aj;
        if aj.abs() <= tol {
            break;
        }
    }

    -a * (c + s)
}

/// Power series for `I_x(a, b)` when `b <= 1` or `b x <= 0.7`.
fn bpser(a: f64, b: f64, x: f64, eps: f64, log_p: bool) -> f64 {
    if x == 0.0 {
        return d_0(log_p);
    }

    // ans := x^a / (a B(a, b))
    let mut ans;
    let a0 = a.min(b);
    if a0 >= 1.0 {
        let z = a * x.ln() - betaln(a, b);
        ans = if log_p { z - a.ln() } else { z.exp() / a };
    } else {
        let mut b0 = a.max(b);

        if b0 < 8.0 {
            if b0 <= 1.0 {
                // a0 < 1 and b0 <= 1
                if log_p {
                    ans = a * x.ln();
                } else {
                    ans = x.powf(a);
                    if ans == 0.0 {
                        return ans;
                    }
                }
                let apb = a + b;
                let z = if apb > 1.0 {
                    (gam1(apb - 1.0) + 1.0) / apb
                } else {
                    gam1(apb) + 1.0
                };
                let c = (gam1(a) + 1.0) * (gam1(b) + 1.0) / z;

                if log_p {
                    ans += (c * (b / apb)).ln();
                } else {
                    ans *= c * (b / apb);
                }
            } else {
                // a0 < 1 < b0 < 8
                let mut u = gamln1(a0);
                let m = (b0 - 1.0) as i32;
                if m >= 1 {
                    let mut c = 1.0;
                    for _ in 0..m {
                        b0 -= 1.0;
                        c *= b0 / (a0 + b0);
                    }
                    u += c.ln();
                }

                let z = a * x.ln() - u;
                b0 -= 1.0;
                let apb = a0 + b0;
                let t = if apb > 1.0 {
                    (gam1(apb - 1.0) + 1.0) / apb
                } else {
                    gam1(apb) + 1.0
                };

                ans = if log_p {
                    z + (a0 / a).ln() + gam1(b0).ln_1p() - t.ln()
                } else {
                    z.exp() * (a0 / a) * (gam1(b0) + 1.0) / t
                };
            }
        } else {
            // a0 < 1 < 8 <= b0
            let u = gamln1(a0) + algdiv(a0, b0);
            let z = a * x.ln() - u;
            ans = if log_p {
                z + (a0 / a).ln()
            } else {
                a0 / a * z.exp()
            };
        }
    }

    if ans == d_0(log_p) || (!log_p && a <= eps * 0.1) {
        return ans;
    }

    let tol = eps / a;
    let mut sum = 0.0;
    let mut n = 0.0;
    let mut c = 1.0;
    let mut w;
    loop {
        n += 1.0;
        c *= (0.5 - b / n + 0.5) * x;
        w = c / (a + n);
        sum += w;
        if n >= 1e7 || w.abs() <= tol {
            break;
        }
    }
    if w.abs() > tol {
        // Only report when the unconverged tail matters.
        let significant = if log_p {
            !(a * sum > -1.0 && (a * sum).ln_1p().abs() < eps * ans.abs())
        } else {
            (a * sum + 1.0).abs() != 1.0
        };
        if significant {
            warn_detail(
                "bpser",
                format_args!(
                    "bpser(a={a}, b={b}, x={x}) did not converge (n=1e7, |w|/tol={})",
                    w.abs() / tol
                ),
            );
        }
    }

    if log_p {
        if a * sum > -1.0 {
            ans + (a * sum).ln_1p()
        } else {
            if ans > f64::NEG_INFINITY {
                warn_detail(
                    "bpser",
                    format_args!("pbeta(*, log_p = true) -> bpser(a={a}, b={b}, x={x}, ..) underflow to -Inf"),
                );
            }
            f64::NEG_INFINITY
        }
    } else {
        ans * (a * sum + 1.0)
    }
}

/// `I_x(a, b) - I_x(a + n, b)` for a positive integer `n`.
fn bup(a: f64, b: f64, x: f64, y: f64, n: i32, eps: f64, give_log: bool) -> f64 {
    let apb = a + b;
    let ap1 = a + 1.0;

    // Scale by exp(-mu) so that the leading factor does not overflow.
    let (mu, mut d) = if n > 1 && a >= 1.0 && apb >= ap1 * 1.1 {
        let mu = (exparg(true).abs() as i32).min(exparg(false) as i32);
        (mu, (-(mu as f64)).exp())
    } else {
        (0, 1.0)
    };

    let mut ret = if give_log {
        brcmp1(mu, a, b, x, y, true) - a.ln()
    } else {
        brcmp1(mu, a, b, x, y, false) / a
    };
    if n == 1 || (give_log && ret == f64::NEG_INFINITY) || (!give_log && ret == 0.0) {
        return ret;
    }

    let nm1 = n - 1;
    let mut w = d;

    // k: index of the largest term
    let mut k = 0;
    let increasing = if b <= 1.0 {
        false
    } else if y > 1e-4 {
        let r = (b - 1.0) * x / y - a;
        if r >= 1.0 {
            k = if r < nm1 as f64 { r as i32 } else { nm1 };
            true
        } else {
            false
        }
    } else {
        k = nm1;
        true
    };

    if increasing {
        for i in 0..k {
            let l = i as f64;
            d *= (apb + l) / (ap1 + l) * x;
            w += d;
        }
    }

    for i in k..nm1 {
        let l = i as f64;
        d *= (apb + l) / (ap1 + l) * x;
        w += d;
        if d <= eps * w {
            break;
        }
    }

    if give_log {
        ret += w.ln();
    } else {
        ret *= w;
    }
    ret
}

/// Continued fraction for `I_x(a, b)` when `a, b > 1`; `lambda = (a + b) y - b`.
fn bfrac(a: f64, b: f64, x: f64, y: f64, lambda: f64, eps: f64, log_p: bool) -> f64 {
    let brc = brcomp(a, b, x, y, log_p);
    if !log_p && brc == 0.0 {
        return 0.0;
    }

    let c = lambda + 1.0;
    let c0 = b / a;
    let c1 = 1.0 / a + 1.0;
    let yp1 = y + 1.0;

    let mut n = 0.0;
    let mut p = 1.0;
    let mut s = a + 1.0;
    let mut an = 0.0;
    let mut bn = 1.0;
    let mut anp1 = 1.0;
    let mut bnp1 = c / c1;
    let mut r = c1 / c;

    loop {
        n += 1.0;
        let t = n / a;
        let w = n * (b - n) * x;
        let e = a / s;
        let alpha = p * (p + c0) * e * e * (w * x);
        let e = (t + 1.0) / (c1 + t + t);
        let beta = n + w / s + e * (c + n * yp1);
        p = t + 1.0;
        s += 2.0;

        let t = alpha * an + beta * anp1;
        an = anp1;
        anp1 = t;
        let t = alpha * bn + beta * bnp1;
        bn = bnp1;
        bnp1 = t;

        let r0 = r;
        r = anp1 / bnp1;
        if (r - r0).abs() <= eps * r {
            break;
        }

        // rescale
        an /= bnp1;
        bn /= bnp1;
        anp1 = r;
        bnp1 = 1.0;
    }

    if log_p {
        brc + r.ln()
    } else {
        brc * r
    }
}

// =============================================================================
// Leading factors x^a y^b / B(a, b)
// =============================================================================

/// Logs of `x` and `y = 1 - x`, picking the accurate form for each.
fn log_xy(x: f64, y: f64) -> (f64, f64) {
    if x <= 0.375 {
        (x.ln(), alnrel(-x))
    } else if y > 0.375 {
        (x.ln(), y.ln())
    } else {
        (alnrel(-y), y.ln())
    }
}

/// `x^a y^b / B(a, b)`.
fn brcomp(a: f64, b: f64, x: f64, y: f64, log_p: bool) -> f64 {
    if x == 0.0 || y == 0.0 {
        return d_0(log_p);
    }
    let a0 = a.min(b);
    if a0 < 8.0 {
        let (lnx, lny) = log_xy(x, y);
        let mut z = a * lnx + b * lny;
        if a0 >= 1.0 {
            z -= betaln(a, b);
            return d_exp(z, log_p);
        }

        // a < 1 or b < 1
        let mut b0 = a.max(b);
        if b0 >= 8.0 {
            let u = gamln1(a0) + algdiv(a0, b0);
            return if log_p {
                a0.ln() + (z - u)
            } else {
                a0 * (z - u).exp()
            };
        }

        if b0 <= 1.0 {
            let e_z = d_exp(z, log_p);
            if !log_p && e_z == 0.0 {
                return 0.0;
            }
            let apb = a + b;
            let zz = if apb > 1.0 {
                (gam1(apb - 1.0) + 1.0) / apb
            } else {
                gam1(apb) + 1.0
            };
            let c = (gam1(a) + 1.0) * (gam1(b) + 1.0) / zz;
            return if log_p {
                e_z + (a0 * c).ln() - (a0 / b0).ln_1p()
            } else {
                e_z * (a0 * c) / (a0 / b0 + 1.0)
            };
        }

        // 1 < b0 < 8
        let mut u = gamln1(a0);
        let n = (b0 - 1.0) as i32;
        if n >= 1 {
            let mut c = 1.0;
            for _ in 0..n {
                b0 -= 1.0;
                c *= b0 / (a0 + b0);
            }
            u += c.ln();
        }
        z -= u;
        b0 -= 1.0;
        let apb = a0 + b0;
        let t = if apb > 1.0 {
            (gam1(apb - 1.0) + 1.0) / apb
        } else {
            gam1(apb) + 1.0
        };

        if log_p {
            a0.ln() + z + gam1(b0).ln_1p() - t.ln()
        } else {
            a0 * z.exp() * (gam1(b0) + 1.0) / t
        }
    } else {
        // a >= 8 and b >= 8
        let (x0, y0, lambda) = if a <= b {
            let h = a / b;
            (h / (h + 1.0), 1.0 / (h + 1.0), a - (a + b) * x)
        } else {
            let h = b / a;
            (1.0 / (h + 1.0), h / (h + 1.0), (a + b) * y - b)
        };

        let e = -lambda / a;
        let u = if e.abs() > 0.6 {
            e - (x / x0).ln()
        } else {
            rlog1(e)
        };

        let e = lambda / b;
        let v = if e.abs() <= 0.6 {
            rlog1(e)
        } else {
            e - (y / y0).ln()
        };

        if log_p {
            -M_LN_SQRT_2PI + 0.5 * (b * x0).ln() - (a * u + b * v) - bcorr(a, b)
        } else {
            INV_SQRT_2_PI * (b * x0).sqrt() * (-(a * u + b * v)).exp() * (-bcorr(a, b)).exp()
        }
    }
}

/// `exp(mu) x^a y^b / B(a, b)`.
fn brcmp1(mu: i32, a: f64, b: f64, x: f64, y: f64, give_log: bool) -> f64 {
    let a0 = a.min(b);
    if a0 < 8.0 {
        let (lnx, lny) = log_xy(x, y);
        let mut z = a * lnx + b * lny;
        if a0 >= 1.0 {
            z -= betaln(a, b);
            return esum(mu, z, give_log);
        }

        let mut b0 = a.max(b);
        if b0 >= 8.0 {
            let u = gamln1(a0) + algdiv(a0, b0);
            return if give_log {
                a0.ln() + esum(mu, z - u, true)
            } else {
                a0 * esum(mu, z - u, false)
            };
        }

        if b0 <= 1.0 {
            // a0 < 1, b0 <= 1
            let ans = esum(mu, z, give_log);
            if ans == d_0(give_log) {
                return ans;
            }
            let apb = a + b;
            let zz = if apb > 1.0 {
                (gam1(apb - 1.0) + 1.0) / apb
            } else {
                gam1(apb) + 1.0
            };
            let c = if give_log {
                gam1(a).ln_1p() + gam1(b).ln_1p() - zz.ln()
            } else {
                (gam1(a) + 1.0) * (gam1(b) + 1.0) / zz
            };
            return if give_log {
                ans + a0.ln() + c - (a0 / b0).ln_1p()
            } else {
                ans * (a0 * c) / (a0 / b0 + 1.0)
            };
        }

        // a0 < 1 < b0 < 8
        let mut u = gamln1(a0);
        let n = (b0 - 1.0) as i32;
        if n >= 1 {
            let mut c = 1.0;
            for _ in 0..n {
                b0 -= 1.0;
                c *= b0 / (a0 + b0);
            }
            u += c.ln();
        }
        z -= u;
        b0 -= 1.0;
        let apb = a0 + b0;
        let t = if apb > 1.0 {
            (gam1(apb - 1.0) + 1.0) / apb
        } else {
            gam1(apb) + 1.0
        };
        if give_log {
            a0.ln() + esum(mu, z, true) + gam1(b0).ln_1p() - t.ln()
        } else {
            a0 * esum(mu, z, false) * (gam1(b0) + 1.0) / t
        }
    } else {
        // a >= 8 and b >= 8
        let (x0, y0, lambda) = if a > b {
            let h = b / a;
            (1.0 / (h + 1.0), h / (h + 1.0), (a + b) * y - b)
        } else {
            let h = a / b;
            (h / (h + 1.0), 1.0 / (h + 1.0), a - (a + b) * x)
        };
        let lx0 = -(b / a).ln_1p();

        let e = -lambda / a;
        let u = if e.abs() > 0.6 {
            e - (x / x0).ln()
        } else {
            rlog1(e)
        };

        let e = lambda / b;
        let v = if e.abs() > 0.6 {
            e - (y / y0).ln()
        } else {
            rlog1(e)
        };

        let z = esum(mu, -(a * u + b * v), give_log);
        if give_log {
            INV_SQRT_2_PI.ln() + (b.ln() + lx0) / 2.0 + z - bcorr(a, b)
        } else {
            INV_SQRT_2_PI * (b * x0).sqrt() * z * (-bcorr(a, b)).exp()
        }
    }
}

// =============================================================================
// Asymptotic expansions
// =============================================================================

const BGRAT_TERMS: usize = 30;

/// Adds `I_x(a, b)` to `w` for `a >= 15`, `b <= 1`.
///
/// With `log_w`, `w` is on the log scale on entry and exit. Returns the new
/// `w` and a status code (`0` on success).
fn bgrat(a: f64, b: f64, x: f64, y: f64, w: f64, eps: f64, log_w: bool) -> (f64, i32) {
    let mut c = [0.0; BGRAT_TERMS];
    let mut d = [0.0; BGRAT_TERMS];

    let bm1 = b - 0.5 - 0.5;
    let nu = a + bm1 * 0.5;
    let lnx = if y > 0.375 { x.ln() } else { alnrel(-y) };
    let z = -nu * lnx;

    if b * z == 0.0 {
        warn_detail(
            "bgrat",
            format_args!("bgrat(a={a}, b={b}, x={x}, y={y}): b*z == 0 underflow, hence inaccurate pbeta()"),
        );
        return (w, 1);
    }

    // r := exp(-z) z^b / Γ(b), on the log scale
    let log_r = b.ln() + gam1(b).ln_1p() + b * z.ln() + nu * lnx;
    let log_u = log_r - (algdiv(b, a) + b * nu.ln());
    let u = log_u.exp();

    if log_u == f64::NEG_INFINITY {
        return (w, 2);
    }

    let u_underflow = u == 0.0;
    let l = if log_w {
        if w == f64::NEG_INFINITY {
            0.0
        } else {
            (w - log_u).exp()
        }
    } else if w == 0.0 {
        0.0
    } else {
        (w.ln() - log_u).exp()
    };

    let q_r = grat_r(b, z, log_r, eps);
    let v = 0.25 / (nu * nu);
    let t2 = lnx * 0.25 * lnx;
    let mut j = q_r;
    let mut sum = j;
    let mut t = 1.0;
    let mut cn = 1.0;
    let mut n2 = 0.0;
    for n in 1..=BGRAT_TERMS {
        let bp2n = b + n2;
        j = (bp2n * (bp2n + 1.0) * j + (z + bp2n + 1.0) * t) * v;
        n2 += 2.0;
        t *= t2;
        cn /= n2 * (n2 + 1.0);
        let nm1 = n - 1;
        c[nm1] = cn;
        let mut s = 0.0;
        if n > 1 {
            let mut coef = b - n as f64;
            for i in 1..=nm1 {
                s += coef * c[i - 1] * d[nm1 - i];
                coef += b;
            }
        }
        d[nm1] = bm1 * cn + s / n as f64;
        let dj = d[nm1] * j;
        sum += dj;
        if sum <= 0.0 {
            return (w, 3);
        }
        if dj.abs() <= eps * (sum + l) {
            break;
        } else if n == BGRAT_TERMS {
            warn_detail(
                "bgrat",
                format_args!(
                    "bgrat(a={a}, b={b}, x={x}) did not converge; dj={dj}, rel.err={}",
                    dj.abs() / (sum + l)
                ),
            );
        }
    }

    let updated = if log_w {
        logspace_add(w, log_u + sum.ln())
    } else if u_underflow {
        w + (log_u + sum.ln()).exp()
    } else {
        w + u * sum
    };
    (updated, 0)
}

/// `Q(a, x) / r` with `r = exp(-x) x^a / Γ(a) = exp(log_r)`, for `a <= 1`.
fn grat_r(a: f64, x: f64, log_r: f64, eps: f64) -> f64 {
    if a * x == 0.0 {
        if x <= a {
            (-log_r).exp()
        } else {
            0.0
        }
    } else if a == 0.5 {
        if x < 0.25 {
            let p = erf(x.sqrt());
            (0.5 - p + 0.5) * (-log_r).exp()
        } else {
            let sx = x.sqrt();
            erfc1(true, sx) / sx * M_SQRT_PI
        }
    } else if x < 1.1 {
        // Taylor series for P(a, x) / x^a
        let mut an = 3.0;
        let mut c = x;
        let mut sum = x / (a + 3.0);
        let tol = eps * 0.1 / (a + 1.0);
        loop {
            an += 1.0;
            c *= -(x / an);
            let t = c / (a + an);
            sum += t;
            if t.abs() <= tol {
                break;
            }
        }

        let j = a * x * ((sum / 6.0 - 0.5 / (a + 2.0)) * x + 1.0 / (a + 1.0));
        let z = a * x.ln();
        let h = gam1(a);
        let g = h + 1.0;

        if (x >= 0.25 && a < x / 2.59) || z > -0.13394 {
            let l = rexpm1(z);
            let q = ((l + 0.5 + 0.5) * j - l) * g - h;
            if q <= 0.0 {
                0.0
            } else {
                q * (-log_r).exp()
            }
        } else {
            let p = z.exp() * g * (0.5 - j + 0.5);
            (0.5 - p + 0.5) * (-log_r).exp()
        }
    } else {
        // continued fraction
        let mut a2n1 = 1.0;
        let mut a2n = 1.0;
        let mut b2n1 = x;
        let mut b2n = x + (1.0 - a);
        let mut c = 1.0;
        loop {
            a2n1 = x * a2n + c * a2n1;
            b2n1 = x * b2n + c * b2n1;
            let am0 = a2n1 / b2n1;
            c += 1.0;
            let c_a = c - a;
            a2n = a2n1 + c_a * a2n;
            b2n = b2n1 + c_a * b2n;
            let an0 = a2n / b2n;
            if (an0 - am0).abs() < eps * an0 {
                return an0;
            }
        }
    }
}

const BASYM_TERMS: usize = 20;

/// `I_x(a, b)` for large `a` and `b` (both `>= 15`), `lambda = (a + b) y - b >= 0`.
fn basym(a: f64, b: f64, lambda: f64, eps: f64, log_p: bool) -> f64 {
    const E0: f64 = 1.12837916709551; // 2/sqrt(pi)
    const E1: f64 = 0.353553390593274; // 2^(-3/2)
    const LN_E0: f64 = 0.120782237635245;

    let mut a0 = [0.0; BASYM_TERMS + 1];
    let mut b0 = [0.0; BASYM_TERMS + 1];
    let mut c = [0.0; BASYM_TERMS + 1];
    let mut d = [0.0; BASYM_TERMS + 1];

    let f = a * rlog1(-lambda / a) + b * rlog1(lambda / b);
    let t = if log_p {
        -f
    } else {
        let t = (-f).exp();
        if t == 0.0 {
            return 0.0;
        }
        t
    };
    let z0 = f.sqrt();
    let z = z0 / E1 * 0.5;
    let z2 = f + f;

    let (h, r0, r1, w0) = if a < b {
        let h = a / b;
        (h, 1.0 / (h + 1.0), (b - a) / b, 1.0 / (a * (h + 1.0)).sqrt())
    } else {
        let h = b / a;
        (h, 1.0 / (h + 1.0), (b - a) / a, 1.0 / (b * (h + 1.0)).sqrt())
    };

    a0[0] = r1 * 0.66666666666666663;
    c[0] = a0[0] * -0.5;
    d[0] = -c[0];
    let mut j0 = 0.5 / E0 * erfc1(true, z0);
    let mut j1 = E1;
    let mut sum = j0 + d[0] * w0 * j1;

    let mut s = 1.0;
    let h2 = h * h;
    let mut hn = 1.0;
    let mut w = w0;
    let mut znm1 = z;
    let mut zn = z2;
    let mut n = 2;
    while n <= BASYM_TERMS {
        hn *= h2;
        a0[n - 1] = r0 * 2.0 * (h * hn + 1.0) / (n as f64 + 2.0);
        let np1 = n + 1;
        s += hn;
        a0[np1 - 1] = r1 * 2.0 * s / (n as f64 + 3.0);

        for i in n..=np1 {
            let r = (i as f64 + 1.0) * -0.5;
            b0[0] = r * a0[0];
            for m in 2..=i {
                let mut bsum = 0.0;
                for jj in 1..m {
                    let mmj = m - jj;
                    bsum += (jj as f64 * r - mmj as f64) * a0[jj - 1] * b0[mmj - 1];
                }
                b0[m - 1] = r * a0[m - 1] + bsum / m as f64;
            }
            c[i - 1] = b0[i - 1] / (i as f64 + 1.0);

            let mut dsum = 0.0;
            for jj in 1..i {
                dsum += d[i - jj - 1] * c[jj - 1];
            }
            d[i - 1] = -(dsum + c[i - 1]);
        }

        j0 = E1 * znm1 + (n as f64 - 1.0) * j0;
        j1 = E1 * zn + n as f64 * j1;
        znm1 *= z2;
        zn *= z2;
        w *= w0;
        let t0 = d[n - 1] * w * j0;
        w *= w0;
        let t1 = d[np1 - 1] * w * j1;
        sum += t0 + t1;
        if t0.abs() + t1.abs() <= eps * sum {
            break;
        }
        n += 2;
    }

    if log_p {
        LN_E0 + t - bcorr(a, b) + sum.ln()
    } else {
        let u = (-bcorr(a, b)).exp();
        E0 * t * u * sum
    }
}

// =============================================================================
// Elementary kernels
// =============================================================================

/// Most negative (`underflow`) or most positive argument `w` for which
/// `exp(w)` is a normal nonzero finite number, to five digits.
fn exparg(underflow: bool) -> f64 {
    const LNB: f64 = 0.69314718055995;
    let m = if underflow {
        f64::MIN_EXP - 1
    } else {
        f64::MAX_EXP
    };
    m as f64 * LNB * 0.99999
}

/// `exp(mu + x)`.
fn esum(mu: i32, x: f64, give_log: bool) -> f64 {
    if give_log {
        return x + mu as f64;
    }
    let mu_f = mu as f64;
    let w;
    if x > 0.0 {
        if mu > 0 {
            return mu_f.exp() * x.exp();
        }
        w = mu_f + x;
        if w < 0.0 {
            return mu_f.exp() * x.exp();
        }
    } else {
        if mu < 0 {
            return mu_f.exp() * x.exp();
        }
        w = mu_f + x;
        if w > 0.0 {
            return mu_f.exp() * x.exp();
        }
    }
    w.exp()
}

/// `exp(x) - 1`.
fn rexpm1(x: f64) -> f64 {
    const P1: f64 = 9.14041914819518e-10;
    const P2: f64 = 0.0238082361044469;
    const Q1: f64 = -0.499999999085958;
    const Q2: f64 = 0.107141568980644;
    const Q3: f64 = -0.0119041179760821;
    const Q4: f64 = 5.95130811860248e-4;

    if x.abs() <= 0.15 {
        return x * (((P2 * x + P1) * x + 1.0) / ((((Q4 * x + Q3) * x + Q2) * x + Q1) * x + 1.0));
    }
    let w = x.exp();
    if x > 0.0 {
        w * (0.5 - 1.0 / w + 0.5)
    } else {
        w - 0.5 - 0.5
    }
}

/// `ln(1 + a)`.
fn alnrel(a: f64) -> f64 {
    if a.abs() > 0.375 {
        return (1.0 + a).ln();
    }
    const P1: f64 = -1.29418923021993;
    const P2: f64 = 0.405303492862024;
    const P3: f64 = -0.0178874546012214;
    const Q1: f64 = -1.62752256355323;
    const Q2: f64 = 0.747811014037616;
    const Q3: f64 = -0.0845104217945565;

    let t = a / (a + 2.0);
    let t2 = t * t;
    let w = (((P3 * t2 + P2) * t2 + P1) * t2 + 1.0) / (((Q3 * t2 + Q2) * t2 + Q1) * t2 + 1.0);
    t * 2.0 * w
}

/// `x - ln(1 + x)`.
fn rlog1(x: f64) -> f64 {
    const A: f64 = 0.0566749439387324;
    const B: f64 = 0.0456512608815524;
    const P0: f64 = 0.333333333333333;
    const P1: f64 = -0.224696413112536;
    const P2: f64 = 0.00620886815375787;
    const Q1: f64 = -1.27408923933623;
    const Q2: f64 = 0.354508718369557;

    if !(-0.39..=0.57).contains(&x) {
        let w = x + 0.5 + 0.5;
        return x - w.ln();
    }

    let (h, w1) = if x < -0.18 {
        let h = (x + 0.3) / 0.7;
        (h, A - h * 0.3)
    } else if x > 0.18 {
        let h = x * 0.75 - 0.25;
        (h, B + h / 3.0)
    } else {
        (x, 0.0)
    };

    let r = h / (h + 2.0);
    let t = r * r;
    let w = ((P2 * t + P1) * t + P0) / ((Q2 * t + Q1) * t + 1.0);
    t * 2.0 * (1.0 / (1.0 - r) - r * w) + w1
}

const ERF_C: f64 = 0.564189583547756;
const ERF_A: [f64; 5] = [
    7.7105849500132e-5,
    -0.00133733772997339,
    0.0323076579225834,
    0.0479137145607681,
    0.128379167095513,
];
const ERF_B: [f64; 3] = [0.00301048631703895, 0.0538971687740286, 0.375795757275549];
const ERF_P: [f64; 8] = [
    -1.36864857382717e-7,
    0.564195517478974,
    7.21175825088309,
    43.1622272220567,
    152.98928504694,
    339.320816734344,
    451.918953711873,
    300.459261020162,
];
const ERF_Q: [f64; 8] = [
    1.0,
    12.7827273196294,
    77.0001529352295,
    277.585444743988,
    638.980264465631,
    931.35409485061,
    790.950925327898,
    300.459260956983,
];
const ERF_R: [f64; 5] = [
    2.10144126479064,
    26.2370141675169,
    21.3688200555087,
    4.6580782871847,
    0.282094791773523,
];
const ERF_S: [f64; 4] = [94.153775055546, 187.11481179959, 99.0191814623914, 18.0124575948747];

fn horner(coefs: &[f64], x: f64) -> f64 {
    coefs.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Real error function.
fn erf(x: f64) -> f64 {
    let ax = x.abs();
    if ax <= 0.5 {
        let t = x * x;
        let top = horner(&ERF_A, t) + 1.0;
        let bot = horner(&ERF_B, t) * t + 1.0;
        return x * (top / bot);
    }

    if ax <= 4.0 {
        let top = horner(&ERF_P, ax);
        let bot = horner(&ERF_Q, ax);
        let ret = 0.5 - (-x * x).exp() * top / bot + 0.5;
        return if x < 0.0 { -ret } else { ret };
    }

    if ax >= 5.8 {
        return if x > 0.0 { 1.0 } else { -1.0 };
    }
    let x2 = x * x;
    let t = 1.0 / x2;
    let top = horner(&ERF_R, t);
    let bot = horner(&ERF_S, t) * t + 1.0;
    let t = (ERF_C - top / (x2 * bot)) / ax;
    let ret = 0.5 - (-x2).exp() * t + 0.5;
    if x < 0.0 {
        -ret
    } else {
        ret
    }
}

/// `erfc(x)`, or `exp(x^2) erfc(x)` when `scaled`.
fn erfc1(scaled: bool, x: f64) -> f64 {
    let ax = x.abs();
    if ax <= 0.5 {
        let t = x * x;
        let top = horner(&ERF_A, t) + 1.0;
        let bot = horner(&ERF_B, t) * t + 1.0;
        let ret = 0.5 - x * (top / bot) + 0.5;
        return if scaled { t.exp() * ret } else { ret };
    }

    let mut ret = if ax <= 4.0 {
        horner(&ERF_P, ax) / horner(&ERF_Q, ax)
    } else {
        if x <= -5.6 {
            return if scaled { (x * x).exp() * 2.0 } else { 2.0 };
        }
        if !scaled && (x > 100.0 || x * x > -exparg(true)) {
            return 0.0;
        }
        let t = 1.0 / (x * x);
        let top = horner(&ERF_R, t);
        let bot = horner(&ERF_S, t) * t + 1.0;
        (ERF_C - t * top / bot) / ax
    };

    if scaled {
        if x < 0.0 {
            ret = (x * x).exp() * 2.0 - ret;
        }
    } else {
        ret *= (-x * x).exp();
        if x < 0.0 {
            ret = 2.0 - ret;
        }
    }
    ret
}

/// `1/Γ(a + 1) - 1` for `-0.5 <= a <= 1.5`.
fn gam1(a: f64) -> f64 {
    const R: [f64; 9] = [
        -0.422784335098468,
        -0.771330383816272,
        -0.244757765222226,
        0.118378989872749,
        9.30357293360349e-4,
        -0.0118290993445146,
        0.00223047661158249,
        2.66505979058923e-4,
        -1.32674909766242e-4,
    ];
    const S1: f64 = 0.273076135303957;
    const S2: f64 = 0.0559398236957378;
    const P: [f64; 7] = [
        0.577215664901533,
        -0.409078193005776,
        -0.230975380857675,
        0.0597275330452234,
        0.0076696818164949,
        -0.00514889771323592,
        5.89597428611429e-4,
    ];
    const Q: [f64; 5] = [
        1.0,
        0.427569613095214,
        0.158451672430138,
        0.0261132021441447,
        0.00423244297896961,
    ];

    let d = a - 0.5;
    let t = if d > 0.0 { d - 0.5 } else { a };

    if t < 0.0 {
        let top = R.iter().rev().fold(0.0, |acc, &c| acc * t + c);
        let bot = (S2 * t + S1) * t + 1.0;
        let w = top / bot;
        if d > 0.0 {
            t * w / a
        } else {
            a * (w + 0.5 + 0.5)
        }
    } else if t == 0.0 {
        0.0
    } else {
        let top = P.iter().rev().fold(0.0, |acc, &c| acc * t + c);
        let bot = (((Q[4] * t + Q[3]) * t + Q[2]) * t + Q[1]) * t + 1.0;
        let w = top / bot;
        if d > 0.0 {
            t / a * (w - 0.5 - 0.5)
        } else {
            a * w
        }
    }
}

/// `ln Γ(1 + a)` for `-0.2 <= a <= 1.25`.
fn gamln1(a: f64) -> f64 {
    if a < 0.6 {
        const P: [f64; 7] = [
            0.577215664901533,
            0.844203922187225,
            -0.168860593646662,
            -0.780427615533591,
            -0.402055799310489,
            -0.0673562214325671,
            -0.00271935708322958,
        ];
        const Q: [f64; 6] = [
            2.88743195473681,
            3.12755088914843,
            1.56875193295039,
            0.361951990101499,
            0.0325038868253937,
            6.67465618796164e-4,
        ];
        let num = P.iter().rev().fold(0.0, |acc, &c| acc * a + c);
        let den = Q.iter().rev().fold(0.0, |acc, &c| acc * a + c) * a + 1.0;
        -a * (num / den)
    } else {
        const R: [f64; 6] = [
            0.422784335098467,
            0.848044614534529,
            0.565221050691933,
            0.156513060486551,
            0.017050248402265,
            4.97958207639485e-4,
        ];
        const S: [f64; 5] = [
            1.24313399877507,
            0.548042109832463,
            0.10155218743983,
            0.00713309612391,
            1.16165475989616e-4,
        ];
        let x = a - 0.5 - 0.5;
        let num = R.iter().rev().fold(0.0, |acc, &c| acc * x + c);
        let den = S.iter().rev().fold(0.0, |acc, &c| acc * x + c) * x + 1.0;
        x * (num / den)
    }
}

/// Digamma function. Returns `0` where it cannot be computed.
fn psi(x: f64) -> f64 {
    const PIOV4: f64 = 0.785398163397448;
    // zero of psi
    const DX0: f64 = 1.461632144968362341262659542325721325;
    const P1: [f64; 7] = [
        0.0089538502298197,
        4.77762828042627,
        142.441585084029,
        1186.45200713425,
        3633.51846806499,
        4138.10161269013,
        1305.60269827897,
    ];
    const Q1: [f64; 6] = [
        44.8452573429826,
        520.752771467162,
        2210.0079924783,
        3641.27349079381,
        1908.310765963,
        6.91091682714533e-6,
    ];
    const P2: [f64; 4] = [
        -2.12940445131011,
        -7.01677227766759,
        -4.48616543918019,
        -0.648157123766197,
    ];
    const Q2: [f64; 4] = [
        32.2703493791143,
        89.2920700481861,
        54.6117738103215,
        7.77788548522962,
    ];
    const XSMALL: f64 = 1e-9;
    let xmax1 = (i32::MAX as f64).min(1.0 / DBL_EPSILON);

    let mut x = x;
    let mut aug = 0.0;
    if x < 0.5 {
        // reflection: psi(1 - x) = psi(x) + π cot(πx)
        if x.abs() <= XSMALL {
            if x == 0.0 {
                return 0.0;
            }
            aug = -1.0 / x;
        } else {
            let mut w = -x;
            let mut sgn = PIOV4;
            if w <= 0.0 {
                w = -w;
                sgn = -sgn;
            }
            if w >= xmax1 {
                return 0.0;
            }
            let mut nq = w as i32;
            w -= nq as f64;
            nq = (w * 4.0) as i32;
            w = (w - nq as f64 * 0.25) * 4.0;

            let n = nq / 2;
            if n + n != nq {
                w = 1.0 - w;
            }
            let z = PIOV4 * w;
            let m = n / 2;
            if m + m != n {
                sgn = -sgn;
            }

            let n = (nq + 1) / 2;
            let m = (n / 2) * 2;
            if m == n {
                if z == 0.0 {
                    return 0.0;
                }
                aug = sgn * (z.cos() / z.sin() * 4.0);
            } else {
                aug = sgn * (z.sin() / z.cos() * 4.0);
            }
        }
        x = 1.0 - x;
    }

    if x <= 3.0 {
        let mut den = x;
        let mut upper = P1[0] * x;
        for i in 1..=5 {
            den = (den + Q1[i - 1]) * x;
            upper = (upper + P1[i]) * x;
        }
        den = (upper + P1[6]) / (den + Q1[5]);
        return den * (x - DX0) + aug;
    }

    if x < xmax1 {
        let w = 1.0 / (x * x);
        let mut den = w;
        let mut upper = P2[0] * w;
        for i in 1..=3 {
            den = (den + Q2[i - 1]) * w;
            upper = (upper + P2[i]) * w;
        }
        aug += upper / (den + Q2[3]) - 0.5 / x;
    }
    aug + x.ln()
}

// =============================================================================
// Log-beta pieces
// =============================================================================

/// `ln B(a0, b0)`.
fn betaln(a0: f64, b0: f64) -> f64 {
    const E: f64 = 0.918938533204673; // 0.5 ln(2π)

    let mut a = a0.min(b0);
    let mut b = a0.max(b0);

    if a >= 8.0 {
        let w = bcorr(a, b);
        let h = a / b;
        let u = -(a - 0.5) * (h / (h + 1.0)).ln();
        let v = b * alnrel(h);
        return if u > v {
            b.ln() * -0.5 + E + w - v - u
        } else {
            b.ln() * -0.5 + E + w - u - v
        };
    }

    if a < 1.0 {
        return if b < 8.0 {
            gamln(a) + (gamln(b) - gamln(a + b))
        } else {
            gamln(a) + algdiv(a, b)
        };
    }

    // 1 <= a < 8
    let mut w = 0.0;
    if a < 2.0 {
        if b <= 2.0 {
            return gamln(a) + gamln(b) - gsumln(a, b);
        }
        if b >= 8.0 {
            return gamln(a) + algdiv(a, b);
        }
    } else if b <= 1e3 {
        // reduction of a
        let n = (a - 1.0) as i32;
        w = 1.0;
        for _ in 0..n {
            a -= 1.0;
            let h = a / b;
            w *= h / (h + 1.0);
        }
        w = w.ln();
        if b >= 8.0 {
            return w + gamln(a) + algdiv(a, b);
        }
    } else {
        // reduction of a when b > 1000
        let n = (a - 1.0) as i32;
        w = 1.0;
        for _ in 0..n {
            a -= 1.0;
            w *= a / (a / b + 1.0);
        }
        return w.ln() - n as f64 * b.ln() + (gamln(a) + algdiv(a, b));
    }

    // reduction of b when b < 8
    let n = (b - 1.0) as i32;
    let mut z = 1.0;
    for _ in 0..n {
        b -= 1.0;
        z *= b / (a + b);
    }
    w + z.ln() + (gamln(a) + (gamln(b) - gsumln(a, b)))
}

/// `ln Γ(a + b)` for `1 <= a, b <= 2`.
fn gsumln(a: f64, b: f64) -> f64 {
    let x = a + b - 2.0;
    if x <= 0.25 {
        gamln1(x + 1.0)
    } else if x <= 1.25 {
        gamln1(x) + alnrel(x)
    } else {
        gamln1(x - 1.0) + (x * (x + 1.0)).ln()
    }
}

const DEL_C: [f64; 6] = [
    0.0833333333333333,
    -0.00277777777760991,
    7.9365066682539e-4,
    -5.9520293135187e-4,
    8.37308034031215e-4,
    -0.00165322962780713,
];

/// `del(b) - del(a + b)` from the series in `s_n = (1 - x^n) / (1 - x)`.
fn del_difference(x: f64, c: f64, b: f64) -> f64 {
    let x2 = x * x;
    let s3 = x + x2 + 1.0;
    let s5 = x + x2 * s3 + 1.0;
    let s7 = x + x2 * s5 + 1.0;
    let s9 = x + x2 * s7 + 1.0;
    let s11 = x + x2 * s9 + 1.0;

    let t = 1.0 / (b * b);
    let w = ((((DEL_C[5] * s11 * t + DEL_C[4] * s9) * t + DEL_C[3] * s7) * t + DEL_C[2] * s5) * t
        + DEL_C[1] * s3)
        * t
        + DEL_C[0];
    w * (c / b)
}

/// `del(a0) + del(b0) - del(a0 + b0)` for `a0, b0 >= 8`, where
/// `ln Γ(a) = (a - 0.5) ln(a) - a + 0.5 ln(2π) + del(a)`.
fn bcorr(a0: f64, b0: f64) -> f64 {
    let a = a0.min(b0);
    let b = a0.max(b0);

    let h = a / b;
    let w = del_difference(1.0 / (h + 1.0), h / (h + 1.0), b);

    let t = 1.0 / (a * a);
    let del_a = DEL_C.iter().rev().fold(0.0, |acc, &c| acc * t + c) / a;
    del_a + w
}

/// `ln(Γ(b) / Γ(a + b))` for `b >= 8`.
fn algdiv(a: f64, b: f64) -> f64 {
    let (c, x, d) = if a > b {
        let h = b / a;
        (1.0 / (h + 1.0), h / (h + 1.0), a + (b - 0.5))
    } else {
        let h = a / b;
        (h / (h + 1.0), 1.0 / (h + 1.0), b + (a - 0.5))
    };

    let w = del_difference(x, c, b);

    let u = d * alnrel(a / b);
    let v = a * (b.ln() - 1.0);
    if u > v {
        w - v - u
    } else {
        w - u - v
    }
}

/// `ln Γ(a)` for `a > 0`.
fn gamln(a: f64) -> f64 {
    const D: f64 = 0.418938533204673; // 0.5 (ln(2π) - 1)

    if a <= 0.8 {
        gamln1(a) - a.ln()
    } else if a <= 2.25 {
        gamln1(a - 0.5 - 0.5)
    } else if a < 10.0 {
        let n = (a - 1.25) as i32;
        let mut t = a;
        let mut w = 1.0;
        for _ in 0..n {
            t -= 1.0;
            w *= t;
        }
        gamln1(t - 1.0) + w.ln()
    } else {
        let t = 1.0 / (a * a);
        let w = DEL_C.iter().rev().fold(0.0, |acc, &c| acc * t + c) / a;
        D + w + (a - 0.5) * (a.ln() - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::special::gamma::lgammafn;
    use approx::assert_relative_eq;

    fn binom_upper(n: u32, k: u32, p: f64) -> f64 {
        // P(X >= k), X ~ Binom(n, p)
        let mut total = 0.0;
        let mut coef = 1.0;
        for j in 0..=n {
            if j > 0 {
                coef *= (n - j + 1) as f64 / j as f64;
            }
            if j >= k {
                total += coef * p.powi(j as i32) * (1.0 - p).powi((n - j) as i32);
            }
        }
        total
    }

    // =========================================================================
    // bratio regimes
    // =========================================================================

    #[test]
    fn test_bratio_power_series() {
        let r = bratio(2.0, 3.0, 0.4, 0.6, false);
        assert_eq!(r.ierr, 0);
        assert_relative_eq!(r.w, 0.5248, max_relative = 1e-13);
        assert_relative_eq!(r.w1, 0.4752, max_relative = 1e-13);
    }

    #[test]
    fn test_bratio_uniform_is_identity() {
        for &x in &[0.01, 0.3, 0.5, 0.77, 0.999] {
            let r = bratio(1.0, 1.0, x, 1.0 - x, false);
            assert_relative_eq!(r.w, x, max_relative = 1e-13);
        }
    }

    #[test]
    fn test_bratio_arcsine() {
        let x: f64 = 0.9;
        let expected = 2.0 / std::f64::consts::PI * x.sqrt().asin();
        let r = bratio(0.5, 0.5, x, 1.0 - x, false);
        assert_relative_eq!(r.w, expected, max_relative = 1e-13);
    }

    #[test]
    fn test_bratio_bgrat_direct() {
        // I_x(1, b) = 1 - (1 - x)^b
        let r = bratio(1.0, 20.0, 0.1, 0.9, false);
        assert_relative_eq!(r.w, 1.0 - 0.9_f64.powi(20), max_relative = 1e-12);
        assert_eq!(r.ierr, 0);
    }

    #[test]
    fn test_bratio_bup_then_bgrat() {
        let r = bratio(1.0, 10.0, 0.2, 0.8, false);
        assert_relative_eq!(r.w, 1.0 - 0.8_f64.powi(10), max_relative = 1e-12);
    }

    #[test]
    fn test_bratio_reduce_b() {
        // I_0.5(5, 10) = P(Binom(14, 0.5) >= 5)
        let r = bratio(5.0, 10.0, 0.5, 0.5, false);
        assert_relative_eq!(r.w, 1.0 - 1471.0 / 16384.0, max_relative = 1e-12);
        assert_relative_eq!(r.w, binom_upper(14, 5, 0.5), max_relative = 1e-12);
    }

    #[test]
    fn test_bratio_continued_fraction_symmetry() {
        let (a, b, x) = (50.0, 60.0, 0.45);
        let r = bratio(a, b, x, 1.0 - x, false);
        let s = bratio(b, a, 1.0 - x, x, false);
        assert_relative_eq!(r.w, s.w1, max_relative = 1e-12);
        assert_relative_eq!(r.w + r.w1, 1.0, epsilon = 1e-15);
        // integer shapes: I_x(a, b) = P(Binom(a + b - 1, x) >= a)
        assert_relative_eq!(r.w, binom_upper(109, 50, x), max_relative = 1e-9);
    }

    #[test]
    fn test_bratio_asymptotic_symmetric() {
        let r = bratio(200.0, 200.0, 0.5, 0.5, false);
        assert_relative_eq!(r.w, 0.5, max_relative = 1e-12);
    }

    #[test]
    fn test_bratio_log_scale_consistent() {
        for &(a, b, x) in &[(2.0, 3.0, 0.4), (0.5, 0.5, 0.9), (50.0, 60.0, 0.45), (1.0, 10.0, 0.2)] {
            let lin = bratio(a, b, x, 1.0 - x, false);
            let log = bratio(a, b, x, 1.0 - x, true);
            assert_relative_eq!(log.w, lin.w.ln(), max_relative = 1e-10);
            assert_relative_eq!(log.w1, lin.w1.ln(), max_relative = 1e-10);
        }
    }

    #[test]
    fn test_bratio_deep_lower_tail_in_log() {
        // I_x(a, 1) = x^a
        let (a, x) = (300.0, 0.01_f64);
        let r = bratio(a, 1.0, x, 1.0 - x, true);
        assert_relative_eq!(r.w, a * x.ln(), max_relative = 1e-12);
    }

    #[test]
    fn test_bratio_input_errors() {
        assert_eq!(bratio(-1.0, 1.0, 0.5, 0.5, false).ierr, 1);
        assert_eq!(bratio(0.0, 0.0, 0.5, 0.5, false).ierr, 2);
        assert_eq!(bratio(1.0, 1.0, 1.5, -0.5, false).ierr, 3);
        assert_eq!(bratio(1.0, 1.0, 0.5, 0.6, false).ierr, 5);
        assert_eq!(bratio(f64::NAN, 1.0, 0.5, 0.5, false).ierr, 9);
        assert!(!bratio(0.0, 1.0, 0.0, 1.0, false).is_ok());
    }

    #[test]
    fn test_bratio_limits() {
        let r = bratio(0.0, 2.0, 0.3, 0.7, false);
        assert_eq!((r.w, r.w1), (1.0, 0.0));
        let r = bratio(2.0, 0.0, 0.3, 0.7, false);
        assert_eq!((r.w, r.w1), (0.0, 1.0));
        let r = bratio(2.0, 3.0, 0.0, 1.0, true);
        assert_eq!((r.w, r.w1), (f64::NEG_INFINITY, 0.0));
        let r = bratio(1e-20, 3e-20, 0.3, 0.7, false);
        assert_relative_eq!(r.w, 0.75);
    }

    // =========================================================================
    // Kernels
    // =========================================================================

    #[test]
    fn test_betaln_against_lgamma() {
        for &(a, b) in &[(0.3, 0.4), (0.5, 9.0), (1.5, 1.7), (1.2, 5.0), (3.5, 4.5), (3.0, 2000.0), (9.0, 12.0)] {
            let expected = lgammafn(a) + lgammafn(b) - lgammafn(a + b);
            assert_relative_eq!(betaln(a, b), expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_gamln_and_gam1() {
        for &a in &[0.2, 1.0, 2.0, 5.5, 12.0] {
            assert_relative_eq!(gamln(a), lgammafn(a), epsilon = 1e-13);
        }
        // 1/Γ(1.5) - 1
        let g = 1.0 / (0.5 * std::f64::consts::PI.sqrt()) - 1.0;
        assert_relative_eq!(gam1(0.5), g, max_relative = 1e-13);
        assert_eq!(gam1(1.0), 0.0);
    }

    #[test]
    fn test_elementary_kernels() {
        for &x in &[-0.3, -0.05, 0.1, 0.5, 2.0] {
            assert_relative_eq!(alnrel(x), f64::ln_1p(x), max_relative = 1e-13);
            assert_relative_eq!(rexpm1(x), f64::exp_m1(x), max_relative = 1e-13);
            assert_relative_eq!(rlog1(x), x - f64::ln_1p(x), max_relative = 1e-11);
        }
        assert_relative_eq!(erf(0.3) + erfc1(false, 0.3), 1.0, epsilon = 1e-14);
        assert_relative_eq!(erf(2.0), 0.9953222650189527, max_relative = 1e-13);
        assert_relative_eq!(
            erfc1(true, 5.0),
            (25.0_f64).exp() * erfc1(false, 5.0),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_psi_values() {
        // psi(1) = -γ, psi(0.5) = -γ - 2 ln 2
        let euler = 0.5772156649015329;
        assert_relative_eq!(psi(1.0), -euler, max_relative = 1e-13);
        assert_relative_eq!(psi(0.5), -euler - 2.0 * std::f64::consts::LN_2, max_relative = 1e-13);
        assert_relative_eq!(psi(10.0), psi(9.0) + 1.0 / 9.0, max_relative = 1e-13);
        assert_eq!(psi(0.0), 0.0);
    }

    #[test]
    fn test_bpser_log_underflow_warns() {
        use crate::types::warning::capture_warnings;

        let (r, text) = capture_warnings(|| bratio(1e4, 20.0, 0.9, 0.1, true));
        assert_eq!(r.w, f64::NEG_INFINITY);
        assert!(text.contains("bpser"), "{text}");
        assert!(text.contains("underflow to -Inf"), "{text}");
    }

    #[test]
    fn test_exparg_bounds() {
        assert!((exparg(false) - 709.78).abs() < 0.1);
        assert!((exparg(true) + 708.39).abs() < 0.1);
    }
}
