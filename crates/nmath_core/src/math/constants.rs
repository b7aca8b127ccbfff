//! Numeric constants.
//!
//! Values are given to more digits than `f64` holds so that the literal rounds
//! to the nearest representable double.

#![allow(clippy::excessive_precision)]

/// log(2)
pub const M_LN2: f64 = std::f64::consts::LN_2;
/// log(10)
pub const M_LN10: f64 = std::f64::consts::LN_10;
/// pi
pub const M_PI: f64 = std::f64::consts::PI;
/// 2 * pi
pub const M_2PI: f64 = 6.283185307179586476925286766559;
/// log(2 * pi)
pub const M_LN_2PI: f64 = 1.837877066409345483560659472811;
/// log(sqrt(2 * pi))
pub const M_LN_SQRT_2PI: f64 = 0.918938533204672741780329736406;
/// log(sqrt(pi))
pub const M_LN_SQRT_PI: f64 = 0.572364942924700087071713675677;
/// log(sqrt(pi / 2))
pub const M_LN_SQRT_PID2: f64 = 0.225791352644727432363097614947;
/// 1 / sqrt(2 * pi)
pub const M_1_SQRT_2PI: f64 = 0.398942280401432677939946059934;
/// sqrt(2 / pi)
pub const M_SQRT_2DPI: f64 = 0.797884560802865355879892119869;
/// sqrt(32)
pub const M_SQRT_32: f64 = 5.656854249492380195206754896838;
/// sqrt(pi)
pub const M_SQRT_PI: f64 = 1.772453850905516027298167483341;
/// 1 / pi
pub const M_1_PI: f64 = std::f64::consts::FRAC_1_PI;
/// pi / 2
pub const M_PI_2: f64 = std::f64::consts::FRAC_PI_2;

/// Machine epsilon, 2^-52.
pub const DBL_EPSILON: f64 = f64::EPSILON;
/// Smallest positive normal double, 2^-1022.
pub const DBL_MIN: f64 = f64::MIN_POSITIVE;
/// Largest finite double.
pub const DBL_MAX: f64 = f64::MAX;
/// Smallest positive subnormal double, 2^-1074.
pub const DBL_TRUE_MIN: f64 = 4.9406564584124654e-324;
/// Binary exponent of `DBL_MIN`, plus one.
pub const DBL_MIN_EXP: i32 = f64::MIN_EXP;
/// Binary exponent of `DBL_MAX`, plus one.
pub const DBL_MAX_EXP: i32 = f64::MAX_EXP;
/// Bits in the significand.
pub const DBL_MANT_DIG: i32 = f64::MANTISSA_DIGITS as i32;

/// Largest integer `i32` value as a double.
pub const INT_MAX: f64 = i32::MAX as f64;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_log_constants() {
        assert_relative_eq!(M_LN_SQRT_2PI, (2.0 * M_PI).sqrt().ln(), epsilon = 1e-15);
        assert_relative_eq!(M_LN_SQRT_PID2, (M_PI / 2.0).sqrt().ln(), epsilon = 1e-15);
        assert_relative_eq!(M_LN_2PI, M_2PI.ln(), epsilon = 1e-15);
    }

    #[test]
    fn test_machine_constants() {
        assert_eq!(DBL_MIN_EXP, -1021);
        assert_eq!(DBL_MAX_EXP, 1024);
        assert_eq!(DBL_MANT_DIG, 53);
        assert!(DBL_TRUE_MIN > 0.0);
        assert_eq!(DBL_TRUE_MIN / 2.0, 0.0);
    }
}
