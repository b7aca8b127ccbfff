//! Non-fatal warnings raised by numerical routines.
//!
//! Every warning is emitted as a `tracing` event at `WARN` level with target
//! `nmath`, carrying the routine name and the warning category as fields. No
//! warning interrupts the computation: the caller always receives a value,
//! `NaN` for domain errors and the best available estimate otherwise.

use std::fmt;

/// Categories of non-fatal numerical conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MathWarning {
    /// Argument outside the mathematical domain; the result is `NaN`.
    Domain,
    /// Result outside the representable range.
    Range,
    /// An iterative algorithm hit its iteration cap.
    NoConvergence,
    /// Full precision may not have been achieved.
    Precision,
    /// Result underflowed to zero.
    Underflow,
}

impl MathWarning {
    /// Human-readable description of the condition.
    pub fn message(&self) -> &'static str {
        match self {
            MathWarning::Domain => "argument out of domain",
            MathWarning::Range => "value out of range",
            MathWarning::NoConvergence => "convergence failed",
            MathWarning::Precision => "full precision may not have been achieved",
            MathWarning::Underflow => "underflow occurred",
        }
    }
}

impl fmt::Display for MathWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Report `kind` for `routine`.
pub fn warn(kind: MathWarning, routine: &'static str) {
    tracing::warn!(target: "nmath", routine, kind = ?kind, "{} in '{}'", kind, routine);
}

/// Report a free-form warning for `routine`.
pub fn warn_detail(routine: &'static str, detail: fmt::Arguments<'_>) {
    tracing::warn!(target: "nmath", routine, "{}: {}", routine, detail);
}

/// Report a domain error for `routine` and return `NaN`.
///
/// ```
/// use nmath_core::types::warning::domain_nan;
///
/// assert!(domain_nan("qgamma").is_nan());
/// ```
#[must_use]
pub fn domain_nan(routine: &'static str) -> f64 {
    warn(MathWarning::Domain, routine);
    f64::NAN
}

/// Runs `f` under a subscriber that records every `nmath` warning.
#[cfg(test)]
pub(crate) fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, String) {
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let buffer = Buffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let text = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (result, text)
}
