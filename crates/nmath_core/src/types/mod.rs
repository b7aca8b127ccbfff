//! Error and warning types shared across the workspace.
//!
//! This module provides:
//! - `error`: Structured error types for solver, interpolation and sampling operations
//! - `warning`: Non-fatal warning categories and their reporting hooks
//!
//! # Re-exports
//!
//! - [`SolverError`], [`InterpolationError`], [`SamplingError`], [`StatsError`] from `error`
//! - [`MathWarning`] from `warning`

pub mod error;
pub mod warning;

pub use error::{InterpolationError, SamplingError, SolverError, StatsError};
pub use warning::MathWarning;
