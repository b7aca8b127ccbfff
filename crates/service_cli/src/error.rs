//! Error types for the command-line front end.

use nmath_core::types::{InterpolationError, SamplingError, SolverError, StatsError};
use nmath_distributions::distribution::DistributionError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Unknown distribution or invalid parameters.
    #[error("Distribution error: {0}")]
    Distribution(#[from] DistributionError),

    /// Root finding or minimisation failed.
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    /// Interpolation or spline construction failed.
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    /// Distance, covariance or correlation failed.
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    /// A vector-valued sampler rejected its input.
    #[error("Sampling error: {0}")]
    Sampling(#[from] SamplingError),

    /// An input file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// A command-line argument is malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The self-check reproduced some reference values incorrectly.
    #[error("{0} reference value(s) not reproduced")]
    CheckFailed(usize),

    /// Reading input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing JSON output failed.
    #[error("Serialisation error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
