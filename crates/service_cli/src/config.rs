//! CLI configuration management
//!
//! Settings come from, lowest to highest priority: built-in defaults, a TOML
//! file, `NMATH_*` environment variables, then command-line flags.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Unrecognised log level.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unrecognised output format.
    #[error("Invalid output format: {0}. Must be one of: table, json")]
    InvalidFormat(String),

    /// Solver settings out of range.
    #[error("Invalid solver settings: {0}")]
    InvalidSolver(String),

    /// Printed precision out of range.
    #[error("Invalid precision: {0}. Must be between 1 and 17")]
    InvalidPrecision(usize),

    /// The file or environment sources could not be merged.
    #[error("Configuration source error: {0}")]
    Source(#[from] ::config::ConfigError),
}

/// Log levels accepted by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including per-iteration solver traces.
    Trace,
    /// Debug output.
    Debug,
    /// Progress messages.
    Info,
    /// Numerical warnings only.
    #[default]
    Warn,
    /// Errors only.
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Output formats for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned plain-text columns.
    #[default]
    Table,
    /// One JSON document.
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

/// Settings for the `solve` and `mode` commands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Absolute tolerance on the argument.
    pub tolerance: f64,
    /// Evaluation cap.
    pub max_iterations: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 1000,
        }
    }
}

/// CLI configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log level
    pub log_level: LogLevel,
    /// Result format
    pub format: OutputFormat,
    /// Significant digits in table output
    pub precision: usize,
    /// Seed for the random source; drawn from entropy when absent
    pub seed: Option<u64>,
    /// Solver settings
    pub solver: SolverSettings,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Warn,
            format: OutputFormat::Table,
            precision: 8,
            seed: None,
            solver: SolverSettings::default(),
        }
    }
}

impl CliConfig {
    /// Loads the TOML file at `path` (if it exists) and `NMATH_*` variables.
    ///
    /// Nested keys use a double underscore, as in `NMATH_SOLVER__TOLERANCE`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(false));
        }
        let config: CliConfig = builder
            .add_source(
                ::config::Environment::with_prefix("NMATH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: CliConfig = ::config::Config::builder()
            .add_source(::config::File::from_str(content, ::config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=17).contains(&self.precision) {
            return Err(ConfigError::InvalidPrecision(self.precision));
        }
        if !(self.solver.tolerance > 0.0 && self.solver.tolerance.is_finite()) {
            return Err(ConfigError::InvalidSolver(format!(
                "tolerance must be positive, got {}",
                self.solver.tolerance
            )));
        }
        if self.solver.max_iterations == 0 {
            return Err(ConfigError::InvalidSolver(
                "max_iterations must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, overrides: &Overrides) -> Result<(), ConfigError> {
        if let Some(level) = &overrides.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        if let Some(format) = &overrides.format {
            self.format = OutputFormat::from_str(format)?;
        }
        if let Some(precision) = overrides.precision {
            self.precision = precision;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        self.validate()
    }

    /// Renders the effective configuration as TOML.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Log level override
    pub log_level: Option<String>,
    /// Output format override
    pub format: Option<String>,
    /// Precision override
    pub precision: Option<usize>,
    /// Seed override
    pub seed: Option<u64>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(path: Option<&Path>, overrides: &Overrides) -> Result<CliConfig, ConfigError> {
    let mut config = CliConfig::load(path)?;
    config.merge_with_cli(overrides)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.format, OutputFormat::Table);
        assert_eq!(config.precision, 8);
        assert_eq!(config.seed, None);
        assert_eq!(config.solver.max_iterations, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert!(LogLevel::from_str("loud").is_err());
        assert_eq!(LogLevel::Error.to_string(), "error");
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(matches!(
            OutputFormat::from_str("csv"),
            Err(ConfigError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_from_toml() {
        let config = CliConfig::from_toml(
            r#"
            log_level = "debug"
            format = "json"
            seed = 17

            [solver]
            tolerance = 1e-12
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.seed, Some(17));
        assert_eq!(config.solver.tolerance, 1e-12);
        assert_eq!(config.solver.max_iterations, 1000);
        assert_eq!(config.precision, 8);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            CliConfig::from_toml("precision = 0"),
            Err(ConfigError::InvalidPrecision(0))
        ));
        assert!(matches!(
            CliConfig::from_toml("[solver]\ntolerance = -1.0"),
            Err(ConfigError::InvalidSolver(_))
        ));
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = CliConfig::default();
        config
            .merge_with_cli(&Overrides {
                log_level: Some("info".to_string()),
                format: Some("json".to_string()),
                precision: Some(12),
                seed: Some(5),
            })
            .unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.precision, 12);
        assert_eq!(config.seed, Some(5));

        assert!(config
            .merge_with_cli(&Overrides {
                format: Some("xml".to_string()),
                ..Overrides::default()
            })
            .is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = CliConfig {
            seed: Some(3),
            ..CliConfig::default()
        };
        assert_eq!(CliConfig::from_toml(&config.to_toml()).unwrap(), config);
    }
}
