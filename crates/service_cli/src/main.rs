//! nmath CLI - Command Line Access to Distributions and Numerical Utilities
//!
//! # Commands
//!
//! - `nmath density|cdf|quantile <dist> -p <params> <values>...` - evaluate d/p/q functions
//! - `nmath describe <dist> -p <params>` - mean and variance
//! - `nmath sample <dist> -p <params> -n <count>` - random variates
//! - `nmath multinom --size <n> --prob <weights>` - multinomial counts
//! - `nmath solve <dist> -p <params> --prob <p>` - invert a distribution function numerically
//! - `nmath mode <dist> -p <params>` - maximise a density
//! - `nmath spline|approx --x .. --y .. --at ..` - interpolation
//! - `nmath dist|cor|cov <file>` - distances and correlations of a numeric table
//! - `nmath check` - reproduce reference values
//!
//! # Configuration
//!
//! Defaults are overridden by the TOML file given with `--config`, then by
//! `NMATH_*` environment variables, then by flags.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use error::{CliError, Result};

use commands::evaluate::Function;
use commands::stats::{ApproxRequest, SplineKind, TieRule};
use commands::{Context, DistArgs};
use crate::config::{build_config, Overrides};

/// Distribution functions, random variates and numerical utilities
#[derive(Parser)]
#[command(name = "nmath")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (same as `--log-level debug`)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "nmath.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Significant digits in table output
    #[arg(long, global = true)]
    precision: Option<usize>,

    /// Seed for random variates
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the density or probability mass
    Density {
        #[command(flatten)]
        dist: DistArgs,

        /// Points to evaluate
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,

        /// Return the log density
        #[arg(long)]
        log: bool,
    },

    /// Evaluate the distribution function
    Cdf {
        #[command(flatten)]
        dist: DistArgs,

        /// Quantiles to evaluate
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,

        /// Upper tail P[X > q]
        #[arg(long)]
        upper: bool,

        /// Return log probabilities
        #[arg(long)]
        log: bool,
    },

    /// Evaluate the quantile function
    Quantile {
        #[command(flatten)]
        dist: DistArgs,

        /// Probabilities to invert
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,

        /// Probabilities are upper-tail
        #[arg(long)]
        upper: bool,

        /// Probabilities are given as logs
        #[arg(long)]
        log: bool,
    },

    /// Show mean and variance of a distribution
    Describe {
        #[command(flatten)]
        dist: DistArgs,
    },

    /// Draw random variates
    Sample {
        #[command(flatten)]
        dist: DistArgs,

        /// Number of draws
        #[arg(short, long, default_value = "10")]
        n: usize,
    },

    /// Draw multinomial count vectors
    Multinom {
        /// Trials per draw
        #[arg(long)]
        size: u64,

        /// Comma-separated category weights
        #[arg(long, value_delimiter = ',', required = true)]
        prob: Vec<f64>,

        /// Number of draws
        #[arg(short, long, default_value = "1")]
        n: usize,
    },

    /// Solve cdf(x) = p with Brent's method
    Solve {
        #[command(flatten)]
        dist: DistArgs,

        /// Target probability
        #[arg(long)]
        prob: f64,

        /// Lower end of the bracket
        #[arg(long, allow_negative_numbers = true, default_value = "-100")]
        lower: f64,

        /// Upper end of the bracket
        #[arg(long, allow_negative_numbers = true, default_value = "100")]
        upper: f64,

        /// Target is an upper-tail probability
        #[arg(long)]
        upper_tail: bool,
    },

    /// Locate the mode of a density with Brent's minimiser
    Mode {
        #[command(flatten)]
        dist: DistArgs,

        /// Lower end of the search interval
        #[arg(long, allow_negative_numbers = true)]
        lower: f64,

        /// Upper end of the search interval
        #[arg(long, allow_negative_numbers = true)]
        upper: f64,
    },

    /// Evaluate an interpolating cubic spline
    Spline {
        /// Knot abscissae
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true, required = true)]
        x: Vec<f64>,

        /// Knot ordinates
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true, required = true)]
        y: Vec<f64>,

        /// Evaluation points
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true, required = true)]
        at: Vec<f64>,

        /// End conditions
        #[arg(short, long, value_enum, default_value = "fmm")]
        method: SplineKind,

        /// Derivative order (0 to 3)
        #[arg(short, long, default_value = "0")]
        deriv: u32,
    },

    /// Linear or constant interpolation
    Approx {
        /// Knot abscissae
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true, required = true)]
        x: Vec<f64>,

        /// Knot ordinates
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true, required = true)]
        y: Vec<f64>,

        /// Evaluation points
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true, required = true)]
        at: Vec<f64>,

        /// Step function instead of straight lines
        #[arg(long)]
        constant: bool,

        /// Weight of the right-hand knot for step functions
        #[arg(long, default_value = "0")]
        f: f64,

        /// Extend the end values outside the knot range
        #[arg(long)]
        nearest: bool,

        /// Rule for tied abscissae
        #[arg(long, value_enum, default_value = "mean")]
        ties: TieRule,
    },

    /// Pairwise distances between the rows of a numeric table
    Dist {
        /// Table file, comma or whitespace separated
        file: PathBuf,

        /// euclidean, maximum, manhattan, canberra, binary or minkowski
        #[arg(short, long, default_value = "euclidean")]
        method: String,

        /// Minkowski exponent
        #[arg(short, default_value = "2")]
        p: f64,
    },

    /// Correlation matrix of the columns of a numeric table
    Cor {
        /// Table file, comma or whitespace separated
        file: PathBuf,

        /// everything, all.obs, complete.obs, na.or.complete or pairwise.complete.obs
        #[arg(short, long = "use", default_value = "everything")]
        policy: String,
    },

    /// Covariance matrix of the columns of a numeric table
    Cov {
        /// Table file, comma or whitespace separated
        file: PathBuf,

        /// everything, all.obs, complete.obs, na.or.complete or pairwise.complete.obs
        #[arg(short, long = "use", default_value = "everything")]
        policy: String,
    },

    /// Reproduce reference values
    Check,

    /// Print the effective configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = Overrides {
        log_level: cli
            .log_level
            .clone()
            .or_else(|| cli.verbose.then(|| "debug".to_string())),
        format: cli.format.clone(),
        precision: cli.precision,
        seed: cli.seed,
    };
    let config = build_config(Some(cli.config.as_path()), &overrides)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    // Initialise tracing; RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_filter_str())),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(log_level = %config.log_level, "configuration loaded");
    let ctx = Context { config };

    dispatch(&ctx, cli.command)?;
    Ok(())
}

fn dispatch(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Density { dist, values, log } => {
            commands::evaluate::run(ctx, Function::Density, &dist, &values, false, log)
        }
        Commands::Cdf {
            dist,
            values,
            upper,
            log,
        } => commands::evaluate::run(ctx, Function::Cdf, &dist, &values, upper, log),
        Commands::Quantile {
            dist,
            values,
            upper,
            log,
        } => commands::evaluate::run(ctx, Function::Quantile, &dist, &values, upper, log),
        Commands::Describe { dist } => commands::evaluate::run_describe(ctx, &dist),
        Commands::Sample { dist, n } => commands::sample::run(ctx, &dist, n),
        Commands::Multinom { size, prob, n } => {
            commands::sample::run_multinomial(ctx, size, &prob, n)
        }
        Commands::Solve {
            dist,
            prob,
            lower,
            upper,
            upper_tail,
        } => commands::solve::run(ctx, &dist, prob, lower, upper, upper_tail),
        Commands::Mode { dist, lower, upper } => commands::solve::run_mode(ctx, &dist, lower, upper),
        Commands::Spline {
            x,
            y,
            at,
            method,
            deriv,
        } => commands::stats::run_spline(ctx, method, &x, &y, &at, deriv),
        Commands::Approx {
            x,
            y,
            at,
            constant,
            f,
            nearest,
            ties,
        } => {
            let request = ApproxRequest {
                constant,
                f,
                nearest,
                ties,
            };
            commands::stats::run_approx(ctx, &x, &y, &at, &request)
        }
        Commands::Dist { file, method, p } => commands::stats::run_dist(ctx, &file, &method, p),
        Commands::Cor { file, policy } => commands::stats::run_covcor(ctx, &file, &policy, true),
        Commands::Cov { file, policy } => commands::stats::run_covcor(ctx, &file, &policy, false),
        Commands::Check => commands::check::run(ctx),
        Commands::Config => {
            println!("{}", ctx.config.to_toml());
            Ok(())
        }
    }
}
