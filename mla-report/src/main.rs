//! mla-report - Music listening analytics batch job
//!
//! Loads the listening, song, user and singer CSV tables, enriches listening
//! events, computes the twelve reports and writes them to one timestamped
//! file in the output directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mla_common::config::{AnalyticsConfig, ConfigOverrides, ConfigResolver, OutputFormat};
use mla_report::Pipeline;
use tracing::{error, info, warn};

/// Command-line arguments for mla-report
#[derive(Parser, Debug)]
#[command(name = "mla-report")]
#[command(about = "Descriptive analytics over music listening data")]
#[command(version)]
struct CliArgs {
    /// TOML config file (default: <config dir>/mla/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding listening.csv, songs.csv, users.csv and singer.csv
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Directory receiving the report file
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format: text or json
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Compute reports on the rayon pool
    #[arg(long, overrides_with = "sequential")]
    parallel: bool,

    /// Compute reports on a single thread
    #[arg(long, overrides_with = "parallel")]
    sequential: bool,

    /// Fail on duplicate dimension keys instead of warning
    #[arg(long, overrides_with = "no_strict_keys")]
    strict_keys: bool,

    /// Warn on duplicate dimension keys and keep going
    #[arg(long, overrides_with = "strict_keys")]
    no_strict_keys: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,

    /// Load and enrich the input without writing a report
    #[arg(long)]
    check_only: bool,
}

impl CliArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_file: self.config.clone(),
            data_dir: self.data_dir.clone(),
            output_dir: self.output_dir.clone(),
            format: self.format,
            parallel: flag_pair(self.parallel, self.sequential),
            strict_keys: flag_pair(self.strict_keys, self.no_strict_keys),
            log_level: self.log_level.clone(),
        }
    }
}

/// `Some` when either flag of an on/off pair was given, `None` otherwise
fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn init_tracing(config: &AnalyticsConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let resolution = ConfigResolver::new(args.overrides())
        .resolve_with_diagnostics()
        .context("Failed to resolve configuration")?;

    init_tracing(&resolution.config);

    info!(
        "Starting music listening analytics (mla-report) v{}",
        env!("CARGO_PKG_VERSION")
    );
    match &resolution.config_file {
        Some(path) => info!("Loaded config file {}", path.display()),
        None => info!("No config file, using environment and defaults"),
    }
    for warning in &resolution.warnings {
        warn!("{}", warning);
    }

    let pipeline = Pipeline::new(resolution.config);

    if args.check_only {
        pipeline
            .check()
            .inspect_err(|e| error!("Input check failed: {}", e))
            .context("Input check failed")?;
        info!("Input check passed, no report written");
        return Ok(());
    }

    let outcome = pipeline
        .run()
        .inspect_err(|e| error!("Pipeline failed: {}", e))
        .context("Analytics pipeline failed")?;

    info!("Report written to {}", outcome.output_path.display());
    Ok(())
}
