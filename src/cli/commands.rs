//! CLI definition for the basic cleaning step.
//!
//! The step takes exactly six required flags (artifact names, output
//! metadata, and the price range) plus the global log level. The flag
//! names keep their underscore form so existing pipeline configs keep
//! working unchanged.

use clap::Parser;
use tracing::info;

use crate::clean::{self, CleanConfig};
use crate::store::StoreClient;

/// Basic data cleaning step: download the raw listings artifact, drop
/// price outliers and out-of-range coordinates, publish the result.
#[derive(Parser, Debug)]
#[command(name = "rental-cleaner")]
#[command(about = "Download a raw dataset artifact, apply basic cleaning, publish the result")]
#[command(version)]
pub struct Cli {
    /// The name of the input artifact.
    #[arg(long = "input_artifact")]
    pub input_artifact: String,

    /// The name of the output artifact.
    #[arg(long = "output_artifact")]
    pub output_artifact: String,

    /// The type for the output artifact.
    #[arg(long = "output_type")]
    pub output_type: String,

    /// Description of the output artifact.
    #[arg(long = "output_description")]
    pub output_description: String,

    /// The minimum price to consider (inclusive).
    #[arg(long = "min_price")]
    pub min_price: f64,

    /// The maximum price to consider (inclusive).
    #[arg(long = "max_price")]
    pub max_price: f64,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

/// Parses command-line arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Runs the cleaning step with parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    let client = StoreClient::from_env()?;
    let config = CleanConfig {
        input_artifact: cli.input_artifact,
        output_artifact: cli.output_artifact,
        output_type: cli.output_type,
        output_description: cli.output_description,
        min_price: cli.min_price,
        max_price: cli.max_price,
    };

    let work_dir = std::env::current_dir()?;
    let report = clean::run(&client, config, &work_dir).await?;

    info!(
        rows_in = report.rows_in,
        rows_out = report.rows_out,
        dropped_price = report.counts.dropped_price,
        dropped_geo = report.counts.dropped_geo,
        artifact = %report.published_artifact,
        version = %report.published_version,
        "Cleaning step complete"
    );
    Ok(())
}
