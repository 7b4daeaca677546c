//! # rightsizing
//!
//! Command-line interface for forecasting and rightsizing. Runs the
//! computation locally, or against a running server with `--server`.

mod client;
mod input;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::RpcClient;
use forecast_facade::{ForecastConfig, Zone};
use rightsizing::{PercentileEstimator, DEFAULT_MARGIN, DEFAULT_QUANTILE};
use rightsizing_server::wire::{
    to_points, to_wire, ForecastRequest, ForecastResponse, RightsizingRequest, RightsizingResponse,
};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rightsizing")]
#[command(about = "Utilisation forecasting and rightsizing CLI", version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend an allocation from utilisation samples
    Rightsize {
        /// Input file (CSV or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Column name or index holding the samples
        #[arg(short, long)]
        column: Option<String>,

        /// Percentile to recommend at (0-100)
        #[arg(short, long, default_value_t = DEFAULT_QUANTILE)]
        quantile: u32,

        /// Headroom on top of the percentile
        #[arg(short, long, default_value_t = DEFAULT_MARGIN)]
        margin: f64,

        /// Server URL; computes locally when omitted
        #[arg(short, long)]
        server: Option<String>,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Forecast the next hours of a timestamped series
    Forecast {
        /// Input file with timestamp,value rows (CSV or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Step between forecast timestamps
        #[arg(short, long)]
        frequency: Option<String>,

        /// Zone for local time, e.g. +09:00 (default: local zone)
        #[arg(long)]
        utc_offset: Option<String>,

        /// Server URL; computes locally when omitted
        #[arg(short, long)]
        server: Option<String>,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn request_id() -> String {
    format!(
        "cli-{}-{}",
        std::process::id(),
        chrono::Utc::now().timestamp_millis()
    )
}

/// Write a response to file or stdout
fn write_output<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            serde_json::to_writer_pretty(&mut file, value).context("failed to write JSON")?;
            eprintln!("Results written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

fn run_rightsize(
    input: &Path,
    column: Option<&str>,
    quantile: u32,
    margin: f64,
    server: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let data = input::load_values(input, column)?;
    eprintln!("Loaded {} samples from {}", data.len(), input.display());

    let request = RightsizingRequest {
        id: request_id(),
        data,
        quantile: Some(quantile),
    };

    let response = match server {
        Some(url) => {
            if (margin - DEFAULT_MARGIN).abs() > f64::EPSILON {
                tracing::warn!("--margin is ignored in server mode; the server applies its own");
            }
            RpcClient::new(url)?.rightsizing(&request)?
        }
        None => {
            let estimator = PercentileEstimator::with_margin(margin)?;
            let result = estimator.estimate(&request.data, quantile)?;
            RightsizingResponse {
                id: request.id,
                result,
            }
        }
    };

    write_output(&response, output)
}

fn run_forecast(
    input: &Path,
    frequency: Option<String>,
    utc_offset: Option<&str>,
    server: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let data = input::load_series(input)?;
    eprintln!("Loaded {} points from {}", data.len(), input.display());

    let request = ForecastRequest {
        id: request_id(),
        data,
        frequency,
    };

    let response = match server {
        Some(url) => RpcClient::new(url)?.forecast(&request)?,
        None => {
            let zone = match utc_offset {
                Some(offset) => Zone::parse(offset)?,
                None => Zone::Local,
            };
            let config = ForecastConfig {
                zone,
                ..ForecastConfig::default()
            };
            let engine = config.build()?;
            let points = to_points(zone, &request.data)?;
            let result = engine.forecast(&points, request.frequency.as_deref())?;
            ForecastResponse {
                id: request.id,
                result: to_wire(zone, &result),
            }
        }
    };

    write_output(&response, output)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rightsizing=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rightsize {
            input,
            column,
            quantile,
            margin,
            server,
            output,
        } => run_rightsize(
            &input,
            column.as_deref(),
            quantile,
            margin,
            server.as_deref(),
            output.as_deref(),
        ),
        Commands::Forecast {
            input,
            frequency,
            utc_offset,
            server,
            output,
        } => run_forecast(
            &input,
            frequency,
            utc_offset.as_deref(),
            server.as_deref(),
            output.as_deref(),
        ),
    }
}
