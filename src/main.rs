//! CLI entry point for the Urban Mobility tool.
//!
//! Provides subcommands for downloading raw TLC trip data, running the ETL
//! pipeline over it, and computing analytics on the processed records.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use urban_mobility::api;
use urban_mobility::config::PipelineConfig;
use urban_mobility::etl::{self, load};
use urban_mobility::fetch::{BasicClient, download_to};
use urban_mobility::output::print_json;

#[derive(Parser)]
#[command(name = "urban_mobility")]
#[command(about = "A tool to process and analyze NYC taxi trip data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a raw trip data file into the data directory
    Fetch {
        /// URL of a trip data CSV (plain or gzipped)
        #[arg(value_name = "URL")]
        url: String,

        /// File name to save as (defaults to the last URL segment)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Run the ETL pipeline: load, clean, engineer features, write processed data
    Pipeline {
        /// Path to the raw trip CSV (plain or gzipped)
        #[arg(value_name = "RAW_CSV")]
        input: String,

        /// Path to the zone lookup CSV (defaults to the data directory copy)
        #[arg(short, long)]
        zones: Option<String>,

        /// Maximum number of raw rows to load
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Run analytics over a processed CSV and print the results as JSON
    Analyze {
        /// Path to a processed trip CSV produced by the pipeline
        #[arg(value_name = "PROCESSED_CSV")]
        input: String,

        /// How many routes and fares to include in the rankings
        #[arg(short, long, default_value_t = 10)]
        top: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/urban_mobility.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("urban_mobility.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let config = PipelineConfig::from_env();
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch { url, output } => {
            let file_name = match output {
                Some(name) => name,
                None => url
                    .rsplit('/')
                    .next()
                    .filter(|s| !s.is_empty())
                    .unwrap_or("tripdata.csv")
                    .to_string(),
            };
            let dest = config.data_dir.join(file_name);

            let client = BasicClient::new();
            let bytes = download_to(&client, &url, &dest).await?;
            info!(bytes, dest = %dest.display(), "Raw trip data saved");
        }
        Commands::Pipeline {
            input,
            zones,
            limit,
        } => {
            let zones_path = zones
                .map(PathBuf::from)
                .unwrap_or_else(|| config.zone_lookup_path());

            let report = etl::run_pipeline(&config, Path::new(&input), &zones_path, limit)?;
            print_json(&report)?;
        }
        Commands::Analyze { input, top } => {
            let trips = load::load_processed(Path::new(&input))?;
            let report = api::analyze_trips(&trips, top);
            print_json(&report)?;
        }
    }

    Ok(())
}
