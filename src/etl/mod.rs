//! The offline ETL pipeline: load raw trips, clean, engineer features, and
//! persist the processed records plus a run report.

pub mod clean;
pub mod features;
pub mod load;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::PipelineConfig;
use crate::output;

/// Outcome of one pipeline run, persisted as JSON next to the processed CSV.
#[derive(Debug, Serialize)]
pub struct PipelineReport {
    pub generated_at: DateTime<Utc>,
    pub input_rows: usize,
    pub cleaned_rows: usize,
    pub processed_rows: usize,
    pub exclusions: Vec<clean::Exclusion>,
    pub features: Vec<features::FeatureSummary>,
    pub processed_path: PathBuf,
    pub rejected_path: PathBuf,
}

/// Runs the full pipeline over one raw trip file.
///
/// Steps: load raw rows (optionally capped), load the zone lookup, clean,
/// write rejected rows, engineer features, write the processed CSV, then
/// write the JSON run report.
#[tracing::instrument(skip(config), fields(input = %input.display()))]
pub fn run_pipeline(
    config: &PipelineConfig,
    input: &Path,
    zones_path: &Path,
    row_limit: Option<usize>,
) -> Result<PipelineReport> {
    config.ensure_dirs()?;

    let raw = load::load_trips(input, row_limit)?;
    let input_rows = raw.len();
    let zones = load::load_zone_lookup(zones_path)?;

    let outcome = clean::clean_trips(raw);

    let rejected_path = config.rejected_dir.join("rejected_trips.csv");
    for row in &outcome.rejected {
        output::append_record(&rejected_path, row)?;
    }
    if !outcome.rejected.is_empty() {
        info!(
            rejected = outcome.rejected.len(),
            path = %rejected_path.display(),
            "Wrote rejected records"
        );
    }

    let cleaned_rows = outcome.kept.len();
    let records = features::engineer_features(outcome.kept, &zones);

    let processed_path = config.processed_dir.join("processed_trips.csv");
    output::write_records(&processed_path, &records)?;
    info!(
        rows = records.len(),
        path = %processed_path.display(),
        "Wrote processed trips"
    );

    let report = PipelineReport {
        generated_at: Utc::now(),
        input_rows,
        cleaned_rows,
        processed_rows: records.len(),
        exclusions: outcome.report.exclusions,
        features: features::feature_summary(&records),
        processed_path,
        rejected_path,
    };

    let report_path = config.processed_dir.join("pipeline_report.json");
    let file = std::fs::File::create(&report_path)
        .with_context(|| format!("creating {}", report_path.display()))?;
    serde_json::to_writer_pretty(file, &report)?;
    info!(path = %report_path.display(), "Wrote pipeline report");

    Ok(report)
}
