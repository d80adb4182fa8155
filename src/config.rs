//! Environment-backed configuration for the pipeline, passed explicitly to
//! whatever needs it. There is no process-global state here.

use std::path::PathBuf;

use anyhow::Result;

/// Directory layout for a pipeline run. Read once at startup from the
/// environment (a `.env` file is honored via dotenvy in `main`) with
/// defaults that match the repository layout.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub rejected_dir: PathBuf,
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        Self {
            data_dir: env_path("DATA_DIR", "data/raw"),
            processed_dir: env_path("PROCESSED_DIR", "data/processed"),
            rejected_dir: env_path("REJECTED_DIR", "data/rejected"),
        }
    }

    /// Default location of the zone lookup table inside the data directory.
    pub fn zone_lookup_path(&self) -> PathBuf {
        self.data_dir.join("taxi_zone_lookup.csv")
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.processed_dir)?;
        std::fs::create_dir_all(&self.rejected_dir)?;
        Ok(())
    }
}

fn env_path(var: &str, default: &str) -> PathBuf {
    std::env::var(var).unwrap_or_else(|_| default.to_string()).into()
}
